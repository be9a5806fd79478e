//! # Stockroom API
//!
//! HTTP service for a multi-tenant product catalog: owners manage their
//! products and read stock and profit analytics over them.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockroom API Server                            │
//! │                                                                         │
//! │  Client ──► axum (HTTP_PORT) ──► AuthUser ──► Services ──► SQLite      │
//! │                                      │            │                     │
//! │                                      ▼            ▼                     │
//! │                               JwtVerifier   stockroom-core              │
//! │                               (HS256)       (validation, analytics)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config::ApiConfig`]):
//! - `DATABASE_PATH` - SQLite file (default: ./stockroom.db)
//! - `HTTP_PORT` / `BIND_ADDR` - Listener (default: 0.0.0.0:8000)
//! - `API_PREFIX` - Path prefix for every route (default: none)
//! - `JWT_SECRET`, `JWT_ISSUER`, `JWT_AUDIENCE` - Token verification (required)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `LOW_STOCK_POLICY` - `any_match` or `plural_only` (default: any_match)

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;

use std::sync::Arc;

use stockroom_db::Database;

// Re-exports
pub use auth::JwtVerifier;
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::router;

use crate::services::{ProductService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtVerifier::from_config(&config);
        AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.db.clone(), self.config.low_stock_policy)
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.db.clone())
    }
}
