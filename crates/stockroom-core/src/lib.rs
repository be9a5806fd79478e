//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! Everything Stockroom decides about a product or an account, expressed as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    routes ──► services ──► repositories                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   input   │  │validation │  │ analytics │  │   │
//! │  │   │  Product  │  │ FieldInput│  │  per-field│  │  rankings │  │   │
//! │  │   │   User    │  │  Patches  │  │   rules   │  │ low stock │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, UserProfile, SortOrder)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`input`] - Request payloads with absent/null/value fields
//! - [`validation`] - Field validation and normalization
//! - [`analytics`] - Stock valuation, profitability, low-stock detection
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::input::ProductDraft;
//! use stockroom_core::analytics::stock_summary;
//!
//! let draft: ProductDraft = serde_json::from_str(
//!     r#"{"name": "Desk Lamp", "available_stock": 4, "price": "12.495"}"#,
//! ).unwrap();
//!
//! let product = draft.validate().unwrap();
//! assert_eq!(product.price.cents(), 1250);
//! # let _ = stock_summary(&[]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod input;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::LowStockPolicy;
pub use error::{CoreError, CoreResult, ValidationError};
pub use input::{FieldInput, NewProduct, ProductChanges, ProfileChanges};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest stock count a product can hold.
pub const MAX_STOCK: i64 = 999_999;

/// Largest price or cost, in cents (999 999.99).
pub const MAX_PRICE_CENTS: i64 = 99_999_999;
