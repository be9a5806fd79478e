//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (apps/api)                                                     │
//! │       │                                                                 │
//! │       │  db.products().find_owned(id, user_id)                         │
//! │       ▼                                                                 │
//! │  ProductRepository / UserRepository / ProfileRepository                │
//! │       │                                                                 │
//! │       │  SQL Query (runtime-checked, bound parameters)                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Owner-scoped product CRUD and listings
//! - [`user::UserRepository`] - Accounts (email, password hash)
//! - [`user::ProfileRepository`] - Optional per-user profile

pub mod product;
pub mod user;
