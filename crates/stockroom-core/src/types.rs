//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐   ┌─────────────────┐  │
//! │  │      User       │ 1    * │    Product      │   │   SortOrder     │  │
//! │  │  ─────────────  │───────►│  ─────────────  │   │  ─────────────  │  │
//! │  │  id (i64)       │        │  id (i64)       │   │  Asc            │  │
//! │  │  email          │        │  user_id (FK)   │   │  Desc           │  │
//! │  │  password_hash  │        │  name (unique   │   └─────────────────┘  │
//! │  └────────┬────────┘        │   per owner)    │                        │
//! │           │ 1               │  price_cents    │                        │
//! │           │                 │  cost_cents?    │                        │
//! │           ▼ 0..1            │  inactive       │                        │
//! │  ┌─────────────────┐        └─────────────────┘                        │
//! │  │   UserProfile   │                                                   │
//! │  │  username?      │                                                   │
//! │  │  avatar_url?    │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A product belongs to exactly one user for its whole lifetime. No type in
//! this crate exposes a way to change `user_id` after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Identifier of a user, assigned by the store.
pub type UserId = i64;

/// Identifier of a product, assigned by the store.
pub type ProductId = i64;

// =============================================================================
// Product
// =============================================================================

/// A product record owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier, assigned at creation.
    pub id: ProductId,

    /// Owner of the product.
    pub user_id: UserId,

    /// Display name, unique among the owner's products.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Units currently in stock.
    pub available_stock: i64,

    /// Sale price in cents.
    pub price_cents: i64,

    /// Purchase cost in cents. `None` means unknown.
    pub cost_cents: Option<i64>,

    /// Where the product is sold (marketplace, shop, ...).
    pub platform: Option<String>,

    /// Product image.
    pub img_url: Option<String>,

    /// Soft-archive marker. Does not affect analytics or ownership.
    pub inactive: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last written.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the cost as a Money type, if known.
    #[inline]
    pub fn cost(&self) -> Option<Money> {
        self.cost_cents.map(Money::from_cents)
    }

    /// Price minus cost. `None` when the cost is unknown.
    ///
    /// ## Example
    /// ```text
    /// price 12.50, cost 10.00 → margin  2.50 (profitable)
    /// price  8.00, cost 10.00 → margin -2.00 (sold at a loss)
    /// ```
    pub fn margin(&self) -> Option<Money> {
        self.cost().map(|cost| self.price() - cost)
    }

    /// Value of the stock on hand at sale price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price() * self.available_stock
    }
}

/// Snapshot of a product returned by a hard delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeletedProduct {
    #[serde(flatten)]
    pub product: Product,

    /// When the row was removed.
    #[ts(as = "String")]
    pub deleted_at: DateTime<Utc>,
}

// =============================================================================
// Sort Order
// =============================================================================

/// Ordering of a product listing by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this ordering.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// =============================================================================
// Users
// =============================================================================

/// An account known to the identity provider.
///
/// Accounts are created outside this system; Stockroom reads them and lets
/// the owner change their email and password.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub plan_code: String,
    pub plan_expires: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Public part of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserAccount {
    pub email: String,
    pub plan_code: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserAccount {
    fn from(user: User) -> Self {
        UserAccount {
            email: user.email,
            plan_code: user.plan_code,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Optional profile attached to a user (at most one per user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: UserId,
    /// Unique across all users.
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
}

/// What `GET /user/user` returns: account basics plus profile highlights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserSummary {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub avatar: Option<String>,
    #[ts(as = "Option<String>")]
    pub last_login: Option<DateTime<Utc>>,
}

impl UserSummary {
    /// Combines an account with its (possibly missing) profile.
    pub fn new(user: &User, profile: Option<&UserProfile>) -> Self {
        UserSummary {
            email: user.email.clone(),
            username: profile.and_then(|p| p.username.clone()),
            avatar: profile.and_then(|p| p.avatar_url.clone()),
            last_login: user.last_login,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price_cents: i64, cost_cents: Option<i64>, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            user_id: 1,
            name: "Desk Lamp".to_string(),
            description: None,
            available_stock: stock,
            price_cents,
            cost_cents,
            platform: None,
            img_url: None,
            inactive: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_margin() {
        assert_eq!(product(1250, Some(1000), 0).margin(), Some(Money::from_cents(250)));
        assert_eq!(product(800, Some(1000), 0).margin(), Some(Money::from_cents(-200)));
        assert_eq!(product(800, None, 0).margin(), None);
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(product(299, None, 3).stock_value().cents(), 897);
    }

    #[test]
    fn test_sort_order_default_and_serde() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        let order: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, SortOrder::Asc);
        assert_eq!(order.as_sql(), "ASC");
    }

    #[test]
    fn test_deleted_product_flattens() {
        let deleted = DeletedProduct {
            product: product(100, None, 1),
            deleted_at: Utc::now(),
        };
        let json = serde_json::to_value(&deleted).unwrap();
        assert_eq!(json["name"], "Desk Lamp");
        assert!(json.get("deleted_at").is_some());
    }

    #[test]
    fn test_user_summary_without_profile() {
        let now = Utc::now();
        let user = User {
            id: 7,
            email: "owner@example.com".to_string(),
            password_hash: "x".to_string(),
            plan_code: "free".to_string(),
            plan_expires: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
            last_login: None,
        };
        let summary = UserSummary::new(&user, None);
        assert_eq!(summary.email, "owner@example.com");
        assert!(summary.username.is_none());
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("username").is_none());
    }

    #[test]
    fn test_user_summary_binding_marks_omitted_keys_optional() {
        let decl = UserSummary::decl();
        assert!(decl.contains("username?: string"), "{decl}");
        assert!(decl.contains("avatar?: string"), "{decl}");
        assert!(decl.contains("last_login: string | null"), "{decl}");
    }
}
