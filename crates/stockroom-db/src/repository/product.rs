//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Ownership Scoping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every statement that touches a single product carries BOTH keys:      │
//! │                                                                         │
//! │     WHERE id = ?1 AND user_id = ?2                                     │
//! │                                                                         │
//! │  find_owned ──► SELECT  (guard before mutating)                        │
//! │  apply_changes ► UPDATE (same predicate, never by id alone)            │
//! │  toggle_inactive UPDATE                                                │
//! │  delete_owned ─► DELETE                                                │
//! │                                                                         │
//! │  A product that exists but belongs to someone else is indistinguishable│
//! │  from one that does not exist.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{NewProduct, Product, ProductChanges, ProductId, SortOrder, UserId};

const PRODUCT_COLUMNS: &str = r#"
    id,
    user_id,
    name,
    description,
    available_stock,
    price_cents,
    cost_cents,
    platform,
    img_url,
    inactive,
    created_at,
    updated_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Ownership guard
/// let product = repo.find_owned(product_id, user_id).await?;
///
/// // Everything one owner has, newest first
/// let products = repo.list_for_owner(user_id, SortOrder::Desc).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Resolves a product by id and owner in one query.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - The product exists and belongs to `owner`
    /// * `Ok(None)` - Missing, or owned by someone else
    pub async fn find_owned(&self, id: ProductId, owner: UserId) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = ?1 AND user_id = ?2",
            PRODUCT_COLUMNS
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Checks whether `owner` already has a product called `name`.
    ///
    /// `exclude` skips one product id, so a product never conflicts with its
    /// own current name.
    pub async fn name_taken(
        &self,
        owner: UserId,
        name: &str,
        exclude: Option<ProductId>,
    ) -> DbResult<bool> {
        let taken: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM products
                WHERE user_id = ?1 AND name = ?2 AND (?3 IS NULL OR id <> ?3)
            )
            "#,
        )
        .bind(owner)
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken != 0)
    }

    /// Inserts a new active product and returns the stored row.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The re-loaded row with its assigned id
    /// * `Err(DbError::UniqueViolation)` - `(owner, name)` already exists
    /// * `Err(DbError::ForeignKeyViolation)` - `owner` is not a user
    pub async fn insert(
        &self,
        owner: UserId,
        product: &NewProduct,
        now: DateTime<Utc>,
    ) -> DbResult<Product> {
        debug!(user_id = owner, name = %product.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                user_id, name, description, available_stock,
                price_cents, cost_cents, platform, img_url,
                inactive, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                0, ?9, ?9
            )
            "#,
        )
        .bind(owner)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.available_stock)
        .bind(product.price.cents())
        .bind(product.cost.map(|c| c.cents()))
        .bind(&product.platform)
        .bind(&product.img_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_owned(id, owner)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Writes the present fields of a validated patch.
    ///
    /// Nullable columns use a flag/value pair so that "clear" and "leave
    /// alone" stay distinct. `updated_at` is always refreshed.
    ///
    /// ## Returns
    /// `true` if a row owned by `owner` was updated.
    pub async fn apply_changes(
        &self,
        id: ProductId,
        owner: UserId,
        changes: &ProductChanges,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id, user_id = owner, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name            = COALESCE(?3, name),
                description     = COALESCE(?4, description),
                available_stock = COALESCE(?5, available_stock),
                price_cents     = COALESCE(?6, price_cents),
                cost_cents      = CASE WHEN ?7 THEN ?8 ELSE cost_cents END,
                platform        = COALESCE(?9, platform),
                img_url         = CASE WHEN ?10 THEN ?11 ELSE img_url END,
                updated_at      = ?12
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.available_stock)
        .bind(changes.price.map(|p| p.cents()))
        .bind(changes.cost.is_some())
        .bind(changes.cost.flatten().map(|c| c.cents()))
        .bind(&changes.platform)
        .bind(changes.img_url.is_some())
        .bind(changes.img_url.clone().flatten())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips the `inactive` flag.
    ///
    /// ## Returns
    /// `true` if a row owned by `owner` was updated.
    pub async fn toggle_inactive(
        &self,
        id: ProductId,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(id, user_id = owner, "Toggling product state");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET inactive = NOT inactive, updated_at = ?3
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-deletes a product.
    ///
    /// ## Returns
    /// `true` if a row owned by `owner` was removed.
    pub async fn delete_owned(&self, id: ProductId, owner: UserId) -> DbResult<bool> {
        debug!(id, user_id = owner, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the owner's products by creation time, ties broken by id.
    pub async fn list_for_owner(&self, owner: UserId, order: SortOrder) -> DbResult<Vec<Product>> {
        // Direction comes from a closed enum, never from request text
        let sql = format!(
            "SELECT {columns} FROM products WHERE user_id = ?1 \
             ORDER BY created_at {dir}, id {dir}",
            columns = PRODUCT_COLUMNS,
            dir = order.as_sql()
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id = owner, count = products.len(), "Listed products");
        Ok(products)
    }

    /// Loads the owner's full product set in insertion order.
    ///
    /// This is the single read every analytics summary folds over.
    pub async fn all_for_owner(&self, owner: UserId) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE user_id = ?1 ORDER BY id",
            PRODUCT_COLUMNS
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Counts all products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Tests
// =============================================================================
