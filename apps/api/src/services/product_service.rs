//! # Product Service
//!
//! Mutations and analytics over one owner's products.
//!
//! ## Mutation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create:  validate ─► name check ─► INSERT ─► re-load                   │
//! │  patch:   non-empty ─► validate ─► guard ─► name check ─► UPDATE        │
//! │           ─► re-load                                                    │
//! │  toggle:  guard ─► UPDATE inactive = NOT inactive ─► re-load            │
//! │  delete:  guard (snapshot) ─► DELETE                                    │
//! │                                                                         │
//! │  guard = find_owned(id, owner); None → AccessDenied                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The name check is advisory: two racing requests can both pass it, and the
//! `UNIQUE(user_id, name)` index turns the loser into `DuplicateName`.

use chrono::Utc;
use stockroom_core::analytics::{
    self, LowStockReport, ProductMargin, ProfitReport, StockSummary,
};
use stockroom_core::input::{ProductDraft, ProductPatch};
use stockroom_core::{
    CoreError, DeletedProduct, LowStockPolicy, Product, ProductId, SortOrder, UserId,
};
use stockroom_db::{Database, DbError, ProductRepository};
use tracing::info;

use super::{ServiceError, ServiceResult};

/// Product operations for authenticated owners.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
    low_stock_policy: LowStockPolicy,
}

impl ProductService {
    pub fn new(db: Database, low_stock_policy: LowStockPolicy) -> Self {
        ProductService {
            db,
            low_stock_policy,
        }
    }

    fn products(&self) -> ProductRepository {
        self.db.products()
    }

    /// Ownership guard: the product if `owner` owns it, `AccessDenied`
    /// whether it is missing or someone else's.
    async fn owned(&self, owner: UserId, id: ProductId) -> ServiceResult<Product> {
        self.products()
            .find_owned(id, owner)
            .await?
            .ok_or_else(|| CoreError::AccessDenied { product_id: id }.into())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates a product for `owner`.
    pub async fn create(&self, owner: UserId, draft: &ProductDraft) -> ServiceResult<Product> {
        let product = draft.validate()?;

        if self.products().name_taken(owner, &product.name, None).await? {
            return Err(duplicate_name(&product.name));
        }

        let created = self
            .products()
            .insert(owner, &product, Utc::now())
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation { .. } => CoreError::UserNotFound(owner).into(),
                e => name_conflict(e, &product.name),
            })?;

        info!(user_id = owner, product_id = created.id, "Product created");
        Ok(created)
    }

    /// Writes the fields present in `patch` and nothing else.
    pub async fn patch(
        &self,
        owner: UserId,
        id: ProductId,
        patch: &ProductPatch,
    ) -> ServiceResult<Product> {
        if patch.is_empty() {
            return Err(CoreError::EmptyPatch.into());
        }

        let changes = patch.validate()?;
        let current = self.owned(owner, id).await?;

        if let Some(name) = &changes.name {
            if *name != current.name && self.products().name_taken(owner, name, Some(id)).await? {
                return Err(duplicate_name(name));
            }
        }

        let updated = self
            .products()
            .apply_changes(id, owner, &changes, Utc::now())
            .await
            .map_err(|e| name_conflict(e, changes.name.as_deref().unwrap_or(&current.name)))?;

        // Deleted between the guard and the write
        if !updated {
            return Err(CoreError::AccessDenied { product_id: id }.into());
        }

        self.owned(owner, id).await
    }

    /// Flips the `inactive` flag.
    pub async fn toggle(&self, owner: UserId, id: ProductId) -> ServiceResult<Product> {
        self.owned(owner, id).await?;

        if !self.products().toggle_inactive(id, owner, Utc::now()).await? {
            return Err(CoreError::AccessDenied { product_id: id }.into());
        }

        self.owned(owner, id).await
    }

    /// Hard-deletes the product and returns what it looked like.
    pub async fn delete(&self, owner: UserId, id: ProductId) -> ServiceResult<DeletedProduct> {
        let product = self.owned(owner, id).await?;

        if !self.products().delete_owned(id, owner).await? {
            return Err(CoreError::AccessDenied { product_id: id }.into());
        }

        info!(user_id = owner, product_id = id, "Product deleted");
        Ok(DeletedProduct {
            product,
            deleted_at: Utc::now(),
        })
    }

    /// All of the owner's products by creation time.
    pub async fn list(&self, owner: UserId, order: SortOrder) -> ServiceResult<Vec<Product>> {
        Ok(self.products().list_for_owner(owner, order).await?)
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    async fn snapshot(&self, owner: UserId) -> ServiceResult<Vec<Product>> {
        Ok(self.products().all_for_owner(owner).await?)
    }

    pub async fn stock_summary(&self, owner: UserId) -> ServiceResult<StockSummary> {
        Ok(analytics::stock_summary(&self.snapshot(owner).await?))
    }

    pub async fn top_profitable(&self, owner: UserId) -> ServiceResult<Vec<ProductMargin>> {
        Ok(analytics::top_profitable(&self.snapshot(owner).await?))
    }

    pub async fn least_profitable(&self, owner: UserId) -> ServiceResult<Vec<ProductMargin>> {
        Ok(analytics::least_profitable(&self.snapshot(owner).await?))
    }

    pub async fn profit_report(&self, owner: UserId) -> ServiceResult<ProfitReport> {
        Ok(analytics::profit_report(&self.snapshot(owner).await?))
    }

    /// Products with fewer than `threshold` units, under the configured policy.
    pub async fn low_stock(&self, owner: UserId, threshold: i64) -> ServiceResult<LowStockReport> {
        let products = self.snapshot(owner).await?;
        Ok(analytics::low_stock(&products, threshold, self.low_stock_policy))
    }
}

fn duplicate_name(name: &str) -> ServiceError {
    CoreError::DuplicateName {
        name: name.to_string(),
    }
    .into()
}

/// Maps a lost race on `UNIQUE(user_id, name)` to `DuplicateName`.
fn name_conflict(err: DbError, name: &str) -> ServiceError {
    if err.is_unique_violation_on("products.name") {
        duplicate_name(name)
    } else {
        err.into()
    }
}
