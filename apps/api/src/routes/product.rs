//! Product endpoints.
//!
//! Every handler takes an [`AuthUser`]; the user id it carries scopes every
//! query, so one owner can never see or touch another's products.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use serde::Deserialize;
use stockroom_core::analytics::{LowStockReport, ProductMargin, ProfitReport, StockSummary};
use stockroom_core::input::{ProductDraft, ProductPatch};
use stockroom_core::{DeletedProduct, Product, ProductId, SortOrder};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::RouterExt;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add-product", post(create_product))
        .route("/update-product/{id}", patch(update_product))
        .route("/inactive-product/{id}", put(toggle_product))
        .route("/delete-product/{id}", delete(delete_product))
        .route("/my-products", get(my_products))
        .route_with_slash("/products-available", get(products_available))
        .route_with_slash("/top-lucrative-products", get(top_lucrative))
        .route_with_slash("/worst-lucrative-products", get(worst_lucrative))
        .route_with_slash("/estimated-profit", get(estimated_profit))
        .route("/low-stock-items/{quantity}", get(low_stock_items))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub order: SortOrder,
}

async fn create_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> ApiResult<(StatusCode, ApiJson<Product>)> {
    let product = state.products().create(user_id, &draft).await?;
    Ok((StatusCode::CREATED, ApiJson(product)))
}

async fn update_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> ApiResult<ApiJson<Product>> {
    Ok(ApiJson(state.products().patch(user_id, id, &patch).await?))
}

async fn toggle_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<ProductId>,
) -> ApiResult<ApiJson<Product>> {
    Ok(ApiJson(state.products().toggle(user_id, id).await?))
}

async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<ProductId>,
) -> ApiResult<ApiJson<DeletedProduct>> {
    Ok(ApiJson(state.products().delete(user_id, id).await?))
}

async fn my_products(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<ApiJson<Vec<Product>>> {
    Ok(ApiJson(state.products().list(user_id, params.order).await?))
}

async fn products_available(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<ApiJson<StockSummary>> {
    Ok(ApiJson(state.products().stock_summary(user_id).await?))
}

async fn top_lucrative(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<ApiJson<Vec<ProductMargin>>> {
    Ok(ApiJson(state.products().top_profitable(user_id).await?))
}

async fn worst_lucrative(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<ApiJson<Vec<ProductMargin>>> {
    Ok(ApiJson(state.products().least_profitable(user_id).await?))
}

async fn estimated_profit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<ApiJson<ProfitReport>> {
    Ok(ApiJson(state.products().profit_report(user_id).await?))
}

async fn low_stock_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(quantity): ApiPath<i64>,
) -> ApiResult<ApiJson<LowStockReport>> {
    Ok(ApiJson(state.products().low_stock(user_id, quantity).await?))
}
