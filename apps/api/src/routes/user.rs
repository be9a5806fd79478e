//! Account and profile endpoints.

use axum::extract::State;
use axum::routing::{get, patch, put};
use axum::Router;
use stockroom_core::input::{EmailChange, PasswordChange, ProfilePatch};
use stockroom_core::{UserAccount, UserProfile, UserSummary};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::routes::RouterExt;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route_with_slash("/update-user", patch(update_user))
        .route_with_slash("/change-email", put(change_email))
        .route_with_slash("/change-password", put(change_password))
        .route("/user", get(user_info))
}

async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(patch): ApiJson<ProfilePatch>,
) -> ApiResult<ApiJson<UserProfile>> {
    Ok(ApiJson(state.users().update_profile(user_id, &patch).await?))
}

async fn change_email(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<EmailChange>,
) -> ApiResult<ApiJson<UserAccount>> {
    Ok(ApiJson(state.users().change_email(user_id, &request).await?))
}

async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<PasswordChange>,
) -> ApiResult<ApiJson<UserAccount>> {
    Ok(ApiJson(state.users().change_password(user_id, &request).await?))
}

async fn user_info(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<ApiJson<UserSummary>> {
    Ok(ApiJson(state.users().get_user(user_id).await?))
}
