use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::authorize;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::store::with_deadline;

#[derive(Debug, Default, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub username: String,
}

/// DELETE /auth/delete - remove the caller's own account. Absent accounts succeed too.
pub async fn account_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<DeleteAccountRequest>, JsonRejection>,
) -> ApiResult<&'static str> {
    let Json(request) = payload?;
    let owner = authorize(&caller, &request.username)?;

    let removed = with_deadline(state.store_timeout, state.accounts.delete(owner.user())).await?;
    tracing::info!("Account delete for '{}' removed {} record(s)", owner.user(), removed);

    Ok("Successfully deleted account!")
}
