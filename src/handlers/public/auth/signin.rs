// handlers/public/auth/signin.rs - POST /auth/signin

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;

use super::utils::token_response;
use crate::auth::password::verify_credentials;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::with_deadline;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Default, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Unknown users and wrong passwords get the same 401; no token is issued for either.
pub async fn signin_post(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;

    let account = with_deadline(state.store_timeout, state.accounts.find(&request.username)).await?;
    let stored_hash = account.as_ref().map(|a| a.password_hash.clone());

    // Unknown users pay for a full verify too
    let valid = verify_credentials(request.password, stored_hash).await.map_err(|e| {
        tracing::error!("Credential check for '{}' failed: {}", request.username, e);
        ApiError::internal_server_error("Could not verify credentials")
    })?;

    let account = match account {
        Some(account) if valid => account,
        Some(_) => {
            tracing::warn!("Wrong password for '{}'", request.username);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            tracing::warn!("Sign-in for unknown user '{}'", request.username);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let token = state.tokens.issue(&account.username)?;
    tracing::debug!("Signed in: {}", account.username);

    Ok(token_response(StatusCode::OK, &account.username, &token))
}
