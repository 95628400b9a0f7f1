// handlers/public/auth/signup.rs - POST /auth/signup

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;

use super::utils::token_response;
use crate::auth::password::hash_password_blocking;
use crate::database::models::Account;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::with_deadline;

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "DateOfBirth")]
    pub date_of_birth: String,
}

/// Create an account and hand back a token for it.
///
/// 400 on an empty username or password, 409 when the username is taken.
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;

    if request.username.is_empty() {
        return Err(ApiError::field_required("username"));
    }
    if request.password.is_empty() {
        return Err(ApiError::field_required("password"));
    }

    let password_hash = hash_password_blocking(request.password).await.map_err(|e| {
        tracing::error!("Signup for '{}' failed: {}", request.username, e);
        ApiError::internal_server_error("Could not create account")
    })?;

    let account = Account {
        username: request.username.clone(),
        password_hash,
        email: request.email,
        date_of_birth: request.date_of_birth,
    };
    with_deadline(state.store_timeout, state.accounts.insert(account)).await?;

    let token = state.tokens.issue(&request.username)?;
    tracing::info!("Account created: {}", request.username);

    Ok(token_response(StatusCode::CREATED, &request.username, &token))
}
