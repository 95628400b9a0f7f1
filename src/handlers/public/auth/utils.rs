use axum::{
    http::{header::AUTHORIZATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TokenBody<'a> {
    pub username: &'a str,
    pub token: &'a str,
}

/// Token in both the `Authorization` header and the JSON body.
pub fn token_response(status: StatusCode, username: &str, token: &str) -> Response {
    (
        status,
        [(AUTHORIZATION, format!("Bearer {}", token))],
        Json(TokenBody { username, token }),
    )
        .into_response()
}
