use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Sign-up, sign-in and account deletion. Only deletion needs a token.
pub fn auth_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/delete", delete(protected::account_delete))
        .route("/delete", delete(protected::account_delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/health", get(public::health_get))
        .route("/auth/signup", post(public::auth::signup_post))
        .route("/auth/signin", post(public::auth::signin_post))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Note CRUD. Everything except `/health` sits behind the token middleware.
pub fn notes_router(state: AppState) -> Router {
    use protected::notes;

    let protected = Router::new()
        .route("/new", post(notes::note_create))
        .route("/find/many/:user/:title", get(notes::notes_prefix))
        .route("/find/:user/:title", get(notes::note_get))
        .route("/find/:user", get(notes::notes_list))
        .route("/update/:user/:title", put(notes::note_update))
        .route("/delete/:user/:title", delete(notes::note_delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/health", get(public::health_get))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Browsers may read the `Authorization` header the auth service returns tokens in.
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let mut origins = Vec::new();
    for origin in &security.cors_origins {
        match HeaderValue::from_str(origin) {
            Ok(value) => origins.push(value),
            Err(err) => tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, err),
        }
    }

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([AUTHORIZATION])
        .allow_origin(origins)
}
