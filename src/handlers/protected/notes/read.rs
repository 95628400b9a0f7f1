use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::auth::authorize;
use crate::database::models::Note;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::store::{with_deadline, NoteQuery};

/// GET /find/:user/:title - exact lookup
pub async fn note_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user, title)): Path<(String, String)>,
) -> ApiResult<Json<Note>> {
    let owner = authorize(&caller, &user)?;
    let query = NoteQuery::exact(owner, &title);

    // The key is unique in both backends; should duplicates exist, the last one wins
    with_deadline(state.store_timeout, state.notes.find(&query))
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Note '{}' not found", title)))
}

/// GET /find/many/:user/:title - every note whose title starts with `title`
pub async fn notes_prefix(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user, prefix)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Note>>> {
    let owner = authorize(&caller, &user)?;
    let query = NoteQuery::prefix(owner, &prefix);

    let notes = with_deadline(state.store_timeout, state.notes.find(&query)).await?;
    Ok(Json(notes))
}

/// GET /find/:user - every note the user owns
pub async fn notes_list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user): Path<String>,
) -> ApiResult<Json<Vec<Note>>> {
    let owner = authorize(&caller, &user)?;
    let query = NoteQuery::all(owner);

    let notes = with_deadline(state.store_timeout, state.notes.find(&query)).await?;
    Ok(Json(notes))
}
