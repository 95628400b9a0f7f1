use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::authorize;
use crate::database::models::NoteDraft;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::store::{with_deadline, NoteKey};

/// PUT /update/:user/:title - replace description and date.
///
/// The key comes from the path only; `title` and `user` in the body are ignored, so a note
/// can never be renamed or handed to another owner.
pub async fn note_update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user, title)): Path<(String, String)>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> ApiResult<String> {
    let Json(draft) = payload?;
    let owner = authorize(&caller, &user)?;

    let key = NoteKey::new(owner, &title);
    let changes = draft.into_changes(Utc::now());

    let matched = with_deadline(state.store_timeout, state.notes.update(&key, &changes)).await?;
    if matched == 0 {
        return Err(ApiError::not_found(format!("Note '{}' not found", title)));
    }
    tracing::info!("Note '{}' updated for '{}'", title, owner.user());

    Ok(format!("Successfully updated '{}'", title))
}
