use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use crate::auth::authorize;
use crate::database::models::NoteDraft;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::store::with_deadline;

/// POST /new - create a note for the `user` named in the body
pub async fn note_create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<NoteDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, String)> {
    let Json(draft) = payload?;
    let target = draft.user.clone();
    let owner = authorize(&caller, &target)?;

    if draft.title.is_empty() {
        return Err(ApiError::field_required("title"));
    }

    let note = draft.into_note(Utc::now());
    let note = with_deadline(state.store_timeout, state.notes.insert(note)).await?;
    tracing::info!("Note '{}' created for '{}'", note.title, owner.user());

    Ok((StatusCode::CREATED, format!("Successfully created '{}'", note.title)))
}
