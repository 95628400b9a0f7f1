use axum::{
    extract::{Path, State},
    Extension,
};

use crate::auth::authorize;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::store::{with_deadline, NoteKey};

/// DELETE /delete/:user/:title - reports success whether or not a note matched
pub async fn note_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((user, title)): Path<(String, String)>,
) -> ApiResult<String> {
    let owner = authorize(&caller, &user)?;
    let key = NoteKey::new(owner, &title);

    let removed = with_deadline(state.store_timeout, state.notes.delete(&key)).await?;
    tracing::debug!("Delete of '{}' for '{}' removed {}", title, owner.user(), removed);

    Ok(format!("Successfully deleted '{}'", title))
}
