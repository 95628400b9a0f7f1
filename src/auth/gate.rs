//! Ownership gate for every owner-scoped request.
//!
//! A request may touch a user's notes (or account) only when the username asserted by its
//! verified token equals the `user` named in the path or body. The comparison is exact and
//! case-sensitive. On success the gate hands out an [`Owner`] value; store keys and queries
//! are built from that value, so nothing can reach the store for an owner the caller was not
//! authorised for.

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Body of every denial response.
pub const DENIAL_MESSAGE: &str = "You're not authorized to make this request";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Denied,
}

impl Decision {
    pub fn of(caller: &str, target: &str) -> Self {
        if caller == target {
            Decision::Authorized
        } else {
            Decision::Denied
        }
    }
}

/// Proof that the current caller owns `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner<'a> {
    user: &'a str,
}

impl<'a> Owner<'a> {
    pub fn user(&self) -> &'a str {
        self.user
    }
}

pub fn authorize<'a>(caller: &AuthUser, target: &'a str) -> Result<Owner<'a>, ApiError> {
    match Decision::of(&caller.username, target) {
        Decision::Authorized => Ok(Owner { user: target }),
        Decision::Denied => {
            tracing::warn!(
                "Ownership check failed: token user '{}' requested resources of '{}'",
                caller.username,
                target
            );
            Err(ApiError::forbidden(DENIAL_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn caller(name: &str) -> AuthUser {
        AuthUser { username: name.to_string() }
    }

    #[test]
    fn same_user_is_authorized() {
        let owner = authorize(&caller("alice"), "alice").unwrap();
        assert_eq!(owner.user(), "alice");
    }

    #[test]
    fn other_user_is_denied() {
        let err = authorize(&caller("alice"), "bob").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), DENIAL_MESSAGE);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(Decision::of("alice", "Alice"), Decision::Denied);
        assert_eq!(Decision::of("alice", "alice "), Decision::Denied);
        assert_eq!(Decision::of("alice", "alice"), Decision::Authorized);
    }

    #[test]
    fn empty_target_is_denied_for_named_caller() {
        assert!(authorize(&caller("alice"), "").is_err());
    }
}
