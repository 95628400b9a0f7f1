use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored account. The password is only ever kept as an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub date_of_birth: String,
}
