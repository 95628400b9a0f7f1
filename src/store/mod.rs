pub mod memory;
pub mod query;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::database::models::{Account, Note, NoteChanges};

pub use memory::MemoryStore;
pub use query::{NoteKey, NoteQuery};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store round trip exceeded {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    Query(String),
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fails with `Conflict` when the (user, title) key is taken.
    async fn insert(&self, note: Note) -> Result<Note, StoreError>;

    /// Matching notes in store order.
    async fn find(&self, query: &NoteQuery) -> Result<Vec<Note>, StoreError>;

    /// Number of notes matched by `key`.
    async fn update(&self, key: &NoteKey, changes: &NoteChanges) -> Result<u64, StoreError>;

    /// Number of notes removed.
    async fn delete(&self, key: &NoteKey) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Conflict` when the username is taken.
    async fn insert(&self, account: Account) -> Result<(), StoreError>;

    async fn find(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn delete(&self, username: &str) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Bound one store round trip. The inner future is dropped when the deadline passes.
pub async fn with_deadline<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_passes_fast_results_through() {
        let result = with_deadline(Duration::from_millis(100), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn deadline_cuts_slow_calls() {
        let result: Result<(), StoreError> = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn deadline_keeps_inner_errors() {
        let result: Result<(), StoreError> = with_deadline(Duration::from_millis(100), async {
            Err(StoreError::Conflict("taken".to_string()))
        })
        .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }
}
