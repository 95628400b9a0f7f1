use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{AccountStore, NoteKey, NoteQuery, NoteStore, StoreError};
use crate::database::models::{Account, Note, NoteChanges};

/// In-process store with the same key constraints as the Postgres schema.
/// Results come back in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    notes: Arc<RwLock<Vec<Note>>>,
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn insert(&self, note: Note) -> Result<Note, StoreError> {
        let mut notes = self.notes.write().await;
        if notes.iter().any(|n| n.user == note.user && n.title == note.title) {
            return Err(StoreError::Conflict(format!(
                "Note '{}' already exists for '{}'",
                note.title, note.user
            )));
        }
        notes.push(note.clone());
        Ok(note)
    }

    async fn find(&self, query: &NoteQuery) -> Result<Vec<Note>, StoreError> {
        let notes = self.notes.read().await;
        Ok(notes.iter().filter(|n| query.matches(n)).cloned().collect())
    }

    async fn update(&self, key: &NoteKey, changes: &NoteChanges) -> Result<u64, StoreError> {
        let mut notes = self.notes.write().await;
        let mut matched = 0;
        for note in notes.iter_mut().filter(|n| key.matches(n)) {
            note.description = changes.description.clone();
            note.date = changes.date;
            matched += 1;
        }
        Ok(matched)
    }

    async fn delete(&self, key: &NoteKey) -> Result<u64, StoreError> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| !key.matches(n));
        Ok((before - notes.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::Conflict(format!(
                "Username '{}' is already taken",
                account.username
            )));
        }
        accounts.push(account);
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn delete(&self, username: &str) -> Result<u64, StoreError> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| a.username != username);
        Ok((before - accounts.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
