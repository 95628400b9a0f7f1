use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenIssuer;
use crate::config::{AppConfig, StoreBackend};
use crate::database::PgStore;
use crate::store::{with_deadline, AccountStore, MemoryStore, NoteStore};

/// Shared by every handler of both services. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenIssuer>,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(
        notes: Arc<dyn NoteStore>,
        accounts: Arc<dyn AccountStore>,
        tokens: TokenIssuer,
        store_timeout: Duration,
    ) -> Self {
        Self {
            notes,
            accounts,
            tokens: Arc::new(tokens),
            store_timeout,
        }
    }

    /// Both stores backed by one in-process [`MemoryStore`].
    pub fn in_memory(tokens: TokenIssuer, store_timeout: Duration) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, tokens, store_timeout)
    }

    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens = TokenIssuer::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;
        let store_timeout = Duration::from_millis(config.database.store_timeout_ms);

        match config.database.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on exit");
                Ok(Self::in_memory(tokens, store_timeout))
            }
            StoreBackend::Postgres => {
                let store = PgStore::connect(&config.database)?;
                // A database that is down at startup is not fatal; the bootstrap reruns on the
                // next store call and requests report 503 until it succeeds
                if let Err(e) = with_deadline(store_timeout, store.bootstrap()).await {
                    tracing::error!("Schema bootstrap failed, will retry on first use: {}", e);
                }
                let store = Arc::new(store);
                Ok(Self::new(store.clone(), store, tokens, store_timeout))
            }
        }
    }
}
