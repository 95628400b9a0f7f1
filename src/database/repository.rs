use async_trait::async_trait;
use serde_json::json;
use sqlx::{self, postgres::PgRow, FromRow, PgPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

use crate::config::DatabaseConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Account, Note, NoteChanges};
use crate::database::query_builder::{bind_param_query, QueryBuilder};
use crate::filter::{Filter, FilterData};
use crate::store::{AccountStore, NoteKey, NoteQuery, NoteStore, StoreError};

pub struct Repository<T> {
    table_name: String,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(&self.table_name)?
            .filter(filter_data)?
            .select_all(&self.pool)
            .await
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        Ok(self.select_any(filter_data).await?.into_iter().next())
    }

    pub async fn delete_any(&self, filter_data: FilterData) -> Result<u64, DatabaseError> {
        QueryBuilder::<T>::new(&self.table_name)?
            .filter(filter_data)?
            .delete(&self.pool)
            .await
    }
}

/// PostgreSQL-backed note and account storage.
///
/// Tables are created on first use. A failed bootstrap leaves the cell empty, so the next
/// store call tries again instead of querying tables that may not exist.
pub struct PgStore {
    pool: PgPool,
    notes: Repository<Note>,
    accounts: Repository<Account>,
    schema: OnceCell<()>,
    bootstrap_attempts: AtomicUsize,
}

impl PgStore {
    pub fn new(pool: PgPool, notes_table: &str, accounts_table: &str) -> Self {
        Self {
            notes: Repository::new(notes_table, pool.clone()),
            accounts: Repository::new(accounts_table, pool.clone()),
            pool,
            schema: OnceCell::new(),
            bootstrap_attempts: AtomicUsize::new(0),
        }
    }

    /// Run the schema bootstrap unless it already succeeded.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        self.schema
            .get_or_try_init(|| self.ensure_schema())
            .await
            .map(|_| ())
            .map_err(|e| e.into_store_error(String::new))
    }

    pub fn schema_ready(&self) -> bool {
        self.schema.initialized()
    }

    pub fn bootstrap_attempts(&self) -> usize {
        self.bootstrap_attempts.load(Ordering::SeqCst)
    }

    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect(config)?;
        Ok(Self::new(pool, &config.notes_table, &config.accounts_table))
    }

    /// Create both tables if missing. The unique constraints carry the natural keys.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let attempt = self.bootstrap_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Schema bootstrap attempt {}", attempt);

        // Table names are validated identifiers; Filter::new rejects anything else
        Filter::new(self.accounts.table_name())?;
        Filter::new(self.notes.table_name())?;

        let accounts = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\
                \"username\" TEXT PRIMARY KEY, \
                \"password_hash\" TEXT NOT NULL, \
                \"email\" TEXT NOT NULL DEFAULT '', \
                \"date_of_birth\" TEXT NOT NULL DEFAULT '', \
                \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT now())",
            self.accounts.table_name()
        );
        let notes = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\
                \"id\" UUID PRIMARY KEY, \
                \"title\" TEXT NOT NULL, \
                \"description\" TEXT NOT NULL, \
                \"user\" TEXT NOT NULL, \
                \"date\" TIMESTAMPTZ NOT NULL, \
                UNIQUE (\"user\", \"title\"))",
            self.notes.table_name()
        );

        sqlx::query(&accounts).execute(&self.pool).await?;
        sqlx::query(&notes).execute(&self.pool).await?;
        tracing::info!(
            "Schema ready: tables {} and {}",
            self.accounts.table_name(),
            self.notes.table_name()
        );
        Ok(())
    }

    async fn ping_pool(&self) -> Result<(), StoreError> {
        self.bootstrap().await?;
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(e).into_store_error(String::new))?;
        Ok(())
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn insert(&self, note: Note) -> Result<Note, StoreError> {
        self.bootstrap().await?;
        let sql = format!(
            "INSERT INTO \"{}\" (\"id\", \"title\", \"description\", \"user\", \"date\") \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
            self.notes.table_name()
        );
        sqlx::query_as::<_, Note>(&sql)
            .bind(note.id)
            .bind(&note.title)
            .bind(&note.description)
            .bind(&note.user)
            .bind(note.date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::from(e).into_store_error(|| {
                    format!("Note '{}' already exists for '{}'", note.title, note.user)
                })
            })
    }

    async fn find(&self, query: &NoteQuery) -> Result<Vec<Note>, StoreError> {
        self.bootstrap().await?;
        Ok(self.notes.select_any(query.to_filter()).await?)
    }

    async fn update(&self, key: &NoteKey, changes: &NoteChanges) -> Result<u64, StoreError> {
        self.bootstrap().await?;
        let mut filter = Filter::new(self.notes.table_name()).map_err(DatabaseError::from)?;
        filter.assign(key.to_filter()).map_err(DatabaseError::from)?;
        let sql_result = filter
            .to_update_sql(&["description", "date"])
            .map_err(DatabaseError::from)?;

        let mut q = sqlx::query(&sql_result.query)
            .bind(&changes.description)
            .bind(changes.date);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let done = q.execute(&self.pool).await.map_err(DatabaseError::from)?;
        Ok(done.rows_affected())
    }

    async fn delete(&self, key: &NoteKey) -> Result<u64, StoreError> {
        self.bootstrap().await?;
        Ok(self.notes.delete_any(key.to_filter()).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ping_pool().await
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        self.bootstrap().await?;
        let sql = format!(
            "INSERT INTO \"{}\" (\"username\", \"password_hash\", \"email\", \"date_of_birth\") \
             VALUES ($1, $2, $3, $4)",
            self.accounts.table_name()
        );
        sqlx::query(&sql)
            .bind(&account.username)
            .bind(&account.password_hash)
            .bind(&account.email)
            .bind(&account.date_of_birth)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::from(e)
                    .into_store_error(|| format!("Username '{}' is already taken", account.username))
            })?;
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.bootstrap().await?;
        let filter = FilterData::matching(json!({ "username": username }));
        Ok(self.accounts.select_one(filter).await?)
    }

    async fn delete(&self, username: &str) -> Result<u64, StoreError> {
        self.bootstrap().await?;
        let filter = FilterData::matching(json!({ "username": username }));
        Ok(self.accounts.delete_any(filter).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ping_pool().await
    }
}
