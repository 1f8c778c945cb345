//! Message repository: persistence and queries for chat history.
//!
//! Uses SqlitePoolManager and MessageRow. Implements `MessageStore` so the
//! retriever can push filters, ordering and the limit down into SQL.

use async_trait::async_trait;
use chrono::Utc;
use memory_core::{
    MessageRecord, MessageStore, NewMessage, RetrievalQuery, SortOrder, StoreError,
};
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::models::MessageRow;
use crate::sqlite_pool::SqlitePoolManager;

const SELECT_COLUMNS: &str =
    "SELECT position, session_id, sender_type, sender_name, text, fields, created_at FROM messages";

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                position INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                sender_type TEXT NOT NULL,
                sender_name TEXT,
                text TEXT NOT NULL,
                fields TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_session_id ON messages(session_id)")
            .execute(pool)
            .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Inserts a message and returns the stored record with its assigned position.
    pub async fn save(&self, message: NewMessage) -> Result<MessageRecord, StorageError> {
        let pool = self.pool_manager.pool();
        let created_at = Utc::now();
        let fields = serde_json::to_string(&message.fields)
            .map_err(|e| StorageError::InvalidRecord(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO messages (session_id, sender_type, sender_name, text, fields, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.session_id)
        .bind(message.sender_type.as_str())
        .bind(&message.sender_name)
        .bind(&message.text)
        .bind(&fields)
        .bind(created_at)
        .execute(pool)
        .await?;

        let position = u64::try_from(result.last_insert_rowid())
            .map_err(|_| StorageError::InvalidRecord("negative rowid".to_string()))?;

        info!(
            session_id = %message.session_id,
            sender_type = %message.sender_type,
            position,
            "Saved message"
        );
        Ok(message.into_record(position, created_at))
    }

    /// Runs `query` with every filter, the ordering and the limit expressed in SQL.
    #[instrument(skip(self), fields(session_id = %query.session_id))]
    pub async fn get_messages(
        &self,
        query: &RetrievalQuery,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
        let mut params: Vec<String> = Vec::new();

        if !query.session_id.is_empty() {
            sql.push_str(" AND session_id = ?");
            params.push(query.session_id.clone());
        }

        if let Some(sender_type) = query.sender_type {
            sql.push_str(" AND sender_type = ?");
            params.push(sender_type.as_str().to_string());
        }

        if let Some(ref name) = query.sender_name {
            sql.push_str(" AND sender_name = ?");
            params.push(name.clone());
        }

        sql.push_str(match query.order {
            SortOrder::Ascending => " ORDER BY position ASC",
            SortOrder::Descending => " ORDER BY position DESC",
        });

        if let Some(limit) = query.effective_limit() {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut query_builder = sqlx::query_as::<_, MessageRow>(&sql);
        for param in &params {
            query_builder = query_builder.bind(param);
        }

        let rows: Vec<MessageRow> = query_builder.fetch_all(pool).await?;
        debug!(count = rows.len(), "Retrieved messages");

        rows.into_iter().map(MessageRecord::try_from).collect()
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn get_messages(&self, query: &RetrievalQuery) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(MessageRepository::get_messages(self, query).await?)
    }

    async fn add(&self, message: NewMessage) -> Result<MessageRecord, StoreError> {
        Ok(self.save(message).await?)
    }
}
