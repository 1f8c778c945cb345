//! Message row model for persistence.
//!
//! Maps to the `messages` table. `position` is the autoincrement key and doubles as
//! the record's sequence position.

use chrono::{DateTime, Utc};
use memory_core::{MessageRecord, SenderType};
use std::collections::BTreeMap;

use crate::error::StorageError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRow {
    pub position: i64,
    pub session_id: String,
    pub sender_type: String,
    pub sender_name: Option<String>,
    pub text: String,
    /// Extra named fields as a JSON object of strings.
    pub fields: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for MessageRecord {
    type Error = StorageError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let sender_type: SenderType = row
            .sender_type
            .parse()
            .map_err(|e| StorageError::InvalidRecord(format!("row {}: {}", row.position, e)))?;
        let position = u64::try_from(row.position).map_err(|_| {
            StorageError::InvalidRecord(format!("negative position {}", row.position))
        })?;
        let fields: BTreeMap<String, String> = if row.fields.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&row.fields).map_err(|e| {
                StorageError::InvalidRecord(format!("row {} fields: {}", row.position, e))
            })?
        };

        Ok(MessageRecord::new(row.session_id, position, sender_type, row.text)
            .with_sender_name(row.sender_name)
            .with_created_at(row.created_at)
            .with_fields(fields))
    }
}
