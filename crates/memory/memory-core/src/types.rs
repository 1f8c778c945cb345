//! # Core Types
//!
//! This module defines the data model shared by message stores, the retriever
//! and the formatter.
//!
//! ## SenderType
//!
//! Who produced a chat turn: the AI or the user.
//!
//! ## RetrievalQuery
//!
//! Filter, ordering and limit policy for one history fetch.
//!
//! ## MessageRecord
//!
//! One stored chat turn. Created by a store at fetch time and read-only afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Name of the field every record carries.
pub const TEXT_FIELD: &str = "text";

/// Represents who sent a message in a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SenderType {
    #[serde(rename = "AI")]
    Ai,
    User,
}

impl SenderType {
    /// Label used in storage and templates ("AI" / "User").
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderType::Ai => "AI",
            SenderType::User => "User",
        }
    }
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SenderType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ai" | "machine" | "assistant" => Ok(SenderType::Ai),
            "user" | "human" => Ok(SenderType::User),
            other => Err(ParseError::SenderType(other.to_string())),
        }
    }
}

/// Parses a sender filter: a single sender type, or `both` / `machine and user` for no filter.
pub fn parse_sender_filter(s: &str) -> Result<Option<SenderType>, ParseError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "both" | "all" | "machine and user" => Ok(None),
        _ => s.parse().map(Some),
    }
}

/// Ordering of retrieved messages. Ascending is store-native (oldest first).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(ParseError::SortOrder(other.to_string())),
        }
    }
}

/// Filter, ordering and limit policy for one history fetch.
///
/// `limit == 0` means "no limit". An empty `session_id` is resolved by the caller
/// (see `RetrievalQuery::resolve_session`); stores treat a still-empty id as "all sessions".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrievalQuery {
    /// Keep only messages from this sender type. `None` keeps both.
    pub sender_type: Option<SenderType>,
    /// Keep only messages whose sender name matches exactly.
    pub sender_name: Option<String>,
    pub session_id: String,
    pub limit: usize,
    pub order: SortOrder,
}

impl RetrievalQuery {
    pub fn for_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    pub fn with_sender_type(mut self, sender_type: Option<SenderType>) -> Self {
        self.sender_type = sender_type;
        self
    }

    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        let name = sender_name.into();
        self.sender_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// The limit as an option; 0 never truncates.
    pub fn effective_limit(&self) -> Option<usize> {
        if self.limit == 0 {
            None
        } else {
            Some(self.limit)
        }
    }

    /// Replaces an empty session id with `default_session`.
    pub fn resolve_session(mut self, default_session: Option<&str>) -> Self {
        if self.session_id.is_empty() {
            if let Some(default) = default_session {
                self.session_id = default.to_string();
            }
        }
        self
    }

    /// True when the record passes the sender type and sender name filters.
    ///
    /// Session scoping is not checked here; it is the source's concern.
    pub fn matches(&self, record: &MessageRecord) -> bool {
        if let Some(sender_type) = self.sender_type {
            if record.sender_type() != sender_type {
                return false;
            }
        }
        if let Some(ref name) = self.sender_name {
            if record.sender_name() != Some(name.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One stored chat turn.
///
/// Fields are private: a record is built once (by a store or a conversion) and
/// only read afterwards. Named fields always include `text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    sender_type: SenderType,
    sender_name: Option<String>,
    session_id: String,
    sequence_position: u64,
    created_at: DateTime<Utc>,
    fields: BTreeMap<String, String>,
}

impl MessageRecord {
    /// Creates a record with the given text and the current timestamp.
    pub fn new(
        session_id: impl Into<String>,
        sequence_position: u64,
        sender_type: SenderType,
        text: impl Into<String>,
    ) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(TEXT_FIELD.to_string(), text.into());
        Self {
            sender_type,
            sender_name: None,
            session_id: session_id.into(),
            sequence_position,
            created_at: Utc::now(),
            fields,
        }
    }

    pub fn with_sender_name(mut self, sender_name: Option<String>) -> Self {
        self.sender_name = sender_name.filter(|n| !n.is_empty());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Adds an extra named field. `text` cannot be replaced through this.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name != TEXT_FIELD {
            self.fields.insert(name, value.into());
        }
        self
    }

    pub fn with_fields(self, fields: impl IntoIterator<Item = (String, String)>) -> Self {
        fields
            .into_iter()
            .fold(self, |record, (name, value)| record.with_field(name, value))
    }

    pub fn sender_type(&self) -> SenderType {
        self.sender_type
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.sender_name.as_deref()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn sequence_position(&self) -> u64 {
        self.sequence_position
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn text(&self) -> &str {
        self.fields.get(TEXT_FIELD).map(String::as_str).unwrap_or("")
    }

    /// Named fields stored on the record (always includes `text`).
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Resolves a template field.
    ///
    /// Built-ins: `sender`, `sender_type`, `sender_name`, `session_id`,
    /// `sequence_position`, `created_at`. Anything else is looked up in the named fields.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "sender" | "sender_type" => Some(Cow::Borrowed(self.sender_type.as_str())),
            "sender_name" => Some(Cow::Borrowed(self.sender_name.as_deref().unwrap_or(""))),
            "session_id" => Some(Cow::Borrowed(&self.session_id)),
            "sequence_position" => Some(Cow::Owned(self.sequence_position.to_string())),
            "created_at" => Some(Cow::Owned(self.created_at.to_rfc3339())),
            other => self.fields.get(other).map(|v| Cow::Borrowed(v.as_str())),
        }
    }
}

/// A chat turn to append to a store. The store assigns position and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMessage {
    pub session_id: String,
    pub sender_type: SenderType,
    pub sender_name: Option<String>,
    pub text: String,
    /// Extra named fields available to templates.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl NewMessage {
    pub fn new(session_id: impl Into<String>, sender_type: SenderType, text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            sender_type,
            sender_name: None,
            text: text.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = Some(sender_name.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builds the stored record once the store has assigned a position.
    pub fn into_record(self, sequence_position: u64, created_at: DateTime<Utc>) -> MessageRecord {
        MessageRecord::new(self.session_id, sequence_position, self.sender_type, self.text)
            .with_sender_name(self.sender_name)
            .with_created_at(created_at)
            .with_fields(self.fields)
    }
}

/// A message as held by an external memory: no session or position of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalMessage {
    pub sender_type: SenderType,
    pub sender_name: Option<String>,
    pub content: String,
    #[serde(default)]
    pub additional_fields: BTreeMap<String, String>,
}

impl ExternalMessage {
    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(SenderType::Ai, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(SenderType::User, content)
    }

    pub fn new(sender_type: SenderType, content: impl Into<String>) -> Self {
        Self {
            sender_type,
            sender_name: None,
            content: content.into(),
            additional_fields: BTreeMap::new(),
        }
    }

    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = Some(sender_name.into());
        self
    }

    /// Converts to a record; `sequence_position` is the index in the memory's ascending list.
    pub fn into_record(self, session_id: &str, sequence_position: u64) -> MessageRecord {
        MessageRecord::new(session_id, sequence_position, self.sender_type, self.content)
            .with_sender_name(self.sender_name)
            .with_fields(self.additional_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_type_parsing() {
        assert_eq!("AI".parse::<SenderType>().unwrap(), SenderType::Ai);
        assert_eq!("Machine".parse::<SenderType>().unwrap(), SenderType::Ai);
        assert_eq!(" user ".parse::<SenderType>().unwrap(), SenderType::User);
        assert!("robot".parse::<SenderType>().is_err());
    }

    #[test]
    fn test_sender_filter_both_means_none() {
        assert_eq!(parse_sender_filter("Machine and User").unwrap(), None);
        assert_eq!(parse_sender_filter("both").unwrap(), None);
        assert_eq!(parse_sender_filter("ai").unwrap(), Some(SenderType::Ai));
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert_eq!("Ascending".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let query = RetrievalQuery::for_session("s1");
        assert_eq!(query.effective_limit(), None);
        assert_eq!(query.with_limit(3).effective_limit(), Some(3));
    }

    #[test]
    fn test_resolve_session_only_fills_empty() {
        let resolved = RetrievalQuery::default().resolve_session(Some("current"));
        assert_eq!(resolved.session_id, "current");

        let kept = RetrievalQuery::for_session("mine").resolve_session(Some("current"));
        assert_eq!(kept.session_id, "mine");
    }

    #[test]
    fn test_query_matches_sender_filters() {
        let record = MessageRecord::new("s1", 1, SenderType::User, "hi")
            .with_sender_name(Some("alice".to_string()));

        assert!(RetrievalQuery::default().matches(&record));
        assert!(RetrievalQuery::default()
            .with_sender_type(Some(SenderType::User))
            .matches(&record));
        assert!(!RetrievalQuery::default()
            .with_sender_type(Some(SenderType::Ai))
            .matches(&record));
        assert!(RetrievalQuery::default()
            .with_sender_name("alice")
            .matches(&record));
        assert!(!RetrievalQuery::default().with_sender_name("bob").matches(&record));
    }

    #[test]
    fn test_record_field_lookup() {
        let record = MessageRecord::new("s1", 7, SenderType::Ai, "hello")
            .with_field("mood", "cheerful")
            .with_field(TEXT_FIELD, "ignored");

        assert_eq!(record.text(), "hello");
        assert_eq!(record.field("text").as_deref(), Some("hello"));
        assert_eq!(record.field("sender").as_deref(), Some("AI"));
        assert_eq!(record.field("sender_name").as_deref(), Some(""));
        assert_eq!(record.field("sequence_position").as_deref(), Some("7"));
        assert_eq!(record.field("mood").as_deref(), Some("cheerful"));
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_empty_sender_name_is_none() {
        let record = MessageRecord::new("s1", 1, SenderType::User, "x").with_sender_name(Some(String::new()));
        assert_eq!(record.sender_name(), None);
    }

    #[test]
    fn test_external_message_into_record() {
        let record = ExternalMessage::ai("pong")
            .with_sender_name("bot")
            .into_record("s9", 3);
        assert_eq!(record.session_id(), "s9");
        assert_eq!(record.sequence_position(), 3);
        assert_eq!(record.sender_type(), SenderType::Ai);
        assert_eq!(record.sender_name(), Some("bot"));
        assert_eq!(record.text(), "pong");
    }

    #[test]
    fn test_sender_type_serde_labels() {
        assert_eq!(serde_json::to_string(&SenderType::Ai).unwrap(), "\"AI\"");
        let parsed: SenderType = serde_json::from_str("\"User\"").unwrap();
        assert_eq!(parsed, SenderType::User);
    }
}
