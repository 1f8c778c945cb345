//! # In-Memory Message Sources
//!
//! In-memory implementations of the `memory-core` collaborator traits.
//!
//! - [`InMemoryMessageStore`] implements `MessageStore`: filter, order and limit are
//!   applied natively, the same way the SQLite store applies them in SQL.
//! - [`InMemoryChatHistory`] implements `ExternalMemory`: a session-keyed list of
//!   messages read back oldest first.
//!
//! **Limitations**: data is lost on restart. Meant for tests, demos and hosts
//! that keep history elsewhere.
//!
//! ## Example
//!
//! ```rust
//! use memory_core::{MessageStore, NewMessage, RetrievalQuery, SenderType};
//! use memory_inmemory::InMemoryMessageStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryMessageStore::new();
//!     store
//!         .add(NewMessage::new("s1", SenderType::User, "Hello").with_sender_name("alice"))
//!         .await
//!         .unwrap();
//!
//!     let records = store.get_messages(&RetrievalQuery::for_session("s1")).await.unwrap();
//!     assert_eq!(records.len(), 1);
//! }
//! ```
//!
//! ## Thread Safety
//!
//! Both types use `Arc<RwLock<>>` and are cheap to clone; clones share state.

mod chat_history;
mod message_store;

pub use chat_history::InMemoryChatHistory;
pub use message_store::InMemoryMessageStore;
