//! Row models for the `messages` table.

mod message_row;

pub use message_row::MessageRow;
