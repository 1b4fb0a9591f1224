//! Per-actor mailboxes backed by two shared pools (§3 "Mailbox").

pub mod entry_pool;
pub mod filter;
pub mod mailbox;
pub mod received;

pub use entry_pool::{EntryNode, EntryPool};
pub use filter::Filter;
pub use mailbox::Mailbox;
pub use received::Received;
