//! The shared entry pool backing every mailbox's intrusive linked list
//! (§3 "Mailbox": "No per-actor quota; all mailboxes share both pools").

// Layer 3: Internal module imports
use crate::message::envelope::Entry;
use crate::pool::{Pool, Slot};

/// One node of a mailbox's singly-linked FIFO. `next` is `None` at the
/// tail. Lives in the global [`EntryPool`], addressed by [`Slot`] rather
/// than by pointer so no mailbox ever owns a heap allocation directly.
#[derive(Debug, Clone, Copy)]
pub struct EntryNode {
    pub entry: Entry,
    pub next: Option<Slot>,
}

/// The global mailbox-entry pool, shared across every actor (one of the
/// "two pools" acquired on send, §4.3).
pub type EntryPool = Pool<EntryNode>;
