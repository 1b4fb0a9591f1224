//! A single actor's mailbox: a FIFO singly-linked list of entry-pool slots
//! (§3 "Mailbox").

// Layer 3: Internal module imports
use crate::error::MailboxError;
use crate::mailbox::entry_pool::{EntryNode, EntryPool};
use crate::mailbox::filter::Filter;
use crate::mailbox::received::Received;
use crate::message::envelope::Entry;
use crate::message::payload::PayloadPool;
use crate::pool::Slot;

/// Head/tail pointers into the shared [`EntryPool`]. Holds no data of its
/// own; every entry and payload lives in the two global pools (§3 "No
/// per-actor quota; all mailboxes share both pools").
#[derive(Debug, Clone, Copy, Default)]
pub struct Mailbox {
    head: Option<Slot>,
    tail: Option<Slot>,
    len: usize,
}

impl Mailbox {
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Append an entry at the tail. The caller has already acquired the
    /// payload slot; this acquires the entry-pool slot.
    pub fn push_back(&mut self, entries: &mut EntryPool, entry: Entry) -> Result<(), MailboxError> {
        let slot = entries
            .acquire(EntryNode { entry, next: None })
            .map_err(|_| MailboxError::EntryPoolExhausted)?;
        match self.tail {
            Some(tail) => {
                if let Some(node) = entries.get_mut(tail) {
                    node.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
        Ok(())
    }

    /// Scan from the head for the first entry matching `filter`, remove it
    /// from the list, release its entry-pool slot, move its payload slot
    /// out of the payload pool as an owned [`Received`] value, and return
    /// it (§4.2 "Selective receive": "scans... in FIFO order... removes the
    /// first match").
    pub fn scan_remove(
        &mut self,
        entries: &mut EntryPool,
        payloads: &mut PayloadPool,
        filter: &Filter,
    ) -> Option<Received> {
        let mut prev: Option<Slot> = None;
        let mut cursor = self.head;

        while let Some(slot) = cursor {
            let node = entries.get(slot)?;
            let next = node.next;
            if filter.matches(&node.entry) {
                let entry = node.entry;
                match prev {
                    Some(p) => {
                        if let Some(p_node) = entries.get_mut(p) {
                            p_node.next = next;
                        }
                    }
                    None => self.head = next,
                }
                if self.tail == Some(slot) {
                    self.tail = prev;
                }
                let _ = entries.release(slot);
                self.len -= 1;
                let payload = payloads.release(entry.payload).ok()?;
                return Some(Received {
                    sender: entry.sender,
                    header: entry.header,
                    payload,
                });
            }
            prev = Some(slot);
            cursor = next;
        }
        None
    }

    /// Remove and release every entry, used when the owning actor dies
    /// (§4.3 death propagation returns unused pool resources).
    pub fn drain_all(&mut self, entries: &mut EntryPool, payloads: &mut PayloadPool) {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let next = entries.get(slot).and_then(|n| n.next);
            if let Some(node) = entries.get(slot) {
                let _ = payloads.release(node.entry.payload);
            }
            let _ = entries.release(slot);
            cursor = next;
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }
}
