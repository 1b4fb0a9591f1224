//! The mailbox entry: a header plus a reference to a pooled payload slot
//! (§3 "Mailbox": "FIFO singly-linked list of message-entry slots").

// Layer 3: Internal module imports
use crate::ids::ActorId;
use crate::message::header::MessageHeader;
use crate::pool::Slot;

/// One entry in a mailbox's FIFO. Holds the header inline and a [`Slot`]
/// reference into the shared [`crate::message::payload::PayloadPool`] —
/// the entry pool and payload pool are the "two pools" acquired on send
/// (§4.3).
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub sender: ActorId,
    pub header: MessageHeader,
    pub payload: Slot,
}

impl Entry {
    pub fn new(sender: ActorId, header: MessageHeader, payload: Slot) -> Self {
        Self {
            sender,
            header,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::ids::Tag;
    use crate::message::header::MessageClass;
    use crate::pool::Pool;

    #[test]
    fn entry_carries_sender_header_and_payload_reference() {
        let mut pool: Pool<u8> = Pool::with_capacity(1);
        let slot = pool.acquire(7).unwrap();
        let sender = ActorId::new(0, 0);
        let header = MessageHeader::new(MessageClass::Notify, false, Tag::new(1));
        let entry = Entry::new(sender, header, slot);
        assert_eq!(entry.sender, sender);
        assert_eq!(entry.header, header);
        assert_eq!(*pool.get(entry.payload).unwrap(), 7);
    }
}
