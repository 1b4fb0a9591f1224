//! Fixed-size message payload storage and its pool (§3 "Message" lifecycle,
//! §4.3 "acquires an entry and a payload slot from the two pools").

// Layer 3: Internal module imports
use crate::config::MESSAGE_HEADER_SIZE;
use crate::pool::Pool;

/// Hard ceiling on payload bytes, matching the reference `MAX_MESSAGE_SIZE`
/// default (§6). `RuntimeConfig::max_message_size` may only be tuned at or
/// below this ceiling (enforced by `RuntimeConfig::validate` plus the
/// payload-pool constructor) — it is the array bound backing every
/// [`Payload`], chosen so a payload slot is always inline storage, never a
/// heap allocation per message.
pub const MAX_PAYLOAD_CEILING: usize = 256 - MESSAGE_HEADER_SIZE;

/// One fixed-size payload slot. `len` bytes of `buf` are significant; the
/// rest is unspecified. Copied into on send (§4.3 "the sender's buffer is
/// not retained"), read by the receiver, freed on the subsequent successful
/// receive or on recipient death.
pub struct Payload {
    buf: [u8; MAX_PAYLOAD_CEILING],
    len: usize,
}

impl Payload {
    pub(crate) fn copy_from(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= MAX_PAYLOAD_CEILING);
        let mut buf = [0u8; MAX_PAYLOAD_CEILING];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self {
            buf,
            len: bytes.len(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The global payload pool (one of the "two pools" in §4.3).
pub type PayloadPool = Pool<Payload>;
