//! The value handed back from a successful receive (§4.2 "Receive").

// Layer 3: Internal module imports
use crate::ids::ActorId;
use crate::message::header::MessageHeader;
use crate::message::payload::Payload;

/// An owned, already-dequeued message. The payload-pool slot backing it is
/// released back to the pool at receive time, so `Received` never carries a
/// pointer that could outlive its slot — the specification's "valid only
/// until next receive" note is satisfied by construction rather than by a
/// borrow the caller must not outlive (see DESIGN.md).
pub struct Received {
    pub sender: ActorId,
    pub header: MessageHeader,
    pub payload: Payload,
}
