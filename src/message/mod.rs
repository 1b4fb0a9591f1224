//! Messages: wire header, payload storage, and the in-mailbox envelope
//! (§3 "Message").

pub mod envelope;
pub mod header;
pub mod payload;

pub use envelope::Entry;
pub use header::MessageClass;
pub use payload::{Payload, PayloadPool};
