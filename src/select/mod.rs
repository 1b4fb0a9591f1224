//! The unified select primitive (§4.5). Every blocking receive variant in
//! this core reduces to a call here.

// Layer 3: Internal module imports
use crate::error::SelectError;
use crate::mailbox::{Filter, Mailbox, Received};
use crate::message::payload::{Payload, PayloadPool};
use crate::mailbox::EntryPool;

/// One of the up-to-K sources passed to [`select`].
#[derive(Debug, Clone, Copy)]
pub enum Source {
    IpcFilter(Filter),
    BusSubscription(usize),
}

/// Which kind of source satisfied the select call, and its array index.
pub enum Outcome {
    Bus { index: usize, payload: Payload },
    Ipc { index: usize, received: Received },
}

/// Step 1+2 of §4.5's algorithm: poll buses in array order first, then
/// scan the mailbox once against every IPC filter in array order. Does not
/// park — the caller decides whether to retry, return `WOULDBLOCK`, or
/// park based on the deadline (parking needs access to the actor table,
/// which this free function deliberately does not take).
pub fn poll_once(
    sources: &[Source],
    bus_poll: impl Fn(usize) -> bool,
    bus_take: impl Fn(usize) -> Option<Payload>,
    mailbox: &mut Mailbox,
    entries: &mut EntryPool,
    payloads: &mut PayloadPool,
) -> Option<Outcome> {
    for (index, source) in sources.iter().enumerate() {
        if let Source::BusSubscription(bus) = source {
            if bus_poll(*bus) {
                if let Some(payload) = bus_take(*bus) {
                    return Some(Outcome::Bus { index, payload });
                }
            }
        }
    }

    for (index, source) in sources.iter().enumerate() {
        if let Source::IpcFilter(filter) = source {
            if let Some(received) = mailbox.scan_remove(entries, payloads, filter) {
                return Some(Outcome::Ipc { index, received });
            }
        }
    }

    None
}

pub fn validate_source_count(sources: &[Source], max: usize) -> Result<(), SelectError> {
    if sources.len() > max {
        Err(SelectError::TooManySources)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::ids::{ActorId, Tag};
    use crate::message::envelope::Entry;
    use crate::message::header::{MessageClass, MessageHeader};

    #[test]
    fn bus_outranks_ipc_when_both_ready() {
        let mut entries = EntryPool::with_capacity(4);
        let mut payloads = PayloadPool::with_capacity(4);
        let mut mailbox = Mailbox::default();
        let payload_slot = payloads
            .acquire(Payload::copy_from(b"x"))
            .unwrap();
        mailbox
            .push_back(
                &mut entries,
                Entry::new(
                    ActorId::new(0, 0),
                    MessageHeader::new(MessageClass::Notify, false, Tag::new(100)),
                    payload_slot,
                ),
            )
            .unwrap();

        let sources = [Source::IpcFilter(Filter::from_tag(Tag::new(100))), Source::BusSubscription(0)];
        let outcome = poll_once(
            &sources,
            |_| true,
            |_| Some(Payload::copy_from(b"bus")),
            &mut mailbox,
            &mut entries,
            &mut payloads,
        );
        match outcome {
            Some(Outcome::Bus { index, .. }) => assert_eq!(index, 1),
            _ => panic!("expected bus outcome to win"),
        }
    }

    #[test]
    fn too_many_sources_is_rejected_before_polling() {
        let sources = vec![Source::BusSubscription(0); 5];
        assert!(validate_source_count(&sources, 4).is_err());
    }
}
