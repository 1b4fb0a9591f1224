//! Receive filters (§4.2 "Selective receive").

// Layer 3: Internal module imports
use crate::ids::{ActorId, Tag};
use crate::message::envelope::Entry;
use crate::message::header::MessageClass;

/// A predicate over a mailbox entry's sender/class/tag. `None` on any field
/// means "match anything" — the wildcard is structural (see DESIGN.md, §9
/// open question on `MSG_ANY`/`SENDER_ANY`/`TAG_ANY`), so a concrete message
/// can never be mistaken for a wildcard at the type level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filter {
    pub sender: Option<ActorId>,
    pub class: Option<MessageClass>,
    pub tag: Option<Tag>,
}

impl Filter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn from_sender(sender: ActorId) -> Self {
        Self {
            sender: Some(sender),
            ..Self::default()
        }
    }

    pub fn from_tag(tag: Tag) -> Self {
        Self {
            tag: Some(tag),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: MessageClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_sender(mut self, sender: ActorId) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        self.sender.is_none_or(|s| s == entry.sender)
            && self.class.is_none_or(|c| c == entry.header.class)
            && self.tag.is_none_or(|t| t == entry.header.tag)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::message::header::MessageHeader;
    use crate::pool::Pool;

    fn entry(sender: ActorId, class: MessageClass, tag: u32) -> Entry {
        let mut dummy_pool: Pool<()> = Pool::with_capacity(1);
        let slot = dummy_pool.acquire(()).unwrap();
        Entry::new(sender, MessageHeader::new(class, false, Tag::new(tag)), slot)
    }

    #[test]
    fn wildcard_filter_matches_anything() {
        let filter = Filter::any();
        assert!(filter.matches(&entry(ActorId::new(1, 0), MessageClass::Notify, 5)));
    }

    #[test]
    fn sender_filter_rejects_other_senders() {
        let filter = Filter::from_sender(ActorId::new(1, 0));
        assert!(!filter.matches(&entry(ActorId::new(2, 0), MessageClass::Notify, 5)));
        assert!(filter.matches(&entry(ActorId::new(1, 0), MessageClass::Notify, 5)));
    }

    #[test]
    fn combined_filter_requires_all_fields_to_match() {
        let filter = Filter::any()
            .with_class(MessageClass::Request)
            .with_tag(Tag::new(7));
        assert!(!filter.matches(&entry(ActorId::new(1, 0), MessageClass::Request, 8)));
        assert!(filter.matches(&entry(ActorId::new(1, 0), MessageClass::Request, 7)));
    }
}
