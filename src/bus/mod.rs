//! Publish/subscribe buses consumed only through the select primitive
//! (§3 "Bus entry", §4.5).

// Layer 3: Internal module imports
use crate::error::RuntimeError;
use crate::ids::ActorId;
use crate::message::payload::Payload;

/// Hard cap on subscribers per bus: a 32-bit bitmask identifies each
/// subscriber's slot, so a 33rd subscriber has nowhere to be recorded.
pub const MAX_BUS_SUBSCRIBERS: usize = 32;

/// One published value still unread by at least one subscriber.
pub struct BusEntry {
    pub payload: Payload,
    /// Bit `i` set means subscriber slot `i` has not yet consumed this
    /// entry.
    pub unread: u32,
}

/// A single bus: a fixed subscriber table plus a backlog of unread
/// entries. Subscriber slots are reused by index, not generation-tagged —
/// a bus handle is only ever held by the subscribing actor itself.
pub struct Bus {
    subscribers: Vec<Option<ActorId>>,
    entries: Vec<BusEntry>,
}

impl Bus {
    pub fn new(max_subscribers: usize) -> Result<Self, RuntimeError> {
        if max_subscribers == 0 || max_subscribers > MAX_BUS_SUBSCRIBERS {
            return Err(RuntimeError::InvalidBusSubscriberCap);
        }
        Ok(Self {
            subscribers: vec![None; max_subscribers],
            entries: Vec::new(),
        })
    }

    /// Subscribe `actor`, returning its subscriber-slot index. `None` if
    /// every slot is taken.
    pub fn subscribe(&mut self, actor: ActorId) -> Option<usize> {
        let index = self.subscribers.iter().position(Option::is_none)?;
        self.subscribers[index] = Some(actor);
        Some(index)
    }

    /// Remove `actor` from the subscriber table and clear its unread bit
    /// from every pending entry (§4.4 death propagation step 5).
    pub fn unsubscribe(&mut self, actor: ActorId) {
        if let Some(index) = self
            .subscribers
            .iter()
            .position(|s| *s == Some(actor))
        {
            self.subscribers[index] = None;
            let mask = !(1u32 << index);
            for entry in &mut self.entries {
                entry.unread &= mask;
            }
            self.entries.retain(|e| e.unread != 0);
        }
    }

    /// Publish a value, marking it unread for every current subscriber.
    pub fn publish(&mut self, payload: Payload) {
        let mut unread = 0u32;
        for (i, slot) in self.subscribers.iter().enumerate() {
            if slot.is_some() {
                unread |= 1 << i;
            }
        }
        if unread != 0 {
            self.entries.push(BusEntry { payload, unread });
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|s| s.is_some()).count()
    }

    /// True if `actor`'s subscriber slot has at least one unread entry.
    pub fn has_data_for(&self, actor: ActorId) -> bool {
        let Some(index) = self.subscribers.iter().position(|s| *s == Some(actor)) else {
            return false;
        };
        self.entries.iter().any(|e| e.unread & (1 << index) != 0)
    }

    /// Consume the oldest unread entry for `actor`, marking it read; once
    /// every subscriber has read an entry it is dropped from the backlog.
    pub fn take_for(&mut self, actor: ActorId) -> Option<Payload> {
        let index = self.subscribers.iter().position(|s| *s == Some(actor))?;
        let bit = 1u32 << index;
        let position = self.entries.iter().position(|e| e.unread & bit != 0)?;
        self.entries[position].unread &= !bit;
        let payload = if self.entries[position].unread == 0 {
            self.entries.remove(position).payload
        } else {
            // Another subscriber still needs it; hand back a copy.
            Payload::copy_from(self.entries[position].payload.as_bytes())
        };
        Some(payload)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn subscriber_cap_above_32_is_rejected() {
        assert!(Bus::new(33).is_err());
    }

    #[test]
    fn publish_then_take_round_trips_for_a_single_subscriber() {
        let mut bus = Bus::new(4).unwrap();
        let actor = ActorId::new(0, 0);
        bus.subscribe(actor);
        bus.publish(Payload::copy_from(b"hi"));
        assert!(bus.has_data_for(actor));
        let payload = bus.take_for(actor).unwrap();
        assert_eq!(payload.as_bytes(), b"hi");
        assert!(!bus.has_data_for(actor));
    }

    #[test]
    fn entry_survives_until_every_subscriber_has_read_it() {
        let mut bus = Bus::new(4).unwrap();
        let a = ActorId::new(0, 0);
        let b = ActorId::new(1, 0);
        bus.subscribe(a);
        bus.subscribe(b);
        bus.publish(Payload::copy_from(b"x"));
        bus.take_for(a);
        assert!(bus.has_data_for(b));
        bus.take_for(b);
        assert!(!bus.has_data_for(b));
    }

    #[test]
    fn unsubscribe_clears_pending_unread_bits() {
        let mut bus = Bus::new(4).unwrap();
        let a = ActorId::new(0, 0);
        bus.subscribe(a);
        bus.publish(Payload::copy_from(b"x"));
        bus.unsubscribe(a);
        assert!(!bus.has_data_for(a));
    }
}
