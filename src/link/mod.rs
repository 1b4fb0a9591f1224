//! Bidirectional links between actors (§4.5 "Links").
//!
//! A link is modelled as two pool slots, one per direction, so that each
//! actor's outgoing-edge list only ever needs to walk its own slots during
//! death propagation — the other endpoint's bookkeeping is symmetric and
//! independent.

// Layer 3: Internal module imports
use crate::error::LinkError;
use crate::ids::ActorId;
use crate::pool::{Pool, Slot};

/// One direction of a link: "if `to` dies, `from` is notified/terminated."
#[derive(Debug, Clone, Copy)]
pub struct LinkEdge {
    pub from: ActorId,
    pub to: ActorId,
}

pub type LinkPool = Pool<LinkEdge>;

/// Create both directions of a link between `a` and `b`. Returns the two
/// slots so each side can record its own outgoing edge.
pub fn link(pool: &mut LinkPool, a: ActorId, b: ActorId) -> Result<(Slot, Slot), LinkError> {
    let a_to_b = pool
        .acquire(LinkEdge { from: a, to: b })
        .map_err(|_| LinkError::PoolExhausted)?;
    let b_to_a = match pool.acquire(LinkEdge { from: b, to: a }) {
        Ok(slot) => slot,
        Err(_) => {
            let _ = pool.release(a_to_b);
            return Err(LinkError::PoolExhausted);
        }
    };
    Ok((a_to_b, b_to_a))
}

/// Release a single direction's slot (used when walking an actor's own
/// `outgoing_links` on unlink or death).
pub fn release_edge(pool: &mut LinkPool, slot: Slot) {
    let _ = pool.release(slot);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn link_acquires_two_slots_one_per_direction() {
        let mut pool = LinkPool::with_capacity(4);
        let a = ActorId::new(0, 0);
        let b = ActorId::new(1, 0);
        let (a_to_b, b_to_a) = link(&mut pool, a, b).unwrap();
        assert_eq!(pool.get(a_to_b).unwrap().to, b);
        assert_eq!(pool.get(b_to_a).unwrap().to, a);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn exhaustion_rolls_back_the_first_slot() {
        let mut pool = LinkPool::with_capacity(1);
        let a = ActorId::new(0, 0);
        let b = ActorId::new(1, 0);
        assert!(link(&mut pool, a, b).is_err());
        assert_eq!(pool.len(), 0);
    }
}
