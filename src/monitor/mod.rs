//! Unidirectional monitors between actors (§4.5 "Monitors").

// Layer 3: Internal module imports
use crate::error::LinkError;
use crate::ids::{ActorId, MonitorRef};
use crate::pool::{Pool, Slot};

/// A single watcher → target monitor edge. The target keeps this slot in
/// its `incoming_monitors` (to notify on death); the watcher keeps it in
/// its `outgoing_monitors` (to cancel, or clean up if the watcher itself
/// dies first).
#[derive(Debug, Clone, Copy)]
pub struct MonitorEdge {
    pub watcher: ActorId,
    pub target: ActorId,
    pub ref_id: MonitorRef,
}

pub type MonitorPool = Pool<MonitorEdge>;

pub fn monitor(
    pool: &mut MonitorPool,
    watcher: ActorId,
    target: ActorId,
    ref_id: MonitorRef,
) -> Result<Slot, LinkError> {
    pool.acquire(MonitorEdge {
        watcher,
        target,
        ref_id,
    })
    .map_err(|_| LinkError::MonitorPoolExhausted)
}

pub fn cancel(pool: &mut MonitorPool, slot: Slot) {
    let _ = pool.release(slot);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::ids::MonitorRefAllocator;

    #[test]
    fn monitor_edge_records_watcher_target_and_ref() {
        let mut pool = MonitorPool::with_capacity(2);
        let allocator = MonitorRefAllocator::default();
        let watcher = ActorId::new(0, 0);
        let target = ActorId::new(1, 0);
        let ref_id = allocator.alloc();
        let slot = monitor(&mut pool, watcher, target, ref_id).unwrap();
        let edge = pool.get(slot).unwrap();
        assert_eq!(edge.watcher, watcher);
        assert_eq!(edge.target, target);
        assert_eq!(edge.ref_id, ref_id);
    }

    #[test]
    fn cancel_releases_the_slot() {
        let mut pool = MonitorPool::with_capacity(1);
        let allocator = MonitorRefAllocator::default();
        let slot = monitor(
            &mut pool,
            ActorId::new(0, 0),
            ActorId::new(1, 0),
            allocator.alloc(),
        )
        .unwrap();
        cancel(&mut pool, slot);
        assert_eq!(pool.len(), 0);
    }
}
