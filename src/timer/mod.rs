//! One-shot and periodic timers (§4.6 "Timers").

// Layer 3: Internal module imports
use crate::error::TimerError;
use crate::ids::{ActorId, TimerId};
use crate::pool::{Pool, Slot};
use crate::time::MicroTimestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    OneShot,
    Periodic { interval_us: u64 },
}

/// A single armed timer. `deadline` is the next instant at which a TIMER
/// message is due; for periodic timers it advances by `interval_us` each
/// time it fires rather than by wall-clock elapsed time, so a scheduler
/// stall coalesces into a single catch-up tick instead of a backlog
/// (§4.6: "at most one outstanding TIMER message per timer id").
#[derive(Debug, Clone, Copy)]
pub struct TimerRecord {
    pub owner: ActorId,
    pub timer_id: TimerId,
    pub kind: TimerKind,
    pub deadline: MicroTimestamp,
    /// True while a TIMER message for this tick is sitting in the owner's
    /// mailbox — a periodic timer does not arm its next tick until the
    /// current one has been delivered.
    pub pending: bool,
}

pub type TimerPool = Pool<TimerRecord>;

pub fn arm(
    pool: &mut TimerPool,
    owner: ActorId,
    timer_id: TimerId,
    kind: TimerKind,
    deadline: MicroTimestamp,
) -> Result<Slot, TimerError> {
    pool.acquire(TimerRecord {
        owner,
        timer_id,
        kind,
        deadline,
        pending: false,
    })
    .map_err(|_| TimerError::PoolExhausted)
}

pub fn cancel(pool: &mut TimerPool, slot: Slot) -> Result<(), TimerError> {
    pool.release(slot).map(|_| ()).map_err(|_| TimerError::Unknown)
}

/// Advance a periodic timer's deadline by one interval after it fires.
/// One-shot timers are removed by the caller instead of being re-armed.
/// Leaves `pending` untouched — it clears only once the owner actually
/// consumes the outstanding TIMER message, not here.
pub fn reschedule(record: &mut TimerRecord) {
    if let TimerKind::Periodic { interval_us } = record.kind {
        record.deadline += interval_us;
    }
}
