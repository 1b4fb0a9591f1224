//! Opaque identifiers for actors, monitors, and timers.
//!
//! Actor identifiers are table-index-based rather than UUID-based so that a
//! stale reference to a dead actor is detectable rather than silently
//! aliasing a later occupant of the same slot (§9 "Cyclic graphs (links)").

// Layer 1: Standard library imports
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies an actor by its slot in the actor table plus a generation
/// counter. When an actor dies, its slot is reused for a later spawn with an
/// incremented generation; an `ActorId` captured before the death compares
/// unequal to the id of whatever occupies the slot afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId {
    index: u32,
    generation: u32,
}

impl ActorId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index into the actor table.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot this id was minted for.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}g{}", self.index, self.generation)
    }
}

/// Reference id for a unidirectional monitor edge (watcher → target).
///
/// Unique for the lifetime of the runtime; monotonically assigned, never
/// reused, so a cancelled or fired monitor's ref id can't be confused with a
/// later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorRef(u32);

impl MonitorRef {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MonitorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monitor#{}", self.0)
    }
}

/// Global monotonic counter for [`MonitorRef`] allocation, shared across the
/// whole runtime (monitor refs are globally unique, not per-actor).
#[derive(Debug, Default)]
pub(crate) struct MonitorRefAllocator {
    next: AtomicU32,
}

impl MonitorRefAllocator {
    pub(crate) fn alloc(&self) -> MonitorRef {
        MonitorRef::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies a timer owned by a single actor. Ids increase monotonically
/// per owning actor (§4.6); uniqueness is only required within the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

impl TimerId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Per-actor monotonic allocator for [`TimerId`]s.
#[derive(Debug, Default)]
pub struct TimerIdAllocator {
    next: u32,
}

impl TimerIdAllocator {
    pub fn alloc(&mut self) -> TimerId {
        let id = TimerId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// A 27-bit correlation tag carried by every message (§3 Message).
///
/// Only the low 27 bits are significant; constructing from a wider value
/// masks the rest off rather than rejecting it, matching the wire header's
/// bit layout (§3 "Wire header").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u32);

impl Tag {
    pub const MASK: u32 = 0x07FF_FFFF;

    pub fn new(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for Tag {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag({})", self.0)
    }
}

/// Global allocator for generated request/reply correlation tags.
///
/// Generated tags are distinguished from user tags by the message header's
/// separate `generated` flag bit, not by a reserved tag range (§4.3
/// "generated tags and user tags live in disjoint namespaces").
#[derive(Debug, Default)]
pub(crate) struct GeneratedTagAllocator {
    next: AtomicU32,
}

impl GeneratedTagAllocator {
    pub(crate) fn alloc(&self) -> Tag {
        Tag::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
