//! Actor identity, lifecycle state, and the per-actor context handle.
//!
//! An actor is a bare `async fn(SharedEngine, ActorId) -> ExitReason` run
//! as a future by the scheduler; there is no `Actor` trait to implement.
//! [`context::ActorContext`] is the handle such a future uses to send,
//! receive, link, monitor, arm timers, and select.
//!
//! - `table.rs` — `Priority`, `ActorState`, `ExitReason`, `WaitReason`, and
//!   the fixed-capacity `ActorTable`/`RunQueues` the scheduler drives.
//! - `context.rs` — `ActorContext` and its `receive`/`select`/`after`
//!   futures.

pub mod context;
pub mod table;

pub use context::ActorContext;
pub use table::{ActorState, ActorTable, ExitReason, Priority, RunQueues, WaitReason};
