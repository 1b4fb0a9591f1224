//! Supervisors: two-phase child start, EXIT-driven restart, and the three
//! BEAM-inspired fanout strategies (§4.7 "Supervisor").
//!
//! A supervisor is itself just an actor — `supervisor::start` spawns its
//! children, installs a sibling directory into each of them, monitors
//! them, then spawns the supervisor's own entry future (`node::run`) to
//! drive the restart loop. There is no separate supervision-tree type:
//! nesting a supervisor under another is done by making a child's entry
//! future call `supervisor::start` itself.

pub mod backoff;
pub mod node;
pub mod strategy;
pub mod types;

pub use backoff::RestartIntensity;
pub use node::{start, stop, ChildHealth, SupervisorHandle, STOP_TAG};
pub use strategy::Strategy;
pub use types::{ChildFactory, ChildSpec, RestartPolicy, SiblingDirectory, SiblingInfo, SupervisorSpec};
