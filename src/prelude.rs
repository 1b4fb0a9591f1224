//! Convenient glob import for building on top of the runtime.
//!
//! ```rust,ignore
//! use kestrel_rt::prelude::*;
//! ```

pub use crate::actor::context::ActorContext;
pub use crate::actor::table::{ActorState, ExitReason, Priority, WaitReason};
pub use crate::config::RuntimeConfig;
pub use crate::error::{
    LinkError, MailboxError, RuntimeError, SelectError, Status, StatusCode, SupervisorError,
    TimerError,
};
pub use crate::ids::{ActorId, MonitorRef, Tag, TimerId};
pub use crate::mailbox::{Filter, Received};
pub use crate::monitoring::{InMemoryRuntimeMonitor, NoopRuntimeMonitor, RuntimeMonitor};
pub use crate::runtime::{Engine, Runtime, SharedEngine};
pub use crate::supervisor::{
    ChildFactory, ChildHealth, ChildSpec, RestartPolicy, SiblingDirectory, SiblingInfo, Strategy,
    SupervisorHandle, SupervisorSpec,
};
pub use crate::time::{Clock, MicroTimestamp, MonotonicClock};
