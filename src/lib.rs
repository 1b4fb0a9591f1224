//! A cooperative, single-threaded actor runtime core.
//!
//! Exactly one actor's future is ever being polled at a time; nothing
//! preempts it mid-poll. The scheduler pulls ready actors off four
//! priority-ordered run queues, polls each to completion of one step, and
//! moves it between RUNNING/WAITING/READY/DEAD based on the outcome (§4.1).
//!
//! # Components
//!
//! - [`runtime::Runtime`] / [`runtime::Engine`] — construction and the
//!   spawn/send/link/monitor surface, plus the shared state handle actor
//!   futures clone into their own [`actor::context::ActorContext`].
//! - [`actor::context::ActorContext`] — the per-actor handle used from
//!   inside an entry future to send, receive, link, monitor, arm timers,
//!   and select across mailbox and bus sources.
//! - [`supervisor`] — two-phase child start, EXIT-driven restart, and the
//!   `OneForOne`/`OneForAll`/`RestForOne` fanout strategies.
//! - [`mailbox`], [`message`], [`bus`], [`timer`], [`link`], [`monitor`] —
//!   the fixed-capacity primitives the scheduler and actor contexts are
//!   built from (§3 "Static pools").
//! - [`monitoring`] — the observability seam: a `RuntimeMonitor` trait plus
//!   `NoopRuntimeMonitor`/`InMemoryRuntimeMonitor` implementations, fed
//!   actor/scheduler/bus/mailbox/supervision events as the runtime runs.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kestrel_rt::prelude::*;
//!
//! let config = RuntimeConfig::builder().max_actors(8).build().unwrap();
//! let runtime = Runtime::new(config).unwrap();
//!
//! let id = runtime
//!     .spawn(Priority::Normal, Some("greeter".into()), |engine, self_id| async move {
//!         let ctx = ActorContext::new(engine, self_id);
//!         let _ = ctx.receive(Filter::any(), None).await;
//!         ExitReason::Normal
//!     })
//!     .unwrap();
//!
//! runtime.run_until_idle();
//! assert!(!runtime.engine().borrow().actors.is_live(id));
//! ```
//!
//! # Module Organization
//!
//! This `lib.rs` contains only module declarations and the crate's public
//! re-export surface; implementation lives in the individual module files.

pub mod actor;
pub mod bus;
pub mod config;
pub mod error;
pub mod ids;
pub mod link;
pub mod mailbox;
pub mod message;
pub mod monitor;
pub mod monitoring;
pub mod pool;
pub mod prelude;
pub mod runtime;
pub mod scheduler;
pub mod select;
pub mod supervisor;
pub mod time;
pub mod timer;

pub use actor::context::ActorContext;
pub use actor::table::{ActorState, ExitReason, Priority, WaitReason};
pub use config::RuntimeConfig;
pub use error::{Status, StatusCode};
pub use ids::{ActorId, MonitorRef, Tag, TimerId};
pub use mailbox::{Filter, Received};
pub use monitoring::{InMemoryRuntimeMonitor, NoopRuntimeMonitor, RuntimeMonitor};
pub use runtime::{Engine, Runtime, SharedEngine};
pub use supervisor::{ChildSpec, RestartPolicy, Strategy, SupervisorSpec};
pub use time::{Clock, MicroTimestamp, MonotonicClock};
