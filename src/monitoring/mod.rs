//! Observability for the runtime: a generic event/monitor trait pair
//! (§10.5 ambient stack) plus concrete event types for actor, scheduler,
//! bus, mailbox, and supervision activity.
//!
//! `NoopMonitor` compiles away to nothing for production builds that don't
//! need history; `InMemoryMonitor` keeps atomic counters and a bounded
//! ring buffer for tests and diagnostics. Neither sits on the scheduling
//! hot path by default — the runtime only records when a monitor more
//! capable than `NoopMonitor` is configured.

pub mod error;
pub mod in_memory;
pub mod noop;
pub mod runtime_monitor;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use runtime_monitor::{InMemoryRuntimeMonitor, NoopRuntimeMonitor, RuntimeMonitor};
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    ActorEvent, ActorEventKind, BusEvent, BusEventKind, MailboxEvent, MailboxEventKind,
    MonitoringConfig, MonitoringSnapshot, SchedulerEvent, SchedulerEventKind, SupervisionEvent,
    SupervisionEventKind,
};
