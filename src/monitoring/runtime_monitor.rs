//! A synchronous facade over the async [`Monitor`] trait, sized to what
//! the scheduler's hot path can call without awaiting anything.
//!
//! The underlying [`InMemoryMonitor`]/[`NoopMonitor`] implementations never
//! actually suspend — their `record`/`snapshot`/`reset` futures resolve on
//! the first poll — so [`run_sync`] drives them to completion with a
//! no-op waker instead of requiring an async runtime on the critical path.

// Layer 1: Standard library imports
use std::future::Future;
use std::pin::pin;
use std::task::{Context, Poll, Waker};

// Layer 3: Internal module imports
use crate::monitoring::{
    ActorEvent, BusEvent, InMemoryMonitor, MailboxEvent, Monitor, MonitoringConfig,
    SchedulerEvent, SupervisionEvent,
};

fn run_sync<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let waker = Waker::noop();
    let mut cx = Context::from_waker(waker);
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(value) => value,
        Poll::Pending => unreachable!("monitor futures never actually suspend"),
    }
}

/// Fire-and-forget observation hooks the engine calls at well-defined
/// points (actor lifecycle, mailbox traffic, scheduler idling, bus
/// traffic, supervisor decisions). Default bodies are no-ops so an
/// implementation only overrides the categories it cares about.
pub trait RuntimeMonitor {
    fn on_actor(&self, _event: ActorEvent) {}
    fn on_mailbox(&self, _event: MailboxEvent) {}
    fn on_scheduler(&self, _event: SchedulerEvent) {}
    fn on_bus(&self, _event: BusEvent) {}
    fn on_supervision(&self, _event: SupervisionEvent) {}
}

/// Discards every event; the default for production builds that don't pay
/// for history tracking.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRuntimeMonitor;

impl RuntimeMonitor for NoopRuntimeMonitor {}

/// Keeps bounded, per-category event history via [`InMemoryMonitor`] — one
/// ring buffer per event category, so a burst of mailbox traffic can't
/// evict a rare supervisor restart from history.
pub struct InMemoryRuntimeMonitor {
    actor: InMemoryMonitor<ActorEvent>,
    mailbox: InMemoryMonitor<MailboxEvent>,
    scheduler: InMemoryMonitor<SchedulerEvent>,
    bus: InMemoryMonitor<BusEvent>,
    supervision: InMemoryMonitor<SupervisionEvent>,
}

impl InMemoryRuntimeMonitor {
    pub fn new(config: MonitoringConfig) -> Self {
        Self {
            actor: InMemoryMonitor::new(config.clone()),
            mailbox: InMemoryMonitor::new(config.clone()),
            scheduler: InMemoryMonitor::new(config.clone()),
            bus: InMemoryMonitor::new(config.clone()),
            supervision: InMemoryMonitor::new(config),
        }
    }

    pub fn actor_snapshot(&self) -> crate::monitoring::MonitoringSnapshot<ActorEvent> {
        run_sync(self.actor.snapshot()).unwrap_or_else(|_| empty_snapshot())
    }
}

fn empty_snapshot<E: crate::monitoring::MonitoringEvent>() -> crate::monitoring::MonitoringSnapshot<E> {
    crate::monitoring::MonitoringSnapshot {
        timestamp: chrono::Utc::now(),
        total_events: 0,
        trace_count: 0,
        debug_count: 0,
        info_count: 0,
        warning_count: 0,
        error_count: 0,
        critical_count: 0,
        recent_events: Vec::new(),
    }
}

impl RuntimeMonitor for InMemoryRuntimeMonitor {
    fn on_actor(&self, event: ActorEvent) {
        let _ = run_sync(self.actor.record(event));
    }

    fn on_mailbox(&self, event: MailboxEvent) {
        let _ = run_sync(self.mailbox.record(event));
    }

    fn on_scheduler(&self, event: SchedulerEvent) {
        let _ = run_sync(self.scheduler.record(event));
    }

    fn on_bus(&self, event: BusEvent) {
        let _ = run_sync(self.bus.record(event));
    }

    fn on_supervision(&self, event: SupervisionEvent) {
        let _ = run_sync(self.supervision.record(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ActorId;
    use crate::monitoring::ActorEventKind;
    use std::collections::HashMap;

    #[test]
    fn noop_monitor_accepts_every_event_kind() {
        let monitor = NoopRuntimeMonitor;
        monitor.on_actor(ActorEvent {
            timestamp: chrono::Utc::now(),
            actor_id: ActorId::new(0, 0),
            event_kind: ActorEventKind::Spawned,
            metadata: HashMap::new(),
        });
    }

    #[test]
    fn in_memory_monitor_records_actor_events() {
        let monitor = InMemoryRuntimeMonitor::new(MonitoringConfig::default());
        monitor.on_actor(ActorEvent {
            timestamp: chrono::Utc::now(),
            actor_id: ActorId::new(0, 0),
            event_kind: ActorEventKind::Spawned,
            metadata: HashMap::new(),
        });
        assert_eq!(monitor.actor_snapshot().total_events, 1);
    }
}
