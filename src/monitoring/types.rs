//! Monitoring event types and configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::ids::ActorId;

mod duration_serde {
    use std::time::Duration;

    use serde::{Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        value.as_millis().serialize(serializer)
    }
}

/// Configuration for monitoring behavior.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub max_history_size: usize,
    pub severity_filter: EventSeverity,
    #[serde(with = "duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    pub timestamp: DateTime<Utc>,
    pub total_events: u64,
    pub trace_count: u64,
    pub debug_count: u64,
    pub info_count: u64,
    pub warning_count: u64,
    pub error_count: u64,
    pub critical_count: u64,
    pub recent_events: Vec<E>,
}

// ============================================================================
// Supervision Events
// ============================================================================

/// Events related to supervisor operations and child management (§4.7).
#[derive(Debug, Clone, Serialize)]
pub struct SupervisionEvent {
    pub timestamp: DateTime<Utc>,
    pub supervisor_id: String,
    pub child_id: Option<String>,
    pub event_kind: SupervisionEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SupervisionEvent {
    const EVENT_TYPE: &'static str = "supervision";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SupervisionEventKind::ChildStarted => EventSeverity::Info,
            SupervisionEventKind::ChildStopped => EventSeverity::Info,
            SupervisionEventKind::ChildFailed { .. } => EventSeverity::Error,
            SupervisionEventKind::ChildRestarted { .. } => EventSeverity::Warning,
            SupervisionEventKind::RestartLimitExceeded { .. } => EventSeverity::Critical,
            SupervisionEventKind::StrategyApplied { .. } => EventSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SupervisionEventKind {
    ChildStarted,
    ChildStopped,
    ChildFailed { error: String, restart_count: u32 },
    ChildRestarted { restart_count: u32 },
    RestartLimitExceeded {
        restart_count: u32,
        #[serde(with = "duration_serde")]
        window: Duration,
    },
    StrategyApplied { strategy: String, affected_count: usize },
}

// ============================================================================
// Actor Events
// ============================================================================

/// Events related to actor lifecycle (§4.2 spawn, §4.4 exit).
#[derive(Debug, Clone, Serialize)]
pub struct ActorEvent {
    pub timestamp: DateTime<Utc>,
    pub actor_id: ActorId,
    pub event_kind: ActorEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for ActorEvent {
    const EVENT_TYPE: &'static str = "actor";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            ActorEventKind::Spawned => EventSeverity::Debug,
            ActorEventKind::Scheduled => EventSeverity::Trace,
            ActorEventKind::Exited { .. } => EventSeverity::Info,
            ActorEventKind::Crashed { .. } => EventSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ActorEventKind {
    Spawned,
    /// Context-switched into by the scheduler.
    Scheduled,
    Exited { reason: String },
    Crashed { reason: String },
}

// ============================================================================
// Scheduler Events
// ============================================================================

/// Events related to the scheduler's run loop (§4.1).
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerEvent {
    pub timestamp: DateTime<Utc>,
    pub event_kind: SchedulerEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SchedulerEvent {
    const EVENT_TYPE: &'static str = "scheduler";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SchedulerEventKind::Started => EventSeverity::Info,
            SchedulerEventKind::Shutdown => EventSeverity::Info,
            SchedulerEventKind::RunQueuesIdle => EventSeverity::Trace,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SchedulerEventKind {
    Started,
    Shutdown,
    /// All four run queues were empty and the scheduler polled for
    /// readiness events (§4.1 step 2).
    RunQueuesIdle,
}

// ============================================================================
// Bus Events
// ============================================================================

/// Events related to publish/subscribe bus operations (§4.5).
#[derive(Debug, Clone, Serialize)]
pub struct BusEvent {
    pub timestamp: DateTime<Utc>,
    pub event_kind: BusEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for BusEvent {
    const EVENT_TYPE: &'static str = "bus";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            BusEventKind::Published { .. } => EventSeverity::Trace,
            BusEventKind::Subscribed { .. } => EventSeverity::Debug,
            BusEventKind::Unsubscribed { .. } => EventSeverity::Debug,
            BusEventKind::SubscriberCapReached => EventSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum BusEventKind {
    Published { subscriber_count: u32 },
    Subscribed { actor_id: ActorId },
    Unsubscribed { actor_id: ActorId },
    SubscriberCapReached,
}

// ============================================================================
// Mailbox Events
// ============================================================================

/// Events related to mailbox operations (§4.3).
#[derive(Debug, Clone, Serialize)]
pub struct MailboxEvent {
    pub timestamp: DateTime<Utc>,
    pub actor_id: ActorId,
    pub event_kind: MailboxEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for MailboxEvent {
    const EVENT_TYPE: &'static str = "mailbox";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            MailboxEventKind::MessageEnqueued { .. } => EventSeverity::Trace,
            MailboxEventKind::MessageReceived { .. } => EventSeverity::Trace,
            MailboxEventKind::PoolExhausted => EventSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum MailboxEventKind {
    MessageEnqueued { queue_size: usize },
    MessageReceived { queue_size: usize },
    /// The entry or payload pool was exhausted on send (§6 `NOMEM`).
    PoolExhausted,
}
