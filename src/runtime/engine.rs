//! The shared runtime state: actor table, run queues, and the pools that
//! back mailboxes, links, monitors, timers, and buses (§2, §4).
//!
//! Single-threaded by construction — exactly one actor is ever RUNNING —
//! so this is owned behind `Rc<RefCell<Engine>>` rather than the
//! `Arc`/lock-based sharing a multi-threaded scheduler would need.

// Layer 1: Standard library imports
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

// Layer 3: Internal module imports
use crate::actor::table::{ActorRecord, ActorState, ActorTable, ExitReason, Priority, RunQueues};
use crate::bus::Bus;
use crate::config::RuntimeConfig;
use crate::error::{LinkError, MailboxError, RuntimeError, TimerError};
use crate::ids::{ActorId, GeneratedTagAllocator, MonitorRef, MonitorRefAllocator, Tag, TimerId};
use crate::link::{self, LinkPool};
use crate::mailbox::{EntryPool, Mailbox};
use crate::message::envelope::Entry;
use crate::message::header::{MessageClass, MessageHeader};
use crate::message::payload::{Payload, PayloadPool};
use crate::monitor::{self, MonitorPool};
use crate::monitoring::{ActorEvent, ActorEventKind, BusEvent, BusEventKind, MailboxEvent, MailboxEventKind, NoopRuntimeMonitor, RuntimeMonitor};
use crate::time::{Clock, MicroTimestamp, MonotonicClock};
use crate::timer::{self, TimerKind, TimerPool};

/// Shared handle to the engine. Futures stored in `ActorRecord::future`
/// close over a clone of this to reach `send`/`link`/`monitor`/timer and
/// bus operations from inside `Future::poll`.
pub type SharedEngine = Rc<std::cell::RefCell<Engine>>;

/// All mutable runtime state outside of the actors' own futures.
pub struct Engine {
    pub config: RuntimeConfig,
    pub clock: Box<dyn Clock>,
    pub actors: ActorTable,
    pub run_queues: RunQueues,
    pub entries: EntryPool,
    pub payloads: PayloadPool,
    pub links: LinkPool,
    pub monitors: MonitorPool,
    pub timers: TimerPool,
    pub buses: Vec<Option<Bus>>,
    monitor_refs: MonitorRefAllocator,
    generated_tags: GeneratedTagAllocator,
    pub monitor: Rc<dyn RuntimeMonitor>,
    shutdown_requested: bool,
}

impl Engine {
    pub fn new(config: RuntimeConfig) -> Result<SharedEngine, RuntimeError> {
        config.validate()?;
        Self::with_clock(config, Box::new(MonotonicClock::default()))
    }

    pub fn with_clock(
        config: RuntimeConfig,
        clock: Box<dyn Clock>,
    ) -> Result<SharedEngine, RuntimeError> {
        config.validate()?;
        let mut buses = Vec::with_capacity(config.max_buses);
        buses.resize_with(config.max_buses, || None);
        let engine = Engine {
            actors: ActorTable::with_capacity(config.max_actors),
            run_queues: RunQueues::new(),
            entries: EntryPool::with_capacity(config.mailbox_entry_pool_size),
            payloads: PayloadPool::with_capacity(config.message_data_pool_size),
            links: LinkPool::with_capacity(config.link_entry_pool_size),
            monitors: MonitorPool::with_capacity(config.monitor_entry_pool_size),
            timers: TimerPool::with_capacity(config.timer_entry_pool_size),
            buses,
            monitor_refs: MonitorRefAllocator::default(),
            generated_tags: GeneratedTagAllocator::default(),
            monitor: Rc::new(NoopRuntimeMonitor),
            config,
            clock,
            shutdown_requested: false,
        };
        Ok(Rc::new(std::cell::RefCell::new(engine)))
    }

    pub fn set_monitor(&mut self, monitor: Rc<dyn RuntimeMonitor>) {
        self.monitor = monitor;
    }

    pub fn now(&self) -> MicroTimestamp {
        self.clock.now_us()
    }

    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    // ---- spawn / exit ---------------------------------------------------

    /// Allocate a slot for a new actor and enqueue it READY (§4.2). The
    /// caller supplies the already-constructed entry future; it is polled
    /// for the first time by the scheduler, never here.
    pub fn spawn(
        &mut self,
        priority: Priority,
        name: Option<String>,
        future: Pin<Box<dyn Future<Output = ExitReason>>>,
    ) -> Result<ActorId, RuntimeError> {
        let id = self
            .actors
            .insert(|_| ActorRecord {
                generation: 0,
                name,
                priority,
                state: ActorState::Ready,
                mailbox: Mailbox::default(),
                future,
                wait_reason: None,
                wait_deadline: None,
                owned_timers: Vec::new(),
                outgoing_links: Vec::new(),
                incoming_monitors: Vec::new(),
                outgoing_monitors: Vec::new(),
                bus_subscriptions: Vec::new(),
            })
            .ok_or(RuntimeError::ActorTableFull)?;
        self.run_queues.push_back(priority, id);
        tracing::debug!(actor = ?id, ?priority, "actor spawned");
        self.monitor.on_actor(ActorEvent {
            timestamp: chrono::Utc::now(),
            actor_id: id,
            event_kind: ActorEventKind::Spawned,
            metadata: Default::default(),
        });
        Ok(id)
    }

    pub fn wake_if_waiting(&mut self, id: ActorId) {
        if let Some(record) = self.actors.get_mut(id) {
            if record.state == ActorState::Waiting {
                record.state = ActorState::Ready;
                record.wait_reason = None;
                record.wait_deadline = None;
                self.run_queues.push_back(record.priority, id);
            }
        }
    }

    /// Terminate `id` with `reason`, propagating death to links, monitors,
    /// owned timers, and bus subscriptions (§4.4 death propagation).
    pub fn kill(&mut self, id: ActorId, reason: ExitReason) {
        tracing::debug!(actor = ?id, ?reason, "killing actor");
        self.run_queues.remove(id);
        let Some(mut record) = self.actors.remove(id) else {
            return;
        };
        record.mailbox.drain_all(&mut self.entries, &mut self.payloads);

        for slot in record.outgoing_links.drain(..) {
            if let Some(edge) = self.links.get(slot).copied() {
                link::release_edge(&mut self.links, slot);
                self.notify_link_peer(edge.to, id, reason);
            }
        }

        for slot in record.incoming_monitors.drain(..) {
            if let Some(edge) = self.monitors.get(slot).copied() {
                monitor::cancel(&mut self.monitors, slot);
                self.notify_watcher(edge.watcher, id, edge.ref_id, reason);
            }
        }
        for slot in record.outgoing_monitors.drain(..) {
            monitor::cancel(&mut self.monitors, slot);
        }

        let owned_timer_slots: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, record)| record.owner == id)
            .map(|(slot, _)| slot)
            .collect();
        for slot in owned_timer_slots {
            let _ = timer::cancel(&mut self.timers, slot);
        }
        record.owned_timers.clear();

        for bus_id in record.bus_subscriptions.drain(..) {
            if let Some(Some(bus)) = self.buses.get_mut(bus_id) {
                bus.unsubscribe(id);
            }
        }

        let kind = match reason {
            ExitReason::Normal => ActorEventKind::Exited { reason: "normal".into() },
            ExitReason::Killed => ActorEventKind::Exited { reason: "killed".into() },
            ExitReason::Crash => ActorEventKind::Crashed { reason: "crash".into() },
            ExitReason::CrashStack => ActorEventKind::Crashed { reason: "crash_stack".into() },
        };
        self.monitor.on_actor(ActorEvent {
            timestamp: chrono::Utc::now(),
            actor_id: id,
            event_kind: kind,
            metadata: Default::default(),
        });
    }

    fn notify_link_peer(&mut self, peer: ActorId, dead: ActorId, reason: ExitReason) {
        if !self.actors.is_live(peer) {
            return;
        }
        tracing::trace!(dead = ?dead, peer = ?peer, ?reason, "notifying link peer");
        let _ = self.enqueue(dead, peer, MessageClass::Exit, Tag::new(0), false, payload_for(reason));
        self.wake_if_waiting(peer);
    }

    fn notify_watcher(&mut self, watcher: ActorId, target: ActorId, ref_id: MonitorRef, reason: ExitReason) {
        if !self.actors.is_live(watcher) {
            return;
        }
        tracing::trace!(target = ?target, watcher = ?watcher, ?reason, "notifying watcher");
        let tag = Tag::new(ref_id.as_u32());
        let _ = self.enqueue(target, watcher, MessageClass::Exit, tag, true, payload_for(reason));
        self.wake_if_waiting(watcher);
    }

    // ---- mailbox ----------------------------------------------------------

    /// Deliver `bytes` into `target`'s mailbox, acquiring one entry slot and
    /// one payload slot from the shared pools (§4.3). Wakes `target` if it
    /// is WAITING on IPC.
    pub fn enqueue(
        &mut self,
        sender: ActorId,
        target: ActorId,
        class: MessageClass,
        tag: Tag,
        generated: bool,
        bytes: &[u8],
    ) -> Result<(), MailboxError> {
        if bytes.len() > self.config.max_payload_size() {
            return Err(MailboxError::PayloadTooLarge);
        }
        if !self.actors.is_live(target) {
            return Err(MailboxError::TargetDead);
        }
        let payload_slot = self
            .payloads
            .acquire(Payload::copy_from(bytes))
            .map_err(|_| MailboxError::PayloadPoolExhausted)?;
        let header = MessageHeader::new(class, generated, tag);
        let entry = Entry::new(sender, header, payload_slot);
        let Some(record) = self.actors.get_mut(target) else {
            let _ = self.payloads.release(payload_slot);
            return Err(MailboxError::TargetDead);
        };
        if let Err(err) = record.mailbox.push_back(&mut self.entries, entry) {
            let _ = self.payloads.release(payload_slot);
            return Err(err);
        }
        let queue_size = record.mailbox.len();
        tracing::trace!(?sender, ?target, ?class, ?tag, queue_size, "message enqueued");
        self.monitor.on_mailbox(MailboxEvent {
            timestamp: chrono::Utc::now(),
            actor_id: target,
            event_kind: MailboxEventKind::MessageEnqueued { queue_size },
            metadata: Default::default(),
        });
        self.wake_if_waiting(target);
        Ok(())
    }

    pub fn alloc_generated_tag(&self) -> Tag {
        self.generated_tags.alloc()
    }

    // ---- links / monitors ---------------------------------------------------

    pub fn link(&mut self, a: ActorId, b: ActorId) -> Result<(), LinkError> {
        if a == b {
            return Err(LinkError::SelfLink);
        }
        if !self.actors.is_live(a) || !self.actors.is_live(b) {
            return Err(LinkError::TargetDead);
        }
        let (a_to_b, b_to_a) = link::link(&mut self.links, a, b)?;
        if let Some(record) = self.actors.get_mut(a) {
            record.outgoing_links.push(a_to_b);
        }
        if let Some(record) = self.actors.get_mut(b) {
            record.outgoing_links.push(b_to_a);
        }
        Ok(())
    }

    pub fn monitor(&mut self, watcher: ActorId, target: ActorId) -> Result<MonitorRef, LinkError> {
        if !self.actors.is_live(target) {
            return Err(LinkError::TargetDead);
        }
        let ref_id = self.monitor_refs.alloc();
        let slot = monitor::monitor(&mut self.monitors, watcher, target, ref_id)?;
        if let Some(record) = self.actors.get_mut(target) {
            record.incoming_monitors.push(slot);
        }
        if let Some(record) = self.actors.get_mut(watcher) {
            record.outgoing_monitors.push(slot);
        }
        Ok(ref_id)
    }

    pub fn cancel_monitor(&mut self, watcher: ActorId, ref_id: MonitorRef) {
        let Some(record) = self.actors.get_mut(watcher) else {
            return;
        };
        let Some(pos) = record
            .outgoing_monitors
            .iter()
            .position(|slot| self.monitors.get(*slot).map(|e| e.ref_id) == Some(ref_id))
        else {
            return;
        };
        let slot = record.outgoing_monitors.remove(pos);
        if let Some(edge) = self.monitors.get(slot).copied() {
            if let Some(target_record) = self.actors.get_mut(edge.target) {
                target_record.incoming_monitors.retain(|s| *s != slot);
            }
        }
        monitor::cancel(&mut self.monitors, slot);
    }

    // ---- timers -------------------------------------------------------------

    pub fn arm_timer(
        &mut self,
        owner: ActorId,
        timer_id: TimerId,
        kind: TimerKind,
        delay_us: u64,
    ) -> Result<(), TimerError> {
        let deadline = self.now() + delay_us;
        let slot = timer::arm(&mut self.timers, owner, timer_id, kind, deadline)?;
        if let Some(record) = self.actors.get_mut(owner) {
            record.owned_timers.push(timer_id);
        }
        let _ = slot;
        Ok(())
    }

    pub fn cancel_timer(&mut self, owner: ActorId, timer_id: TimerId) -> Result<(), TimerError> {
        let slot = self
            .timers
            .iter()
            .find(|(_, record)| record.owner == owner && record.timer_id == timer_id)
            .map(|(slot, _)| slot)
            .ok_or(TimerError::Unknown)?;
        timer::cancel(&mut self.timers, slot)?;
        if let Some(record) = self.actors.get_mut(owner) {
            record.owned_timers.retain(|t| *t != timer_id);
        }
        Ok(())
    }

    /// Fire every timer whose deadline has elapsed, enqueuing a TIMER
    /// message for each and rescheduling periodic ones (§4.6).
    pub fn tick_timers(&mut self) {
        let now = self.now();
        let due: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, record)| !record.pending && record.deadline <= now)
            .map(|(slot, record)| (slot, *record))
            .collect();
        for (slot, record) in due {
            let tag = Tag::new(record.timer_id.as_u32());
            tracing::trace!(owner = ?record.owner, timer_id = ?record.timer_id, "timer fired");
            let _ = self.enqueue(record.owner, record.owner, MessageClass::Timer, tag, true, &[]);
            match record.kind {
                TimerKind::OneShot => {
                    let _ = self.timers.release(slot);
                }
                TimerKind::Periodic { .. } => {
                    if let Some(stored) = self.timers.get_mut(slot) {
                        stored.pending = true;
                        timer::reschedule(stored);
                    }
                }
            }
        }
    }

    pub fn next_timer_deadline(&self) -> Option<MicroTimestamp> {
        self.timers.iter().map(|(_, record)| record.deadline).min()
    }

    /// Clear the `pending` flag once `owner` has actually taken the TIMER
    /// message for `timer_id` out of its mailbox, re-arming eligibility for
    /// the next tick (§4.6 "at most one outstanding TIMER message per timer
    /// id"). A no-op if the timer was cancelled or already fired again
    /// under a different slot.
    pub fn mark_timer_delivered(&mut self, owner: ActorId, timer_id: TimerId) {
        let slot = self
            .timers
            .iter()
            .find(|(_, record)| record.owner == owner && record.timer_id == timer_id)
            .map(|(slot, _)| slot);
        if let Some(slot) = slot {
            if let Some(record) = self.timers.get_mut(slot) {
                record.pending = false;
            }
        }
    }

    // ---- buses ----------------------------------------------------------------

    pub fn create_bus(&mut self, max_subscribers: usize) -> Result<usize, RuntimeError> {
        let bus = Bus::new(max_subscribers)?;
        let slot = self
            .buses
            .iter()
            .position(Option::is_none)
            .ok_or(RuntimeError::BusTableFull)?;
        self.buses[slot] = Some(bus);
        Ok(slot)
    }

    pub fn bus_subscribe(&mut self, bus_id: usize, actor: ActorId) -> Option<usize> {
        let index = self.buses.get_mut(bus_id)?.as_mut()?.subscribe(actor)?;
        if let Some(record) = self.actors.get_mut(actor) {
            record.bus_subscriptions.push(bus_id);
        }
        self.monitor.on_bus(BusEvent {
            timestamp: chrono::Utc::now(),
            event_kind: BusEventKind::Subscribed { actor_id: actor },
            metadata: Default::default(),
        });
        Some(index)
    }

    pub fn bus_unsubscribe(&mut self, bus_id: usize, actor: ActorId) {
        if let Some(Some(bus)) = self.buses.get_mut(bus_id) {
            bus.unsubscribe(actor);
        }
        if let Some(record) = self.actors.get_mut(actor) {
            record.bus_subscriptions.retain(|id| *id != bus_id);
        }
        self.monitor.on_bus(BusEvent {
            timestamp: chrono::Utc::now(),
            event_kind: BusEventKind::Unsubscribed { actor_id: actor },
            metadata: Default::default(),
        });
    }

    pub fn bus_publish(&mut self, bus_id: usize, bytes: &[u8]) -> Result<(), RuntimeError> {
        let bus = self
            .buses
            .get_mut(bus_id)
            .and_then(Option::as_mut)
            .ok_or(RuntimeError::UnknownBus)?;
        bus.publish(Payload::copy_from(bytes));
        let subscriber_count = bus.subscriber_count();
        self.monitor.on_bus(BusEvent {
            timestamp: chrono::Utc::now(),
            event_kind: BusEventKind::Published { subscriber_count: subscriber_count as u32 },
            metadata: Default::default(),
        });
        let waiters: Vec<ActorId> = self.actors.ids();
        for id in waiters {
            if self
                .actors
                .get(id)
                .map(|r| r.bus_subscriptions.iter().any(|s| *s == bus_id))
                .unwrap_or(false)
            {
                self.wake_if_waiting(id);
            }
        }
        Ok(())
    }

    pub fn bus_has_data_for(&self, bus_id: usize, actor: ActorId) -> bool {
        self.buses
            .get(bus_id)
            .and_then(Option::as_ref)
            .map(|bus| bus.has_data_for(actor))
            .unwrap_or(false)
    }

    pub fn bus_take_for(&mut self, bus_id: usize, actor: ActorId) -> Option<Payload> {
        self.buses.get_mut(bus_id)?.as_mut()?.take_for(actor)
    }
}

/// EXIT message payload for a given exit reason, shared by link and monitor
/// notification (§4.4).
fn payload_for(reason: ExitReason) -> &'static [u8] {
    match reason {
        ExitReason::Normal => b"normal",
        ExitReason::Killed => b"killed",
        ExitReason::Crash => b"crash",
        ExitReason::CrashStack => b"crash_stack",
    }
}
