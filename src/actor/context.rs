//! The handle an actor's entry future uses to talk to the runtime: send,
//! receive, link, monitor, arm timers, and subscribe to buses (§4.2-§4.6).
//!
//! Every blocking operation here is a hand-rolled [`Future`] that polls the
//! shared [`Engine`] directly rather than going through an async runtime's
//! reactor — there is no I/O to wait on, only run-queue wakeups the
//! scheduler already drives (§4.1).

// Layer 1: Standard library imports
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

// Layer 3: Internal module imports
use crate::actor::table::{ActorState, ExitReason, Priority, WaitReason};
use crate::error::{LinkError, MailboxError, RuntimeError, TimerError};
use crate::ids::{ActorId, MonitorRef, Tag, TimerId, TimerIdAllocator};
use crate::mailbox::{Filter, Received};
use crate::message::header::MessageClass;
use crate::runtime::engine::SharedEngine;
use crate::select::{Outcome, Source};
use crate::time::MicroTimestamp;
use crate::timer::TimerKind;

/// Per-actor handle to the shared engine. Not `Clone` — each actor's entry
/// future owns exactly one.
pub struct ActorContext {
    engine: SharedEngine,
    self_id: ActorId,
    timer_ids: TimerIdAllocator,
}

impl ActorContext {
    pub fn new(engine: SharedEngine, self_id: ActorId) -> Self {
        Self {
            engine,
            self_id,
            timer_ids: TimerIdAllocator::default(),
        }
    }

    pub fn self_id(&self) -> ActorId {
        self.self_id
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.engine.borrow().actors.is_live(id)
    }

    /// Spawn a child actor. The new actor's entry future is built lazily
    /// from `make_future` once its id is known (§4.2).
    pub fn spawn<F, Fut>(
        &self,
        priority: Priority,
        name: Option<String>,
        make_future: F,
    ) -> Result<ActorId, RuntimeError>
    where
        F: FnOnce(SharedEngine, ActorId) -> Fut,
        Fut: Future<Output = ExitReason> + 'static,
    {
        let stub: Pin<Box<dyn Future<Output = ExitReason>>> = Box::pin(async { ExitReason::Normal });
        let id = self.engine.borrow_mut().spawn(priority, name, stub)?;
        let future: Pin<Box<dyn Future<Output = ExitReason>>> =
            Box::pin(make_future(std::rc::Rc::clone(&self.engine), id));
        if let Some(record) = self.engine.borrow_mut().actors.get_mut(id) {
            record.future = future;
        }
        Ok(id)
    }

    /// Fire-and-forget notify send (§3 `MSG_NOTIFY`).
    pub fn notify(&self, target: ActorId, tag: Tag, bytes: &[u8]) -> Result<(), MailboxError> {
        self.engine
            .borrow_mut()
            .enqueue(self.self_id, target, MessageClass::Notify, tag, false, bytes)
    }

    /// Reply to a request, echoing its tag (§4.3 request/reply pairing).
    pub fn reply(&self, target: ActorId, tag: Tag, bytes: &[u8]) -> Result<(), MailboxError> {
        self.engine
            .borrow_mut()
            .enqueue(self.self_id, target, MessageClass::Reply, tag, true, bytes)
    }

    pub fn link(&self, other: ActorId) -> Result<(), LinkError> {
        self.engine.borrow_mut().link(self.self_id, other)
    }

    pub fn monitor(&self, target: ActorId) -> Result<MonitorRef, LinkError> {
        self.engine.borrow_mut().monitor(self.self_id, target)
    }

    pub fn cancel_monitor(&self, ref_id: MonitorRef) {
        self.engine.borrow_mut().cancel_monitor(self.self_id, ref_id);
    }

    /// Externally requested termination (§4.4 `Killed`), e.g. from a
    /// supervisor enforcing a shutdown.
    pub fn external_kill(engine: &SharedEngine, target: ActorId) {
        engine.borrow_mut().kill(target, ExitReason::Killed);
    }

    /// Block until a message matching `filter` is received, or `deadline`
    /// elapses if given (§4.3 `receive`/`receive_timeout`).
    pub fn receive(&self, filter: Filter, deadline: Option<MicroTimestamp>) -> ReceiveFuture {
        ReceiveFuture {
            engine: self.engine.clone(),
            self_id: self.self_id,
            filter,
            deadline,
        }
    }

    /// Send a request and block for the matching reply (§4.3 `request`).
    /// The generated tag is not user-visible — user tags and generated
    /// tags live in disjoint namespaces (§4.3). Places a temporary monitor
    /// on `target` first, so a target death before it replies resolves the
    /// future as `Closed` rather than waiting out the full deadline.
    pub fn request(
        &self,
        target: ActorId,
        bytes: &[u8],
        deadline: Option<MicroTimestamp>,
    ) -> Result<RequestFuture, MailboxError> {
        let monitor_ref = self.engine.borrow_mut().monitor(self.self_id, target).map_err(|err| match err {
            LinkError::TargetDead => MailboxError::TargetDead,
            _ => MailboxError::Invalid {
                reason: "monitor pool exhausted while starting a request",
            },
        })?;
        let tag = self.engine.borrow().alloc_generated_tag();
        if let Err(err) =
            self.engine
                .borrow_mut()
                .enqueue(self.self_id, target, MessageClass::Request, tag, true, bytes)
        {
            self.engine.borrow_mut().cancel_monitor(self.self_id, monitor_ref);
            return Err(err);
        }
        Ok(RequestFuture {
            engine: self.engine.clone(),
            self_id: self.self_id,
            target,
            reply_tag: tag,
            monitor_ref,
            deadline,
        })
    }

    /// Wait on several IPC filters and/or bus subscriptions at once
    /// (§4.5 `select`).
    pub fn select(&self, sources: Vec<Source>, deadline: Option<MicroTimestamp>) -> SelectFuture {
        SelectFuture {
            engine: self.engine.clone(),
            self_id: self.self_id,
            sources,
            deadline,
        }
    }

    /// Arm a one-shot timer, firing a `MSG_TIMER` after `delay_us` (§4.6
    /// `after`).
    pub fn after(&mut self, delay_us: u64) -> Result<TimerId, TimerError> {
        let timer_id = self.timer_ids.alloc();
        self.engine
            .borrow_mut()
            .arm_timer(self.self_id, timer_id, TimerKind::OneShot, delay_us)?;
        Ok(timer_id)
    }

    /// Arm a periodic timer, firing every `interval_us` (§4.6 `every`).
    pub fn every(&mut self, interval_us: u64) -> Result<TimerId, TimerError> {
        let timer_id = self.timer_ids.alloc();
        self.engine.borrow_mut().arm_timer(
            self.self_id,
            timer_id,
            TimerKind::Periodic { interval_us },
            interval_us,
        )?;
        Ok(timer_id)
    }

    pub fn cancel_timer(&self, timer_id: TimerId) -> Result<(), TimerError> {
        self.engine.borrow_mut().cancel_timer(self.self_id, timer_id)
    }

    /// Suspend for `delay_us` without consuming any mailbox message — a
    /// one-shot timer filtered to itself (§4.6 "`sleep` is `after` plus a
    /// receive scoped to that timer's tag").
    pub fn sleep(&mut self, delay_us: u64) -> Result<ReceiveFuture, TimerError> {
        let timer_id = self.after(delay_us)?;
        let tag = Tag::new(timer_id.as_u32());
        Ok(ReceiveFuture {
            engine: self.engine.clone(),
            self_id: self.self_id,
            filter: Filter::any().with_class(MessageClass::Timer).with_tag(tag),
            deadline: None,
        })
    }

    pub fn subscribe_bus(&self, bus_id: usize) -> Option<usize> {
        self.engine.borrow_mut().bus_subscribe(bus_id, self.self_id)
    }

    pub fn unsubscribe_bus(&self, bus_id: usize) {
        self.engine.borrow_mut().bus_unsubscribe(bus_id, self.self_id);
    }

    /// Yield to the scheduler without blocking on anything: re-queues
    /// behind any other actor already READY at this priority (§4.1
    /// cooperative yield).
    pub fn yield_now(&self) -> YieldFuture {
        YieldFuture { yielded: false }
    }
}

fn park(engine: &SharedEngine, self_id: ActorId, deadline: Option<MicroTimestamp>) {
    let mut guard = engine.borrow_mut();
    if let Some(record) = guard.actors.get_mut(self_id) {
        record.state = ActorState::Waiting;
        record.wait_reason = Some(WaitReason::Ipc);
        record.wait_deadline = deadline;
    }
}

/// Future returned by [`ActorContext::receive`], [`ActorContext::request`],
/// and [`ActorContext::sleep`].
pub struct ReceiveFuture {
    engine: SharedEngine,
    self_id: ActorId,
    filter: Filter,
    deadline: Option<MicroTimestamp>,
}

impl Future for ReceiveFuture {
    type Output = Result<Received, MailboxError>;

    fn poll(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut engine = this.engine.borrow_mut();
        if let Some(deadline) = this.deadline {
            if engine.now() >= deadline {
                return Poll::Ready(Err(MailboxError::Timeout));
            }
        }
        let Some(record) = engine.actors.get_mut(this.self_id) else {
            return Poll::Ready(Err(MailboxError::TargetDead));
        };
        if let Some(received) =
            record.mailbox.scan_remove(&mut engine.entries, &mut engine.payloads, &this.filter)
        {
            drop(engine);
            if received.header.class == MessageClass::Timer {
                this.engine
                    .borrow_mut()
                    .mark_timer_delivered(this.self_id, TimerId::new(received.header.tag.as_u32()));
            }
            return Poll::Ready(Ok(received));
        }
        drop(engine);
        park(&this.engine, this.self_id, this.deadline);
        Poll::Pending
    }
}

/// Future returned by [`ActorContext::request`]. Resolves `Ok` on a
/// matching REPLY, `Err(Closed)` if the temporary monitor's EXIT arrives
/// first, or `Err(Timeout)` if the deadline elapses first — whichever of
/// the three happens first wins (§4.3 request/reply).
pub struct RequestFuture {
    engine: SharedEngine,
    self_id: ActorId,
    target: ActorId,
    reply_tag: Tag,
    monitor_ref: MonitorRef,
    deadline: Option<MicroTimestamp>,
}

impl Future for RequestFuture {
    type Output = Result<Received, MailboxError>;

    fn poll(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut engine = this.engine.borrow_mut();
        if let Some(deadline) = this.deadline {
            if engine.now() >= deadline {
                engine.cancel_monitor(this.self_id, this.monitor_ref);
                return Poll::Ready(Err(MailboxError::Timeout));
            }
        }
        let Some(record) = engine.actors.get_mut(this.self_id) else {
            return Poll::Ready(Err(MailboxError::TargetDead));
        };
        let reply_filter = Filter::any()
            .with_sender(this.target)
            .with_class(MessageClass::Reply)
            .with_tag(this.reply_tag);
        if let Some(received) =
            record.mailbox.scan_remove(&mut engine.entries, &mut engine.payloads, &reply_filter)
        {
            drop(engine);
            this.engine.borrow_mut().cancel_monitor(this.self_id, this.monitor_ref);
            return Poll::Ready(Ok(received));
        }
        let exit_filter = Filter::any()
            .with_sender(this.target)
            .with_class(MessageClass::Exit)
            .with_tag(Tag::new(this.monitor_ref.as_u32()));
        if record
            .mailbox
            .scan_remove(&mut engine.entries, &mut engine.payloads, &exit_filter)
            .is_some()
        {
            return Poll::Ready(Err(MailboxError::Closed));
        }
        drop(engine);
        park(&this.engine, this.self_id, this.deadline);
        Poll::Pending
    }
}

/// Future returned by [`ActorContext::select`].
pub struct SelectFuture {
    engine: SharedEngine,
    self_id: ActorId,
    sources: Vec<Source>,
    deadline: Option<MicroTimestamp>,
}

impl Future for SelectFuture {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut engine = this.engine.borrow_mut();

        // Bus sources outrank IPC when both are ready (§4.5 step 1); scan
        // them directly against `engine.buses` rather than reusing
        // `select::poll_once`'s closure-based form, which would need two
        // simultaneous borrows of the bus table here.
        for (index, source) in this.sources.iter().enumerate() {
            if let Source::BusSubscription(bus_id) = source {
                let has_data = engine
                    .buses
                    .get(*bus_id)
                    .and_then(Option::as_ref)
                    .map(|bus| bus.has_data_for(this.self_id))
                    .unwrap_or(false);
                if has_data {
                    if let Some(payload) = engine.bus_take_for(*bus_id, this.self_id) {
                        return Poll::Ready(Outcome::Bus { index, payload });
                    }
                }
            }
        }

        let mut found = None;
        if let Some(record) = engine.actors.get_mut(this.self_id) {
            for (index, source) in this.sources.iter().enumerate() {
                if let Source::IpcFilter(filter) = source {
                    if let Some(received) =
                        record.mailbox.scan_remove(&mut engine.entries, &mut engine.payloads, filter)
                    {
                        found = Some(Outcome::Ipc { index, received });
                        break;
                    }
                }
            }
        }
        drop(engine);

        if let Some(Outcome::Ipc { received, .. }) = &found {
            if received.header.class == MessageClass::Timer {
                this.engine
                    .borrow_mut()
                    .mark_timer_delivered(this.self_id, TimerId::new(received.header.tag.as_u32()));
            }
        }
        if let Some(outcome) = found {
            return Poll::Ready(outcome);
        }

        park(&this.engine, this.self_id, this.deadline);
        Poll::Pending
    }
}

/// Trivial future that is `Pending` exactly once, forcing the actor back
/// through the run queue behind any sibling already READY.
pub struct YieldFuture {
    yielded: bool,
}

impl Future for YieldFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.yielded {
            Poll::Ready(())
        } else {
            this.yielded = true;
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::runtime::engine::Engine;
    use crate::runtime::Runtime;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn receive_future_completes_once_a_matching_message_arrives() {
        let runtime = Runtime::new(RuntimeConfig::builder().max_actors(4).build().unwrap()).unwrap();
        let observed = std::rc::Rc::new(std::cell::RefCell::new(None));
        let observed_clone = std::rc::Rc::clone(&observed);
        let receiver = runtime
            .spawn(Priority::Normal, None, move |engine, self_id| async move {
                let ctx = ActorContext::new(engine, self_id);
                let received = ctx.receive(Filter::any(), None).await.unwrap();
                *observed_clone.borrow_mut() = Some(received.payload.as_bytes().to_vec());
                ExitReason::Normal
            })
            .unwrap();
        runtime.run_until_idle();
        assert!(runtime.engine().borrow().actors.is_live(receiver));

        runtime
            .engine()
            .borrow_mut()
            .enqueue(
                ActorId::new(0, 0),
                receiver,
                MessageClass::Notify,
                Tag::new(1),
                false,
                b"hi",
            )
            .unwrap();
        runtime.run_until_idle();
        assert_eq!(observed.borrow().as_deref(), Some(b"hi".as_slice()));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn yield_now_requeues_behind_the_actor_itself() {
        let runtime = Runtime::new(RuntimeConfig::builder().max_actors(2).build().unwrap()).unwrap();
        let id = runtime
            .spawn(Priority::Normal, None, |engine, self_id| async move {
                let ctx = ActorContext::new(engine, self_id);
                ctx.yield_now().await;
                ExitReason::Normal
            })
            .unwrap();
        runtime.run_until_idle();
        assert!(!runtime.engine().borrow().actors.is_live(id));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn request_resolves_closed_when_target_dies_before_replying() {
        let runtime = Runtime::new(RuntimeConfig::builder().max_actors(4).build().unwrap()).unwrap();
        let target = runtime
            .spawn(Priority::Normal, None, |engine, self_id| async move {
                let ctx = ActorContext::new(engine, self_id);
                ctx.yield_now().await;
                ExitReason::Normal
            })
            .unwrap();
        let closed = std::rc::Rc::new(std::cell::RefCell::new(None));
        let closed_clone = std::rc::Rc::clone(&closed);
        runtime
            .spawn(Priority::Normal, None, move |engine, self_id| async move {
                let ctx = ActorContext::new(engine, self_id);
                let result = ctx.request(target, b"ping", None).unwrap().await;
                *closed_clone.borrow_mut() = Some(result);
                ExitReason::Normal
            })
            .unwrap();
        runtime.run_until_idle();
        assert!(matches!(closed.borrow().as_ref(), Some(Err(MailboxError::Closed))));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn external_kill_marks_the_actor_dead() {
        let engine = Engine::new(RuntimeConfig::default()).expect("valid default config");
        let id = engine
            .borrow_mut()
            .spawn(Priority::Normal, None, Box::pin(async { ExitReason::Normal }))
            .expect("room in table");
        ActorContext::external_kill(&engine, id);
        assert!(!engine.borrow().actors.is_live(id));
    }
}
