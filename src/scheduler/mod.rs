//! The cooperative main loop (§4.1). Exactly one actor's future is polled
//! at a time; nothing preempts it mid-poll.

// Layer 1: Standard library imports
use std::future::Future;
use std::task::{Context, Poll, Waker};

// Layer 3: Internal module imports
use crate::actor::table::ActorState;
use crate::ids::ActorId;
use crate::monitoring::{SchedulerEvent, SchedulerEventKind};
use crate::runtime::engine::SharedEngine;

/// Run queued actors until every run queue is empty and no timer is due
/// (§4.1 steps 1-4). Returns the number of polls performed, mostly useful
/// for tests asserting forward progress was made.
pub fn run_until_idle(engine: &SharedEngine) -> usize {
    let mut polls = 0usize;
    loop {
        engine.borrow_mut().tick_timers();

        let next = engine.borrow_mut().run_queues.pop_front();
        let Some(id) = next else {
            engine.borrow().monitor.on_scheduler(SchedulerEvent {
                timestamp: chrono::Utc::now(),
                event_kind: SchedulerEventKind::RunQueuesIdle,
                metadata: Default::default(),
            });
            break;
        };
        poll_one(engine, id);
        polls += 1;
    }
    polls
}

/// Poll a single actor's future exactly once, moving it between
/// READY/RUNNING/WAITING/DEAD per the outcome (§4.1 step 3).
fn poll_one(engine: &SharedEngine, id: ActorId) {
    let mut future = {
        let mut guard = engine.borrow_mut();
        let Some(record) = guard.actors.get_mut(id) else {
            return;
        };
        record.state = ActorState::Running;
        std::mem::replace(&mut record.future, Box::pin(async { crate::actor::table::ExitReason::Normal }))
    };

    // Re-entrant note: nothing here holds the engine's RefCell borrow while
    // `future.as_mut().poll(..)` runs — the future's own poll bodies borrow
    // the engine themselves when they touch mailboxes, timers, or links.
    let waker = Waker::noop();
    let mut cx = Context::from_waker(waker);
    let outcome = future.as_mut().poll(&mut cx);

    let mut guard = engine.borrow_mut();
    let Some(record) = guard.actors.get_mut(id) else {
        // The actor was killed (e.g. by a linked peer's death) while its
        // own future was being polled above; nothing left to update.
        return;
    };
    match outcome {
        Poll::Pending => {
            record.future = future;
            if record.state == ActorState::Running {
                // The future parked without registering a wait reason —
                // treat it as immediately re-runnable rather than stuck.
                record.state = ActorState::Ready;
                guard.run_queues.push_back(record.priority, id);
            }
        }
        Poll::Ready(reason) => {
            drop(guard);
            engine.borrow_mut().kill(id, reason);
        }
    }
}
