//! End-to-end scenarios S1-S6 (§8), run against the public runtime API.
//!
//! These wrap otherwise-synchronous `Runtime` calls in `tokio::test` on a
//! current-thread runtime purely so real wall-clock waits (`tokio::time::sleep`)
//! can interleave with `run_until_idle` passes for the scenarios that involve
//! a timer; `run_until_idle` itself never blocks on a pending-but-not-yet-due
//! timer, so the test driver has to supply the elapsed time itself.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kestrel_rt::prelude::*;
use kestrel_rt::select::Source;
use kestrel_rt::supervisor;

/// Drive the scheduler to idle, then let real wall-clock time pass in small
/// steps (re-driving to idle after each) until `done()` reports true or
/// `timeout` elapses.
async fn drive_until(runtime: &Runtime, timeout: Duration, mut done: impl FnMut() -> bool) {
    let step = Duration::from_millis(5);
    let mut waited = Duration::ZERO;
    loop {
        runtime.run_until_idle();
        if done() || waited >= timeout {
            return;
        }
        tokio::time::sleep(step).await;
        waited += step;
    }
}

#[tokio::test(flavor = "current_thread")]
async fn s1_linked_pair_b_dies_first() {
    let runtime = Runtime::new(RuntimeConfig::builder().max_actors(4).build().unwrap()).unwrap();

    let b = runtime
        .spawn(Priority::Normal, Some("b".into()), |engine, self_id| async move {
            let mut ctx = ActorContext::new(engine, self_id);
            ctx.sleep(500_000).unwrap().await.unwrap();
            ExitReason::Normal
        })
        .unwrap();

    let exit_seen = Rc::new(RefCell::new(None));
    let exit_seen_clone = Rc::clone(&exit_seen);
    let second_receive_timed_out = Rc::new(RefCell::new(false));
    let second_receive_timed_out_clone = Rc::clone(&second_receive_timed_out);

    runtime
        .spawn(Priority::Normal, Some("a".into()), move |engine, self_id| async move {
            let mut ctx = ActorContext::new(Rc::clone(&engine), self_id);
            ctx.sleep(100_000).unwrap().await.unwrap();
            ctx.link(b).unwrap();
            let received = ctx.receive(Filter::any(), None).await.unwrap();
            *exit_seen_clone.borrow_mut() = Some((received.sender, received.header.class, received.header.tag));

            let deadline = engine.borrow().now() + 1_000;
            let second = ctx.receive(Filter::any(), Some(deadline)).await;
            *second_receive_timed_out_clone.borrow_mut() = matches!(second, Err(MailboxError::Timeout));
            ExitReason::Normal
        })
        .unwrap();

    drive_until(&runtime, Duration::from_secs(2), || {
        !runtime.engine().borrow().actors.is_live(b) && second_receive_timed_out.borrow().clone()
    })
    .await;

    let got = *exit_seen.borrow();
    let (sender, class, tag) = got.expect("A observed exactly one message");
    assert_eq!(sender, b);
    assert_eq!(class, kestrel_rt::message::header::MessageClass::Exit);
    assert_eq!(tag, Tag::new(0));
    assert!(*second_receive_timed_out.borrow(), "A must not observe a second EXIT");
}

#[tokio::test(flavor = "current_thread")]
async fn s2_selective_receive_skips_non_matching() {
    let runtime = Runtime::new(RuntimeConfig::builder().max_actors(4).build().unwrap()).unwrap();
    let payloads = Rc::new(RefCell::new(Vec::new()));
    let payloads_clone = Rc::clone(&payloads);

    runtime
        .spawn(Priority::Normal, None, move |engine, self_id| async move {
            let ctx = ActorContext::new(engine, self_id);
            ctx.notify(self_id, Tag::new(100), b"a").unwrap();
            ctx.notify(self_id, Tag::new(200), b"b").unwrap();
            ctx.notify(self_id, Tag::new(100), b"c").unwrap();

            let filtered = ctx
                .receive(
                    Filter::any().with_class(kestrel_rt::message::header::MessageClass::Notify).with_tag(Tag::new(200)),
                    None,
                )
                .await
                .unwrap();
            let next1 = ctx.receive(Filter::any(), None).await.unwrap();
            let next2 = ctx.receive(Filter::any(), None).await.unwrap();

            let mut out = payloads_clone.borrow_mut();
            out.push(filtered.payload.as_bytes().to_vec());
            out.push(next1.payload.as_bytes().to_vec());
            out.push(next2.payload.as_bytes().to_vec());
            ExitReason::Normal
        })
        .unwrap();

    runtime.run_until_idle();

    let out = payloads.borrow();
    assert_eq!(out[0], b"b");
    assert_eq!(out[1], b"a");
    assert_eq!(out[2], b"c");
}

#[tokio::test(flavor = "current_thread")]
async fn s3_request_target_death_closes_rather_than_times_out() {
    let runtime = Runtime::new(RuntimeConfig::builder().max_actors(4).build().unwrap()).unwrap();

    let target = runtime
        .spawn(Priority::Normal, Some("target".into()), |engine, self_id| async move {
            let mut ctx = ActorContext::new(engine, self_id);
            ctx.sleep(10_000).unwrap().await.unwrap();
            ExitReason::Normal
        })
        .unwrap();

    let result = Rc::new(RefCell::new(None));
    let result_clone = Rc::clone(&result);
    let requester = runtime
        .spawn(Priority::Normal, Some("requester".into()), move |engine, self_id| async move {
            let ctx = ActorContext::new(Rc::clone(&engine), self_id);
            let deadline = engine.borrow().now() + 1_000_000;
            let outcome = ctx.request(target, b"ping", Some(deadline)).unwrap().await;
            *result_clone.borrow_mut() = Some(outcome);
            ExitReason::Normal
        })
        .unwrap();

    drive_until(&runtime, Duration::from_secs(1), || {
        !runtime.engine().borrow().actors.is_live(requester)
    })
    .await;

    assert!(matches!(*result.borrow(), Some(Err(MailboxError::Closed))), "expected Closed, got {:?}", *result.borrow());
    assert!(
        !matches!(*result.borrow(), Some(Err(MailboxError::Timeout))),
        "must not time out when the target dies first"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn s4_one_for_one_restart_respins_only_the_crashing_child() {
    let runtime = Runtime::new(RuntimeConfig::builder().max_actors(16).build().unwrap()).unwrap();
    let counters = Rc::new(RefCell::new(vec![0u32; 3]));

    let child = |index: usize| {
        let counters = Rc::clone(&counters);
        ChildSpec::with_siblings("worker", RestartPolicy::Permanent, vec![index as u8], move |engine, self_id, _siblings, init_arg| {
            let counters = Rc::clone(&counters);
            async move {
                let idx = init_arg[0] as usize;
                counters.borrow_mut()[idx] += 1;
                let mut ctx = ActorContext::new(engine, self_id);
                if idx == 1 {
                    ctx.sleep(50_000).unwrap().await.unwrap();
                    ExitReason::Crash
                } else {
                    let _ = ctx.receive(Filter::any(), None).await;
                    ExitReason::Normal
                }
            }
        })
    };

    let spec = SupervisorSpec::new(Strategy::OneForOne, vec![child(0), child(1), child(2)]);
    let (_supervisor_id, handle) = supervisor::start(runtime.engine(), Priority::Normal, None, spec).unwrap();
    assert_eq!(handle.health_snapshot().len(), 3);

    drive_until(&runtime, Duration::from_millis(200), || false).await;

    let counts = counters.borrow();
    assert!(counts[1] >= 4, "child 1 should have restarted repeatedly, got {}", counts[1]);
    assert_eq!(counts[0], 1);
    assert_eq!(counts[2], 1);
}

#[tokio::test(flavor = "current_thread")]
async fn s5_restart_intensity_gives_up_after_the_budget_is_spent() {
    let runtime = Runtime::new(RuntimeConfig::builder().max_actors(16).build().unwrap()).unwrap();
    let shutdown_calls = Rc::new(RefCell::new(0u32));
    let shutdown_calls_clone = Rc::clone(&shutdown_calls);

    let crashing_child = ChildSpec::new("doomed", RestartPolicy::Permanent, |_engine, _self_id| async move {
        ExitReason::Crash
    });
    let spec = SupervisorSpec::new(Strategy::OneForOne, vec![crashing_child])
        .with_restart_budget(3, 5_000_000)
        .with_shutdown_callback(Rc::new(move || {
            *shutdown_calls_clone.borrow_mut() += 1;
        }));

    let supervisor_exit = Rc::new(RefCell::new(None));
    let supervisor_exit_clone = Rc::clone(&supervisor_exit);
    let watcher = runtime
        .spawn(Priority::Normal, Some("watcher".into()), move |engine, self_id| async move {
            let ctx = ActorContext::new(engine, self_id);
            let received = ctx
                .receive(Filter::any().with_class(kestrel_rt::message::header::MessageClass::Exit), None)
                .await
                .unwrap();
            *supervisor_exit_clone.borrow_mut() = Some(received.payload.as_bytes().to_vec());
            ExitReason::Normal
        })
        .unwrap();

    let (supervisor_id, _handle) = supervisor::start(runtime.engine(), Priority::Normal, None, spec).unwrap();
    runtime.engine().borrow_mut().monitor(watcher, supervisor_id).unwrap();

    runtime.run_until_idle();

    assert!(!runtime.engine().borrow().actors.is_live(supervisor_id));
    assert_eq!(*shutdown_calls.borrow(), 1);
    assert_eq!(supervisor_exit.borrow().as_deref(), Some(b"normal".as_slice()));
}

#[tokio::test(flavor = "current_thread")]
async fn s6_select_prefers_bus_over_ipc() {
    let runtime = Runtime::new(RuntimeConfig::builder().max_actors(4).build().unwrap()).unwrap();
    let bus_id = runtime.engine().borrow_mut().create_bus(4).unwrap();

    let outcome_kind = Rc::new(RefCell::new(None));
    let outcome_kind_clone = Rc::clone(&outcome_kind);
    let second_was_ipc = Rc::new(RefCell::new(false));
    let second_was_ipc_clone = Rc::clone(&second_was_ipc);

    let actor = runtime
        .spawn(Priority::Normal, None, move |engine, self_id| async move {
            let ctx = ActorContext::new(Rc::clone(&engine), self_id);
            let _ = ctx.subscribe_bus(bus_id);
            ctx.notify(self_id, Tag::new(100), b"notify").unwrap();
            engine.borrow_mut().bus_publish(bus_id, b"bus-payload").unwrap();

            let ipc_filter = Filter::any().with_class(kestrel_rt::message::header::MessageClass::Notify).with_tag(Tag::new(100));
            let outcome = ctx
                .select(vec![Source::IpcFilter(ipc_filter), Source::BusSubscription(bus_id)], None)
                .await;
            *outcome_kind_clone.borrow_mut() = Some(match &outcome {
                kestrel_rt::select::Outcome::Bus { index, .. } => ("bus", *index),
                kestrel_rt::select::Outcome::Ipc { index, .. } => ("ipc", *index),
            });

            let second = ctx.receive(ipc_filter, None).await.unwrap();
            *second_was_ipc_clone.borrow_mut() = second.payload.as_bytes() == b"notify";
            ExitReason::Normal
        })
        .unwrap();

    runtime.run_until_idle();
    assert!(!runtime.engine().borrow().actors.is_live(actor));
    assert_eq!(*outcome_kind.borrow(), Some(("bus", 1)));
    assert!(*second_was_ipc.borrow(), "the NOTIFY must still be there for a follow-up receive");
}
