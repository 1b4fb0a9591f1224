//! The supervisor actor: two-phase start, the EXIT/stop runtime loop, and
//! strategy-driven respin (§4.7 "Supervisor").

// Layer 1: Standard library imports
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

// Layer 3: Internal module imports
use crate::actor::context::ActorContext;
use crate::actor::table::{ExitReason, Priority};
use crate::error::SupervisorError;
use crate::ids::{ActorId, Tag};
use crate::mailbox::Filter;
use crate::message::header::MessageClass;
use crate::monitoring::{SupervisionEvent, SupervisionEventKind};
use crate::runtime::engine::SharedEngine;
use crate::supervisor::backoff::RestartIntensity;
use crate::supervisor::strategy::{self, Strategy};
use crate::supervisor::types::{ChildSpec, RestartPolicy, SiblingDirectory, SiblingInfo, SupervisorSpec};

/// Reserved notify tag a collaborator uses to ask a supervisor to stop
/// (§4.7 "Runtime loop: wait for either an EXIT message... or a NOTIFY
/// with the internal stop tag"). Distinct from the generated-tag space
/// (§4.3), since it is never allocated by `Engine::alloc_generated_tag`.
pub const STOP_TAG: u32 = 0;

/// One child's current liveness as observed by
/// [`SupervisorHandle::health_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildHealth {
    pub id: Option<ActorId>,
    pub alive: bool,
}

/// Shared roster a running supervisor keeps up to date as children are
/// killed and respun: `(name, current id or None while between death and
/// respin)`, indexed by declaration order.
type ChildRoster = Rc<std::cell::RefCell<Vec<(String, Option<ActorId>)>>>;

/// A handle for polling a supervisor's children without waiting for an
/// EXIT message (§10.5 "Health check surface"), adapted from the
/// teacher's opt-in health-poll concept to this single-threaded model: no
/// background task, just an on-demand liveness query over the actor
/// table.
#[derive(Clone)]
pub struct SupervisorHandle {
    engine: SharedEngine,
    roster: ChildRoster,
}

impl SupervisorHandle {
    /// Poll every declared child's current liveness, by name. A child
    /// between death and respin (or one whose restart policy gave up on
    /// it) reports `id: None, alive: false`.
    pub fn health_snapshot(&self) -> Vec<(String, ChildHealth)> {
        let engine = self.engine.borrow();
        self.roster
            .borrow()
            .iter()
            .map(|(name, id)| {
                let alive = id.is_some_and(|id| engine.actors.is_live(id));
                (name.clone(), ChildHealth { id: *id, alive })
            })
            .collect()
    }
}

/// Start a supervisor: spawn every declared child in order, install the
/// sibling directory, monitor each child, then spawn the supervisor's own
/// loop (§4.7 "Two-phase start"). On any child spawn failure, every
/// already-spawned child (and the supervisor's own reserved slot) is
/// killed and rolled back before the error reaches the caller.
pub fn start(
    engine: &SharedEngine,
    priority: Priority,
    name: Option<String>,
    spec: SupervisorSpec,
) -> Result<(ActorId, SupervisorHandle), SupervisorError> {
    let max_children = engine.borrow().config.max_supervisor_children;
    if spec.children.len() > max_children {
        return Err(SupervisorError::TooManyChildren {
            count: spec.children.len(),
            max: max_children,
        });
    }

    let stub: Pin<Box<dyn Future<Output = ExitReason>>> = Box::pin(async { ExitReason::Normal });
    let supervisor_id = engine.borrow_mut().spawn(priority, name, stub)?;

    let siblings: SiblingDirectory = Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut spawned: Vec<ActorId> = Vec::with_capacity(spec.children.len());
    for child_spec in &spec.children {
        match spawn_child(engine, child_spec, Rc::clone(&siblings)) {
            Ok(child_id) => spawned.push(child_id),
            Err(err) => {
                for id in spawned.into_iter().rev() {
                    ActorContext::external_kill(engine, id);
                }
                ActorContext::external_kill(engine, supervisor_id);
                return Err(SupervisorError::Runtime(err));
            }
        }
    }

    *siblings.borrow_mut() = spec
        .children
        .iter()
        .zip(spawned.iter())
        .map(|(child_spec, id)| SiblingInfo {
            name: child_spec.name.clone(),
            id: *id,
        })
        .collect();

    for id in &spawned {
        let _ = engine.borrow_mut().monitor(supervisor_id, *id);
    }

    let roster: ChildRoster = Rc::new(std::cell::RefCell::new(
        spec.children
            .iter()
            .zip(spawned.iter())
            .map(|(child_spec, id)| (child_spec.name.clone(), Some(*id)))
            .collect(),
    ));
    let handle = SupervisorHandle {
        engine: Rc::clone(engine),
        roster: Rc::clone(&roster),
    };

    let loop_future: Pin<Box<dyn Future<Output = ExitReason>>> = Box::pin(run(
        Rc::clone(engine),
        supervisor_id,
        spec,
        spawned,
        siblings,
        roster,
    ));
    if let Some(record) = engine.borrow_mut().actors.get_mut(supervisor_id) {
        record.future = loop_future;
    }
    Ok((supervisor_id, handle))
}

/// Ask a running supervisor to stop (§4.7 "On stop (external request...)").
pub fn stop(ctx: &ActorContext, supervisor_id: ActorId) -> Result<(), crate::error::MailboxError> {
    ctx.notify(supervisor_id, Tag::new(STOP_TAG), &[])
}

fn spawn_child(
    engine: &SharedEngine,
    child_spec: &ChildSpec,
    siblings: SiblingDirectory,
) -> Result<ActorId, crate::error::RuntimeError> {
    let stub: Pin<Box<dyn Future<Output = ExitReason>>> = Box::pin(async { ExitReason::Normal });
    let id = engine
        .borrow_mut()
        .spawn(child_spec.priority, Some(child_spec.name.clone()), stub)?;
    let future = (child_spec.factory)(Rc::clone(engine), id, siblings, child_spec.init_arg.clone());
    if let Some(record) = engine.borrow_mut().actors.get_mut(id) {
        record.future = future;
    }
    Ok(id)
}

fn supervision_event(supervisor_id: ActorId, child_id: Option<ActorId>, kind: SupervisionEventKind) -> SupervisionEvent {
    SupervisionEvent {
        timestamp: chrono::Utc::now(),
        supervisor_id: supervisor_id.to_string(),
        child_id: child_id.map(|id| id.to_string()),
        event_kind: kind,
        metadata: Default::default(),
    }
}

/// The supervisor's own entry future (§4.7 "Runtime loop").
async fn run(
    engine: SharedEngine,
    self_id: ActorId,
    spec: SupervisorSpec,
    spawned: Vec<ActorId>,
    siblings: SiblingDirectory,
    roster: ChildRoster,
) -> ExitReason {
    let ctx = ActorContext::new(Rc::clone(&engine), self_id);
    let declared = spec.children;
    let mut live: Vec<Option<ActorId>> = spawned.into_iter().map(Some).collect();
    let mut intensity = RestartIntensity::new(spec.max_restarts, spec.restart_period_us);

    loop {
        let Ok(received) = ctx.receive(Filter::any(), None).await else {
            return ExitReason::Normal;
        };

        match received.header.class {
            MessageClass::Notify if received.header.tag == Tag::new(STOP_TAG) => {
                shutdown_all(&engine, &live, &spec.shutdown_callback);
                return ExitReason::Normal;
            }
            MessageClass::Exit => {
                let Some(index) = live.iter().position(|slot| *slot == Some(received.sender)) else {
                    continue;
                };
                live[index] = None;
                roster.borrow_mut()[index].1 = None;
                let exited_normally = received.payload.as_bytes() == b"normal";
                let child_spec = &declared[index];

                engine.borrow().monitor.on_supervision(supervision_event(
                    self_id,
                    Some(received.sender),
                    SupervisionEventKind::ChildFailed {
                        error: String::from_utf8_lossy(received.payload.as_bytes()).into_owned(),
                        restart_count: 0,
                    },
                ));

                let should_restart = match child_spec.restart_policy {
                    RestartPolicy::Permanent => true,
                    RestartPolicy::Transient => !exited_normally,
                    RestartPolicy::Temporary => false,
                };
                if !should_restart {
                    continue;
                }

                let now = engine.borrow().now();
                if intensity.record_and_check(now) {
                    engine.borrow().monitor.on_supervision(supervision_event(
                        self_id,
                        None,
                        SupervisionEventKind::RestartLimitExceeded {
                            restart_count: spec.max_restarts,
                            window: std::time::Duration::from_micros(spec.restart_period_us),
                        },
                    ));
                    shutdown_all(&engine, &live, &spec.shutdown_callback);
                    return ExitReason::Normal;
                }

                let victims = strategy::restart_set(spec.strategy, index, declared.len());
                for &victim_index in &victims {
                    if victim_index != index {
                        if let Some(id) = live[victim_index].take() {
                            ActorContext::external_kill(&engine, id);
                        }
                    }
                }

                let mut respin_failed = false;
                for &i in &victims {
                    match spawn_child(&engine, &declared[i], Rc::clone(&siblings)) {
                        Ok(new_id) => {
                            let _ = engine.borrow_mut().monitor(self_id, new_id);
                            live[i] = Some(new_id);
                            roster.borrow_mut()[i].1 = Some(new_id);
                        }
                        Err(_) => {
                            respin_failed = true;
                            break;
                        }
                    }
                }
                if respin_failed {
                    shutdown_all(&engine, &live, &spec.shutdown_callback);
                    return ExitReason::Crash;
                }
                engine.borrow().monitor.on_supervision(supervision_event(
                    self_id,
                    None,
                    SupervisionEventKind::StrategyApplied {
                        strategy: format!("{:?}", spec.strategy),
                        affected_count: victims.len(),
                    },
                ));
            }
            _ => continue,
        }
    }
}

/// Kill every surviving child in reverse declaration order and invoke the
/// shutdown callback (§4.7 "On stop..."). Any EXIT messages this raises
/// land in the supervisor's own mailbox but never need draining
/// separately — the supervisor exits immediately after and its mailbox is
/// discarded with it during death propagation.
fn shutdown_all(engine: &SharedEngine, live: &[Option<ActorId>], shutdown_callback: &Option<Rc<dyn Fn()>>) {
    for slot in live.iter().rev() {
        if let Some(id) = slot {
            ActorContext::external_kill(engine, *id);
        }
    }
    if let Some(callback) = shutdown_callback {
        callback();
    }
}
