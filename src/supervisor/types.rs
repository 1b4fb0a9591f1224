//! Child specifications and the values a supervisor hands its children at
//! start time (§4.7 "Supervisor").

// Layer 1: Standard library imports
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

// Layer 3: Internal module imports
use crate::actor::table::{ExitReason, Priority};
use crate::ids::ActorId;
use crate::runtime::engine::SharedEngine;
use crate::supervisor::strategy::Strategy;

/// Restart decision for a child that has exited (§4.7 "restart policy").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Always respin, regardless of exit reason.
    Permanent,
    /// Respin only if the exit reason was not `Normal`.
    Transient,
    /// Never respin.
    Temporary,
}

/// A live sibling's identity, installed into every child's startup context
/// once the whole declaration has spawned successfully (§4.7 step 2-3).
/// Names are for logging and peer lookup only; there is no separate
/// name-registry service in this core (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct SiblingInfo {
    pub name: String,
    pub id: ActorId,
}

/// Directory a child reads once, on its first poll, to discover the rest
/// of its supervisor's declared children. Filled in by the supervisor
/// after every child has been spawned, before any of them is first polled
/// (§4.7 step 3) — a respin reuses the same directory taken at the
/// supervisor's initial start rather than a refreshed one (see DESIGN.md).
pub type SiblingDirectory = Rc<RefCell<Vec<SiblingInfo>>>;

/// Builds a child's entry future. Handed the shared engine, the child's
/// freshly-allocated id, the sibling directory, and the copied init-arg
/// bytes from its [`ChildSpec`].
pub type ChildFactory =
    Rc<dyn Fn(SharedEngine, ActorId, SiblingDirectory, Vec<u8>) -> Pin<Box<dyn Future<Output = ExitReason>>>>;

/// One child's declaration within a [`SupervisorSpec`] (§4.7 "per-child:
/// entry function, optional init callback and init-arg bytes, name,
/// restart policy, actor config").
#[derive(Clone)]
pub struct ChildSpec {
    pub name: String,
    pub priority: Priority,
    pub restart_policy: RestartPolicy,
    pub init_arg: Vec<u8>,
    pub factory: ChildFactory,
}

impl ChildSpec {
    /// Build a child spec from a plain entry future factory (no init-arg
    /// bytes, no sibling directory access).
    pub fn new<F, Fut>(name: impl Into<String>, restart_policy: RestartPolicy, entry: F) -> Self
    where
        F: Fn(SharedEngine, ActorId) -> Fut + 'static,
        Fut: Future<Output = ExitReason> + 'static,
    {
        let entry = Rc::new(entry);
        Self {
            name: name.into(),
            priority: Priority::Normal,
            restart_policy,
            init_arg: Vec::new(),
            factory: Rc::new(move |engine, id, _siblings, _init_arg| {
                let entry = Rc::clone(&entry);
                Box::pin(async move { entry(engine, id).await })
            }),
        }
    }

    /// Build a child spec whose entry future reads the sibling directory
    /// and its own init-arg bytes.
    pub fn with_siblings<F, Fut>(
        name: impl Into<String>,
        restart_policy: RestartPolicy,
        init_arg: Vec<u8>,
        entry: F,
    ) -> Self
    where
        F: Fn(SharedEngine, ActorId, SiblingDirectory, Vec<u8>) -> Fut + 'static,
        Fut: Future<Output = ExitReason> + 'static,
    {
        let entry = Rc::new(entry);
        Self {
            name: name.into(),
            priority: Priority::Normal,
            restart_policy,
            init_arg,
            factory: Rc::new(move |engine, id, siblings, init_arg| {
                let entry = Rc::clone(&entry);
                Box::pin(async move { entry(engine, id, siblings, init_arg).await })
            }),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// A full supervisor declaration (§4.7 "Configuration").
#[derive(Clone)]
pub struct SupervisorSpec {
    pub strategy: Strategy,
    pub children: Vec<ChildSpec>,
    /// `0` means unlimited (§4.7 "restart budget").
    pub max_restarts: u32,
    pub restart_period_us: u64,
    pub shutdown_callback: Option<Rc<dyn Fn()>>,
}

impl SupervisorSpec {
    pub fn new(strategy: Strategy, children: Vec<ChildSpec>) -> Self {
        Self {
            strategy,
            children,
            max_restarts: 0,
            restart_period_us: 5_000_000,
            shutdown_callback: None,
        }
    }

    pub fn with_restart_budget(mut self, max_restarts: u32, restart_period_us: u64) -> Self {
        self.max_restarts = max_restarts;
        self.restart_period_us = restart_period_us;
        self
    }

    pub fn with_shutdown_callback(mut self, callback: Rc<dyn Fn()>) -> Self {
        self.shutdown_callback = Some(callback);
        self
    }
}
