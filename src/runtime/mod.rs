//! The runtime driver: construction, the public spawn/send/link/monitor
//! surface, and shutdown (§4 "Runtime operations").

pub mod engine;

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::actor::table::{ExitReason, Priority};
use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::ids::ActorId;
use crate::monitoring::RuntimeMonitor;
use crate::scheduler;
use crate::time::Clock;

pub use engine::{Engine, SharedEngine};

/// Owns a [`SharedEngine`] and drives its scheduler to idle. This is the
/// type application code constructs; `Engine` itself is the shared state
/// handle that actor futures clone into their contexts.
pub struct Runtime {
    engine: SharedEngine,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        Ok(Self {
            engine: Engine::new(config)?,
        })
    }

    pub fn with_clock(config: RuntimeConfig, clock: Box<dyn Clock>) -> Result<Self, RuntimeError> {
        Ok(Self {
            engine: Engine::with_clock(config, clock)?,
        })
    }

    pub fn set_monitor(&mut self, monitor: Rc<dyn RuntimeMonitor>) {
        self.engine.borrow_mut().set_monitor(monitor);
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Spawn an actor from a future factory. The factory is handed the
    /// shared engine and the actor's own id once a table slot has been
    /// reserved, so the entry future can build an `ActorContext` that
    /// already knows its identity (§4.2).
    pub fn spawn<F, Fut>(&self, priority: Priority, name: Option<String>, make_future: F) -> Result<ActorId, RuntimeError>
    where
        F: FnOnce(SharedEngine, ActorId) -> Fut,
        Fut: Future<Output = ExitReason> + 'static,
    {
        // Reserve the slot with a stub, then immediately replace it with
        // the real future now that the id is known.
        let stub: Pin<Box<dyn Future<Output = ExitReason>>> = Box::pin(async { ExitReason::Normal });
        let id = self.engine.borrow_mut().spawn(priority, name, stub)?;
        let future: Pin<Box<dyn Future<Output = ExitReason>>> =
            Box::pin(make_future(Rc::clone(&self.engine), id));
        if let Some(record) = self.engine.borrow_mut().actors.get_mut(id) {
            record.future = future;
        }
        Ok(id)
    }

    /// Run the scheduler until every run queue is empty and no timer is
    /// due (§4.1). Suitable for tests and for embedding into a host loop
    /// that also services external I/O between calls.
    pub fn run_until_idle(&self) -> usize {
        scheduler::run_until_idle(&self.engine)
    }

    pub fn request_shutdown(&self) {
        self.engine.borrow_mut().request_shutdown();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.engine.borrow().is_shutdown_requested()
    }
}
