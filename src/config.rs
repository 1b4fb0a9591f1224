//! Runtime-overridable defaults for the compile-time limits in §6.
//!
//! The reference defaults in the specification are compile-time constants
//! in the source this was distilled from; here they are `RuntimeConfig`
//! fields so a deployment can tune them without recompiling, with the same
//! numeric defaults. Validation happens once, at construction, never on the
//! scheduling hot path.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::error::RuntimeError;

/// Reference default: maximum live actors.
pub const DEFAULT_MAX_ACTORS: usize = 64;
/// Reference default: maximum buses.
pub const DEFAULT_MAX_BUSES: usize = 32;
/// Reference default: maximum subscribers per bus (hard cap by bitmask width).
pub const DEFAULT_MAX_BUS_SUBSCRIBERS: usize = 32;
/// Reference default: mailbox entry pool size.
pub const DEFAULT_MAILBOX_ENTRY_POOL_SIZE: usize = 256;
/// Reference default: message payload pool size.
pub const DEFAULT_MESSAGE_DATA_POOL_SIZE: usize = 256;
/// Reference default: maximum message size including the 4-byte header.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 256;
/// Reference default: link entry pool size (two entries per live link).
pub const DEFAULT_LINK_ENTRY_POOL_SIZE: usize = 128;
/// Reference default: monitor entry pool size.
pub const DEFAULT_MONITOR_ENTRY_POOL_SIZE: usize = 128;
/// Reference default: timer entry pool size.
pub const DEFAULT_TIMER_ENTRY_POOL_SIZE: usize = 64;
/// Reference default: maximum children per supervisor.
pub const DEFAULT_MAX_SUPERVISOR_CHILDREN: usize = 16;
/// Reference default: maximum live supervisors.
pub const DEFAULT_MAX_SUPERVISORS: usize = 8;
/// Fixed by the priority model (§3); not independently configurable.
pub const PRIORITY_LEVELS: usize = 4;
/// Reference default: bounded timeout the scheduler waits on the platform
/// readiness source when all run queues are empty (§4.1 step 2).
pub const DEFAULT_READINESS_POLL_TIMEOUT: Duration = Duration::from_millis(50);
/// Reference default: supervisor restart-intensity sliding window.
pub const DEFAULT_RESTART_PERIOD: Duration = Duration::from_secs(5);

/// Header size in bytes (§3 "Wire header").
pub const MESSAGE_HEADER_SIZE: usize = 4;

/// Runtime-tunable limits and scheduler parameters (§6 "Compile-time
/// limits", §2 component budgets). `serde`-deserializable so a deployment
/// can ship these as a config file; never read on the scheduling hot path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub max_actors: usize,
    pub max_buses: usize,
    pub max_bus_subscribers: usize,
    pub mailbox_entry_pool_size: usize,
    pub message_data_pool_size: usize,
    pub max_message_size: usize,
    pub link_entry_pool_size: usize,
    pub monitor_entry_pool_size: usize,
    pub timer_entry_pool_size: usize,
    pub max_supervisor_children: usize,
    pub max_supervisors: usize,
    pub readiness_poll_timeout: Duration,
    pub default_restart_period: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_actors: DEFAULT_MAX_ACTORS,
            max_buses: DEFAULT_MAX_BUSES,
            max_bus_subscribers: DEFAULT_MAX_BUS_SUBSCRIBERS,
            mailbox_entry_pool_size: DEFAULT_MAILBOX_ENTRY_POOL_SIZE,
            message_data_pool_size: DEFAULT_MESSAGE_DATA_POOL_SIZE,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            link_entry_pool_size: DEFAULT_LINK_ENTRY_POOL_SIZE,
            monitor_entry_pool_size: DEFAULT_MONITOR_ENTRY_POOL_SIZE,
            timer_entry_pool_size: DEFAULT_TIMER_ENTRY_POOL_SIZE,
            max_supervisor_children: DEFAULT_MAX_SUPERVISOR_CHILDREN,
            max_supervisors: DEFAULT_MAX_SUPERVISORS,
            readiness_poll_timeout: DEFAULT_READINESS_POLL_TIMEOUT,
            default_restart_period: DEFAULT_RESTART_PERIOD,
        }
    }
}

impl RuntimeConfig {
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Maximum payload bytes a single message may carry, after the header.
    pub fn max_payload_size(&self) -> usize {
        self.max_message_size.saturating_sub(MESSAGE_HEADER_SIZE)
    }

    /// Validate configuration values. Called once at runtime construction.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.max_actors == 0 {
            return Err(RuntimeError::InvalidConfig {
                reason: "max_actors must be > 0",
            });
        }
        if self.max_bus_subscribers == 0 || self.max_bus_subscribers > 32 {
            return Err(RuntimeError::InvalidConfig {
                reason: "max_bus_subscribers must be in 1..=32 (32-bit bitmask)",
            });
        }
        if self.max_message_size <= MESSAGE_HEADER_SIZE {
            return Err(RuntimeError::InvalidConfig {
                reason: "max_message_size must exceed the header size",
            });
        }
        if self.max_supervisor_children == 0 {
            return Err(RuntimeError::InvalidConfig {
                reason: "max_supervisor_children must be > 0",
            });
        }
        Ok(())
    }
}

/// Fluent builder for [`RuntimeConfig`].
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfigInner,
}

#[derive(Debug)]
struct RuntimeConfigInner(RuntimeConfig);

impl Default for RuntimeConfigInner {
    fn default() -> Self {
        Self(RuntimeConfig::default())
    }
}

impl RuntimeConfigBuilder {
    pub fn max_actors(mut self, value: usize) -> Self {
        self.config.0.max_actors = value;
        self
    }

    pub fn max_message_size(mut self, value: usize) -> Self {
        self.config.0.max_message_size = value;
        self
    }

    pub fn max_supervisor_children(mut self, value: usize) -> Self {
        self.config.0.max_supervisor_children = value;
        self
    }

    pub fn readiness_poll_timeout(mut self, value: Duration) -> Self {
        self.config.0.readiness_poll_timeout = value;
        self
    }

    pub fn default_restart_period(mut self, value: Duration) -> Self {
        self.config.0.default_restart_period = value;
        self
    }

    pub fn build(self) -> Result<RuntimeConfig, RuntimeError> {
        self.config.0.validate()?;
        Ok(self.config.0)
    }
}
