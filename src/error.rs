//! Error taxonomy for the runtime core (§7).
//!
//! Internal modules use rich [`thiserror`]-derived enums, as the rest of this
//! codebase family does. At the external boundary (§6 "Return status"),
//! every fallible entry point additionally collapses onto the flat
//! [`Status`]/[`StatusCode`] pair the specification requires, via `From`
//! conversions from the internal error types.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::ids::ActorId;

/// The flat status code surfaced at the core's external boundary (§6).
///
/// Message strings accompanying a code are always `'static` string slices;
/// never heap-allocated, so returning a `Status` never touches the hot-path
/// allocation budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    NoMem,
    Invalid,
    Timeout,
    Closed,
    WouldBlock,
    Io,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCode::Ok => "OK",
            StatusCode::NoMem => "NOMEM",
            StatusCode::Invalid => "INVALID",
            StatusCode::Timeout => "TIMEOUT",
            StatusCode::Closed => "CLOSED",
            StatusCode::WouldBlock => "WOULDBLOCK",
            StatusCode::Io => "IO",
        };
        f.write_str(s)
    }
}

/// A `(code, optional static message)` pair, the full external-boundary
/// return value described in §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub code: StatusCode,
    pub message: Option<&'static str>,
}

impl Status {
    pub const fn ok() -> Self {
        Self {
            code: StatusCode::Ok,
            message: None,
        }
    }

    pub const fn new(code: StatusCode, message: &'static str) -> Self {
        Self {
            code,
            message: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(msg) => write!(f, "{}: {msg}", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Errors from a fixed-capacity pool (§3 "Static pools").
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool exhausted")]
    Exhausted,
    #[error("stale or out-of-range pool index")]
    Stale,
}

impl From<PoolError> for Status {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Exhausted => Status::new(StatusCode::NoMem, "pool exhausted"),
            PoolError::Stale => Status::new(StatusCode::Invalid, "stale pool index"),
        }
    }
}

/// Errors from mailbox/IPC operations (§4.3).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    #[error("payload too large for a single message slot")]
    PayloadTooLarge,
    #[error("message entry pool exhausted")]
    EntryPoolExhausted,
    #[error("message payload pool exhausted")]
    PayloadPoolExhausted,
    #[error("receive timed out before a matching message arrived")]
    Timeout,
    #[error("non-blocking receive found no matching message")]
    WouldBlock,
    #[error("target actor does not exist or has already died")]
    TargetDead,
    #[error("peer died before replying")]
    Closed,
    #[error("invalid argument: {reason}")]
    Invalid { reason: &'static str },
}

impl MailboxError {
    pub fn is_transient(&self) -> bool {
        matches!(self, MailboxError::Timeout | MailboxError::WouldBlock)
    }
}

impl From<MailboxError> for Status {
    fn from(err: MailboxError) -> Self {
        match err {
            MailboxError::PayloadTooLarge => Status::new(StatusCode::Invalid, "payload too large"),
            MailboxError::EntryPoolExhausted => {
                Status::new(StatusCode::NoMem, "mailbox entry pool exhausted")
            }
            MailboxError::PayloadPoolExhausted => {
                Status::new(StatusCode::NoMem, "message payload pool exhausted")
            }
            MailboxError::Timeout => Status::new(StatusCode::Timeout, "receive deadline elapsed"),
            MailboxError::WouldBlock => {
                Status::new(StatusCode::WouldBlock, "no matching message available")
            }
            MailboxError::TargetDead => Status::new(StatusCode::Invalid, "target actor is dead"),
            MailboxError::Closed => Status::new(StatusCode::Closed, "peer died before replying"),
            MailboxError::Invalid { reason } => Status::new(StatusCode::Invalid, reason),
        }
    }
}

/// Errors from link/monitor operations (§4.4).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    #[error("cannot link an actor to itself")]
    SelfLink,
    #[error("target actor does not exist or has already died")]
    TargetDead,
    #[error("link pool exhausted")]
    PoolExhausted,
    #[error("monitor pool exhausted")]
    MonitorPoolExhausted,
}

impl From<LinkError> for Status {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::SelfLink => Status::new(StatusCode::Invalid, "cannot link to self"),
            LinkError::TargetDead => Status::new(StatusCode::Invalid, "target actor is dead"),
            LinkError::PoolExhausted => Status::new(StatusCode::NoMem, "link pool exhausted"),
            LinkError::MonitorPoolExhausted => {
                Status::new(StatusCode::NoMem, "monitor pool exhausted")
            }
        }
    }
}

/// Errors from timer operations (§4.6).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer pool exhausted")]
    PoolExhausted,
    #[error("unknown or already-cancelled timer id")]
    Unknown,
}

impl From<TimerError> for Status {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::PoolExhausted => Status::new(StatusCode::NoMem, "timer pool exhausted"),
            TimerError::Unknown => Status::new(StatusCode::Invalid, "unknown timer id"),
        }
    }
}

/// Errors from select-primitive operations (§4.5).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    #[error("too many sources for a single select call")]
    TooManySources,
    #[error("no source was ready and timeout was zero")]
    WouldBlock,
    #[error("deadline elapsed before any source became ready")]
    Timeout,
}

impl From<SelectError> for Status {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::TooManySources => {
                Status::new(StatusCode::Invalid, "too many select sources")
            }
            SelectError::WouldBlock => Status::new(StatusCode::WouldBlock, "no source ready"),
            SelectError::Timeout => Status::new(StatusCode::Timeout, "select deadline elapsed"),
        }
    }
}

/// Errors from supervisor operations (§4.7).
#[derive(Error, Debug, Clone)]
pub enum SupervisorError {
    #[error("too many children for a single supervisor: {count} > {max}")]
    TooManyChildren { count: usize, max: usize },
    #[error("child spawn failed during two-phase start: {0}")]
    SpawnFailed(#[source] Box<SupervisorError>),
    #[error("actor-table or pool error while starting children")]
    Pool(#[from] PoolError),
    #[error("unknown child id")]
    UnknownChild,
    #[error("supervisor slot pool exhausted")]
    SupervisorPoolExhausted,
    #[error("actor table error while starting a supervisor or child: {0}")]
    Runtime(#[from] RuntimeError),
}

impl From<SupervisorError> for Status {
    fn from(err: SupervisorError) -> Self {
        match err {
            SupervisorError::TooManyChildren { .. } => {
                Status::new(StatusCode::Invalid, "too many supervisor children")
            }
            SupervisorError::SpawnFailed(_) => {
                Status::new(StatusCode::NoMem, "child spawn failed during start")
            }
            SupervisorError::Pool(e) => e.into(),
            SupervisorError::UnknownChild => Status::new(StatusCode::Invalid, "unknown child id"),
            SupervisorError::SupervisorPoolExhausted => {
                Status::new(StatusCode::NoMem, "supervisor pool exhausted")
            }
            SupervisorError::Runtime(e) => e.into(),
        }
    }
}

/// Top-level runtime errors not specific to one subsystem.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("actor table exhausted (MAX_ACTORS reached)")]
    ActorTableFull,
    #[error("unknown actor id: {0}")]
    UnknownActor(ActorId),
    #[error("stack arena exhausted")]
    StackArenaExhausted,
    #[error("runtime is shutting down, no new actors may be spawned")]
    ShuttingDown,
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },
    #[error("bus subscriber cap must be between 1 and MAX_BUS_SUBSCRIBERS")]
    InvalidBusSubscriberCap,
    #[error("bus pool exhausted (MAX_BUSES reached)")]
    BusTableFull,
    #[error("unknown bus id")]
    UnknownBus,
}

impl From<RuntimeError> for Status {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::ActorTableFull => Status::new(StatusCode::NoMem, "actor table full"),
            RuntimeError::UnknownActor(_) => Status::new(StatusCode::Invalid, "unknown actor id"),
            RuntimeError::StackArenaExhausted => {
                Status::new(StatusCode::NoMem, "stack arena exhausted")
            }
            RuntimeError::ShuttingDown => Status::new(StatusCode::Invalid, "runtime shutting down"),
            RuntimeError::InvalidConfig { reason } => Status::new(StatusCode::Invalid, reason),
            RuntimeError::InvalidBusSubscriberCap => {
                Status::new(StatusCode::Invalid, "bus subscriber cap out of range")
            }
            RuntimeError::BusTableFull => Status::new(StatusCode::NoMem, "bus table full"),
            RuntimeError::UnknownBus => Status::new(StatusCode::Invalid, "unknown bus id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ok_has_no_message() {
        let s = Status::ok();
        assert!(s.is_ok());
        assert_eq!(s.message, None);
    }

    #[test]
    fn pool_error_converts_to_nomem() {
        let status: Status = PoolError::Exhausted.into();
        assert_eq!(status.code, StatusCode::NoMem);
    }

    #[test]
    fn mailbox_timeout_is_transient_not_fatal() {
        assert!(MailboxError::Timeout.is_transient());
        assert!(!MailboxError::TargetDead.is_transient());
    }

    #[test]
    fn closed_status_is_distinct_from_timeout() {
        let closed: Status = MailboxError::Closed.into();
        let timeout: Status = MailboxError::Timeout.into();
        assert_eq!(closed.code, StatusCode::Closed);
        assert_eq!(timeout.code, StatusCode::Timeout);
        assert_ne!(closed.code, timeout.code);
    }

    #[test]
    fn display_includes_message_when_present() {
        let s = Status::new(StatusCode::Invalid, "bad argument");
        assert_eq!(s.to_string(), "INVALID: bad argument");
    }
}
