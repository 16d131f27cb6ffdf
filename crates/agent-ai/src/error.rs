//! Error types surfaced by the agent behavior core.
//!
//! Structural problems (bad blueprint tags, non-positive durations, absent
//! services) are reported when a tree is built and are fatal to that build.
//! Runtime failures inside skill callbacks are reported through
//! [`BehaviorError::Callback`] and never leave a skill busy.
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::env::{EntityId, SpawnError};

pub type Result<T> = std::result::Result<T, BehaviorError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BehaviorError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("required service `{service}` is not registered")]
    MissingDependency { service: &'static str },

    #[error("entity spawn failed: {0}")]
    TransientSpawnFailure(#[source] SpawnError),

    #[error("{phase} callback failed: {message}")]
    Callback { phase: CallbackPhase, message: String },

    #[error("agent {0} is not spawned")]
    UnknownAgent(EntityId),
}

impl BehaviorError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub fn callback(phase: CallbackPhase, message: impl fmt::Display) -> Self {
        Self::Callback {
            phase,
            message: message.to_string(),
        }
    }
}

impl From<SpawnError> for BehaviorError {
    fn from(error: SpawnError) -> Self {
        Self::TransientSpawnFailure(error)
    }
}

/// The skill phase a callback error originated from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CallbackPhase {
    Cast,
    Activate,
}

impl fmt::Display for CallbackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CallbackPhase::Cast => "cast",
            CallbackPhase::Activate => "activate",
        };
        write!(f, "{}", label)
    }
}

/// Collects runtime errors for the tick driver.
///
/// Cloning yields another handle to the same buffer. Leaves report into it
/// while ticking; the driver drains it once per tick.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    errors: Arc<Mutex<Vec<BehaviorError>>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, error: BehaviorError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    /// Takes every error reported since the last drain, oldest first.
    pub fn drain(&self) -> Vec<BehaviorError> {
        std::mem::take(&mut *self.errors.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn is_empty(&self) -> bool {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_clones_share_one_buffer() {
        let sink = ErrorSink::new();
        let handle = sink.clone();

        handle.report(BehaviorError::invalid("first"));
        handle.report(BehaviorError::callback(CallbackPhase::Cast, "second"));
        assert!(!sink.is_empty());

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], BehaviorError::InvalidConfiguration { .. }));
        assert!(sink.is_empty());
        assert!(handle.drain().is_empty());
    }
}
