use std::error::Error;

use crate::client::Action;

pub type Result<T> = std::result::Result<T, DeviceError>;

/// Failure reported by an actuation client.
#[derive(Debug, thiserror::Error)]
pub enum ActuationError {
    #[error("Action `{action}` rejected: {reason}")]
    Rejected { action: Action, reason: String },

    #[error("Action `{0}` timed out")]
    Timeout(Action),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn Error + Send + Sync>),
}

impl ActuationError {
    pub fn rejected<S: Into<String>>(action: Action, reason: S) -> Self {
        Self::Rejected {
            action,
            reason: reason.into(),
        }
    }

    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::Transport(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device topic must not be empty")]
    EmptyTopic,

    #[error("Travel duration must be greater than zero")]
    InvalidTravelDuration,

    #[error("Tick interval must be greater than zero")]
    InvalidTickInterval,

    #[error("Target position {0} is outside 0..=100")]
    InvalidTarget(u8),

    #[error(transparent)]
    Actuation(#[from] ActuationError),
}
