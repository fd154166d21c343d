use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ActuationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up,
    Down,
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => write!(f, "up"),
            Action::Down => write!(f, "down"),
            Action::Stop => write!(f, "stop"),
        }
    }
}

/// Payload handed to the actuation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: Action,
    pub topic: String,
}

impl ActionRequest {
    pub fn new<S: Into<String>>(action: Action, topic: S) -> Self {
        Self {
            action,
            topic: topic.into(),
        }
    }
}

/// Remote endpoint that moves the physical actuator.
///
/// Implementations own authentication and session handling; the device only
/// looks at whether a request succeeded.
#[async_trait]
pub trait ActuationClient: Send + Sync {
    /// Prepares the session before the first action.
    async fn init(&self) -> Result<(), ActuationError> {
        Ok(())
    }

    async fn action(&self, request: ActionRequest) -> Result<(), ActuationError>;
}
