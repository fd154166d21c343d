use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use shadesync_device::{ActionRequest, ActuationClient, ActuationError};
use tokio::time;

/// Stand-in for the remote endpoint: accepts every action after a fixed delay.
pub struct SimulatedActuator {
    latency: Duration,
    history: Mutex<Vec<ActionRequest>>,
}

impl SimulatedActuator {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<ActionRequest> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ActuationClient for SimulatedActuator {
    async fn init(&self) -> Result<(), ActuationError> {
        tracing::info!("Simulated actuation session ready");
        Ok(())
    }

    async fn action(&self, request: ActionRequest) -> Result<(), ActuationError> {
        tracing::debug!(topic = %request.topic, action = %request.action, "Actuator received");

        time::sleep(self.latency).await;

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        Ok(())
    }
}
