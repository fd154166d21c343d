use tracing::{debug, warn};

use super::{Device, MAX_POSITION, MIN_POSITION};
use crate::client::{Action, ActionRequest};
use crate::error::Result;
use crate::event::DeviceState;

impl Device {
    pub async fn up(&self) -> Result<()> {
        self.send(Action::Up).await?;
        self.apply_state_change(DeviceState::Increasing);
        Ok(())
    }

    pub async fn down(&self) -> Result<()> {
        self.send(Action::Down).await?;
        self.apply_state_change(DeviceState::Decreasing);
        Ok(())
    }

    /// Stops the actuator. At a limit the actuator has already halted, so
    /// only the local state is updated.
    pub async fn stop(&self) -> Result<()> {
        let position = self.position();

        if position == MIN_POSITION || position == MAX_POSITION {
            debug!(topic = %self.topic(), position, "At limit, skipping stop action");
        } else {
            self.send(Action::Stop).await?;
        }

        self.apply_state_change(DeviceState::Stopped);
        Ok(())
    }

    async fn send(&self, action: Action) -> Result<()> {
        let request = ActionRequest::new(action, self.topic());

        debug!(topic = %self.topic(), %action, "Sending action");

        self.inner.client.action(request).await.map_err(|e| {
            warn!(topic = %self.topic(), %action, "Action failed: {}", e);
            e
        })?;

        Ok(())
    }
}
