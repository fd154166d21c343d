use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use shadesync_device::{ActionRequest, Device, DeviceEvent, DeviceEventKind, DeviceState};
use tokio::sync::mpsc;
use tokio::time;

use crate::actuator::SimulatedActuator;
use crate::settings::Settings;

pub mod actuator;
pub mod settings;

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub position: u8,
    pub state: DeviceState,
    pub actions: Vec<ActionRequest>,
}

/// Drives one simulated shade through the configured targets, waiting for
/// each movement to stop before requesting the next one.
pub async fn run(settings: &Arc<Settings>) -> Result<ScenarioReport, Box<dyn Error>> {
    let actuator = Arc::new(SimulatedActuator::new(Duration::from_millis(
        settings.actuator.latency_ms,
    )));
    let device = Device::new(settings.device.clone(), actuator.clone())?;

    let (state_tx, mut state_rx) = mpsc::unbounded_channel();

    device.on(DeviceEventKind::PositionChange, |event| {
        if let DeviceEvent::PositionChange { value } = event {
            tracing::info!(position = value, "Position changed");
        }
    });
    device.on(DeviceEventKind::StateChange, move |event| {
        if let DeviceEvent::StateChange { value } = event {
            tracing::info!(state = %value, "State changed");
            let _ = state_tx.send(*value);
        }
    });

    device.init().await?;

    let settle_timeout = Duration::from_millis(settings.scenario.settle_timeout_ms);

    for &target in &settings.scenario.targets {
        while state_rx.try_recv().is_ok() {}

        tracing::info!(from = device.position(), target, "Requesting position");
        device.set_position(target).await?;

        if !device.is_moving() {
            continue;
        }

        let deadline = time::sleep(settle_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                Some(state) = state_rx.recv() => {
                    if state == DeviceState::Stopped {
                        break;
                    }
                },
                _ = &mut deadline => {
                    tracing::warn!(target, "Movement did not settle in time");
                    device.cancel();
                    break;
                }
            }
        }
    }

    let report = ScenarioReport {
        position: device.position(),
        state: device.state(),
        actions: actuator.history(),
    };

    tracing::info!(
        position = report.position,
        actions = report.actions.len(),
        "Scenario finished"
    );

    Ok(report)
}
