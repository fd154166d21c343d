use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::client::ActuationClient;
use crate::config::DeviceConfig;
use crate::error::Result;
use crate::event::{DeviceEvent, DeviceEventKind, DeviceState, EventEmitter, ListenerId};

use self::scheduler::ScheduleSlot;

mod commands;
mod scheduler;

pub const MIN_POSITION: u8 = 0;
pub const MAX_POSITION: u8 = 100;

/// Handle to a time-estimated positional actuator.
///
/// The actuator cannot report where it is, so the device publishes an
/// estimate derived from how long it has been moving. Clones share the same
/// device.
#[derive(Clone)]
pub struct Device {
    inner: Arc<Inner>,
}

struct Inner {
    config: DeviceConfig,
    client: Arc<dyn ActuationClient>,
    status: Mutex<Status>,
    events: EventEmitter,
    schedule: Mutex<ScheduleSlot>,
}

#[derive(Debug, Default)]
struct Status {
    state: DeviceState,
    position: u8,
}

impl Device {
    pub fn new(config: DeviceConfig, client: Arc<dyn ActuationClient>) -> Result<Self> {
        config.validate()?;

        debug!(
            topic = %config.topic,
            name = %config.name,
            travel_ms = config.travel_duration.as_millis() as u64,
            "Device created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                client,
                status: Mutex::new(Status::default()),
                events: EventEmitter::new(),
                schedule: Mutex::new(ScheduleSlot::default()),
            }),
        })
    }

    pub fn topic(&self) -> &str {
        &self.inner.config.topic
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn travel_duration(&self) -> Duration {
        self.inner.config.travel_duration
    }

    pub fn state(&self) -> DeviceState {
        lock(&self.inner.status).state
    }

    pub fn position(&self) -> u8 {
        lock(&self.inner.status).position
    }

    /// Runs the client's session setup.
    pub async fn init(&self) -> Result<()> {
        self.inner.client.init().await?;
        Ok(())
    }

    pub fn on<F>(&self, kind: DeviceEventKind, listener: F) -> ListenerId
    where
        F: Fn(&DeviceEvent) + Send + Sync + 'static,
    {
        self.inner.events.on(kind, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.events.off(id)
    }

    pub fn listener_count(&self, kind: DeviceEventKind) -> usize {
        self.inner.events.listener_count(kind)
    }

    /// Records a new movement intent and notifies listeners, even when the
    /// state did not change.
    pub fn apply_state_change(&self, state: DeviceState) {
        lock(&self.inner.status).state = state;

        debug!(topic = %self.topic(), %state, "State change");
        self.inner.events.emit(DeviceEvent::StateChange { value: state });
    }

    /// The only write path to the position: rounds, clamps to 0..=100 and
    /// notifies listeners.
    pub fn apply_position_change(&self, raw: f64) -> u8 {
        let position = clamp_position(raw);
        lock(&self.inner.status).position = position;

        self.inner
            .events
            .emit(DeviceEvent::PositionChange { value: position });

        position
    }
}

/// Rounds half-up to the nearest integer and clamps to the position range.
pub fn clamp_position(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_POSITION;
    }

    raw.round()
        .clamp(f64::from(MIN_POSITION), f64::from(MAX_POSITION)) as u8
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self
            .schedule
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = slot.active.take() {
            handle.abort();
        }
    }
}
