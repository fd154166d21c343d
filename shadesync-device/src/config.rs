use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Result};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Static identity and timing of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub topic: String,
    #[serde(default)]
    pub name: String,
    /// Time needed to travel from 0 to 100.
    #[serde(rename = "travel_duration_ms", with = "millis")]
    pub travel_duration: Duration,
    #[serde(
        rename = "tick_interval_ms",
        with = "millis",
        default = "default_tick_interval"
    )]
    pub tick_interval: Duration,
}

impl DeviceConfig {
    pub fn new<S: Into<String>>(topic: S, travel_duration: Duration) -> Self {
        Self {
            topic: topic.into(),
            name: String::new(),
            travel_duration,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(DeviceError::EmptyTopic);
        }
        if self.travel_duration.is_zero() {
            return Err(DeviceError::InvalidTravelDuration);
        }
        if self.tick_interval.is_zero() {
            return Err(DeviceError::InvalidTickInterval);
        }

        Ok(())
    }

    /// Position units covered by one tick.
    pub fn step_per_tick(&self) -> f64 {
        100.0 * self.tick_interval.as_secs_f64() / self.travel_duration.as_secs_f64()
    }
}

fn default_tick_interval() -> Duration {
    DEFAULT_TICK_INTERVAL
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
