//! Position estimation for motorized shades that cannot report where they are.
//!
//! A [`Device`] sends `up` / `down` / `stop` actions through an
//! [`ActuationClient`] and publishes an estimated position in `0..=100`,
//! interpolated from the configured full-travel duration.

pub mod client;
pub mod config;
pub mod device;
pub mod error;
pub mod event;

pub use client::{Action, ActionRequest, ActuationClient};
pub use config::DeviceConfig;
pub use device::{Device, MAX_POSITION, MIN_POSITION, clamp_position};
pub use error::{ActuationError, DeviceError, Result};
pub use event::{DeviceEvent, DeviceEventKind, DeviceState, EventEmitter, ListenerId};
