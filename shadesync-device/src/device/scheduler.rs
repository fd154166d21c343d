use std::cmp::Ordering;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::{Device, Inner, MAX_POSITION, MIN_POSITION, lock};
use crate::error::{DeviceError, Result};

/// The single tick task of a device.
///
/// `generation` advances on every cancel; a task whose generation no longer
/// matches has been superseded and must not touch the device again.
#[derive(Default)]
pub(super) struct ScheduleSlot {
    pub(super) generation: u64,
    pub(super) active: Option<JoinHandle<()>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct Movement {
    generation: u64,
    direction: Direction,
    target: u8,
    start: f64,
    step: f64,
    period: Duration,
}

enum Tick {
    Moving,
    Arrived,
    Superseded,
}

impl Device {
    /// Drives the estimated position toward `target`.
    ///
    /// Any running movement is cancelled first. Returns once the directional
    /// command has settled and ticking has been scheduled; the movement itself
    /// finishes in the background with a `stop`.
    pub async fn set_position(&self, target: u8) -> Result<()> {
        let generation = self.cancel_schedule();

        if target > MAX_POSITION {
            return Err(DeviceError::InvalidTarget(target));
        }

        let position = self.position();

        match target.cmp(&position) {
            Ordering::Equal => match position {
                // Re-assert the limit so the actuator is firmly seated there.
                MIN_POSITION => self.down().await,
                MAX_POSITION => self.up().await,
                _ => {
                    debug!(topic = %self.topic(), position, "Already at target");
                    Ok(())
                }
            },
            Ordering::Greater => {
                self.up().await?;
                self.schedule(generation, Direction::Up, target);
                Ok(())
            }
            Ordering::Less => {
                self.down().await?;
                self.schedule(generation, Direction::Down, target);
                Ok(())
            }
        }
    }

    /// Abandons the running movement without sending `stop`.
    pub fn cancel(&self) {
        self.cancel_schedule();
    }

    pub fn is_moving(&self) -> bool {
        lock(&self.inner.schedule).active.is_some()
    }

    fn cancel_schedule(&self) -> u64 {
        let mut slot = lock(&self.inner.schedule);
        slot.generation = slot.generation.wrapping_add(1);

        if let Some(handle) = slot.active.take() {
            handle.abort();
            debug!(topic = %self.topic(), "Movement cancelled");
        }

        slot.generation
    }

    fn schedule(&self, generation: u64, direction: Direction, target: u8) {
        let mut slot = lock(&self.inner.schedule);

        if slot.generation != generation {
            debug!(topic = %self.topic(), target, "Movement superseded before ticking");
            return;
        }

        let movement = Movement {
            generation,
            direction,
            target,
            start: f64::from(self.position()),
            step: self.inner.config.step_per_tick(),
            period: self.inner.config.tick_interval,
        };

        info!(
            topic = %self.topic(),
            from = movement.start,
            target,
            ?direction,
            "Movement started"
        );

        let inner = Arc::downgrade(&self.inner);
        slot.active = Some(tokio::spawn(run_movement(inner, movement)));
    }

    fn advance(&self, movement: &Movement, estimate: &mut f64) -> Tick {
        let mut slot = lock(&self.inner.schedule);

        if slot.generation != movement.generation {
            return Tick::Superseded;
        }

        let target = f64::from(movement.target);
        let (next, arrived) = match movement.direction {
            Direction::Up => {
                let next = (*estimate + movement.step).min(target);
                (next, next >= target || next >= f64::from(MAX_POSITION))
            }
            Direction::Down => {
                let next = (*estimate - movement.step).max(target);
                (next, next <= target || next <= f64::from(MIN_POSITION))
            }
        };
        *estimate = next;

        // The closing stop must survive a later cancel.
        if arrived {
            slot.active = None;
        }
        drop(slot);

        let position = self.apply_position_change(next);
        debug!(topic = %self.topic(), position, "Tick");

        if arrived { Tick::Arrived } else { Tick::Moving }
    }
}

async fn run_movement(inner: Weak<Inner>, movement: Movement) {
    let mut interval = time::interval_at(Instant::now() + movement.period, movement.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut estimate = movement.start;

    loop {
        interval.tick().await;

        let Some(inner) = inner.upgrade() else {
            return;
        };
        let device = Device { inner };

        match device.advance(&movement, &mut estimate) {
            Tick::Moving => {}
            Tick::Superseded => return,
            Tick::Arrived => {
                info!(topic = %device.topic(), position = device.position(), "Movement finished");

                if let Err(e) = device.stop().await {
                    error!(topic = %device.topic(), "Failed to stop after movement: {}", e);
                }
                return;
            }
        }
    }
}
