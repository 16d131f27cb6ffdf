use tracing::{debug, trace};

use super::{Activation, ActivationListener, Activator, drive, settle};
use crate::error::{BehaviorError, Result};

/// Timer-gated trigger that re-arms itself.
///
/// # States
///
/// - **Idle**: not begun, or ended
/// - **Armed-Waiting**: active, `can_fire == false`, counting down (or waiting
///   for the previous activation to finish)
/// - **Ready**: active, `can_fire == true`, firing on this step
///
/// A fresh activator is ready: the first `begin` fires immediately. After each
/// firing the listener's activation is awaited, and only once it resolves
/// does the full cooldown start counting down again. A slow activation
/// therefore stretches the effective period by its own duration.
///
/// The countdown advances only while active, so ending and re-beginning
/// resumes the countdown where it stopped instead of firing early.
pub struct CooldownActivator {
    duration: f32,
    active: bool,
    can_fire: bool,
    remaining: f32,
    listener: Option<Box<dyn ActivationListener>>,
    in_flight: Option<Activation>,
    last_error: Option<BehaviorError>,
    fires: u64,
}

impl CooldownActivator {
    /// Creates an activator with a cooldown of `duration` seconds.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `duration` is not a positive, finite number.
    pub fn new(duration: f32) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(BehaviorError::invalid(format!(
                "cooldown duration must be positive, got {duration}"
            )));
        }

        Ok(Self {
            duration,
            active: false,
            can_fire: true,
            remaining: 0.0,
            listener: None,
            in_flight: None,
            last_error: None,
            fires: 0,
        })
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds left before the next firing, once the countdown is running.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    fn fire(&mut self) {
        let Some(listener) = self.listener.as_mut() else {
            return;
        };

        self.can_fire = false;
        self.fires += 1;
        debug!("cooldown activator firing (#{})", self.fires);

        let mut work = listener.on_activate();
        match work.poll() {
            Some(result) => {
                settle(result, &mut self.last_error);
                self.rearm();
            }
            None => self.in_flight = Some(work),
        }
    }

    fn rearm(&mut self) {
        self.remaining = self.duration;
        trace!("cooldown re-armed for {}s", self.duration);
    }
}

impl Activator for CooldownActivator {
    fn begin(&mut self, listener: Box<dyn ActivationListener>) {
        if self.active {
            return;
        }

        self.active = true;
        self.listener = Some(listener);

        if self.can_fire {
            self.fire();
        }
    }

    fn update(&mut self, delta_time: f32) {
        if self.in_flight.is_some() {
            if drive(&mut self.in_flight, &mut self.last_error) {
                self.rearm();
            }
            return;
        }

        if !self.active || self.can_fire {
            return;
        }

        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.can_fire = true;
            self.fire();
        }
    }

    fn end(&mut self) {
        self.active = false;
        self.listener = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn can_fire(&self) -> bool {
        self.can_fire
    }

    fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn fire_count(&self) -> u64 {
        self.fires
    }

    fn take_error(&mut self) -> Option<BehaviorError> {
        self.last_error.take()
    }
}
