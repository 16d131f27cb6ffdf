use tracing::debug;

use super::{Activation, ActivationListener, Activator, drive, settle};
use crate::error::BehaviorError;

/// Degenerate activator without a cooldown.
///
/// Every `begin` fires the listener right away, unless the previous
/// activation is still in flight. `update` only drives in-flight work and
/// `end` merely detaches the listener.
#[derive(Default)]
pub struct SingleActivator {
    active: bool,
    listener: Option<Box<dyn ActivationListener>>,
    in_flight: Option<Activation>,
    last_error: Option<BehaviorError>,
    fires: u64,
}

impl SingleActivator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Activator for SingleActivator {
    fn begin(&mut self, listener: Box<dyn ActivationListener>) {
        self.active = true;
        let listener = self.listener.insert(listener);
        if self.in_flight.is_some() {
            return;
        }

        self.fires += 1;
        debug!("single activator firing (#{})", self.fires);

        let mut work = listener.on_activate();
        match work.poll() {
            Some(result) => settle(result, &mut self.last_error),
            None => self.in_flight = Some(work),
        }
    }

    fn update(&mut self, _delta_time: f32) {
        drive(&mut self.in_flight, &mut self.last_error);
    }

    fn end(&mut self) {
        self.active = false;
        self.listener = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn can_fire(&self) -> bool {
        self.in_flight.is_none()
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
