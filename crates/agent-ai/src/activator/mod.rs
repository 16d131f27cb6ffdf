//! Activation triggers.
//!
//! An [`Activator`] decides *when* a listener's activation runs. The listener
//! hands back the activation as a [`WorkItem`]; the activator polls it
//! immediately and then once per `update` until it completes, so at most one
//! activation per activator is ever in flight.
//!
//! - [`CooldownActivator`]: fires, waits for the activation to finish, then
//!   counts down a fixed cooldown before firing again
//! - [`SingleActivator`]: fires once per `begin`, no cooldown

mod cooldown;
mod single;

pub use cooldown::CooldownActivator;
pub use single::SingleActivator;

use tracing::warn;

use crate::error::{BehaviorError, Result};
use crate::work::WorkItem;

/// Pending activation produced by a listener.
pub type Activation = WorkItem<Result<()>>;

/// Receives activation triggers.
pub trait ActivationListener: Send {
    /// Starts one activation. The returned work is driven by the activator.
    fn on_activate(&mut self) -> Activation;
}

/// A trigger that invokes its listener according to its own policy.
pub trait Activator: Send {
    /// Activates the trigger with `listener`.
    fn begin(&mut self, listener: Box<dyn ActivationListener>);

    /// Advances the trigger by `delta_time` seconds and drives in-flight work.
    fn update(&mut self, delta_time: f32);

    /// Deactivates the trigger and detaches the listener. Work already in
    /// flight keeps running to completion on later updates.
    fn end(&mut self);

    fn is_active(&self) -> bool;

    /// Whether the next `begin`/expiry may fire right away.
    fn can_fire(&self) -> bool;

    /// Whether an activation is currently in flight.
    fn is_busy(&self) -> bool;

    /// Number of activations started so far.
    fn fire_count(&self) -> u64;

    /// Takes the error of the most recent failed activation, if any.
    fn take_error(&mut self) -> Option<BehaviorError>;
}

/// Polls in-flight work once. Returns `true` if it completed on this poll.
fn drive(in_flight: &mut Option<Activation>, last_error: &mut Option<BehaviorError>) -> bool {
    let Some(work) = in_flight.as_mut() else {
        return false;
    };
    match work.poll() {
        Some(result) => {
            *in_flight = None;
            settle(result, last_error);
            true
        }
        None => false,
    }
}

fn settle(result: Result<()>, last_error: &mut Option<BehaviorError>) {
    if let Err(e) = result {
        warn!("activation failed: {}", e);
        *last_error = Some(e);
    }
}

#[cfg(test)]
pub(crate) mod test_listeners {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::clock::GameClock;

    /// Completes instantly and counts invocations.
    pub struct Counting(pub Arc<AtomicU32>);

    impl ActivationListener for Counting {
        fn on_activate(&mut self) -> Activation {
            self.0.fetch_add(1, Ordering::SeqCst);
            WorkItem::new(async { Ok(()) })
        }
    }

    /// Takes `latency` seconds of game time per activation.
    pub struct Slow {
        pub clock: GameClock,
        pub latency: f32,
        pub calls: Arc<AtomicU32>,
    }

    impl ActivationListener for Slow {
        fn on_activate(&mut self) -> Activation {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.clock.delay(self.latency);
            WorkItem::new(async move {
                delay.await;
                Ok(())
            })
        }
    }

    /// Fails every activation.
    pub struct Failing;

    impl ActivationListener for Failing {
        fn on_activate(&mut self) -> Activation {
            WorkItem::new(async { Err(BehaviorError::invalid("listener failure")) })
        }
    }
}
