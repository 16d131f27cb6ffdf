//! Tick-time clock and the per-frame context handed to every task.
//!
//! Suspended work (skill casts, projectile travel) measures time in
//! simulation seconds, not wall-clock seconds: the driver advances the
//! [`GameClock`] once per tick and [`Delay`] futures resolve on the first
//! poll after their deadline has passed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::task::{Context, Poll};

/// Read-only access to the current tick's delta time.
pub trait TimeMonitor {
    /// Seconds elapsed since the previous tick.
    fn delta_time(&self) -> f32;
}

/// Per-tick context passed down the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds since the previous tick.
    pub delta_time: f32,
    /// Simulation seconds since the clock started, including this tick.
    pub elapsed: f64,
    /// Sequence number of this tick, starting at 1.
    pub index: u64,
}

impl Frame {
    /// A standalone frame, for driving a tree without a [`GameClock`].
    pub fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            elapsed: f64::from(delta_time),
            index: 1,
        }
    }
}

impl TimeMonitor for Frame {
    fn delta_time(&self) -> f32 {
        self.delta_time
    }
}

#[derive(Default)]
struct ClockState {
    elapsed_bits: AtomicU64,
    delta_bits: AtomicU32,
    frame: AtomicU64,
}

/// Shared simulation clock.
///
/// Cloning yields another handle to the same clock. Only the tick driver
/// should call [`GameClock::advance`].
#[derive(Clone, Default)]
pub struct GameClock {
    state: Arc<ClockState>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `delta_time` seconds and returns the new frame.
    pub fn advance(&self, delta_time: f32) -> Frame {
        let elapsed = self.elapsed() + f64::from(delta_time);
        self.state
            .elapsed_bits
            .store(elapsed.to_bits(), Ordering::Release);
        self.state
            .delta_bits
            .store(delta_time.to_bits(), Ordering::Release);
        let index = self.state.frame.fetch_add(1, Ordering::AcqRel) + 1;

        Frame {
            delta_time,
            elapsed,
            index,
        }
    }

    /// Simulation seconds since the clock started.
    pub fn elapsed(&self) -> f64 {
        f64::from_bits(self.state.elapsed_bits.load(Ordering::Acquire))
    }

    /// Number of ticks advanced so far.
    pub fn frame(&self) -> u64 {
        self.state.frame.load(Ordering::Acquire)
    }

    /// A future resolving once `seconds` of simulation time have passed.
    pub fn delay(&self, seconds: f32) -> Delay {
        Delay {
            clock: self.clone(),
            deadline: self.elapsed() + f64::from(seconds.max(0.0)),
        }
    }
}

impl TimeMonitor for GameClock {
    fn delta_time(&self) -> f32 {
        f32::from_bits(self.state.delta_bits.load(Ordering::Acquire))
    }
}

/// Tick-time delay created by [`GameClock::delay`].
///
/// The delay never registers a wake-up: it is meant to be polled by the tick
/// loop, which re-polls pending work every frame.
pub struct Delay {
    clock: GameClock,
    deadline: f64,
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.clock.elapsed() >= self.deadline {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::WorkItem;

    #[test]
    fn advance_reports_frames() {
        let clock = GameClock::new();
        let first = clock.advance(0.5);
        let second = clock.advance(0.25);

        assert_eq!(first.index, 1);
        assert_eq!(second.index, 2);
        assert_eq!(second.elapsed, 0.75);
        assert_eq!(clock.delta_time(), 0.25);
    }

    #[test]
    fn delay_resolves_after_deadline() {
        let clock = GameClock::new();
        let mut delay = WorkItem::new(clock.delay(1.0));

        assert!(delay.poll().is_none());
        clock.advance(0.5);
        assert!(delay.poll().is_none());
        clock.advance(0.5);
        assert!(delay.poll().is_some());
    }
}
