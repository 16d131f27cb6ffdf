//! Edge-triggered target tracking.
//!
//! A [`TargetLocker`] asks its [`AimStrategy`] for targets every tick and
//! reports only *transitions*: acquiring targets after having none, and
//! losing all targets after having some. Repeated empty or non-empty results
//! are silent.

mod aim;

pub use aim::{AimStrategy, FixedCharacter, NearestEnemy};

use tracing::debug;

use crate::env::Target;
use crate::error::{BehaviorError, Result};
use crate::observer::{ObserverSet, Subscription};

/// A change in lock state reported by [`TargetLocker::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum LockTransition {
    /// Targets were acquired after a tick with none.
    Locked(Vec<Target>),
    /// All targets were lost after a tick with some.
    Unlocked,
}

/// Subscriber to lock transitions.
pub trait LockListener: Send {
    fn on_lock_target(&mut self, targets: &[Target]) -> Result<()> {
        let _ = targets;
        Ok(())
    }

    fn on_unlock_target(&mut self) -> Result<()> {
        Ok(())
    }
}

pub struct TargetLocker {
    range: f32,
    aim: Box<dyn AimStrategy>,
    last_targets: Option<Vec<Target>>,
    listeners: ObserverSet<dyn LockListener>,
}

impl TargetLocker {
    /// Creates a locker searching within `range` world units.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `range` is not a positive, finite number.
    pub fn new(range: f32, aim: Box<dyn AimStrategy>) -> Result<Self> {
        if !(range.is_finite() && range > 0.0) {
            return Err(BehaviorError::invalid(format!(
                "lock range must be positive, got {range}"
            )));
        }

        Ok(Self {
            range,
            aim,
            last_targets: None,
            listeners: ObserverSet::new(),
        })
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn is_locked(&self) -> bool {
        self.last_targets.is_some()
    }

    /// Targets seen on the most recent non-empty query while locked.
    pub fn current_targets(&self) -> Option<&[Target]> {
        self.last_targets.as_deref()
    }

    pub fn subscribe(&mut self, listener: Box<dyn LockListener>) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        self.listeners.unsubscribe(handle)
    }

    /// Queries the aim strategy and reports a transition, if one happened.
    pub fn update(&mut self) -> Option<LockTransition> {
        let found = self.aim.find_targets(self.range);

        match (self.last_targets.is_some(), found.is_empty()) {
            (false, false) => {
                debug!("locked {} target(s)", found.len());
                self.listeners.notify(|l| l.on_lock_target(&found));
                self.last_targets = Some(found.clone());
                Some(LockTransition::Locked(found))
            }
            (true, true) => Some(self.unlock()),
            (true, false) => {
                self.last_targets = Some(found);
                None
            }
            (false, true) => None,
        }
    }

    /// Releases the lock. Reports `Unlocked` if targets were held.
    pub fn end(&mut self) -> Option<LockTransition> {
        self.last_targets.is_some().then(|| self.unlock())
    }

    fn unlock(&mut self) -> LockTransition {
        debug!("target lock released");
        self.last_targets = None;
        self.listeners.notify(|l| l.on_unlock_target());
        LockTransition::Unlocked
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::env::EntityId;
    use crate::math::Vec2;

    struct ScriptedAim(Mutex<VecDeque<Vec<Target>>>);

    impl AimStrategy for ScriptedAim {
        fn find_targets(&self, _range: f32) -> Vec<Target> {
            self.0.lock().unwrap().pop_front().unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl LockListener for Journal {
        fn on_lock_target(&mut self, targets: &[Target]) -> Result<()> {
            self.0.lock().unwrap().push(format!("lock {}", targets.len()));
            Ok(())
        }

        fn on_unlock_target(&mut self) -> Result<()> {
            self.0.lock().unwrap().push("unlock".into());
            Ok(())
        }
    }

    struct Grumpy;

    impl LockListener for Grumpy {
        fn on_lock_target(&mut self, _targets: &[Target]) -> Result<()> {
            Err(BehaviorError::invalid("grumpy"))
        }
    }

    fn t1() -> Target {
        Target {
            id: EntityId(1),
            position: Vec2::new(1.0, 0.0),
        }
    }

    fn locker(frames: Vec<Vec<Target>>) -> TargetLocker {
        TargetLocker::new(5.0, Box::new(ScriptedAim(Mutex::new(frames.into())))).unwrap()
    }

    #[test]
    fn reports_only_transitions() {
        let mut locker = locker(vec![vec![], vec![], vec![t1()], vec![t1()], vec![]]);
        let journal = Journal::default();
        let log = journal.0.clone();
        locker.subscribe(Box::new(journal));

        let transitions: Vec<_> = (0..5).map(|_| locker.update()).collect();

        assert_eq!(
            transitions,
            vec![
                None,
                None,
                Some(LockTransition::Locked(vec![t1()])),
                None,
                Some(LockTransition::Unlocked),
            ]
        );
        assert_eq!(*log.lock().unwrap(), ["lock 1", "unlock"]);
    }

    #[test]
    fn failing_listener_does_not_block_others() {
        let mut locker = locker(vec![vec![t1()]]);
        let journal = Journal::default();
        let log = journal.0.clone();
        locker.subscribe(Box::new(Grumpy));
        locker.subscribe(Box::new(journal));

        assert!(locker.update().is_some());
        assert_eq!(*log.lock().unwrap(), ["lock 1"]);
    }

    #[test]
    fn end_releases_held_lock_once() {
        let mut locker = locker(vec![vec![t1()]]);
        locker.update();

        assert_eq!(locker.end(), Some(LockTransition::Unlocked));
        assert_eq!(locker.end(), None);
        assert!(!locker.is_locked());
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let mut locker = locker(vec![vec![t1()]]);
        let journal = Journal::default();
        let log = journal.0.clone();
        let handle = locker.subscribe(Box::new(journal));
        assert!(locker.unsubscribe(handle));

        locker.update();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn rejects_non_positive_range() {
        let aim = Box::new(ScriptedAim(Mutex::new(VecDeque::new())));
        assert!(TargetLocker::new(0.0, aim).is_err());
    }
}
