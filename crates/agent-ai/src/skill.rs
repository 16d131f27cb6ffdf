//! Skill actions: cooldown-gated, target-locked cast/activate lifecycles.
//!
//! A [`SkillAction`] couples an [`Activator`], a [`TargetLocker`] and a
//! [`SkillBehavior`] into one task:
//!
//! ```text
//! Idle --lock--> fire --> Casting --cast done--> Activating --activate done--> Idle
//!                 ^                                                            |
//!                 +------------ cooldown expiry while still locked <-----------+
//! ```
//!
//! Losing the lock ends the activator, which cancels a pending firing but
//! lets an activation already in flight run to completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use behavior_tree::{Task, TaskStatus};
use tracing::debug;

use crate::activator::{Activation, ActivationListener, Activator};
use crate::clock::TimeMonitor;
use crate::env::Target;
use crate::error::{BehaviorError, CallbackPhase, ErrorSink, Result};
use crate::locker::{LockTransition, TargetLocker};
use crate::work::WorkItem;

/// Lifecycle phase of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillPhase {
    Idle,
    Casting,
    Activating,
}

/// The asynchronous halves of a skill.
///
/// Both receive the target snapshot taken when the lock was acquired.
#[async_trait]
pub trait SkillBehavior: Send + Sync {
    async fn cast(&self, targets: &[Target]) -> Result<()>;

    async fn activate(&self, targets: &[Target]) -> Result<()>;
}

#[derive(Default)]
struct PhaseFlags {
    casting: AtomicBool,
    activating: AtomicBool,
}

impl PhaseFlags {
    fn phase(&self) -> SkillPhase {
        if self.casting.load(Ordering::Acquire) {
            SkillPhase::Casting
        } else if self.activating.load(Ordering::Acquire) {
            SkillPhase::Activating
        } else {
            SkillPhase::Idle
        }
    }

    fn enter(&self, phase: CallbackPhase) -> PhaseGuard<'_> {
        let flag = match phase {
            CallbackPhase::Cast => &self.casting,
            CallbackPhase::Activate => &self.activating,
        };
        flag.store(true, Ordering::Release);
        PhaseGuard { flag }
    }
}

/// Clears its phase flag when dropped, on every exit path.
struct PhaseGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn in_phase(phase: CallbackPhase, error: BehaviorError) -> BehaviorError {
    match error {
        BehaviorError::Callback { .. } => error,
        other => BehaviorError::callback(phase, other),
    }
}

/// Listener handed to the activator for one lock period.
struct SkillListener {
    flags: Arc<PhaseFlags>,
    behavior: Arc<dyn SkillBehavior>,
    targets: Arc<[Target]>,
}

impl ActivationListener for SkillListener {
    fn on_activate(&mut self) -> Activation {
        let flags = Arc::clone(&self.flags);
        let behavior = Arc::clone(&self.behavior);
        let targets = Arc::clone(&self.targets);

        WorkItem::new(async move {
            {
                let _casting = flags.enter(CallbackPhase::Cast);
                behavior
                    .cast(&targets)
                    .await
                    .map_err(|e| in_phase(CallbackPhase::Cast, e))?;
            }

            let _activating = flags.enter(CallbackPhase::Activate);
            behavior
                .activate(&targets)
                .await
                .map_err(|e| in_phase(CallbackPhase::Activate, e))
        })
    }
}

/// A task driving one skill.
///
/// # Status
///
/// - `Running` while casting
/// - `Success` while activating
/// - `Failure` otherwise (no target, or waiting for the cooldown)
///
/// # Errors
///
/// Failed activations are forwarded to the [`ErrorSink`] given to
/// [`SkillAction::with_error_sink`] on the tick they resolve. Without a sink
/// the most recent one is kept for [`SkillAction::take_error`].
pub struct SkillAction {
    activator: Box<dyn Activator>,
    locker: TargetLocker,
    behavior: Arc<dyn SkillBehavior>,
    flags: Arc<PhaseFlags>,
    targets: Arc<[Target]>,
    errors: Option<ErrorSink>,
}

impl SkillAction {
    pub fn new(
        activator: Box<dyn Activator>,
        locker: TargetLocker,
        behavior: Arc<dyn SkillBehavior>,
    ) -> Self {
        Self {
            activator,
            locker,
            behavior,
            flags: Arc::default(),
            targets: Arc::from(Vec::new()),
            errors: None,
        }
    }

    /// Reports failed activations into `sink` (builder pattern).
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.errors = Some(sink);
        self
    }

    pub fn phase(&self) -> SkillPhase {
        self.flags.phase()
    }

    /// Snapshot taken when the current lock was acquired.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn is_locked(&self) -> bool {
        self.locker.is_locked()
    }

    pub fn activator(&self) -> &dyn Activator {
        self.activator.as_ref()
    }

    /// Takes the error of the most recent failed activation, if any.
    pub fn take_error(&mut self) -> Option<BehaviorError> {
        self.activator.take_error()
    }

    /// Releases the lock and detaches from the activator.
    pub fn end(&mut self) {
        if let Some(transition) = self.locker.end() {
            self.handle(transition);
        }
        self.activator.end();
    }

    fn forward_error(&mut self) {
        let Some(sink) = &self.errors else {
            return;
        };
        if let Some(error) = self.activator.take_error() {
            sink.report(error);
        }
    }

    fn handle(&mut self, transition: LockTransition) {
        match transition {
            LockTransition::Locked(targets) => {
                debug!("skill locked {} target(s)", targets.len());
                self.targets = Arc::from(targets);
                self.activator.begin(Box::new(SkillListener {
                    flags: Arc::clone(&self.flags),
                    behavior: Arc::clone(&self.behavior),
                    targets: Arc::clone(&self.targets),
                }));
            }
            LockTransition::Unlocked => {
                debug!("skill lost its targets");
                self.activator.end();
            }
        }
    }
}

impl<C: TimeMonitor> Task<C> for SkillAction {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        self.activator.update(ctx.delta_time());

        if let Some(transition) = self.locker.update() {
            self.handle(transition);
        }
        self.forward_error();

        match self.phase() {
            SkillPhase::Casting => TaskStatus::Running,
            SkillPhase::Activating => TaskStatus::Success,
            SkillPhase::Idle => TaskStatus::Failure,
        }
    }
}
