use behavior_tree::{Task, TaskStatus};
use serde::{Deserialize, Serialize};

use crate::error::{BehaviorError, Result};
use crate::locker::AimStrategy;

/// Which side of the range satisfies a [`DistanceCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// A target is within range.
    #[default]
    Within,
    /// No target is within range.
    Beyond,
}

/// Checks whether the aimed target is within `range`.
///
/// Conditions never move the agent or touch the world.
pub struct DistanceCondition {
    aim: Box<dyn AimStrategy>,
    range: f32,
    mode: DistanceMode,
}

impl DistanceCondition {
    pub fn new(aim: Box<dyn AimStrategy>, range: f32, mode: DistanceMode) -> Result<Self> {
        if !(range.is_finite() && range > 0.0) {
            return Err(BehaviorError::invalid(format!(
                "distance condition range must be positive, got {range}"
            )));
        }

        Ok(Self { aim, range, mode })
    }
}

impl<C> Task<C> for DistanceCondition {
    fn on_update(&mut self, _ctx: &mut C) -> TaskStatus {
        let in_range = !self.aim.find_targets(self.range).is_empty();
        let holds = match self.mode {
            DistanceMode::Within => in_range,
            DistanceMode::Beyond => !in_range,
        };

        if holds {
            TaskStatus::Success
        } else {
            TaskStatus::Failure
        }
    }
}
