use behavior_tree::{Task, TaskStatus};
use tracing::trace;

use crate::clock::TimeMonitor;
use crate::env::SharedAgent;
use crate::error::{BehaviorError, Result};
use crate::locker::AimStrategy;

/// Moves the agent toward its aimed target.
///
/// # Status
///
/// - `Running` while knocked back (without moving) or while closing in
/// - `Success` once within `stop_distance` of the target
/// - `Failure` when no target is in sight
///
/// # Example
///
/// ```rust
/// # use std::sync::Arc;
/// # use agent_ai::{EntityId, Frame, Vec2};
/// # use agent_ai::sandbox::{SandboxAgent, SandboxWorld};
/// use agent_ai::actions::{Chase, NullTask};
/// use agent_ai::locker::NearestEnemy;
/// use behavior_tree::BoxedTask;
/// use behavior_tree::builder::selector;
///
/// # fn main() -> agent_ai::Result<()> {
/// # let world = Arc::new(SandboxWorld::new());
/// # let agent = SandboxAgent::enemy(EntityId(7), Vec2::ZERO);
/// let aim = NearestEnemy::new(agent.clone(), world);
///
/// // Chase the nearest enemy, otherwise idle
/// let chase = Chase::new(agent, Box::new(aim), 12.0, 1.5)?;
/// let children: Vec<BoxedTask<Frame>> = vec![Box::new(chase), Box::new(NullTask)];
/// let _root = selector(children);
/// # Ok(())
/// # }
/// ```
pub struct Chase {
    agent: SharedAgent,
    aim: Box<dyn AimStrategy>,
    sight_range: f32,
    stop_distance: f32,
}

impl Chase {
    pub fn new(
        agent: SharedAgent,
        aim: Box<dyn AimStrategy>,
        sight_range: f32,
        stop_distance: f32,
    ) -> Result<Self> {
        if !(sight_range.is_finite() && sight_range > 0.0) {
            return Err(BehaviorError::invalid(format!(
                "chase sight range must be positive, got {sight_range}"
            )));
        }
        if !(stop_distance.is_finite() && stop_distance >= 0.0) {
            return Err(BehaviorError::invalid(format!(
                "chase stop distance must not be negative, got {stop_distance}"
            )));
        }

        Ok(Self {
            agent,
            aim,
            sight_range,
            stop_distance,
        })
    }
}

impl<C: TimeMonitor> Task<C> for Chase {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        if self.agent.is_knock_backed() {
            return TaskStatus::Running;
        }

        let Some(target) = self.aim.find_targets(self.sight_range).into_iter().next() else {
            return TaskStatus::Failure;
        };

        let position = self.agent.position();
        self.agent.look_at(target.position);

        let distance = position.distance(target.position);
        if distance <= self.stop_distance {
            return TaskStatus::Success;
        }

        // Never step past the stop radius.
        let step = (self.agent.speed() * ctx.delta_time()).min(distance - self.stop_distance);
        let next = position.move_towards(target.position, step);
        trace!("agent {} chasing {} ({:.2} left)", self.agent.id(), target.id, distance);
        self.agent.set_position(next);

        TaskStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::Frame;
    use crate::env::{Agent, EntityId, Faction};
    use crate::locker::NearestEnemy;
    use crate::math::Vec2;
    use crate::sandbox::{SandboxAgent, SandboxWorld};

    fn setup() -> (Arc<SandboxAgent>, Arc<SandboxWorld>, Chase) {
        let agent = SandboxAgent::enemy(EntityId(100), Vec2::ZERO);
        let world = Arc::new(SandboxWorld::new());
        world.add(EntityId(1), Faction::Player, Vec2::new(4.0, 0.0));

        let aim = NearestEnemy::new(agent.clone(), world.clone());
        let chase = Chase::new(agent.clone(), Box::new(aim), 10.0, 1.0).unwrap();
        (agent, world, chase)
    }

    #[test]
    fn closes_in_and_stops_at_distance() {
        let (agent, _world, mut chase) = setup();
        let mut frame = Frame::new(1.0);

        for _ in 0..3 {
            assert_eq!(chase.on_update(&mut frame), TaskStatus::Running);
        }
        assert!((agent.position().x - 3.0).abs() < 1e-4);

        assert_eq!(chase.on_update(&mut frame), TaskStatus::Success);
        assert!((agent.position().x - 3.0).abs() < 1e-4);
        assert_eq!(agent.facing(), Some(Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn does_not_overshoot_stop_radius() {
        let (agent, _world, mut chase) = setup();
        let mut frame = Frame::new(10.0);

        assert_eq!(chase.on_update(&mut frame), TaskStatus::Running);
        assert!((agent.position().x - 3.0).abs() < 1e-4);
    }

    #[test]
    fn fails_without_target() {
        let (agent, world, mut chase) = setup();
        world.remove(EntityId(1));

        assert_eq!(chase.on_update(&mut Frame::new(1.0)), TaskStatus::Failure);
        assert_eq!(agent.position(), Vec2::ZERO);
    }

    #[test]
    fn knocked_back_agent_holds_position() {
        let (agent, _world, mut chase) = setup();
        agent.set_knocked_back(true);

        assert_eq!(chase.on_update(&mut Frame::new(1.0)), TaskStatus::Running);
        assert_eq!(agent.position(), Vec2::ZERO);
    }

    #[test]
    fn rejects_bad_ranges() {
        let agent = SandboxAgent::enemy(EntityId(100), Vec2::ZERO);
        let world = Arc::new(SandboxWorld::new());
        let aim = || Box::new(NearestEnemy::new(agent.clone(), world.clone()));

        assert!(Chase::new(agent.clone(), aim(), 0.0, 1.0).is_err());
        assert!(Chase::new(agent.clone(), aim(), 5.0, -1.0).is_err());
    }
}
