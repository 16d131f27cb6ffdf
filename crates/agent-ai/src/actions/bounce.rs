use behavior_tree::{Task, TaskStatus};

use crate::clock::TimeMonitor;
use crate::env::SharedAgent;
use crate::error::{BehaviorError, Result};
use crate::math::Vec2;

/// Patrols inside an axis-aligned box, reflecting off its edges.
///
/// Always reports `Running`; combine it with a condition in a selector to
/// interrupt the patrol.
pub struct MovementBounce {
    agent: SharedAgent,
    direction: Vec2,
    min: Vec2,
    max: Vec2,
}

impl MovementBounce {
    /// Creates a patrol starting along `direction` (normalized).
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `direction` is zero or `min` exceeds `max`
    /// on either axis.
    pub fn new(agent: SharedAgent, direction: Vec2, min: Vec2, max: Vec2) -> Result<Self> {
        let direction = direction.normalized();
        if direction == Vec2::ZERO {
            return Err(BehaviorError::invalid("bounce direction must be non-zero"));
        }
        if min.x > max.x || min.y > max.y {
            return Err(BehaviorError::invalid(format!(
                "bounce bounds are inverted: min {min:?}, max {max:?}"
            )));
        }

        Ok(Self {
            agent,
            direction,
            min,
            max,
        })
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}

/// Clamps one axis into `[min, max]`, returning the reflected direction.
fn reflect(value: f32, dir: f32, min: f32, max: f32) -> (f32, f32) {
    if value < min {
        (min, dir.abs())
    } else if value > max {
        (max, -dir.abs())
    } else {
        (value, dir)
    }
}

impl<C: TimeMonitor> Task<C> for MovementBounce {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        if self.agent.is_knock_backed() {
            return TaskStatus::Running;
        }

        let step = self.agent.speed() * ctx.delta_time();
        let next = self.agent.position() + self.direction * step;

        let (x, dx) = reflect(next.x, self.direction.x, self.min.x, self.max.x);
        let (y, dy) = reflect(next.y, self.direction.y, self.min.y, self.max.y);
        let next = Vec2::new(x, y);
        self.direction = Vec2::new(dx, dy);

        self.agent.set_position(next);
        self.agent.look_at(next + self.direction);

        TaskStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Frame;
    use crate::env::{Agent, EntityId};
    use crate::sandbox::SandboxAgent;

    #[test]
    fn reflects_at_bounds() {
        let agent = SandboxAgent::enemy(EntityId(100), Vec2::ZERO);
        let mut bounce = MovementBounce::new(
            agent.clone(),
            Vec2::new(1.0, 0.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.5, 1.0),
        )
        .unwrap();
        let mut frame = Frame::new(1.0);

        assert_eq!(bounce.on_update(&mut frame), TaskStatus::Running);
        assert_eq!(agent.position(), Vec2::new(1.0, 0.0));

        assert_eq!(bounce.on_update(&mut frame), TaskStatus::Running);
        assert_eq!(agent.position(), Vec2::new(1.5, 0.0));
        assert_eq!(bounce.direction(), Vec2::new(-1.0, 0.0));

        bounce.on_update(&mut frame);
        assert_eq!(agent.position(), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn knocked_back_agent_does_not_move() {
        let agent = SandboxAgent::enemy(EntityId(100), Vec2::ZERO);
        agent.set_knocked_back(true);
        let mut bounce = MovementBounce::new(
            agent.clone(),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, 1.0),
        )
        .unwrap();

        assert_eq!(bounce.on_update(&mut Frame::new(1.0)), TaskStatus::Running);
        assert_eq!(agent.position(), Vec2::ZERO);
    }

    #[test]
    fn rejects_degenerate_setup() {
        let agent = SandboxAgent::enemy(EntityId(100), Vec2::ZERO);
        let (min, max) = (Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));

        assert!(MovementBounce::new(agent.clone(), Vec2::ZERO, min, max).is_err());
        assert!(MovementBounce::new(agent, Vec2::new(1.0, 0.0), max, min).is_err());
    }
}
