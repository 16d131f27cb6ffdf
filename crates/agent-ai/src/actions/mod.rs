//! Leaf behaviors for agent trees.
//!
//! Movement and condition leaves are synchronous and generic over any
//! [`TimeMonitor`](crate::clock::TimeMonitor) context. Shooting is a
//! [`SkillAction`](crate::skill::SkillAction) driven by [`ShootSkill`].

mod bounce;
mod chase;
mod distance;
mod null;
mod shoot;

pub use bounce::MovementBounce;
pub use chase::Chase;
pub use distance::{DistanceCondition, DistanceMode};
pub use null::NullTask;
pub use shoot::{Bullet, ShootSkill};
