use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::BuildContext;
use crate::actions::{Bullet, Chase, DistanceCondition, DistanceMode, MovementBounce, ShootSkill};
use crate::activator::{Activator, CooldownActivator, SingleActivator};
use crate::env::EntityId;
use crate::error::Result;
use crate::locker::{AimStrategy, FixedCharacter, NearestEnemy, TargetLocker};
use crate::math::Vec2;
use crate::skill::SkillAction;

/// Target selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AimConfig {
    #[default]
    NearestEnemy,
    FixedCharacter { id: EntityId },
}

impl AimConfig {
    pub fn build(&self, ctx: &BuildContext) -> Result<Box<dyn AimStrategy>> {
        let characters = ctx.services.characters()?;
        let agent = Arc::clone(&ctx.agent);

        let aim: Box<dyn AimStrategy> = match *self {
            AimConfig::NearestEnemy => Box::new(NearestEnemy::new(agent, characters)),
            AimConfig::FixedCharacter { id } => {
                Box::new(FixedCharacter::new(agent, characters, id))
            }
        };
        Ok(aim)
    }
}

/// When a skill fires while its targets stay locked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivationConfig {
    /// Fire, then wait `duration` seconds after the activation finishes.
    Cooldown { duration: f32 },
    /// Fire once per lock.
    Single,
}

impl ActivationConfig {
    pub fn build(&self) -> Result<Box<dyn Activator>> {
        let activator: Box<dyn Activator> = match *self {
            ActivationConfig::Cooldown { duration } => Box::new(CooldownActivator::new(duration)?),
            ActivationConfig::Single => Box::new(SingleActivator::default()),
        };
        Ok(activator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseConfig {
    #[serde(default)]
    pub aim: AimConfig,
    pub sight_range: f32,
    #[serde(default)]
    pub stop_distance: f32,
}

impl ChaseConfig {
    pub(super) fn build(&self, ctx: &BuildContext) -> Result<Chase> {
        Chase::new(
            Arc::clone(&ctx.agent),
            self.aim.build(ctx)?,
            self.sight_range,
            self.stop_distance,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceConditionConfig {
    #[serde(default)]
    pub aim: AimConfig,
    pub range: f32,
    #[serde(default)]
    pub mode: DistanceMode,
}

impl DistanceConditionConfig {
    pub(super) fn build(&self, ctx: &BuildContext) -> Result<DistanceCondition> {
        DistanceCondition::new(self.aim.build(ctx)?, self.range, self.mode)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementBounceConfig {
    pub direction: Vec2,
    pub min: Vec2,
    pub max: Vec2,
}

impl MovementBounceConfig {
    pub(super) fn build(&self, ctx: &BuildContext) -> Result<MovementBounce> {
        MovementBounce::new(Arc::clone(&ctx.agent), self.direction, self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootProjectileConfig {
    pub activation: ActivationConfig,
    pub range: f32,
    #[serde(default)]
    pub aim: AimConfig,
    pub bullet: Bullet,
}

impl ShootProjectileConfig {
    pub(super) fn build(&self, ctx: &BuildContext) -> Result<SkillAction> {
        let shoot = ShootSkill::new(
            Arc::clone(&ctx.agent),
            ctx.clock.clone(),
            ctx.services.characters()?,
            ctx.services.entities()?,
            self.bullet.clone(),
        )?;
        let locker = TargetLocker::new(self.range, self.aim.build(ctx)?)?;

        let skill = SkillAction::new(self.activation.build()?, locker, Arc::new(shoot))
            .with_error_sink(ctx.errors.clone());
        Ok(skill)
    }
}
