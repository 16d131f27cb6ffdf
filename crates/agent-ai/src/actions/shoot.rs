use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::GameClock;
use crate::env::{
    AnimationState, AssetRef, CharacterProvider, Entity, EntityManager, SharedAgent, Target,
};
use crate::error::{BehaviorError, Result};
use crate::skill::SkillBehavior;

/// Projectile fired by a [`ShootSkill`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub asset: AssetRef,
    pub damage: f32,
    /// Seconds of game time between spawn and impact.
    #[serde(default)]
    pub travel_time: f32,
}

impl Bullet {
    fn validate(&self) -> Result<()> {
        if !(self.damage.is_finite() && self.damage >= 0.0) {
            return Err(BehaviorError::invalid(format!(
                "bullet damage must not be negative, got {}",
                self.damage
            )));
        }
        if !(self.travel_time.is_finite() && self.travel_time >= 0.0) {
            return Err(BehaviorError::invalid(format!(
                "bullet travel time must not be negative, got {}",
                self.travel_time
            )));
        }
        Ok(())
    }
}

/// Ranged attack: plays the attack animation, then fires a projectile.
///
/// # Activation
///
/// 1. Spawn the bullet. A failed spawn skips this cycle without an error.
/// 2. Wait for the travel time on the game clock.
/// 3. If the shooter was disabled meanwhile, discard the bullet.
/// 4. Damage every locked target that can still take damage.
pub struct ShootSkill {
    agent: SharedAgent,
    clock: GameClock,
    characters: Arc<dyn CharacterProvider>,
    entities: Arc<dyn EntityManager>,
    bullet: Bullet,
}

impl ShootSkill {
    pub fn new(
        agent: SharedAgent,
        clock: GameClock,
        characters: Arc<dyn CharacterProvider>,
        entities: Arc<dyn EntityManager>,
        bullet: Bullet,
    ) -> Result<Self> {
        bullet.validate()?;

        Ok(Self {
            agent,
            clock,
            characters,
            entities,
            bullet,
        })
    }
}

#[async_trait]
impl SkillBehavior for ShootSkill {
    async fn cast(&self, targets: &[Target]) -> Result<()> {
        if let Some(first) = targets.first() {
            self.agent.look_at(first.position);
        }
        self.agent.play_animation(AnimationState::Attack).await;
        Ok(())
    }

    async fn activate(&self, targets: &[Target]) -> Result<()> {
        let bullet = match self.entities.create_entity(&self.bullet.asset).await {
            Ok(entity) => BulletGuard {
                entities: self.entities.as_ref(),
                entity,
            },
            Err(e) => {
                let error = BehaviorError::from(e);
                warn!("agent {} skipped a shot: {}", self.agent.id(), error);
                return Ok(());
            }
        };

        self.clock.delay(self.bullet.travel_time).await;

        if !self.agent.is_enable() {
            debug!("agent {} disabled before impact", self.agent.id());
            return Ok(());
        }

        for target in targets {
            if self.characters.can_take_damage(target.id) {
                self.characters.apply_damage(target.id, self.bullet.damage);
                debug!(
                    "agent {} hit {} for {}",
                    self.agent.id(),
                    target.id,
                    self.bullet.damage
                );
            }
        }

        drop(bullet);
        Ok(())
    }
}

/// Despawns a spawned bullet when dropped, including when the activation is
/// dropped mid-flight with its tree.
struct BulletGuard<'a> {
    entities: &'a dyn EntityManager,
    entity: Entity,
}

impl Drop for BulletGuard<'_> {
    fn drop(&mut self) {
        self.entities.despawn(&self.entity);
    }
}

#[cfg(test)]
mod tests {
    use behavior_tree::{Task, TaskStatus};

    use super::*;
    use crate::activator::CooldownActivator;
    use crate::env::{EntityId, Faction};
    use crate::locker::{NearestEnemy, TargetLocker};
    use crate::math::Vec2;
    use crate::sandbox::{SandboxAgent, SandboxEntities, SandboxWorld};
    use crate::skill::{SkillAction, SkillPhase};

    const PLAYER: EntityId = EntityId(1);

    struct Range {
        clock: GameClock,
        agent: Arc<SandboxAgent>,
        world: Arc<SandboxWorld>,
        entities: Arc<SandboxEntities>,
        skill: SkillAction,
    }

    impl Range {
        fn new() -> Self {
            let clock = GameClock::new();
            let agent = Arc::new(
                SandboxAgent::new(EntityId(100), Faction::Enemy, Vec2::ZERO, 1.0)
                    .with_animation_time(clock.clone(), 0.5),
            );
            let world = Arc::new(SandboxWorld::new());
            world.add(PLAYER, Faction::Player, Vec2::new(3.0, 0.0));
            let entities = Arc::new(SandboxEntities::new());

            let bullet = Bullet {
                asset: AssetRef::new("arrow"),
                damage: 10.0,
                travel_time: 0.5,
            };
            let shoot = ShootSkill::new(
                agent.clone(),
                clock.clone(),
                world.clone(),
                entities.clone(),
                bullet,
            )
            .unwrap();
            let aim = NearestEnemy::new(agent.clone(), world.clone());
            let skill = SkillAction::new(
                Box::new(CooldownActivator::new(2.0).unwrap()),
                TargetLocker::new(5.0, Box::new(aim)).unwrap(),
                Arc::new(shoot),
            );

            Self {
                clock,
                agent,
                world,
                entities,
                skill,
            }
        }

        fn tick(&mut self) -> TaskStatus {
            let mut frame = self.clock.advance(0.25);
            self.skill.on_update(&mut frame)
        }
    }

    #[test]
    fn shot_lands_after_travel_time() {
        let mut range = Range::new();

        // Attack animation.
        assert_eq!(range.tick(), TaskStatus::Running);
        assert_eq!(range.agent.animations(), [AnimationState::Attack]);
        assert_eq!(range.agent.facing(), Some(Vec2::new(3.0, 0.0)));
        assert_eq!(range.tick(), TaskStatus::Running);

        // Bullet in the air.
        assert_eq!(range.tick(), TaskStatus::Success);
        assert_eq!(range.entities.live(), 1);
        assert_eq!(range.world.health(PLAYER), Some(SandboxWorld::DEFAULT_HEALTH));
        range.tick();

        assert_eq!(range.tick(), TaskStatus::Failure);
        assert_eq!(range.world.health(PLAYER), Some(90.0));
        assert_eq!(range.entities.live(), 0);
        assert!(range.skill.take_error().is_none());
    }

    #[test]
    fn spawn_failure_skips_the_cycle() {
        let mut range = Range::new();
        range.entities.set_failing(true);

        range.tick();
        range.tick();
        assert_eq!(range.tick(), TaskStatus::Failure);
        assert_eq!(range.skill.phase(), SkillPhase::Idle);
        assert_eq!(range.entities.spawned(), 0);
        assert_eq!(range.world.health(PLAYER), Some(SandboxWorld::DEFAULT_HEALTH));
        assert!(range.skill.take_error().is_none());
    }

    #[test]
    fn disabled_shooter_discards_bullet() {
        let mut range = Range::new();
        for _ in 0..3 {
            range.tick();
        }
        range.agent.set_enabled(false);
        range.tick();
        range.tick();

        assert_eq!(range.world.health(PLAYER), Some(SandboxWorld::DEFAULT_HEALTH));
        assert_eq!(range.entities.spawned(), 1);
        assert_eq!(range.entities.live(), 0);
    }

    #[test]
    fn invulnerable_targets_are_spared() {
        let mut range = Range::new();
        for _ in 0..3 {
            range.tick();
        }
        range.world.set_invulnerable(PLAYER, true);
        range.tick();
        range.tick();

        assert_eq!(range.world.health(PLAYER), Some(SandboxWorld::DEFAULT_HEALTH));
    }

    #[test]
    fn dropping_the_skill_mid_flight_despawns_the_bullet() {
        let mut range = Range::new();
        for _ in 0..3 {
            range.tick();
        }
        assert_eq!(range.entities.live(), 1);

        let Range { skill, entities, .. } = range;
        drop(skill);

        assert_eq!(entities.spawned(), 1);
        assert_eq!(entities.live(), 0);
    }

    #[test]
    fn rejects_negative_damage() {
        let clock = GameClock::new();
        let agent = SandboxAgent::enemy(EntityId(100), Vec2::ZERO);
        let bullet = Bullet {
            asset: AssetRef::new("arrow"),
            damage: -1.0,
            travel_time: 0.0,
        };

        let result = ShootSkill::new(
            agent,
            clock,
            Arc::new(SandboxWorld::new()),
            Arc::new(SandboxEntities::new()),
            bullet,
        );
        assert!(matches!(result, Err(BehaviorError::InvalidConfiguration { .. })));
    }
}
