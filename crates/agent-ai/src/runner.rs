//! Fixed-order tick driver for many agents.
//!
//! The runner owns the shared [`GameClock`] and one slot per agent. Each
//! [`BehaviorRunner::tick`] advances the clock once and updates every root
//! with the same [`Frame`], in spawn order. Nothing here is thread-aware:
//! the runner is the single cooperative scheduler for its agents.

use behavior_tree::TaskStatus;
use serde::{Deserialize, Serialize};

use crate::clock::{Frame, GameClock};
use crate::config::{AgentTask, BehaviorConfig, BuildContext};
use crate::env::{EntityId, Services, SharedAgent};
use crate::error::{BehaviorError, ErrorSink, Result};

/// Tick timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Step used by [`BehaviorRunner::step`].
    pub fixed_delta_time: f32,
    /// Upper bound on a single tick, so a stalled host cannot teleport agents.
    pub max_delta_time: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fixed_delta_time: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub frame: Frame,
    /// Root status of every agent, in spawn order.
    pub statuses: Vec<(EntityId, TaskStatus)>,
    /// Runtime errors reported by each agent's tree during this tick.
    pub errors: Vec<(EntityId, BehaviorError)>,
}

impl TickReport {
    pub fn status(&self, id: EntityId) -> Option<TaskStatus> {
        self.statuses
            .iter()
            .find_map(|(agent, status)| (*agent == id).then_some(*status))
    }
}

struct AgentSlot {
    agent: SharedAgent,
    root: AgentTask,
    errors: ErrorSink,
    last_status: Option<TaskStatus>,
}

/// Drives the trees of all spawned agents.
pub struct BehaviorRunner {
    config: RunnerConfig,
    clock: GameClock,
    services: Services,
    slots: Vec<AgentSlot>,
}

impl BehaviorRunner {
    pub fn new(services: Services, config: RunnerConfig) -> Self {
        Self {
            config,
            clock: GameClock::new(),
            services,
            slots: Vec::new(),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The clock driving every agent, for hosts that schedule their own
    /// tick-time work (animations, projectiles).
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    /// Status the agent's root reported on the most recent tick.
    pub fn status(&self, id: EntityId) -> Option<TaskStatus> {
        self.position(id).and_then(|i| self.slots[i].last_status)
    }

    /// Builds a tree for `agent` and starts ticking it.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the agent is already spawned
    /// - any error from [`BehaviorConfig::build`]; nothing is inserted then
    pub fn spawn(&mut self, agent: SharedAgent, config: &BehaviorConfig) -> Result<()> {
        self.spawn_with(agent, |ctx| config.build(ctx))
    }

    /// Like [`BehaviorRunner::spawn`], with a host-built tree.
    ///
    /// `build` receives the same context a blueprint would; errors reported
    /// into `ctx.errors` show up in the agent's [`TickReport`] entries.
    pub fn spawn_with<F>(&mut self, agent: SharedAgent, build: F) -> Result<()>
    where
        F: FnOnce(&BuildContext) -> Result<AgentTask>,
    {
        let id = agent.id();
        if self.contains(id) {
            return Err(BehaviorError::invalid(format!(
                "agent {id} is already spawned"
            )));
        }

        let ctx = self.context(&agent);
        let root = build(&ctx)?;
        self.slots.push(AgentSlot {
            agent,
            root,
            errors: ctx.errors,
            last_status: None,
        });
        tracing::info!("spawned agent {} ({} active)", id, self.slots.len());
        Ok(())
    }

    /// Stops ticking `id` and drops its tree.
    pub fn despawn(&mut self, id: EntityId) -> Result<SharedAgent> {
        let index = self.position(id).ok_or(BehaviorError::UnknownAgent(id))?;
        let slot = self.slots.remove(index);
        tracing::info!("despawned agent {} ({} active)", id, self.slots.len());
        Ok(slot.agent)
    }

    /// Replaces the tree of `id` with a fresh build of `config`.
    ///
    /// The old tree is kept if the new one fails to build.
    pub fn reroll(&mut self, id: EntityId, config: &BehaviorConfig) -> Result<()> {
        let index = self.position(id).ok_or(BehaviorError::UnknownAgent(id))?;
        let ctx = self.context(&self.slots[index].agent);
        let root = config.build(&ctx)?;

        let slot = &mut self.slots[index];
        slot.root = root;
        slot.errors = ctx.errors;
        slot.last_status = None;
        tracing::info!("rerolled behavior of agent {}", id);
        Ok(())
    }

    /// Advances the clock by `delta_time` (clamped to `max_delta_time`) and
    /// updates every agent once.
    pub fn tick(&mut self, delta_time: f32) -> TickReport {
        let delta_time = delta_time.max(0.0).min(self.config.max_delta_time);
        let mut frame = self.clock.advance(delta_time);
        tracing::trace!("tick {} (dt {:.4})", frame.index, frame.delta_time);

        let mut statuses = Vec::with_capacity(self.slots.len());
        let mut errors = Vec::new();
        for slot in &mut self.slots {
            let id = slot.agent.id();
            let _span = tracing::debug_span!("agent", %id).entered();

            let status = slot.root.on_update(&mut frame);
            if slot.last_status != Some(status) {
                tracing::debug!("agent {} -> {:?}", id, status);
            }
            slot.last_status = Some(status);
            statuses.push((id, status));
            errors.extend(slot.errors.drain().into_iter().map(|e| (id, e)));
        }

        TickReport {
            frame,
            statuses,
            errors,
        }
    }

    /// Ticks once with the configured fixed delta time.
    pub fn step(&mut self) -> TickReport {
        self.tick(self.config.fixed_delta_time)
    }

    /// A build context with a fresh error sink for one agent's tree.
    fn context(&self, agent: &SharedAgent) -> BuildContext {
        BuildContext::new(self.services.clone(), self.clock.clone(), agent.clone())
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.agent.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::activator::SingleActivator;
    use crate::config::{AimConfig, ChaseConfig, CompositeKind, MultiConfig};
    use crate::env::{Agent, Faction, Target};
    use crate::error::CallbackPhase;
    use crate::locker::TargetLocker;
    use crate::math::Vec2;
    use crate::sandbox::{SandboxAgent, SandboxEntities, SandboxWorld};
    use crate::skill::{SkillAction, SkillBehavior};

    const SLOW_SHOT: &str = r#"{
        "kind": "shoot_projectile",
        "activation": { "type": "cooldown", "duration": 2.0 },
        "range": 5.0,
        "bullet": { "asset": "arrow", "damage": 5.0, "travel_time": 1.0 }
    }"#;

    struct Armory {
        runner: BehaviorRunner,
        world: Arc<SandboxWorld>,
        entities: Arc<SandboxEntities>,
    }

    fn armory() -> Armory {
        let world = Arc::new(SandboxWorld::new());
        world.add(EntityId(1), Faction::Player, Vec2::new(3.0, 0.0));
        let entities = Arc::new(SandboxEntities::new());
        let services = Services::new()
            .with_characters(world.clone())
            .with_entities(entities.clone());
        Armory {
            runner: BehaviorRunner::new(services, RunnerConfig::default()),
            world,
            entities,
        }
    }

    /// Fails every cast.
    struct Misfire;

    #[async_trait]
    impl SkillBehavior for Misfire {
        async fn cast(&self, _targets: &[Target]) -> Result<()> {
            Err(BehaviorError::invalid("bowstring snapped"))
        }

        async fn activate(&self, _targets: &[Target]) -> Result<()> {
            Ok(())
        }
    }

    fn chase() -> BehaviorConfig {
        BehaviorConfig::Chase(ChaseConfig {
            aim: Default::default(),
            sight_range: 20.0,
            stop_distance: 1.0,
        })
    }

    fn runner() -> (BehaviorRunner, Arc<SandboxWorld>) {
        let world = Arc::new(SandboxWorld::new());
        world.add(EntityId(1), Faction::Player, Vec2::new(10.0, 0.0));
        let services = Services::new().with_characters(world.clone());
        (BehaviorRunner::new(services, RunnerConfig::default()), world)
    }

    #[test]
    fn ticks_agents_in_spawn_order() {
        let (mut runner, _world) = runner();
        runner
            .spawn(SandboxAgent::enemy(EntityId(20), Vec2::ZERO), &chase())
            .unwrap();
        runner
            .spawn(SandboxAgent::enemy(EntityId(10), Vec2::ZERO), &BehaviorConfig::Null)
            .unwrap();

        let report = runner.tick(0.1);
        let order: Vec<_> = report.statuses.iter().map(|(id, _)| *id).collect();

        assert_eq!(order, [EntityId(20), EntityId(10)]);
        assert_eq!(report.status(EntityId(20)), Some(TaskStatus::Running));
        assert_eq!(runner.status(EntityId(10)), Some(TaskStatus::Failure));
        assert_eq!(report.frame.index, 1);
    }

    #[test]
    fn clamps_long_frames() {
        let (mut runner, _world) = runner();
        let agent = SandboxAgent::enemy(EntityId(20), Vec2::ZERO);
        runner.spawn(agent.clone(), &chase()).unwrap();

        let report = runner.tick(5.0);

        assert_eq!(report.frame.delta_time, 0.25);
        assert!((agent.position().x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let (mut runner, _world) = runner();
        let agent = SandboxAgent::enemy(EntityId(20), Vec2::ZERO);
        runner.spawn(agent.clone(), &BehaviorConfig::Null).unwrap();

        assert!(matches!(
            runner.spawn(agent, &BehaviorConfig::Null),
            Err(BehaviorError::InvalidConfiguration { .. })
        ));
        assert_eq!(runner.len(), 1);
    }

    #[test]
    fn failed_build_inserts_nothing() {
        let (mut runner, _world) = runner();
        let empty = BehaviorConfig::Multi(MultiConfig::new(CompositeKind::Sequence, Vec::new()));

        assert!(runner
            .spawn(SandboxAgent::enemy(EntityId(20), Vec2::ZERO), &empty)
            .is_err());
        assert!(runner.is_empty());
    }

    #[test]
    fn despawn_and_reroll() {
        let (mut runner, _world) = runner();
        runner
            .spawn(SandboxAgent::enemy(EntityId(20), Vec2::ZERO), &chase())
            .unwrap();
        runner.step();
        assert_eq!(runner.status(EntityId(20)), Some(TaskStatus::Running));

        runner.reroll(EntityId(20), &BehaviorConfig::Null).unwrap();
        assert_eq!(runner.status(EntityId(20)), None);
        runner.step();
        assert_eq!(runner.status(EntityId(20)), Some(TaskStatus::Failure));

        let agent = runner.despawn(EntityId(20)).unwrap();
        assert_eq!(agent.id(), EntityId(20));
        assert!(matches!(
            runner.despawn(EntityId(20)),
            Err(BehaviorError::UnknownAgent(EntityId(20)))
        ));
        assert!(matches!(
            runner.reroll(EntityId(20), &chase()),
            Err(BehaviorError::UnknownAgent(_))
        ));
    }

    #[test]
    fn reroll_mid_shot_releases_the_bullet() {
        let mut armory = armory();
        let shot = BehaviorConfig::from_json(SLOW_SHOT).unwrap();
        armory
            .runner
            .spawn(SandboxAgent::enemy(EntityId(20), Vec2::ZERO), &shot)
            .unwrap();

        armory.runner.tick(0.1);
        assert_eq!(armory.entities.spawned(), 1);
        assert_eq!(armory.entities.live(), 1);

        armory.runner.reroll(EntityId(20), &BehaviorConfig::Null).unwrap();
        assert_eq!(armory.entities.live(), 0);

        for _ in 0..100 {
            armory.runner.tick(0.1);
        }
        assert_eq!(armory.entities.spawned(), 1);
        assert_eq!(armory.entities.live(), 0);
        assert_eq!(
            armory.world.health(EntityId(1)),
            Some(SandboxWorld::DEFAULT_HEALTH)
        );
    }

    #[test]
    fn despawn_mid_shot_releases_the_bullet() {
        let mut armory = armory();
        let shot = BehaviorConfig::from_json(SLOW_SHOT).unwrap();
        armory
            .runner
            .spawn(SandboxAgent::enemy(EntityId(20), Vec2::ZERO), &shot)
            .unwrap();

        armory.runner.tick(0.1);
        assert_eq!(armory.entities.live(), 1);

        armory.runner.despawn(EntityId(20)).unwrap();
        assert_eq!(armory.entities.live(), 0);
    }

    #[test]
    fn failed_cast_is_reported_in_tick() {
        let mut armory = armory();
        armory
            .runner
            .spawn_with(SandboxAgent::enemy(EntityId(20), Vec2::ZERO), |ctx| {
                let locker = TargetLocker::new(5.0, AimConfig::NearestEnemy.build(ctx)?)?;
                let skill = SkillAction::new(
                    Box::new(SingleActivator::new()),
                    locker,
                    Arc::new(Misfire),
                )
                .with_error_sink(ctx.errors.clone());
                let root: AgentTask = Box::new(skill);
                Ok(root)
            })
            .unwrap();

        let report = armory.runner.tick(0.1);
        assert_eq!(report.status(EntityId(20)), Some(TaskStatus::Failure));
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            (
                EntityId(20),
                BehaviorError::Callback {
                    phase: CallbackPhase::Cast,
                    ..
                }
            )
        ));

        // Reported once, not on every later tick.
        assert!(armory.runner.tick(0.1).errors.is_empty());
    }
}
