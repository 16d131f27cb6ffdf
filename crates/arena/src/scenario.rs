//! The arena world and its preset behaviors.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use agent_ai::config::MovementBounceConfig;
use agent_ai::sandbox::{SandboxAgent, SandboxEntities, SandboxWorld};
use agent_ai::{
    BehaviorConfig, BehaviorRunner, EntityId, Faction, RunnerConfig, Services, TickReport, Vec2,
};
use anyhow::{Context, Result};

use crate::ArenaConfig;

pub const PLAYER: EntityId = EntityId(1);
pub const ARCHER: EntityId = EntityId(100);
pub const PATROL: EntityId = EntityId(101);

/// Archer: shoot when in range, otherwise close in.
pub const ARCHER_PRESET: &str = r#"{
    "kind": "multi",
    "mode": "selector",
    "children": [
        {
            "kind": "shoot_projectile",
            "activation": { "type": "cooldown", "duration": 1.5 },
            "range": 6.0,
            "bullet": { "asset": "arrow", "damage": 12.0, "travel_time": 0.3 }
        },
        { "kind": "chase", "sight_range": 20.0, "stop_distance": 5.0 },
        { "kind": "null" }
    ]
}"#;

/// Seconds of game time the archer's attack animation takes.
const ATTACK_ANIMATION: f32 = 0.4;

/// Loads the archer blueprint from `path`, or the built-in preset.
pub fn load_blueprint(path: Option<&Path>) -> Result<BehaviorConfig> {
    let Some(path) = path else {
        return BehaviorConfig::from_json(ARCHER_PRESET).context("Built-in preset is invalid");
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read blueprint {}", path.display()))?;
    BehaviorConfig::from_json(&json)
        .with_context(|| format!("Failed to parse blueprint {}", path.display()))
}

/// A running arena.
pub struct Arena {
    runner: BehaviorRunner,
    world: Arc<SandboxWorld>,
    entities: Arc<SandboxEntities>,
}

impl Arena {
    pub fn new(config: &ArenaConfig, archer: &BehaviorConfig) -> Result<Self> {
        let world = Arc::new(SandboxWorld::new());
        let entities = Arc::new(SandboxEntities::new());
        world.add(PLAYER, Faction::Player, Vec2::new(12.0, 0.0));

        let services = Services::new()
            .with_characters(world.clone())
            .with_entities(entities.clone());
        let runner_config = RunnerConfig {
            fixed_delta_time: config.delta_time,
            ..RunnerConfig::default()
        };
        let mut runner = BehaviorRunner::new(services, runner_config);

        let archer_agent = SandboxAgent::new(ARCHER, Faction::Enemy, Vec2::ZERO, 3.0)
            .with_animation_time(runner.clock().clone(), ATTACK_ANIMATION);
        runner
            .spawn(Arc::new(archer_agent), archer)
            .context("Failed to spawn archer")?;

        let patrol = BehaviorConfig::MovementBounce(MovementBounceConfig {
            direction: Vec2::new(0.0, 1.0),
            min: Vec2::new(4.0, -4.0),
            max: Vec2::new(4.0, 4.0),
        });
        runner
            .spawn(
                Arc::new(SandboxAgent::new(PATROL, Faction::Enemy, Vec2::new(4.0, 0.0), 2.0)),
                &patrol,
            )
            .context("Failed to spawn patrol")?;

        Ok(Self {
            runner,
            world,
            entities,
        })
    }

    pub fn tick(&mut self) -> TickReport {
        self.runner.step()
    }

    pub fn runner(&self) -> &BehaviorRunner {
        &self.runner
    }

    pub fn player_health(&self) -> f32 {
        self.world.health(PLAYER).unwrap_or(0.0)
    }

    /// Projectiles spawned so far.
    pub fn shots_fired(&self) -> u32 {
        self.entities.spawned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn fast_config(ticks: u64) -> ArenaConfig {
        ArenaConfig {
            ticks,
            delta_time: 0.1,
            behavior: None,
            realtime: false,
        }
    }

    #[test]
    fn preset_archer_closes_in_and_shoots() {
        let config = fast_config(100);
        let blueprint = load_blueprint(None).unwrap();
        let mut arena = Arena::new(&config, &blueprint).unwrap();

        for _ in 0..config.ticks {
            arena.tick();
        }

        assert!(arena.shots_fired() > 0);
        assert!(arena.player_health() < SandboxWorld::DEFAULT_HEALTH);
    }

    #[test]
    fn loads_blueprint_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "kind": "null" }}"#).unwrap();

        let blueprint = load_blueprint(Some(file.path())).unwrap();
        assert_eq!(blueprint, BehaviorConfig::Null);

        let mut arena = Arena::new(&fast_config(10), &blueprint).unwrap();
        arena.tick();
        assert_eq!(arena.shots_fired(), 0);
    }

    #[test]
    fn malformed_blueprint_is_reported_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "kind": "multi", "children": 3 }}"#).unwrap();

        let error = load_blueprint(Some(file.path())).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse blueprint"));
    }
}
