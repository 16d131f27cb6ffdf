//! Aim strategies: how a locker finds candidate targets.

use std::sync::Arc;

use crate::env::{CharacterProvider, EntityId, SharedAgent, Target};

/// Finds targets within a range of the aiming agent.
pub trait AimStrategy: Send + Sync {
    fn find_targets(&self, range: f32) -> Vec<Target>;
}

/// Targets the single nearest damageable character hostile to the agent.
pub struct NearestEnemy {
    agent: SharedAgent,
    characters: Arc<dyn CharacterProvider>,
}

impl NearestEnemy {
    pub fn new(agent: SharedAgent, characters: Arc<dyn CharacterProvider>) -> Self {
        Self { agent, characters }
    }
}

impl AimStrategy for NearestEnemy {
    fn find_targets(&self, range: f32) -> Vec<Target> {
        let origin = self.agent.position();
        let faction = self.agent.faction();
        let me = self.agent.id();

        self.characters
            .characters()
            .into_iter()
            .filter(|c| c.id != me && faction.is_hostile_to(c.faction))
            .filter(|c| self.characters.can_take_damage(c.id))
            .map(|c| (origin.distance(c.position), c))
            .filter(|(distance, _)| *distance <= range)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, c)| vec![Target::from(c)])
            .unwrap_or_default()
    }
}

/// Targets one configured character, when it is in range and damageable.
pub struct FixedCharacter {
    agent: SharedAgent,
    characters: Arc<dyn CharacterProvider>,
    target: EntityId,
}

impl FixedCharacter {
    pub fn new(
        agent: SharedAgent,
        characters: Arc<dyn CharacterProvider>,
        target: EntityId,
    ) -> Self {
        Self {
            agent,
            characters,
            target,
        }
    }
}

impl AimStrategy for FixedCharacter {
    fn find_targets(&self, range: f32) -> Vec<Target> {
        let Some(position) = self.characters.position(self.target) else {
            return Vec::new();
        };

        if self.agent.position().distance(position) > range
            || !self.characters.can_take_damage(self.target)
        {
            return Vec::new();
        }

        vec![Target {
            id: self.target,
            position,
        }]
    }
}
