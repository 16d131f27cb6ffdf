//! Collaborator interfaces consumed by the behavior core.
//!
//! Agents, the character manager and the entity manager live in the host
//! game. The core only sees them through these narrow traits, bundled into
//! [`Services`] when a tree is built.
mod agent;
mod characters;
mod entities;
mod services;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use agent::{Agent, AnimationState, SharedAgent};
pub use characters::{CharacterProvider, CharacterSnapshot, Target};
pub use entities::{AssetRef, Entity, EntityManager, SpawnError};
pub use services::Services;

/// Stable identifier of an agent, character or spawned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side a character fights for. Enemies of an agent are the other faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}
