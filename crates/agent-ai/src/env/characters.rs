use serde::{Deserialize, Serialize};

use super::{EntityId, Faction};
use crate::math::Vec2;

/// Read-only view of a character at query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterSnapshot {
    pub id: EntityId,
    pub faction: Faction,
    pub position: Vec2,
}

/// A character selected by an aim strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: EntityId,
    pub position: Vec2,
}

impl From<CharacterSnapshot> for Target {
    fn from(snapshot: CharacterSnapshot) -> Self {
        Self {
            id: snapshot.id,
            position: snapshot.position,
        }
    }
}

/// Character manager shared by every agent.
///
/// Queries are read-only during tick processing; only leaf behaviors apply
/// damage, and never through the scheduler itself.
pub trait CharacterProvider: Send + Sync {
    /// All characters currently alive in the world.
    fn characters(&self) -> Vec<CharacterSnapshot>;

    fn position(&self, id: EntityId) -> Option<Vec2>;

    fn can_take_damage(&self, id: EntityId) -> bool;

    fn apply_damage(&self, id: EntityId, amount: f32);
}
