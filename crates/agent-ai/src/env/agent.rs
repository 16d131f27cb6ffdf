use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{EntityId, Faction};
use crate::math::Vec2;

/// Animation states the host can play on an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    Idle,
    Move,
    Attack,
    Death,
    Hit,
}

/// The entity whose tree is being driven.
///
/// Methods take `&self`: one agent is shared by every leaf of its own tree,
/// so implementations use interior mutability for position and facing.
#[async_trait]
pub trait Agent: Send + Sync {
    fn id(&self) -> EntityId;

    fn faction(&self) -> Faction;

    fn position(&self) -> Vec2;

    fn set_position(&self, position: Vec2);

    /// Turns the agent to face `target`.
    fn look_at(&self, target: Vec2);

    /// Movement speed in world units per second.
    fn speed(&self) -> f32;

    fn is_knock_backed(&self) -> bool;

    /// `false` once the agent has been disabled (dead, despawned, pooled).
    fn is_enable(&self) -> bool;

    /// Plays `state` and resolves when the animation's configured duration
    /// has elapsed. Hosts without animations resolve immediately.
    async fn play_animation(&self, state: AnimationState) {
        let _ = state;
    }
}

pub type SharedAgent = Arc<dyn Agent>;
