use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;

/// Reference to a spawnable asset (projectile prefab, effect).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to an entity created by the [`EntityManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub asset: AssetRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("asset `{0}` is not registered")]
    UnknownAsset(AssetRef),

    #[error("entity pool for `{0}` is exhausted")]
    PoolExhausted(AssetRef),

    #[error("spawning `{0}` timed out")]
    TimedOut(AssetRef),
}

/// Spawns and releases world entities on behalf of leaf behaviors.
///
/// Spawning is best-effort: callers skip the current activation on failure.
#[async_trait]
pub trait EntityManager: Send + Sync {
    async fn create_entity(&self, asset: &AssetRef) -> Result<Entity, SpawnError>;

    fn despawn(&self, entity: &Entity);
}
