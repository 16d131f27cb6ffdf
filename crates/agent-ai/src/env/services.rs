use std::sync::Arc;

use super::{CharacterProvider, EntityManager};
use crate::error::{BehaviorError, Result};

/// Shared managers resolved while building trees.
///
/// Cloning is cheap; every registered service is reference counted and
/// shared read-only between agents.
#[derive(Clone, Default)]
pub struct Services {
    characters: Option<Arc<dyn CharacterProvider>>,
    entities: Option<Arc<dyn EntityManager>>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the character manager (builder pattern).
    pub fn with_characters(mut self, characters: Arc<dyn CharacterProvider>) -> Self {
        self.characters = Some(characters);
        self
    }

    /// Registers the entity manager (builder pattern).
    pub fn with_entities(mut self, entities: Arc<dyn EntityManager>) -> Self {
        self.entities = Some(entities);
        self
    }

    /// The character manager, or `MissingDependency` when none is registered.
    pub fn characters(&self) -> Result<Arc<dyn CharacterProvider>> {
        self.characters
            .clone()
            .ok_or(BehaviorError::MissingDependency {
                service: "characters",
            })
    }

    /// The entity manager, or `MissingDependency` when none is registered.
    pub fn entities(&self) -> Result<Arc<dyn EntityManager>> {
        self.entities
            .clone()
            .ok_or(BehaviorError::MissingDependency { service: "entities" })
    }
}
