//! In-memory collaborators.
//!
//! A minimal world for exercising trees without a host engine: agents with
//! interior-mutable transforms, a character registry with hit points, and an
//! entity manager that can be told to fail. Used by the test suites and the
//! arena binary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::clock::GameClock;
use crate::env::{
    Agent, AnimationState, AssetRef, CharacterProvider, CharacterSnapshot, Entity, EntityId,
    EntityManager, Faction, SpawnError,
};
use crate::math::Vec2;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An agent whose state lives in memory.
pub struct SandboxAgent {
    id: EntityId,
    faction: Faction,
    speed: f32,
    position: Mutex<Vec2>,
    facing: Mutex<Option<Vec2>>,
    knocked_back: AtomicBool,
    enabled: AtomicBool,
    animations: Mutex<Vec<AnimationState>>,
    animation: Option<(GameClock, f32)>,
}

impl SandboxAgent {
    pub fn new(id: EntityId, faction: Faction, position: Vec2, speed: f32) -> Self {
        Self {
            id,
            faction,
            speed,
            position: Mutex::new(position),
            facing: Mutex::new(None),
            knocked_back: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
            animations: Mutex::new(Vec::new()),
            animation: None,
        }
    }

    /// An enemy-faction agent moving at one unit per second.
    pub fn enemy(id: EntityId, position: Vec2) -> Arc<Self> {
        Arc::new(Self::new(id, Faction::Enemy, position, 1.0))
    }

    /// Animations take `seconds` of game time on `clock` (builder pattern).
    pub fn with_animation_time(mut self, clock: GameClock, seconds: f32) -> Self {
        self.animation = Some((clock, seconds));
        self
    }

    pub fn facing(&self) -> Option<Vec2> {
        *lock(&self.facing)
    }

    pub fn animations(&self) -> Vec<AnimationState> {
        lock(&self.animations).clone()
    }

    pub fn set_knocked_back(&self, knocked_back: bool) {
        self.knocked_back.store(knocked_back, Ordering::SeqCst);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

#[async_trait]
impl Agent for SandboxAgent {
    fn id(&self) -> EntityId {
        self.id
    }

    fn faction(&self) -> Faction {
        self.faction
    }

    fn position(&self) -> Vec2 {
        *lock(&self.position)
    }

    fn set_position(&self, position: Vec2) {
        *lock(&self.position) = position;
    }

    fn look_at(&self, target: Vec2) {
        *lock(&self.facing) = Some(target);
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn is_knock_backed(&self) -> bool {
        self.knocked_back.load(Ordering::SeqCst)
    }

    fn is_enable(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    async fn play_animation(&self, state: AnimationState) {
        lock(&self.animations).push(state);
        if let Some((clock, seconds)) = &self.animation {
            clock.delay(*seconds).await;
        }
    }
}

#[derive(Debug, Clone)]
struct CharacterRecord {
    faction: Faction,
    position: Vec2,
    health: f32,
    invulnerable: bool,
}

/// Character registry with hit points.
#[derive(Default)]
pub struct SandboxWorld {
    characters: Mutex<HashMap<EntityId, CharacterRecord>>,
}

impl SandboxWorld {
    pub const DEFAULT_HEALTH: f32 = 100.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, id: EntityId, faction: Faction, position: Vec2) {
        lock(&self.characters).insert(
            id,
            CharacterRecord {
                faction,
                position,
                health: Self::DEFAULT_HEALTH,
                invulnerable: false,
            },
        );
    }

    pub fn remove(&self, id: EntityId) {
        lock(&self.characters).remove(&id);
    }

    pub fn move_to(&self, id: EntityId, position: Vec2) {
        if let Some(record) = lock(&self.characters).get_mut(&id) {
            record.position = position;
        }
    }

    pub fn set_invulnerable(&self, id: EntityId, invulnerable: bool) {
        if let Some(record) = lock(&self.characters).get_mut(&id) {
            record.invulnerable = invulnerable;
        }
    }

    pub fn health(&self, id: EntityId) -> Option<f32> {
        lock(&self.characters).get(&id).map(|r| r.health)
    }
}

impl CharacterProvider for SandboxWorld {
    fn characters(&self) -> Vec<CharacterSnapshot> {
        let mut snapshots: Vec<_> = lock(&self.characters)
            .iter()
            .map(|(id, r)| CharacterSnapshot {
                id: *id,
                faction: r.faction,
                position: r.position,
            })
            .collect();
        snapshots.sort_by_key(|s| s.id);
        snapshots
    }

    fn position(&self, id: EntityId) -> Option<Vec2> {
        lock(&self.characters).get(&id).map(|r| r.position)
    }

    fn can_take_damage(&self, id: EntityId) -> bool {
        lock(&self.characters)
            .get(&id)
            .is_some_and(|r| !r.invulnerable && r.health > 0.0)
    }

    fn apply_damage(&self, id: EntityId, amount: f32) {
        if let Some(record) = lock(&self.characters).get_mut(&id) {
            record.health = (record.health - amount).max(0.0);
        }
    }
}

/// Entity manager that hands out sequential ids.
pub struct SandboxEntities {
    next_id: AtomicU32,
    failing: AtomicBool,
    live: Mutex<Vec<Entity>>,
    spawned: AtomicU32,
}

impl SandboxEntities {
    /// Ids of spawned entities start at this offset.
    pub const FIRST_ID: u32 = 10_000;

    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(Self::FIRST_ID),
            failing: AtomicBool::new(false),
            live: Mutex::new(Vec::new()),
            spawned: AtomicU32::new(0),
        }
    }

    /// Makes every subsequent spawn fail with `PoolExhausted`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn spawned(&self) -> u32 {
        self.spawned.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        lock(&self.live).len()
    }
}

impl Default for SandboxEntities {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityManager for SandboxEntities {
    async fn create_entity(&self, asset: &AssetRef) -> Result<Entity, SpawnError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SpawnError::PoolExhausted(asset.clone()));
        }

        let entity = Entity {
            id: EntityId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            asset: asset.clone(),
        };
        self.spawned.fetch_add(1, Ordering::SeqCst);
        lock(&self.live).push(entity.clone());
        Ok(entity)
    }

    fn despawn(&self, entity: &Entity) {
        lock(&self.live).retain(|e| e.id != entity.id);
    }
}
