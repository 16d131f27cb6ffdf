//! Tick-driven behavior core for non-player agents.
//!
//! This crate composes [`behavior_tree`] tasks with a skill-activation state
//! machine: cooldown gating, edge-triggered target locking and two-phase
//! (cast, then activate) skills whose work is suspended across ticks.
//! Hosts describe trees as [`BehaviorConfig`] blueprints and drive them
//! through a [`BehaviorRunner`].
//!
//! Modules are organized by responsibility:
//! - [`env`] declares the collaborators the host provides (agents,
//!   characters, entity spawning)
//! - [`clock`] and [`work`] carry tick time and suspended work
//! - [`activator`], [`locker`] and [`skill`] make up the skill state machine
//! - [`actions`] holds the leaf behaviors
//! - [`config`] turns blueprints into task graphs
//! - [`runner`] ticks every spawned agent in a fixed order
//! - [`sandbox`] provides in-memory collaborators for tests and demos
pub mod actions;
pub mod activator;
pub mod clock;
pub mod config;
pub mod env;
pub mod error;
pub mod locker;
pub mod math;
pub mod observer;
pub mod runner;
pub mod sandbox;
pub mod skill;
pub mod work;

pub use activator::{Activation, ActivationListener, Activator, CooldownActivator, SingleActivator};
pub use clock::{Delay, Frame, GameClock, TimeMonitor};
pub use config::{AgentTask, BehaviorConfig, BuildContext, CompositeKind, MultiConfig};
pub use env::{
    Agent, AnimationState, AssetRef, CharacterProvider, CharacterSnapshot, Entity, EntityId,
    EntityManager, Faction, Services, SharedAgent, SpawnError, Target,
};
pub use error::{BehaviorError, CallbackPhase, ErrorSink, Result};
pub use locker::{AimStrategy, LockListener, LockTransition, TargetLocker};
pub use math::Vec2;
pub use observer::{ObserverSet, Subscription};
pub use runner::{BehaviorRunner, RunnerConfig, TickReport};
pub use skill::{SkillAction, SkillBehavior, SkillPhase};
pub use work::WorkItem;
