//! Data-only behavior blueprints.
//!
//! A [`BehaviorConfig`] describes a tree without holding any runtime state.
//! [`BehaviorConfig::build`] turns it into a fresh task graph for one agent:
//! every call constructs new activators, lockers and composites, so one
//! config can be shared by any number of agents.
//!
//! Blueprints are usually authored as JSON:
//!
//! ```json
//! {
//!   "kind": "multi",
//!   "mode": "selector",
//!   "children": [
//!     {
//!       "kind": "shoot_projectile",
//!       "activation": { "type": "cooldown", "duration": 2.0 },
//!       "range": 6.0,
//!       "bullet": { "asset": "arrow", "damage": 10.0, "travel_time": 0.3 }
//!     },
//!     { "kind": "chase", "sight_range": 12.0, "stop_distance": 5.0 }
//!   ]
//! }
//! ```

mod actions;
mod composite;

pub use actions::{
    ActivationConfig, AimConfig, ChaseConfig, DistanceConditionConfig, MovementBounceConfig,
    ShootProjectileConfig,
};
pub use composite::{CompositeKind, MultiConfig};

use behavior_tree::Task;
use serde::{Deserialize, Serialize};

use crate::actions::NullTask;
use crate::clock::{Frame, GameClock};
use crate::env::{Services, SharedAgent};
use crate::error::{BehaviorError, ErrorSink, Result};

/// Root task of an agent's tree.
pub type AgentTask = Box<dyn Task<Frame>>;

/// Everything a build needs from the host.
#[derive(Clone)]
pub struct BuildContext {
    pub services: Services,
    pub clock: GameClock,
    pub agent: SharedAgent,
    /// Where built skills report runtime errors.
    pub errors: ErrorSink,
}

impl BuildContext {
    pub fn new(services: Services, clock: GameClock, agent: SharedAgent) -> Self {
        Self {
            services,
            clock,
            agent,
            errors: ErrorSink::new(),
        }
    }

    /// Reports runtime errors into `errors` (builder pattern).
    pub fn with_errors(mut self, errors: ErrorSink) -> Self {
        self.errors = errors;
        self
    }
}

/// A behavior blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorConfig {
    Chase(ChaseConfig),
    DistanceCondition(DistanceConditionConfig),
    MovementBounce(MovementBounceConfig),
    ShootProjectile(ShootProjectileConfig),
    Multi(MultiConfig),
    Null,
}

impl BehaviorConfig {
    /// Parses a JSON blueprint.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for malformed JSON or an unknown `kind` tag.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BehaviorError::invalid(format!("malformed behavior config: {e}")))
    }

    /// Builds a fresh task graph for `ctx.agent`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for empty composites and non-positive
    ///   durations or ranges
    /// - `MissingDependency` when a leaf needs a service `ctx` lacks
    pub fn build(&self, ctx: &BuildContext) -> Result<AgentTask> {
        let task: AgentTask = match self {
            BehaviorConfig::Chase(config) => Box::new(config.build(ctx)?),
            BehaviorConfig::DistanceCondition(config) => Box::new(config.build(ctx)?),
            BehaviorConfig::MovementBounce(config) => Box::new(config.build(ctx)?),
            BehaviorConfig::ShootProjectile(config) => Box::new(config.build(ctx)?),
            BehaviorConfig::Multi(config) => config.build(ctx)?,
            BehaviorConfig::Null => Box::new(NullTask),
        };
        Ok(task)
    }
}
