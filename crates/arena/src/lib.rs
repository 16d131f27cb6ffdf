//! Headless arena for agent behaviors.
//!
//! Sets up a small in-memory world (one player, an archer and a patrol) and
//! drives it through a [`agent_ai::BehaviorRunner`].
pub mod config;
pub mod scenario;

pub use config::ArenaConfig;
pub use scenario::{Arena, load_blueprint};
