//! Lightweight, tick-driven behavior tree library.
//!
//! This library provides a minimal behavior tree implementation designed for
//! real-time agents that are updated once per simulation frame.
//!
//! - **Tri-state results**: tasks succeed, fail, or keep running across ticks
//! - **Stateful nodes**: composites remember where to resume
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Task`]: Core trait for all nodes
//! - [`TaskStatus`]: Success, Failure or Running
//! - Composite nodes: [`Sequence`], [`Selector`], [`SelectorWithRunning`],
//!   [`Parallel`], [`Race`], [`ProgressiveSequence`]
//! - Leaf helper: [`Leaf`]

pub mod builder;
pub mod composite;
pub mod status;
pub mod task;

// Re-export core types for ergonomic API
pub use builder::BoxedTask;
pub use composite::{Parallel, ProgressiveSequence, Race, Selector, SelectorWithRunning, Sequence};
pub use status::TaskStatus;
pub use task::{Leaf, Task};
