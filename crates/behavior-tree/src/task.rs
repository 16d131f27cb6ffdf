//! Core task trait.
//!
//! This module defines the [`Task`] trait, the fundamental abstraction for
//! every node in a tree. The trait is generic over a context type `C`, which
//! is handed down from the root on every tick (for agents this carries the
//! frame's delta time).

use crate::TaskStatus;

/// A behavior tree node that is updated once per tick.
///
/// Tasks are stateful: composites remember which child is running and leaves
/// may hold in-flight work, so updating takes `&mut self`. A task is owned by
/// exactly one parent (or by the agent holding the root) and is never shared
/// between agents.
pub trait Task<C>: Send {
    /// Advance this task by one tick.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the per-tick context.
    ///
    /// # Returns
    ///
    /// - `TaskStatus::Success` if the task succeeded
    /// - `TaskStatus::Failure` if the task failed
    /// - `TaskStatus::Running` if the task needs more ticks
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus;
}

/// Blanket implementation for boxed tasks.
///
/// This allows `Box<dyn Task<C>>` to also implement `Task<C>`,
/// enabling dynamic dispatch and heterogeneous collections of nodes.
impl<C> Task<C> for Box<dyn Task<C>> {
    #[inline]
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        (**self).on_update(ctx)
    }
}

/// A leaf task backed by a closure.
///
/// Useful for conditions and glue logic that do not justify a dedicated type.
pub struct Leaf<F> {
    action: F,
}

impl<F> Leaf<F> {
    /// Wraps the given closure as a task.
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<C, F> Task<C> for Leaf<F>
where
    F: FnMut(&mut C) -> TaskStatus + Send,
{
    #[inline]
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        (self.action)(ctx)
    }
}
