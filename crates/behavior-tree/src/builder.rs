//! Builder utilities for ergonomic tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! task trees. Instead of writing verbose `Box::new(Sequence::new(vec![...]))`,
//! you can use shorter functions like `sequence(vec![...])`.

use crate::{
    Leaf, Parallel, ProgressiveSequence, Race, Selector, SelectorWithRunning, Sequence, Task,
    TaskStatus,
};

/// Boxed task, the unit composites are built from.
pub type BoxedTask<C> = Box<dyn Task<C>>;

/// Creates a sequence node.
#[inline]
pub fn sequence<C: 'static>(children: Vec<BoxedTask<C>>) -> BoxedTask<C> {
    Box::new(Sequence::new(children))
}

/// Creates a selector node.
#[inline]
pub fn selector<C: 'static>(children: Vec<BoxedTask<C>>) -> BoxedTask<C> {
    Box::new(Selector::new(children))
}

/// Creates a selector that resumes its running child.
#[inline]
pub fn selector_with_running<C: 'static>(children: Vec<BoxedTask<C>>) -> BoxedTask<C> {
    Box::new(SelectorWithRunning::new(children))
}

/// Creates a parallel node.
#[inline]
pub fn parallel<C: 'static>(children: Vec<BoxedTask<C>>) -> BoxedTask<C> {
    Box::new(Parallel::new(children))
}

/// Creates a race node.
#[inline]
pub fn race<C: 'static>(children: Vec<BoxedTask<C>>) -> BoxedTask<C> {
    Box::new(Race::new(children))
}

/// Creates a progressive sequence node.
#[inline]
pub fn progressive_sequence<C: 'static>(children: Vec<BoxedTask<C>>) -> BoxedTask<C> {
    Box::new(ProgressiveSequence::new(children))
}

/// Creates a closure-backed leaf.
///
/// Shorthand for `Box::new(Leaf::new(action))`.
#[inline]
pub fn leaf<C: 'static>(
    action: impl FnMut(&mut C) -> TaskStatus + Send + 'static,
) -> BoxedTask<C> {
    Box::new(Leaf::new(action))
}
