//! Composite task nodes.
//!
//! Composite nodes control the execution flow of multiple child tasks. Each
//! composite owns an ordered, non-empty list of children fixed at
//! construction and keeps only the progress state its policy needs:
//!
//! | Node                    | Combination                       | Progress kept        |
//! |-------------------------|-----------------------------------|----------------------|
//! | [`Sequence`]            | AND, short-circuit on failure     | running child        |
//! | [`Selector`]            | OR, short-circuit on success      | none                 |
//! | [`SelectorWithRunning`] | OR, short-circuit on success      | running child        |
//! | [`Parallel`]            | all children every tick, AND      | none                 |
//! | [`Race`]                | all children every tick, first wins | none               |
//! | [`ProgressiveSequence`] | AND, retries the failed child     | current child        |

use crate::{Task, TaskStatus};

type Children<C> = Vec<Box<dyn Task<C>>>;

fn assert_children<C>(children: &Children<C>, node: &str) {
    assert!(!children.is_empty(), "{node} must have at least one child");
}

/// Executes child tasks in order until one fails.
///
/// # Semantics
///
/// - If a child returns `Failure`, the sequence **stops immediately** and
///   returns `Failure`; the next invocation starts again from the first child
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If a child returns `Running`, the sequence pauses there and resumes at
///   that child next tick without re-evaluating earlier children
/// - If all children return `Success` within one traversal, the sequence
///   returns `Success`
pub struct Sequence<C> {
    children: Children<C>,
    running: usize,
}

impl<C> Sequence<C> {
    /// Creates a new sequence with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A sequence with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Children<C>) -> Self {
        assert_children(&children, "Sequence");
        Self {
            children,
            running: 0,
        }
    }
}

impl<C> Task<C> for Sequence<C> {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        let start = self.running;
        for (index, child) in self.children.iter_mut().enumerate().skip(start) {
            match child.on_update(ctx) {
                TaskStatus::Success => continue,
                TaskStatus::Running => {
                    self.running = index;
                    return TaskStatus::Running;
                }
                TaskStatus::Failure => {
                    self.running = 0;
                    return TaskStatus::Failure;
                }
            }
        }
        self.running = 0;
        TaskStatus::Success
    }
}

/// Executes child tasks in priority order until one succeeds.
///
/// # Semantics
///
/// Evaluation restarts from the first child on **every** tick:
/// - If a child returns `Success`, the selector stops and returns `Success`
/// - If a child returns `Running`, the selector stops and returns `Running`
/// - If a child returns `Failure`, the selector tries the next child
/// - If all children fail, the selector returns `Failure`
///
/// Because nothing is remembered between ticks, a higher-priority child that
/// starts succeeding interrupts a lower-priority child that was running.
pub struct Selector<C> {
    children: Children<C>,
}

impl<C> Selector<C> {
    /// Creates a new selector with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Children<C>) -> Self {
        assert_children(&children, "Selector");
        Self { children }
    }
}

impl<C> Task<C> for Selector<C> {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        for child in &mut self.children {
            match child.on_update(ctx) {
                TaskStatus::Failure => continue,
                status => return status,
            }
        }
        TaskStatus::Failure
    }
}

/// A selector that commits to a running child.
///
/// Combines statuses exactly like [`Selector`], but remembers the index of
/// the child that returned `Running` and resumes evaluation *from that index*
/// on subsequent ticks, until that child stops returning `Running`.
/// Higher-priority children are not re-evaluated in the meantime.
pub struct SelectorWithRunning<C> {
    children: Children<C>,
    running: Option<usize>,
}

impl<C> SelectorWithRunning<C> {
    /// Creates a new selector-with-running with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Children<C>) -> Self {
        assert_children(&children, "SelectorWithRunning");
        Self {
            children,
            running: None,
        }
    }

    /// Index of the child being resumed, if any.
    pub fn running_index(&self) -> Option<usize> {
        self.running
    }
}

impl<C> Task<C> for SelectorWithRunning<C> {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        let start = self.running.take().unwrap_or(0);
        for (index, child) in self.children.iter_mut().enumerate().skip(start) {
            match child.on_update(ctx) {
                TaskStatus::Failure => continue,
                TaskStatus::Success => return TaskStatus::Success,
                TaskStatus::Running => {
                    self.running = Some(index);
                    return TaskStatus::Running;
                }
            }
        }
        TaskStatus::Failure
    }
}

/// Updates every child on every tick.
///
/// # Semantics
///
/// All children are invoked in order regardless of individual outcomes, so
/// their side effects always happen. Statuses are aggregated afterwards:
/// - any `Failure` yields `Failure`
/// - all `Success` yields `Success`
/// - otherwise `Running`
pub struct Parallel<C> {
    children: Children<C>,
}

impl<C> Parallel<C> {
    /// Creates a new parallel node with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Children<C>) -> Self {
        assert_children(&children, "Parallel");
        Self { children }
    }
}

impl<C> Task<C> for Parallel<C> {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        let mut failed = false;
        let mut running = false;
        for child in &mut self.children {
            match child.on_update(ctx) {
                TaskStatus::Success => {}
                TaskStatus::Failure => failed = true,
                TaskStatus::Running => running = true,
            }
        }

        if failed {
            TaskStatus::Failure
        } else if running {
            TaskStatus::Running
        } else {
            TaskStatus::Success
        }
    }
}

/// Updates every child on every tick; the first to finish decides.
///
/// # Semantics
///
/// All children are invoked in declaration order. The first child (in that
/// order) returning a terminal status determines the result for the tick;
/// terminal results of later children in the same tick are discarded. While
/// no child has terminated, the race returns `Running`.
pub struct Race<C> {
    children: Children<C>,
}

impl<C> Race<C> {
    /// Creates a new race with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Children<C>) -> Self {
        assert_children(&children, "Race");
        Self { children }
    }
}

impl<C> Task<C> for Race<C> {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        let mut winner = None;
        for child in &mut self.children {
            let status = child.on_update(ctx);
            if winner.is_none() && status.is_terminal() {
                winner = Some(status);
            }
        }
        winner.unwrap_or(TaskStatus::Running)
    }
}

/// A sequence that never starts over on failure.
///
/// # Semantics
///
/// - A failing child is retried on the next tick, indefinitely, and the
///   sequence returns `Failure` meanwhile
/// - The sequence advances past a child only after it returns `Success`
/// - Reaching the end of the list returns `Success` and wraps back to the
///   first child for the next cycle
pub struct ProgressiveSequence<C> {
    children: Children<C>,
    current: usize,
}

impl<C> ProgressiveSequence<C> {
    /// Creates a new progressive sequence with the given children.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Children<C>) -> Self {
        assert_children(&children, "ProgressiveSequence");
        Self {
            children,
            current: 0,
        }
    }

    /// Index of the child that will be evaluated next.
    pub fn current_index(&self) -> usize {
        self.current
    }
}

impl<C> Task<C> for ProgressiveSequence<C> {
    fn on_update(&mut self, ctx: &mut C) -> TaskStatus {
        while let Some(child) = self.children.get_mut(self.current) {
            match child.on_update(ctx) {
                TaskStatus::Success => self.current += 1,
                status => return status,
            }
        }
        self.current = 0;
        TaskStatus::Success
    }
}
