//! Status returned by tasks.

/// The result of updating a task for one tick.
///
/// # Tick Semantics
///
/// Agents are driven once per simulation frame. A task that cannot resolve
/// within a single frame (moving toward a target, waiting on an animation)
/// reports [`TaskStatus::Running`] and is updated again on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// The task completed successfully.
    ///
    /// For conditions: The condition was met.
    /// For actions: The action finished without errors.
    Success,

    /// The task failed.
    ///
    /// For conditions: The condition was not met.
    /// For actions: The action could not be carried out (e.g., no target).
    Failure,

    /// The task has not resolved yet and must be updated again next tick.
    Running,
}

impl TaskStatus {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, TaskStatus::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, TaskStatus::Running)
    }

    /// Returns `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }
}
