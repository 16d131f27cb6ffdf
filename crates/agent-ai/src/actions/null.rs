use behavior_tree::{Task, TaskStatus};

/// Placeholder leaf that always fails.
///
/// Failing (rather than succeeding) lets a selector fall through to the next
/// option when a slot is left unconfigured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTask;

impl<C> Task<C> for NullTask {
    fn on_update(&mut self, _ctx: &mut C) -> TaskStatus {
        TaskStatus::Failure
    }
}
