//! Task state machine for the lane.

use serde::{Deserialize, Serialize};

/// Lifecycle state of one admitted prompt task.
///
/// State transitions:
/// - Initialized -> Executing
/// - Executing -> Finished
///
/// Everything else (double start, anything after Finished) is a scheduler
/// bug and panics rather than silently no-opping: a missed transition would
/// corrupt the lane's concurrency accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    /// Admitted, not yet started.
    Initialized,

    /// Running its lifecycle: pre-delay, body, post-delay.
    Executing,

    /// Lifecycle complete; the lane slot is free.
    Finished,
}

impl TaskState {
    /// Is `self -> next` a legal transition?
    pub fn can_transition(self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Initialized, TaskState::Executing)
                | (TaskState::Executing, TaskState::Finished)
        )
    }

    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskState::Initialized, TaskState::Executing, true)]
    #[case(TaskState::Executing, TaskState::Finished, true)]
    #[case(TaskState::Initialized, TaskState::Finished, false)]
    #[case(TaskState::Initialized, TaskState::Initialized, false)]
    #[case(TaskState::Executing, TaskState::Executing, false)]
    #[case(TaskState::Executing, TaskState::Initialized, false)]
    #[case(TaskState::Finished, TaskState::Initialized, false)]
    #[case(TaskState::Finished, TaskState::Executing, false)]
    #[case(TaskState::Finished, TaskState::Finished, false)]
    fn transition_table(#[case] from: TaskState, #[case] to: TaskState, #[case] legal: bool) {
        assert_eq!(from.can_transition(to), legal);
    }

    #[test]
    fn only_finished_is_terminal() {
        assert!(!TaskState::Initialized.is_terminal());
        assert!(!TaskState::Executing.is_terminal());
        assert!(TaskState::Finished.is_terminal());
    }
}
