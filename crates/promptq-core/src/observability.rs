use serde::{Deserialize, Serialize};

/// Snapshot of lane occupancy and lifetime counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneCounts {
    /// Prompts admitted but not yet started.
    pub pending: usize,

    /// Prompts currently executing (0 or 1).
    pub executing: usize,

    /// Prompts that ran their full lifecycle (presented or skipped).
    pub finished: u64,

    /// Prompts rejected because the lane was busy.
    pub dropped: u64,

    /// Prompts discarded before ever reaching the lane.
    pub ignored: u64,
}

impl LaneCounts {
    /// Nothing admitted and nothing executing.
    pub fn is_idle(&self) -> bool {
        self.pending == 0 && self.executing == 0
    }
}
