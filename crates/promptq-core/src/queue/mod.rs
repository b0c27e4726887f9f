//! Queue module: task state machine, prompt tasks, and the execution lane.

pub(crate) mod lane;
mod state;
mod task;

pub use lane::PromptLane;
pub use state::TaskState;
pub use task::PromptTask;

use async_trait::async_trait;

use crate::domain::{Prompt, PromptId};
use crate::error::LaneError;
use crate::observability::LaneCounts;

/// Dispatch port (interface).
///
/// [`PromptLane`] is the in-process implementation; this trait is the seam
/// for callers that want to inject a fake (e.g. record prompts instead of
/// running them) or swap implementations later.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Route a prompt according to its admission field.
    async fn dispatch(&self, prompt: Prompt) -> Result<PromptId, LaneError>;

    /// Observability hook.
    async fn counts(&self) -> LaneCounts;
}
