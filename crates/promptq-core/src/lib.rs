//! promptq-core
//!
//! Serialized dispatch of transient UI prompts: at most one prompt is
//! visible at a time, and callers pick how strictly theirs must run.
//!
//! # Modules
//! - **domain**: prompt descriptor, priorities, admission policies, outcomes
//! - **ports**: injectable seams (callback context, clock)
//! - **queue**: the task state machine and the single execution lane
//! - **observability**: lane occupancy/counter snapshots
//! - **error**: admission errors
//!
//! # Quick start
//!
//! ```ignore
//! use promptq_core::{Prompt, PromptLane};
//!
//! #[tokio::main]
//! async fn main() {
//!     let lane = PromptLane::spawn();
//!
//!     // Guaranteed to run, one at a time, in admission order.
//!     lane.enqueue(Prompt::new(|signal| {
//!         show_dialog(move || signal.done());
//!     }))
//!     .await
//!     .unwrap();
//!
//!     // Shown only if nothing else is up; dropped (with a completion
//!     // carrying Outcome::DroppedBusy) otherwise.
//!     lane.present_if_idle(Prompt::new(|signal| {
//!         show_toast(move || signal.done());
//!     }))
//!     .await
//!     .unwrap();
//!
//!     lane.shutdown_and_join().await;
//! }
//! ```

pub mod domain;
pub mod error;
pub mod observability;
pub mod ports;
pub mod queue;

mod worker;

pub use domain::{
    Admission, CompletionSignal, Outcome, Priority, Prompt, PromptId,
};
pub use error::LaneError;
pub use observability::LaneCounts;
pub use ports::{CallbackContext, Clock, FixedClock, InlineContext, SpawnContext, SystemClock};
pub use queue::{Dispatcher, PromptLane, PromptTask, TaskState};
