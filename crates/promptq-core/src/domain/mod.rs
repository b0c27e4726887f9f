//! Domain model (ids, prompt descriptor, outcomes).

pub mod ids;
pub mod outcome;
pub mod prompt;

pub use ids::PromptId;
pub use outcome::Outcome;
pub use prompt::{
    Admission, CompletionFn, CompletionSignal, PredicateFn, Priority, Prompt, PromptBody,
};
