use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaneError {
    /// The lane has been shut down; no further prompts are accepted.
    #[error("prompt lane is closed")]
    Closed,
}
