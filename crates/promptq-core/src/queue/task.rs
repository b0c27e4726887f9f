//! One admitted unit of work: state machine + async lifecycle.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::TaskState;
use crate::domain::{CompletionFn, CompletionSignal, Outcome, PredicateFn, Prompt, PromptBody, PromptId};

/// The body and predicate, consumed exactly once when the task starts.
struct Payload {
    body: PromptBody,
    predicate: PredicateFn,
}

/// An admitted prompt, driven by the lane worker.
///
/// Owns its own state machine. The state field sits behind its own lock so
/// `is_ready` / `is_executing` / `is_finished` are safe to read from any
/// thread while `start()` runs; completion hooks never fire inside that
/// lock's scope (the worker runs them after the task reports back).
pub struct PromptTask {
    id: PromptId,
    pre_delay: Duration,
    post_delay: Duration,
    state: Mutex<TaskState>,
    payload: Mutex<Option<Payload>>,
    hooks: Mutex<Vec<CompletionFn>>,
}

impl PromptTask {
    /// Wrap a descriptor. The descriptor's completion callback becomes the
    /// first completion hook; the lane appends its own bookkeeping after it.
    pub fn new(id: PromptId, prompt: Prompt) -> Self {
        let mut hooks: Vec<CompletionFn> = Vec::new();
        if let Some(callback) = prompt.on_complete {
            hooks.push(callback);
        }
        Self {
            id,
            pre_delay: prompt.pre_delay,
            post_delay: prompt.post_delay,
            state: Mutex::new(TaskState::Initialized),
            payload: Mutex::new(Some(Payload {
                body: prompt.body,
                predicate: prompt.predicate,
            })),
            hooks: Mutex::new(hooks),
        }
    }

    pub fn id(&self) -> PromptId {
        self.id
    }

    /// Run the full lifecycle: pre-delay, predicate, body, post-delay.
    ///
    /// Legal only from `Initialized`; a second call, concurrent or not,
    /// panics at the transition guard. The task occupies its caller for the
    /// whole lifecycle; delays suspend on tokio timers, never block.
    ///
    /// A predicate that returns `false` skips the body: the task still runs
    /// administratively and finishes, reporting [`Outcome::Skipped`].
    pub async fn start(&self) -> Outcome {
        self.transition(TaskState::Executing);

        let Payload { body, predicate } = self
            .payload
            .lock()
            .take()
            .expect("payload present until the Initialized -> Executing transition");

        sleep(self.pre_delay).await;

        let outcome = if (predicate)() {
            let (signal, fired) = CompletionSignal::new();
            body(signal);
            if fired.await.is_err() {
                // Body dropped its signal without firing it. Treat it as
                // done rather than stalling the lane on a dead channel.
                warn!(id = %self.id, "prompt body dropped its completion signal");
            }
            Outcome::Presented
        } else {
            debug!(id = %self.id, "predicate false, skipping body");
            drop(body);
            Outcome::Skipped
        };

        sleep(self.post_delay).await;
        self.transition(TaskState::Finished);

        outcome
    }

    /// Append a completion hook; hooks run FIFO once the task finishes, on
    /// the lane's callback context.
    pub fn add_completion_hook(&self, hook: CompletionFn) {
        self.hooks.lock().push(hook);
    }

    pub(crate) fn take_completion_hooks(&self) -> Vec<CompletionFn> {
        std::mem::take(&mut *self.hooks.lock())
    }

    pub fn is_ready(&self) -> bool {
        *self.state.lock() == TaskState::Initialized
    }

    pub fn is_executing(&self) -> bool {
        *self.state.lock() == TaskState::Executing
    }

    pub fn is_finished(&self) -> bool {
        *self.state.lock() == TaskState::Finished
    }

    /// Deliberately a no-op: an admitted prompt cannot be retracted once it
    /// may already be visible or mid-animation.
    pub fn cancel(&self) {}

    fn transition(&self, next: TaskState) {
        let mut state = self.state.lock();
        if !state.can_transition(next) {
            panic!("invalid state transition from {:?} to {:?}", *state, next);
        }
        *state = next;
    }
}
