//! Prompt descriptor: body, predicate, delays, priority, admission.
//!
//! A `Prompt` is a value. Configuration methods consume `self` and return
//! the updated value, so a descriptor shared between call sites can never be
//! mutated behind the back of a copy that is already queued.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use super::Outcome;

/// The signal a prompt body fires when its visible work is done.
///
/// Consuming `self` makes "exactly once" a compile-time property; the signal
/// is `Send`, so the body may fire it from any thread.
pub struct CompletionSignal(oneshot::Sender<()>);

impl CompletionSignal {
    pub(crate) fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    /// Mark the prompt's visible work as finished.
    pub fn done(self) {
        let _ = self.0.send(());
    }
}

/// A prompt body: kicks off the visible work and fires the signal when done,
/// synchronously or later.
pub type PromptBody = Box<dyn FnOnce(CompletionSignal) + Send + 'static>;

/// Evaluated at execution time; `false` skips the body.
pub type PredicateFn = Box<dyn Fn() -> bool + Send + 'static>;

/// Runs once per dispatched prompt, on the lane's callback context.
pub type CompletionFn = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// Ordering hint among pending prompts. Advisory only: a lower-priority
/// prompt already executing is never preempted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    VeryLow,
    Low,
    #[default]
    Normal,
    High,
    VeryHigh,
}

/// Rule deciding whether a prompt enters the execution lane at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// Always admitted; eventual execution is guaranteed (barring shutdown).
    #[default]
    MustRun,

    /// Admitted only when the lane is completely idle, dropped otherwise.
    RunIfIdle,

    /// Never admitted; a deliberate no-op placeholder.
    Ignore,
}

/// Descriptor of one transient prompt.
pub struct Prompt {
    pub(crate) body: PromptBody,
    pub(crate) predicate: PredicateFn,
    pub(crate) on_complete: Option<CompletionFn>,
    pub(crate) pre_delay: Duration,
    pub(crate) post_delay: Duration,
    priority: Priority,
    admission: Admission,
}

impl Prompt {
    pub fn new(body: impl FnOnce(CompletionSignal) + Send + 'static) -> Self {
        Self {
            body: Box::new(body),
            predicate: Box::new(|| true),
            on_complete: None,
            pre_delay: Duration::ZERO,
            post_delay: Duration::ZERO,
            priority: Priority::default(),
            admission: Admission::default(),
        }
    }

    /// An ignorable placeholder: the body signals immediately and admission
    /// is [`Admission::Ignore`], so it never reaches the lane.
    pub fn empty() -> Self {
        Self::new(|signal| signal.done()).ignored()
    }

    /// Wait before the body begins.
    pub fn with_pre_delay(mut self, delay: Duration) -> Self {
        self.pre_delay = delay;
        self
    }

    /// Wait after the body signals completion, before the lane frees up.
    pub fn with_post_delay(mut self, delay: Duration) -> Self {
        self.post_delay = delay;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_admission(mut self, admission: Admission) -> Self {
        self.admission = admission;
        self
    }

    /// Mark the prompt ignorable (shorthand for `Admission::Ignore`).
    pub fn ignored(self) -> Self {
        self.with_admission(Admission::Ignore)
    }

    /// Gate the body on a condition checked at execution time, not at
    /// admission time.
    pub fn when(mut self, predicate: impl Fn() -> bool + Send + 'static) -> Self {
        self.predicate = Box::new(predicate);
        self
    }

    /// Set the completion callback, replacing any existing one.
    pub fn on_complete(mut self, f: impl FnOnce(Outcome) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Append a completion callback; callbacks run FIFO (earlier-attached
    /// first).
    pub fn add_completion(mut self, f: impl FnOnce(Outcome) + Send + 'static) -> Self {
        self.on_complete = Some(match self.on_complete.take() {
            Some(prev) => Box::new(move |outcome| {
                prev(outcome);
                f(outcome);
            }),
            None => Box::new(f),
        });
        self
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn admission(&self) -> Admission {
        self.admission
    }

    pub fn pre_delay(&self) -> Duration {
        self.pre_delay
    }

    pub fn post_delay(&self) -> Duration {
        self.post_delay
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("pre_delay", &self.pre_delay)
            .field("post_delay", &self.post_delay)
            .field("priority", &self.priority)
            .field("admission", &self.admission)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn defaults_are_normal_must_run_no_delays() {
        let prompt = Prompt::new(|signal| signal.done());

        assert_eq!(prompt.priority(), Priority::Normal);
        assert_eq!(prompt.admission(), Admission::MustRun);
        assert_eq!(prompt.pre_delay(), Duration::ZERO);
        assert_eq!(prompt.post_delay(), Duration::ZERO);
        assert!((prompt.predicate)());
    }

    #[test]
    fn configuration_returns_updated_values() {
        let prompt = Prompt::new(|signal| signal.done())
            .with_pre_delay(Duration::from_millis(100))
            .with_post_delay(Duration::from_millis(50))
            .with_priority(Priority::High)
            .with_admission(Admission::RunIfIdle);

        assert_eq!(prompt.pre_delay(), Duration::from_millis(100));
        assert_eq!(prompt.post_delay(), Duration::from_millis(50));
        assert_eq!(prompt.priority(), Priority::High);
        assert_eq!(prompt.admission(), Admission::RunIfIdle);
    }

    #[test]
    fn priority_is_ordered_low_to_high() {
        assert!(Priority::VeryLow < Priority::Low);
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
        assert!(Priority::High < Priority::VeryHigh);
    }

    #[test]
    fn empty_prompt_is_ignorable() {
        let prompt = Prompt::empty();
        assert_eq!(prompt.admission(), Admission::Ignore);
    }

    #[test]
    fn add_completion_composes_fifo() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));

        let first_order = Arc::clone(&order);
        let second_order = Arc::clone(&order);
        let first_calls = Arc::clone(&calls);
        let second_calls = Arc::clone(&calls);

        let prompt = Prompt::new(|signal| signal.done())
            .add_completion(move |_| {
                first_order.lock().push("first");
                first_calls.fetch_add(1, Ordering::SeqCst);
            })
            .add_completion(move |_| {
                second_order.lock().push("second");
                second_calls.fetch_add(1, Ordering::SeqCst);
            });

        let callback = prompt.on_complete.expect("completion attached");
        callback(Outcome::Presented);

        assert_eq!(*order.lock(), vec!["first", "second"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
