//! The single execution lane: admission policies + serialized dispatch.

use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, Notify};
use tracing::debug;

use super::task::PromptTask;
use crate::domain::{Admission, CompletionFn, Outcome, Priority, Prompt, PromptId};
use crate::error::LaneError;
use crate::observability::LaneCounts;
use crate::ports::{CallbackContext, Clock, SpawnContext, SystemClock};
use crate::worker::Worker;

/// Pending entry for the priority heap.
///
/// Ordered by priority first, then admission sequence. The sequence
/// comparison is reversed so the max-heap pops the earliest-admitted entry
/// among equals (FIFO within priority).
struct PendingEntry {
    priority: Priority,
    seq: u64,
    task: PromptTask,
}

impl PartialEq for PendingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for PendingEntry {}

impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Lane state behind one lock: the occupancy check and the enqueue of an
/// admission decision are atomic.
struct LaneState {
    pending: BinaryHeap<PendingEntry>,
    executing: bool,

    /// Admission sequence, ties FIFO within equal priority.
    seq: u64,

    finished: u64,
    dropped: u64,
    ignored: u64,
}

impl LaneState {
    fn new() -> Self {
        Self {
            pending: BinaryHeap::new(),
            executing: false,
            seq: 0,
            finished: 0,
            dropped: 0,
            ignored: 0,
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    fn occupied(&self) -> bool {
        self.executing || !self.pending.is_empty()
    }
}

/// State shared between the lane handle and its worker.
pub(crate) struct LaneShared {
    state: Mutex<LaneState>,
    notify: Notify,
    context: Arc<dyn CallbackContext>,
    clock: Arc<dyn Clock>,
    closed: AtomicBool,
}

impl LaneShared {
    /// Pop the highest-priority pending task, waiting until one is admitted.
    /// Marks the lane executing before returning.
    pub(crate) async fn lease(&self) -> PromptTask {
        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(entry) = state.pending.pop() {
                    state.executing = true;
                    return entry.task;
                }
            }
            self.notify.notified().await;
        }
    }

    /// A leased task finished its lifecycle; free the lane slot.
    pub(crate) async fn finish(&self) {
        let mut state = self.state.lock().await;
        state.executing = false;
        state.finished += 1;
    }

    /// Run completion hooks FIFO on the callback context.
    pub(crate) fn deliver(&self, hooks: Vec<CompletionFn>, outcome: Outcome) {
        if hooks.is_empty() {
            return;
        }
        self.context.execute(Box::new(move || {
            for hook in hooks {
                hook(outcome);
            }
        }));
    }
}

/// Serializes prompt presentation: at most one prompt executes at a time.
///
/// A process typically creates one lane and injects it into callers; the
/// lifecycle is explicit rather than a global singleton, so each test can
/// construct its own. [`spawn`](PromptLane::spawn) starts the lane and its
/// single worker, [`shutdown_and_join`](PromptLane::shutdown_and_join) ends
/// it.
pub struct PromptLane {
    shared: Arc<LaneShared>,
    worker: Worker,
}

impl PromptLane {
    /// Start a lane with the default callback context (tokio spawn) and the
    /// system clock. Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        Self::spawn_with(Arc::new(SpawnContext), Arc::new(SystemClock))
    }

    /// Start a lane with an injected callback context and clock.
    pub fn spawn_with(context: Arc<dyn CallbackContext>, clock: Arc<dyn Clock>) -> Self {
        let shared = Arc::new(LaneShared {
            state: Mutex::new(LaneState::new()),
            notify: Notify::new(),
            context,
            clock,
            closed: AtomicBool::new(false),
        });
        let worker = Worker::spawn(Arc::clone(&shared));
        Self { shared, worker }
    }

    /// Route a prompt according to its own admission field.
    pub async fn dispatch(&self, prompt: Prompt) -> Result<PromptId, LaneError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(LaneError::Closed);
        }
        match prompt.admission() {
            Admission::MustRun => self.admit(prompt).await,
            Admission::RunIfIdle => self.admit_if_idle(prompt).await,
            Admission::Ignore => self.reject(prompt, Outcome::Ignored).await,
        }
    }

    /// Queue the prompt unconditionally; it will eventually run.
    pub async fn enqueue(&self, prompt: Prompt) -> Result<PromptId, LaneError> {
        self.dispatch(prompt.with_admission(Admission::MustRun)).await
    }

    /// Run the prompt only if nothing is pending or executing; otherwise it
    /// is dropped and its completion fires with [`Outcome::DroppedBusy`].
    pub async fn present_if_idle(&self, prompt: Prompt) -> Result<PromptId, LaneError> {
        self.dispatch(prompt.with_admission(Admission::RunIfIdle)).await
    }

    /// Discard the prompt without running it; its completion fires with
    /// [`Outcome::Ignored`].
    pub async fn discard(&self, prompt: Prompt) -> Result<PromptId, LaneError> {
        self.dispatch(prompt.with_admission(Admission::Ignore)).await
    }

    /// Occupancy and lifetime counters.
    pub async fn counts(&self) -> LaneCounts {
        let state = self.shared.state.lock().await;
        LaneCounts {
            pending: state.pending.len(),
            executing: usize::from(state.executing),
            finished: state.finished,
            dropped: state.dropped,
            ignored: state.ignored,
        }
    }

    /// Stop admitting prompts and stop the worker after the in-flight
    /// prompt (if any) finishes. Pending prompts never run and their
    /// completions never fire.
    pub fn request_shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.worker.request_shutdown();
    }

    /// Shut down and wait for the worker to stop.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        self.worker.join().await;
    }

    async fn admit(&self, prompt: Prompt) -> Result<PromptId, LaneError> {
        let id = PromptId::generate(&*self.shared.clock);
        let priority = prompt.priority();

        let mut state = self.shared.state.lock().await;
        let seq = state.next_seq();
        state.pending.push(PendingEntry {
            priority,
            seq,
            task: self.wrap(id, prompt),
        });
        drop(state);

        // Wake the worker outside the lock.
        self.shared.notify.notify_one();
        debug!(%id, ?priority, "prompt admitted");
        Ok(id)
    }

    async fn admit_if_idle(&self, prompt: Prompt) -> Result<PromptId, LaneError> {
        let id = PromptId::generate(&*self.shared.clock);
        let priority = prompt.priority();

        let mut state = self.shared.state.lock().await;
        if state.occupied() {
            state.dropped += 1;
            drop(state);

            debug!(%id, "lane busy, prompt dropped");
            self.complete_unadmitted(prompt, Outcome::DroppedBusy);
            return Ok(id);
        }
        let seq = state.next_seq();
        state.pending.push(PendingEntry {
            priority,
            seq,
            task: self.wrap(id, prompt),
        });
        drop(state);

        self.shared.notify.notify_one();
        debug!(%id, ?priority, "prompt admitted to idle lane");
        Ok(id)
    }

    async fn reject(&self, prompt: Prompt, outcome: Outcome) -> Result<PromptId, LaneError> {
        let id = PromptId::generate(&*self.shared.clock);

        let mut state = self.shared.state.lock().await;
        state.ignored += 1;
        drop(state);

        debug!(%id, "ignorable prompt discarded");
        self.complete_unadmitted(prompt, outcome);
        Ok(id)
    }

    fn wrap(&self, id: PromptId, prompt: Prompt) -> PromptTask {
        let task = PromptTask::new(id, prompt);
        // Lane bookkeeping composes after the caller's own completions.
        task.add_completion_hook(Box::new(move |outcome| {
            debug!(%id, ?outcome, "prompt completion delivered");
        }));
        task
    }

    /// A prompt that never reached the lane still notifies its caller: one
    /// completion per dispatch, admitted or not.
    fn complete_unadmitted(&self, prompt: Prompt, outcome: Outcome) {
        if let Some(callback) = prompt.on_complete {
            self.shared.deliver(vec![callback], outcome);
        }
    }
}

#[async_trait::async_trait]
impl super::Dispatcher for PromptLane {
    async fn dispatch(&self, prompt: Prompt) -> Result<PromptId, LaneError> {
        PromptLane::dispatch(self, prompt).await
    }

    async fn counts(&self) -> LaneCounts {
        PromptLane::counts(self).await
    }
}
