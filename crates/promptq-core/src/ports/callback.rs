//! Callback context port: where completion callbacks run.
//!
//! UI hosts usually want completions on a designated thread (their main
//! loop). The execution context is injected rather than hard-coded, so the
//! core stays testable without a UI loop and hosts can route completions
//! wherever they need them.

/// Executor for completion callbacks.
///
/// The lane hands every completion (admitted or dropped) to exactly one
/// `execute` call. Implementations must not block the caller for long; the
/// worker invokes this between prompts.
pub trait CallbackContext: Send + Sync {
    fn execute(&self, f: Box<dyn FnOnce() + Send>);
}

/// Default context: run the callback on a fresh tokio task.
///
/// Requires a tokio runtime; calling it outside one is a wiring bug and
/// panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnContext;

impl CallbackContext for SpawnContext {
    fn execute(&self, f: Box<dyn FnOnce() + Send>) {
        tokio::spawn(async move { f() });
    }
}

/// Run the callback synchronously on the calling thread.
///
/// Useful for headless tests and for hosts that already invoke the lane from
/// their designated callback thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineContext;

impl CallbackContext for InlineContext {
    fn execute(&self, f: Box<dyn FnOnce() + Send>) {
        f();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn inline_context_runs_immediately() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        InlineContext.execute(Box::new(move || flag.store(true, Ordering::SeqCst)));

        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn spawn_context_runs_on_the_runtime() {
        let (tx, rx) = tokio::sync::oneshot::channel();

        SpawnContext.execute(Box::new(move || {
            let _ = tx.send(());
        }));

        tokio::time::timeout(std::time::Duration::from_secs(1), rx)
            .await
            .expect("callback did not run")
            .unwrap();
    }
}
