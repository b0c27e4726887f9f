//! The lane's single worker: leases one task at a time and drives its full
//! lifecycle before taking the next. Concurrency = 1 lives here: the loop
//! awaits each lifecycle inline, so no two bodies can ever overlap.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::queue::lane::LaneShared;

/// Worker handle owned by the lane.
/// - `request_shutdown()` stops the loop after the in-flight task finishes.
/// - Dropping the lane (and with it the watch sender) stops it too.
pub(crate) struct Worker {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl Worker {
    pub(crate) fn spawn(shared: Arc<LaneShared>) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            worker_loop(shared, &mut shutdown_rx).await;
        });

        Self { shutdown_tx, join }
    }

    /// Stop taking new leases. The in-flight lifecycle is never cancelled.
    pub(crate) fn request_shutdown(&self) {
        // ignore send error: the receiver may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub(crate) async fn join(self) {
        let _ = self.join.await;
    }
}

async fn worker_loop(shared: Arc<LaneShared>, shutdown_rx: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // lease() waits for an admission, so race it against shutdown.
        let task = tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    // Sender dropped: the lane handle is gone.
                    break;
                }
                continue;
            }
            task = shared.lease() => task,
        };

        let id = task.id();
        debug!(%id, "presenting prompt");

        // The whole lifecycle runs inline: pre-delay, body, post-delay.
        let outcome = task.start().await;

        let hooks = task.take_completion_hooks();
        shared.finish().await;
        shared.deliver(hooks, outcome);

        debug!(%id, ?outcome, "prompt finished");
    }

    info!("prompt lane worker stopped");
}
