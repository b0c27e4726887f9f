use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use promptq_core::{Outcome, Priority, Prompt, PromptLane};

/// Pretend to show a prompt on screen for a moment, then report done.
fn fake_dialog(text: &'static str) -> impl FnOnce(promptq_core::CompletionSignal) + Send + 'static {
    move |signal| {
        println!("[screen] {text}");
        // Completion may arrive from any thread; use a plain OS thread here
        // to make that visible.
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(150));
            signal.done();
        });
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptq_core=debug".into()),
        )
        .init();

    // (A) One lane for the whole process, explicit lifecycle.
    let lane = PromptLane::spawn();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(&'static str, Outcome)>();

    // (B) A guaranteed prompt with delays around its visible work.
    let tx = done_tx.clone();
    let id = lane
        .enqueue(
            Prompt::new(fake_dialog("welcome aboard"))
                .with_pre_delay(Duration::from_millis(200))
                .with_post_delay(Duration::from_millis(100))
                .on_complete(move |outcome| tx.send(("welcome", outcome)).unwrap()),
        )
        .await
        .expect("lane is open");
    println!("enqueued welcome prompt: {id}");

    // (C) A high-priority prompt jumps ahead of anything still pending.
    let tx = done_tx.clone();
    lane.enqueue(
        Prompt::new(fake_dialog("update required"))
            .with_priority(Priority::High)
            .on_complete(move |outcome| tx.send(("update", outcome)).unwrap()),
    )
    .await
    .expect("lane is open");

    // (D) A conditional prompt: the predicate is checked at execution time.
    let already_rated = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&already_rated);
    let tx = done_tx.clone();
    lane.enqueue(
        Prompt::new(fake_dialog("enjoying the app? rate us"))
            .when(move || !flag.load(Ordering::SeqCst))
            .on_complete(move |outcome| tx.send(("rating", outcome)).unwrap()),
    )
    .await
    .expect("lane is open");

    // (E) Best-effort: only shown if nothing else is up right now.
    let tx = done_tx.clone();
    lane.present_if_idle(
        Prompt::new(fake_dialog("tip of the day"))
            .on_complete(move |outcome| tx.send(("tip", outcome)).unwrap()),
    )
    .await
    .expect("lane is open");

    // (F) An ignorable placeholder never runs but still reports back.
    let tx = done_tx.clone();
    lane.discard(
        Prompt::empty().on_complete(move |outcome| tx.send(("placeholder", outcome)).unwrap()),
    )
    .await
    .expect("lane is open");

    // (G) Collect every completion: one per dispatched prompt, always.
    for _ in 0..5 {
        let (name, outcome) = done_rx.recv().await.expect("completion");
        println!("completed: {name} -> {outcome:?}");
    }

    sleep(Duration::from_millis(50)).await;
    let counts = lane.counts().await;
    println!(
        "lane counts: {}",
        serde_json::to_string(&counts).expect("counts serialize")
    );

    // (H) Graceful shutdown: the worker stops once the lane drains.
    lane.shutdown_and_join().await;
}
