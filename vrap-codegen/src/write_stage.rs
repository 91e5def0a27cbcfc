//! Bounded-parallel write stage.
//!
//! A fixed pool of workers pulls files from a shared bounded queue and
//! writes them one at a time, so at most `workers` writes are in flight.
//! Every write runs in its own task: an error or a panic is confined to
//! that file and recorded.

use std::{any::Any, sync::Arc};

use tokio::{
    sync::{Mutex, mpsc},
    task::{JoinError, JoinSet},
};
use tracing::{debug, error};
use vrap_core::{DataSink, TemplateFile};

use crate::report::UnitFailure;

/// What the write stage did.
#[derive(Debug, Default)]
pub(crate) struct WriteOutcome {
    pub attempted: usize,
    pub written: usize,
    pub failures: Vec<UnitFailure>,
}

impl WriteOutcome {
    fn merge(&mut self, other: WriteOutcome) {
        self.attempted += other.attempted;
        self.written += other.written;
        self.failures.extend(other.failures);
    }
}

/// Write every file received on `queue` until it is closed and drained.
///
/// Returns only after every received file had exactly one write attempt.
pub(crate) async fn run(
    sink: Arc<dyn DataSink>,
    queue: mpsc::Receiver<TemplateFile>,
    workers: usize,
) -> WriteOutcome {
    let queue = Arc::new(Mutex::new(queue));
    let mut pool = JoinSet::new();
    for _ in 0..workers.max(1) {
        pool.spawn(worker(Arc::clone(&queue), Arc::clone(&sink)));
    }

    let mut outcome = WriteOutcome::default();
    while let Some(result) = pool.join_next().await {
        match result {
            Ok(worker_outcome) => outcome.merge(worker_outcome),
            Err(e) => error!(error = %e, "write worker stopped unexpectedly"),
        }
    }
    outcome
}

async fn worker(
    queue: Arc<Mutex<mpsc::Receiver<TemplateFile>>>,
    sink: Arc<dyn DataSink>,
) -> WriteOutcome {
    let mut outcome = WriteOutcome::default();
    loop {
        let next = queue.lock().await.recv().await;
        let Some(file) = next else { break };

        outcome.attempted += 1;
        let path = file.relative_path().to_string();
        let sink = Arc::clone(&sink);
        let write = tokio::spawn(async move { sink.write(&file).await });

        match write.await {
            Ok(Ok(())) => {
                debug!(path = %path, "file written");
                outcome.written += 1;
            }
            Ok(Err(e)) => {
                error!(path = %path, error = ?e, "Error occurred while generating file");
                outcome
                    .failures
                    .push(UnitFailure::write(path, format!("{:#}", e)));
            }
            Err(e) => {
                let message = join_error_message(e);
                error!(path = %path, error = %message, "write task failed");
                outcome.failures.push(UnitFailure::write(path, message));
            }
        }
    }
    outcome
}

fn join_error_message(error: JoinError) -> String {
    if error.is_panic() {
        format!("write panicked: {}", panic_message(error.into_panic()))
    } else {
        error.to_string()
    }
}

/// Extract the message of a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
