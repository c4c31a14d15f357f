//! Background task execution
//!
//! Work submitted here runs after the caller's response has been finalized.
//! Submission never blocks the response path; a failing task is counted,
//! logged, and swallowed, because by the time it runs there is no caller
//! left to report to. Shutdown drains every task already in the queue.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::{IrisError, Result};

/// Queue of deferred tasks with a dedicated worker
#[derive(Debug)]
pub struct TaskQueue<T> {
    tx: Mutex<Option<mpsc::UnboundedSender<T>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    processed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl<T: Send + 'static> TaskQueue<T> {
    /// Spawn the worker with the given task handler.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(handler: F) -> Self
    where
        F: Fn(T) -> Result<()> + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let processed = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        let worker_processed = Arc::clone(&processed);
        let worker_failed = Arc::clone(&failed);
        let worker = tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                match handler(task) {
                    Ok(()) => {
                        worker_processed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        // The response is already gone; record once and move on
                        worker_failed.fetch_add(1, Ordering::Relaxed);
                        error!(error = %e, "Background task failed");
                    }
                }
            }
            debug!("Background worker drained");
        });

        Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
            processed,
            failed,
        }
    }

    /// Register work to run after the current operation completes.
    /// Fails only when the queue has already been shut down.
    pub fn submit(&self, task: T) -> Result<()> {
        let tx = self.tx.lock();
        match tx.as_ref() {
            Some(tx) => tx
                .send(task)
                .map_err(|_| IrisError::BackgroundTask("worker is gone".to_string())),
            None => Err(IrisError::BackgroundTask("queue is shut down".to_string())),
        }
    }

    /// Close the queue and wait for the worker to drain in-flight tasks.
    pub async fn shutdown(&self) {
        // Dropping the sender ends the worker's recv loop after the queue
        // is empty; tasks already submitted are never cancelled.
        self.tx.lock().take();
        let worker = self.worker.lock().take();
        if let Some(handle) = worker {
            let _ = handle.await;
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tasks_drain_on_shutdown() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_handler = Arc::clone(&seen);
        let queue = TaskQueue::spawn(move |n: u64| {
            seen_in_handler.fetch_add(n, Ordering::Relaxed);
            Ok(())
        });

        for i in 1..=5 {
            queue.submit(i).unwrap();
        }
        queue.shutdown().await;

        assert_eq!(seen.load(Ordering::Relaxed), 15);
        assert_eq!(queue.processed(), 5);
        assert_eq!(queue.failed(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_counted_once() {
        let queue = TaskQueue::spawn(|n: u64| {
            if n == 2 {
                Err(IrisError::BackgroundTask("logging broke".to_string()))
            } else {
                Ok(())
            }
        });

        // Submission succeeds regardless of what the handler will do
        queue.submit(1).unwrap();
        queue.submit(2).unwrap();
        queue.submit(3).unwrap();
        queue.shutdown().await;

        assert_eq!(queue.processed(), 2);
        assert_eq!(queue.failed(), 1);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_fails() {
        let queue = TaskQueue::spawn(|_: u64| Ok(()));
        queue.shutdown().await;

        let err = queue.submit(1).unwrap_err();
        assert!(matches!(err, IrisError::BackgroundTask(_)));
    }
}
