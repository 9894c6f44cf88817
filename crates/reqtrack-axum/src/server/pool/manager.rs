//! Worker pool that completes submitted requests in the background.
//!
//! [`WorkerPool`] owns one unbounded channel per worker and hands out
//! [`WorkRequest`]s round-robin. Channels are unbounded so a submission never
//! waits on workers; the registry has no queue-depth limit either.

use crate::server::error::{Error, Result};
use crate::server::pool::worker::WorkRequest;
use core::time::Duration;
use reqtrack::RequestId;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tokio::{
    sync::{mpsc, oneshot},
    time::{sleep, timeout},
};
use tokio_util::sync::CancellationToken;

/// Per-worker wait for a shutdown acknowledgement.
const SHUTDOWN_ACK_TIMEOUT: Duration = Duration::from_secs(3);

/// A cooperative pool of asynchronous completion workers.
pub struct WorkerPool {
    workers: Vec<mpsc::UnboundedSender<WorkRequest>>,
    next_worker: AtomicUsize,
    pending: Arc<AtomicUsize>,
    closing: AtomicBool,
    shutdown_token: CancellationToken,
    shutdown_timeout: Duration,
}

impl WorkerPool {
    /// Constructs a pool from initialized worker channels, the counter the
    /// workers decrement, and the token they watch.
    pub fn new(
        workers: Vec<mpsc::UnboundedSender<WorkRequest>>,
        pending: Arc<AtomicUsize>,
        shutdown_token: CancellationToken,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            workers,
            next_worker: AtomicUsize::new(0),
            pending,
            closing: AtomicBool::new(false),
            shutdown_token,
            shutdown_timeout,
        }
    }

    /// Returns the index of the next worker to receive work (round-robin).
    pub fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Returns `true` once [`Self::shutdown`] has started.
    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    /// Number of dispatched requests no worker has handled yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Queues a request for completion on the next worker.
    ///
    /// # Errors
    ///
    /// - [`Error::ServiceShutdown`] once shutdown has started.
    /// - [`Error::ChannelError`] if the worker has already stopped.
    pub fn dispatch(&self, id: RequestId) -> Result<()> {
        if self.is_closing() {
            return Err(Error::ServiceShutdown);
        }

        let worker_idx = self.next_worker_index();
        self.pending.fetch_add(1, Ordering::AcqRel);
        if self.workers[worker_idx]
            .send(WorkRequest::Complete { id })
            .is_err()
        {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(Error::ChannelError {
                context: format!("Worker {worker_idx} channel closed"),
            });
        }
        Ok(())
    }

    /// Gracefully shuts down all workers in the pool.
    ///
    /// 1. Refuses new work.
    /// 2. Lets queued work drain for up to `shutdown_timeout`.
    /// 3. Cancels the shared token so workers skip whatever is left.
    /// 4. Sends [`WorkRequest::Shutdown`] to each worker and waits for the
    ///    acknowledgements.
    pub async fn shutdown(&self) -> Result<()> {
        if self.closing.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        tracing::info!("Refusing new requests");

        tracing::info!("Draining queued work ({} pending)", self.pending());
        let drain_result = timeout(self.shutdown_timeout, async {
            while self.pending() > 0 {
                sleep(Duration::from_millis(50)).await;
            }
        })
        .await;

        match drain_result {
            Ok(()) => tracing::debug!("All queued work drained"),
            Err(_) => tracing::warn!(
                "Graceful drain timed out ({} requests left unfinished)",
                self.pending()
            ),
        }

        tracing::debug!("Cancelling remaining work via shutdown token");
        self.shutdown_token.cancel();

        tracing::debug!("Notifying all workers to shut down");
        let mut shutdown_handles = Vec::with_capacity(self.workers.len());
        for (i, worker) in self.workers.iter().enumerate() {
            let (tx, rx) = oneshot::channel();
            if let Err(e) = worker.send(WorkRequest::Shutdown { response: tx }) {
                tracing::error!("Failed to send shutdown to worker {i}: {e}");
            } else {
                shutdown_handles.push((i, rx));
            }
        }

        let acks = shutdown_handles.into_iter().map(|(i, rx)| async move {
            match timeout(SHUTDOWN_ACK_TIMEOUT, rx).await {
                Ok(Ok(())) => tracing::trace!("Worker {i} shutdown acknowledged"),
                Ok(Err(e)) => tracing::error!("Worker {i} returned error: {e}"),
                Err(_) => tracing::warn!("Worker {i} shutdown timed out"),
            }
        });
        futures::future::join_all(acks).await;

        tracing::info!("Worker pool shutdown complete");
        Ok(())
    }
}
