use crate::server::config::AppRegistry;
use core::time::Duration;
use reqtrack::RequestId;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::{
    sync::{mpsc, oneshot},
    time::sleep,
};
use tokio_util::sync::CancellationToken;

/// Messages accepted by a completion worker.
#[derive(Debug)]
pub enum WorkRequest {
    /// Perform the (simulated) work for a request, then complete it.
    Complete { id: RequestId },
    /// Stop the worker and acknowledge on `response`.
    Shutdown { response: oneshot::Sender<()> },
}

/// Everything a worker task needs besides its inbox.
pub struct WorkerContext {
    pub registry: Arc<AppRegistry>,
    pub work_delay: Duration,
    /// Queued `Complete` messages not yet handled by any worker.
    pub pending: Arc<AtomicUsize>,
    pub shutdown_token: CancellationToken,
}

/// Worker task responsible for processing [`WorkRequest`] messages.
///
/// For every [`WorkRequest::Complete`] the worker waits `work_delay`, then
/// marks the request finished in the shared registry. Once the shutdown token
/// is cancelled, remaining work is skipped and those requests stay `New`.
///
/// Runs until it receives [`WorkRequest::Shutdown`] or its channel closes.
pub async fn worker_loop(
    worker_id: usize,
    mut rx: mpsc::UnboundedReceiver<WorkRequest>,
    ctx: WorkerContext,
) {
    tracing::trace!("Worker {worker_id} started");

    while let Some(work) = rx.recv().await {
        match work {
            WorkRequest::Complete { id } => {
                let cancelled = tokio::select! {
                    biased;
                    () = ctx.shutdown_token.cancelled() => true,
                    () = sleep(ctx.work_delay) => false,
                };

                if cancelled {
                    tracing::debug!(worker_id, %id, "Shutdown in progress, leaving request unfinished");
                } else {
                    ctx.registry.complete(id.as_str());
                    tracing::debug!(worker_id, %id, "Request finished");
                }
                ctx.pending.fetch_sub(1, Ordering::AcqRel);
            }
            WorkRequest::Shutdown { response } => {
                tracing::debug!("Worker {worker_id} received shutdown signal");

                if response.send(()).is_err() {
                    tracing::error!("Worker {worker_id} failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    tracing::trace!("Worker {worker_id} stopped");
}
