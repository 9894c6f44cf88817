//! HTTP service over the request registry.
//!
//! [`AppService`] owns the shared registry and the completion worker pool.
//! [`router`] wires it to axum handlers:
//!
//! - submissions go through the registry, then to the pool when
//!   auto-completion is on
//! - queries and manual completions go straight to the registry, whose lock
//!   is held only for the map operation itself

use crate::server::{
    config::{AppRegistry, ServerConfig},
    error::{Error, Result},
    pool::{
        manager::WorkerPool,
        worker::{WorkerContext, worker_loop},
    },
};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use reqtrack::{RequestId, RequestState};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, atomic::AtomicUsize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppService {
    registry: Arc<AppRegistry>,
    worker_pool: Arc<WorkerPool>,
    auto_complete: bool,
}

impl AppService {
    /// Builds the registry and spawns one completion worker per configured
    /// slot. Must be called from within a Tokio runtime.
    pub fn new(config: &ServerConfig) -> Self {
        let registry = Arc::new(config.build_registry());
        let pending = Arc::new(AtomicUsize::new(0));
        let shutdown_token = CancellationToken::new();

        let mut workers = Vec::with_capacity(config.num_workers);
        for worker_id in 0..config.num_workers {
            let (tx, rx) = mpsc::unbounded_channel();
            workers.push(tx);

            let ctx = WorkerContext {
                registry: Arc::clone(&registry),
                work_delay: config.work_delay,
                pending: Arc::clone(&pending),
                shutdown_token: shutdown_token.clone(),
            };
            tokio::spawn(worker_loop(worker_id, rx, ctx));
        }

        let worker_pool = WorkerPool::new(
            workers,
            pending,
            shutdown_token,
            config.shutdown_timeout,
        );

        Self {
            registry,
            worker_pool: Arc::new(worker_pool),
            auto_complete: config.auto_complete,
        }
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    /// Returns `false` once shutdown has started.
    pub fn is_serving(&self) -> bool {
        !self.worker_pool.is_closing()
    }

    /// Registers a new request and, with auto-completion on, queues it for a
    /// worker.
    ///
    /// # Errors
    /// - [`Error::ServiceShutdown`] once shutdown has started
    /// - [`Error::Registry`] if no free identifier was found
    /// - [`Error::ChannelError`] if the chosen worker has stopped
    ///
    /// A request that registered but could not be dispatched is removed
    /// again, so a failed submission never leaves an entry behind.
    pub fn submit(&self, payload: i64) -> Result<RequestId> {
        if !self.is_serving() {
            return Err(Error::ServiceShutdown);
        }
        let id = self.registry.try_submit(payload)?;
        if self.auto_complete {
            if let Err(e) = self.worker_pool.dispatch(id.clone()) {
                tracing::debug!(%id, "Dispatch failed, withdrawing request: {e}");
                self.registry.try_remove(id.as_str())?;
                return Err(e);
            }
        }
        Ok(id)
    }

    /// Stops accepting submissions and shuts the worker pool down.
    pub async fn shutdown(&self) -> Result<()> {
        self.worker_pool.shutdown().await
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub payload: i64,
}

/// JSON view of a registry entry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestView {
    pub id: RequestId,
    pub state: RequestState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<i64>,
}

impl RequestView {
    fn new(id: RequestId, state: RequestState) -> Self {
        Self {
            id,
            state,
            payload: None,
        }
    }
}

/// Builds the HTTP routes for `service`.
pub fn router(service: AppService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/requests", post(submit))
        .route("/requests/{id}", get(query))
        .route("/requests/{id}/detail", get(detail))
        .route("/requests/{id}/complete", post(complete))
        .with_state(service)
}

async fn health(State(service): State<AppService>) -> (StatusCode, &'static str) {
    if service.is_serving() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "shutting down")
    }
}

#[tracing::instrument(skip_all)]
async fn submit(
    State(service): State<AppService>,
    body: core::result::Result<Json<SubmitBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RequestView>)> {
    let Json(body) = body.map_err(|rejection| Error::InvalidRequest {
        reason: rejection.body_text(),
    })?;

    let id = service.submit(body.payload)?;
    tracing::debug!(%id, payload = body.payload, "Request submitted");
    Ok((
        StatusCode::CREATED,
        Json(RequestView::new(id, RequestState::New)),
    ))
}

async fn query(
    State(service): State<AppService>,
    Path(id): Path<String>,
) -> Result<Json<RequestView>> {
    let state = service.registry().try_query(&id)?;
    Ok(Json(RequestView::new(RequestId::from(id), state)))
}

async fn detail(
    State(service): State<AppService>,
    Path(id): Path<String>,
) -> Result<Json<RequestView>> {
    let Some(request) = service.registry().try_get(&id)? else {
        return Err(Error::NotFound { id });
    };
    Ok(Json(RequestView {
        id: RequestId::from(id),
        state: request.state(),
        payload: Some(*request.payload()),
    }))
}

#[tracing::instrument(skip_all)]
async fn complete(
    State(service): State<AppService>,
    Path(id): Path<String>,
) -> Result<Json<RequestView>> {
    let registry = service.registry();
    registry.try_complete(&id)?;
    let state = registry.try_query(&id)?;
    Ok(Json(RequestView::new(RequestId::from(id), state)))
}
