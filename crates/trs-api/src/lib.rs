//! ---
//! trs_section: "05-networking-external-interfaces"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "REST surface exposing the thermal risk core."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use std::fmt;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, get_service, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use trs_core::{simulate, HallGenerator, HallSnapshot, SimulationResult, StateStore};

/// Shared API state exposed to handlers.
///
/// Owns the single-slot snapshot store and the generator that feeds it. The
/// generator sits behind a mutex because refresh advances its RNG; the store
/// handles its own synchronisation.
pub struct ApiState {
    store: StateStore,
    generator: Mutex<HallGenerator>,
    start: Instant,
    version: &'static str,
}

impl ApiState {
    /// Bootstrap the state with an initial snapshot drawn from `generator`.
    pub fn new(mut generator: HallGenerator) -> Self {
        let initial = generator.generate();
        info!(
            site = %initial.site(),
            racks = initial.racks().len(),
            fragile_or_critical = initial.fragile_or_critical_count(),
            "initial hall snapshot generated"
        );
        Self {
            store: StateStore::new(initial),
            generator: Mutex::new(generator),
            start: Instant::now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    fn current(&self) -> Arc<HallSnapshot> {
        self.store.snapshot()
    }

    fn refresh(&self) -> Arc<HallSnapshot> {
        let next = self.generator.lock().generate();
        let snapshot = self.store.replace(next);
        info!(
            site = %snapshot.site(),
            overall_headroom = %snapshot.overall_headroom(),
            fragile_or_critical = snapshot.fragile_or_critical_count(),
            "hall snapshot refreshed"
        );
        snapshot
    }

    fn status(&self) -> StatusResponse {
        let snapshot = self.current();
        StatusResponse {
            version: self.version.to_owned(),
            uptime_seconds: self.start.elapsed().as_secs(),
            site: snapshot.site().to_owned(),
            rack_count: snapshot.racks().len(),
            current_setpoint: snapshot.current_setpoint(),
        }
    }
}

impl fmt::Debug for ApiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiState")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Handle to the running API server.
#[derive(Debug)]
pub struct ApiServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl ApiServer {
    /// The bound address; useful when listening on an ephemeral port.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(err.into()),
        }
    }
}

/// Spawn the REST API with optional static asset hosting.
pub fn spawn_api_server(
    state: Arc<ApiState>,
    addr: SocketAddr,
    static_dir: Option<PathBuf>,
) -> Result<ApiServer> {
    let api_routes = Router::new()
        .route("/api/state", get(get_state))
        .route("/api/refresh", post(post_refresh))
        .route("/api/simulate", post(post_simulate))
        .route("/api/status", get(get_status))
        .with_state(state);

    let router = if let Some(dir) = static_dir {
        let service = get_service(ServeDir::new(dir).append_index_html_on_directories(true));
        Router::new()
            .merge(api_routes)
            .fallback_service(service)
            .layer(TraceLayer::new_for_http())
    } else {
        api_routes.layer(TraceLayer::new_for_http())
    };

    let listener = StdTcpListener::bind(addr)
        .with_context(|| format!("failed to bind API listener {addr}"))?;
    listener
        .set_nonblocking(true)
        .context("failed to configure API listener as non-blocking")?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound API address")?;
    let tcp_listener =
        TcpListener::from_std(listener).context("failed to create tokio listener")?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle: JoinHandle<Result<()>> = tokio::spawn(async move {
        info!(address = %local_addr, "api server listening");
        if let Err(err) = axum::serve(tcp_listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
        {
            error!(address = %local_addr, error = %err, "api server exited with error");
            return Err(err.into());
        }
        Ok(())
    });

    Ok(ApiServer {
        addr: local_addr,
        shutdown: Some(shutdown_tx),
        task: handle,
    })
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    version: String,
    uptime_seconds: u64,
    site: String,
    rack_count: usize,
    current_setpoint: f64,
}

/// Simulate request body. A missing `delta` field defaults to a no-op
/// projection; a non-numeric `delta` is rejected by deserialization before
/// the core is invoked.
#[derive(Debug, Deserialize)]
struct SimulateRequest {
    #[serde(default)]
    delta: Option<f64>,
}

async fn get_state(State(state): State<Arc<ApiState>>) -> Json<HallSnapshot> {
    Json(state.current().as_ref().clone())
}

async fn post_refresh(State(state): State<Arc<ApiState>>) -> Json<HallSnapshot> {
    Json(state.refresh().as_ref().clone())
}

async fn post_simulate(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SimulateRequest>,
) -> Json<SimulationResult> {
    let delta = request.delta.unwrap_or(0.0);
    debug!(delta, "setpoint simulation requested");
    Json(simulate(&state.current(), delta))
}

async fn get_status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    Json(state.status())
}
