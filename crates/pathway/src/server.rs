// File: src/server.rs
// Purpose: Server lifecycle (build -> patch -> listen)

use axum::extract::Request;
use axum::response::Response;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing::{error, info};

use crate::builder::RouteBuilder;
use crate::config::ServerConfig;
use crate::engine::{AxumEngine, RoutingEngine};
use crate::error::PathwayError;
use crate::handler::{RouteHandler, RouteTable};
use crate::live_reload::{LiveReload, LIVE_RELOAD_PATH};
use crate::loader::ModuleLoader;
use crate::patcher::{patch, PatchReport};

/// Where a [`Server`] is in its start sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Routed,
    Patched,
    Listening,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Routed => "routed",
            Self::Patched => "patched",
            Self::Listening => "listening",
        })
    }
}

/// What [`Server::prepare`] did
#[derive(Debug)]
pub struct StartupReport {
    /// Entries discovered and turned into routes
    pub checked: usize,
    pub build_elapsed: Duration,
    pub patch: PatchReport,
    /// Token served by the live-reload endpoint, when enabled
    pub live_reload_token: Option<i64>,
}

/// File-system routed HTTP server
///
/// ```no_run
/// use pathway::{ModuleRegistry, Server, ServerConfig};
///
/// # async fn run() -> Result<(), pathway::PathwayError> {
/// let registry = ModuleRegistry::new("routes");
/// let mut server = Server::new(ServerConfig::new("routes", 3000), registry);
/// server.fire().await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    config: ServerConfig,
    loader: Arc<dyn ModuleLoader>,
    engine: AxumEngine,
    live_reload: LiveReload,
    routes: RouteTable,
    state: LifecycleState,
    launched: bool,
}

impl Server {
    pub fn new(config: ServerConfig, loader: impl ModuleLoader + 'static) -> Self {
        Self {
            config,
            loader: Arc::new(loader),
            engine: AxumEngine::new(),
            live_reload: LiveReload::new(),
            routes: RouteTable::default(),
            state: LifecycleState::Created,
            launched: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn live_reload(&self) -> &LiveReload {
        &self.live_reload
    }

    /// Routes found by the last build, in build order
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The patched router
    pub fn router(&self) -> Router {
        self.engine.router()
    }

    /// Run everything up to listening: live reload, `on_launch`, build, patch
    ///
    /// Routes are staged on a fresh engine that replaces the served one only
    /// once the build succeeds. Build errors are fatal and leave the server in
    /// `Created`, ready for another attempt. `on_launch` runs at most once.
    /// Individual route registration failures are only reported.
    pub async fn prepare(&mut self) -> Result<StartupReport, PathwayError> {
        if self.state != LifecycleState::Created {
            return Err(PathwayError::AlreadyStarted(self.state));
        }

        let mut engine = AxumEngine::new();
        let live_reload_token = if self.config.live_reload_enabled() {
            let token = self.live_reload.arm();
            engine.all(LIVE_RELOAD_PATH, RouteHandler::Normal(self.live_reload.endpoint()))?;
            info!(token, "Live reload enabled");
            Some(token)
        } else {
            None
        };

        if !self.launched {
            if let Some(hook) = self.config.launch_hook() {
                hook();
            }
            self.launched = true;
        }

        let build = RouteBuilder::new(self.config.base_path(), Arc::clone(&self.loader))
            .translator(self.config.translator_config().clone())
            .on_init(self.config.init_hook())
            .server_name(self.config.name())
            .build()
            .await?;
        self.routes = build.routes;
        self.state = LifecycleState::Routed;

        let patch = patch(&mut engine, &self.routes);
        self.engine = engine;
        self.state = LifecycleState::Patched;

        Ok(StartupReport {
            checked: build.checked,
            build_elapsed: build.elapsed,
            patch,
            live_reload_token,
        })
    }

    /// Prepare, bind the configured address and serve until Ctrl-C
    pub async fn fire(&mut self) -> Result<(), PathwayError> {
        if self.state == LifecycleState::Created {
            self.prepare().await?;
        }

        let addr = self.config.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| PathwayError::Bind { addr, source })?;
        self.fire_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until Ctrl-C
    pub async fn fire_on(&mut self, listener: TcpListener) -> Result<(), PathwayError> {
        self.fire_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves
    pub async fn fire_with_shutdown<F>(
        &mut self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), PathwayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.state {
            LifecycleState::Created => {
                self.prepare().await?;
            }
            LifecycleState::Listening => return Err(PathwayError::AlreadyStarted(self.state)),
            LifecycleState::Routed | LifecycleState::Patched => {}
        }

        if let Ok(addr) = listener.local_addr() {
            info!(address = %addr, "Server listening");
        }
        self.state = LifecycleState::Listening;

        axum::serve(listener, self.engine.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(PathwayError::Serve)
    }

    /// Dispatch a request through the patched router without a socket
    pub async fn request(&self, request: Request) -> Response {
        match self.engine.router().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        }
    }
}

/// Wait for Ctrl-C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server..."),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ModuleRegistry;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn server_at(base: &Path) -> Server {
        Server::new(ServerConfig::new(base, 0), ModuleRegistry::new(base))
    }

    #[tokio::test]
    async fn test_prepare_walks_states() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("robots.txt"), "").unwrap();

        let mut server = server_at(dir.path());
        assert_eq!(server.state(), LifecycleState::Created);

        let report = server.prepare().await.unwrap();
        assert_eq!(server.state(), LifecycleState::Patched);
        assert_eq!(report.checked, 1);
        assert_eq!(report.live_reload_token, None);
    }

    #[tokio::test]
    async fn test_prepare_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server_at(dir.path());
        server.prepare().await.unwrap();

        assert!(matches!(
            server.prepare().await,
            Err(PathwayError::AlreadyStarted(LifecycleState::Patched))
        ));
    }

    #[tokio::test]
    async fn test_build_failure_stays_created() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut server = server_at(&missing);

        assert!(matches!(server.prepare().await, Err(PathwayError::BaseNotFound(_))));
        assert_eq!(server.state(), LifecycleState::Created);
    }

    #[tokio::test]
    async fn test_failed_prepare_can_be_retried_with_live_reload() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("routes");
        let launches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&launches);
        let config = ServerConfig::new(&base, 0)
            .live_reload(true)
            .on_launch(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let mut server = Server::new(config, ModuleRegistry::new(&base));

        assert!(matches!(server.prepare().await, Err(PathwayError::BaseNotFound(_))));
        assert_eq!(server.state(), LifecycleState::Created);

        std::fs::create_dir(&base).unwrap();
        std::fs::write(base.join("robots.txt"), "").unwrap();
        let report = server.prepare().await.unwrap();

        assert_eq!(server.state(), LifecycleState::Patched);
        assert!(report.patch.failed.is_empty());
        assert_eq!(report.live_reload_token, server.live_reload().token());
        assert_eq!(launches.load(Ordering::SeqCst), 1);

        let request = Request::builder()
            .uri(LIVE_RELOAD_PATH)
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(server.request(request).await.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_listening_after_fire() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = server_at(dir.path());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        server.fire_with_shutdown(listener, async {}).await.unwrap();
        assert_eq!(server.state(), LifecycleState::Listening);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        assert!(matches!(
            server.fire_with_shutdown(listener, async {}).await,
            Err(PathwayError::AlreadyStarted(LifecycleState::Listening))
        ));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::Listening.to_string(), "listening");
    }
}
