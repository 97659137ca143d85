//! The warp server: configuration, shared context and route wiring.

use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use warp::filters::BoxedFilter;
use warp::{Filter, Reply};

use crate::archive::{ArchiveError, HandArchive, JsonlArchive, MemoryArchive};
use crate::handlers;
use crate::static_handler::StaticHandler;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    static_dir: PathBuf,
    /// Directory of `{tournament}.jsonl` archives; `None` starts with an
    /// empty in-memory archive (used by tests).
    archive_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            static_dir: static_dir.into(),
            archive_dir: None,
        }
    }

    pub fn with_archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.archive_dir = Some(dir.into());
        self
    }

    pub fn for_tests() -> Self {
        let dir = std::env::temp_dir().join("railbird_web_static");
        Self::new("127.0.0.1", 0, dir)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn archive_dir(&self) -> Option<&Path> {
        self.archive_dir.as_deref()
    }
}

#[derive(Clone)]
pub struct AppContext {
    config: ServerConfig,
    archive: Arc<dyn HandArchive>,
    static_handler: Arc<StaticHandler>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if !config.static_dir().exists() {
            std::fs::create_dir_all(config.static_dir())
                .map_err(|err| ServerError::ConfigError(err.to_string()))?;
        }

        let archive: Arc<dyn HandArchive> = match config.archive_dir() {
            Some(dir) => Arc::new(JsonlArchive::open(dir)?),
            None => Arc::new(MemoryArchive::new()),
        };
        let static_handler = Arc::new(StaticHandler::new(config.static_dir().to_path_buf()));

        Ok(Self::new_with_dependencies(config, archive, static_handler))
    }

    pub fn new_with_dependencies(
        config: ServerConfig,
        archive: Arc<dyn HandArchive>,
        static_handler: Arc<StaticHandler>,
    ) -> Self {
        Self {
            config,
            archive,
            static_handler,
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests()).expect("test context")
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn archive(&self) -> Arc<dyn HandArchive> {
        Arc::clone(&self.archive)
    }

    pub fn static_handler(&self) -> Arc<StaticHandler> {
        Arc::clone(&self.static_handler)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("archive error: {0}")]
    ArchiveError(#[from] ArchiveError),
}

#[derive(Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        info!("spectator server listening on http://{}", addr);

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    pub fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let health = Self::health_route();
        let static_routes = Self::static_routes(context);
        let replay_routes = Self::replay_routes(context);

        health
            .or(replay_routes)
            .unify()
            .or(static_routes)
            .unify()
            .boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn static_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let handler = context.static_handler();

        let index = warp::path::end()
            .and(warp::get())
            .and(Self::with_static_handler(handler.clone()))
            .and_then(|handler: Arc<StaticHandler>| async move {
                let response = handler
                    .index()
                    .await
                    .unwrap_or_else(|err| handler.error_response(err));
                Ok::<_, Infallible>(response)
            });

        let assets = warp::path("static")
            .and(warp::path::tail())
            .and(warp::get())
            .and(Self::with_static_handler(handler))
            .and_then(
                |tail: warp::path::Tail, handler: Arc<StaticHandler>| async move {
                    let response = handler
                        .asset(tail.as_str())
                        .await
                        .unwrap_or_else(|err| handler.error_response(err));
                    Ok::<_, Infallible>(response)
                },
            );

        index.or(assets).unify().boxed()
    }

    fn replay_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let archive = context.archive();

        let step = warp::path!("api" / "replay" / String / u32 / u64 / usize)
            .and(warp::get())
            .and(Self::with_archive(archive.clone()))
            .and_then(
                |tournament: String,
                 table_no: u32,
                 hand_no: u64,
                 step: usize,
                 archive: Arc<dyn HandArchive>| async move {
                    let response =
                        handlers::show_step(archive, tournament, table_no, hand_no, step).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let latest = warp::path!("api" / "latest" / String)
            .and(warp::get())
            .and(Self::with_archive(archive.clone()))
            .and_then(
                |tournament: String, archive: Arc<dyn HandArchive>| async move {
                    let response = handlers::latest_games(archive, tournament).await;
                    Ok::<_, Infallible>(response)
                },
            );

        let latest_step = warp::path!("api" / "latest" / String / String / usize)
            .and(warp::get())
            .and(Self::with_archive(archive))
            .and_then(
                |tournament: String,
                 id: String,
                 step: usize,
                 archive: Arc<dyn HandArchive>| async move {
                    let response =
                        handlers::show_latest_step(archive, tournament, id, step).await;
                    Ok::<_, Infallible>(response)
                },
            );

        step.or(latest_step).unify().or(latest).unify().boxed()
    }

    fn with_static_handler(
        handler: Arc<StaticHandler>,
    ) -> impl Filter<Extract = (Arc<StaticHandler>,), Error = Infallible> + Clone {
        warp::any().map(move || handler.clone())
    }

    fn with_archive(
        archive: Arc<dyn HandArchive>,
    ) -> impl Filter<Extract = (Arc<dyn HandArchive>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&archive))
    }
}

pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
