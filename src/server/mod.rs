//! Bootstrap: database connection, router assembly, and the listener.

mod diagnose;

pub use diagnose::ConnectFailure;

use crate::config::Config;
use crate::routes::{common_routes, todo_routes};
use crate::state::AppState;
use crate::store::{ensure_database_exists, ensure_todo_table, PgTodoStore};
use axum::Router;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(#[source] sqlx::Error),
    #[error("bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("serve: {0}")]
    Serve(#[source] io::Error),
}

/// Full router: liveness at `/`, CRUD under `/api/todos`, permissive CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .nest("/api/todos", todo_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Open the pool and prove it works by establishing the first connection.
pub async fn connect(config: &Config, options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.server_selection_timeout)
        .connect_with(options)
        .await
}

/// Connect, prepare the schema, and serve until the listener fails.
/// Returns only on error; no traffic is accepted without a working database.
pub async fn run(config: Config) -> Result<(), StartupError> {
    let options = config.connect_options().map_err(StartupError::Database)?;
    if config.auto_create_database {
        prepare_database(&config, &options).await;
    }
    let pool = connect(&config, options).await.map_err(StartupError::Database)?;
    tracing::info!("database connection established");
    ensure_todo_table(&pool).await.map_err(StartupError::Database)?;

    let state = AppState::new(Arc::new(PgTodoStore::new(pool)));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app(state))
        .await
        .map_err(StartupError::Serve)
}

/// Best effort; the real connection attempt reports anything that matters.
async fn prepare_database(config: &Config, options: &PgConnectOptions) {
    match tokio::time::timeout(
        config.server_selection_timeout,
        ensure_database_exists(options),
    )
    .await
    {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "could not ensure database exists"),
        Err(_) => tracing::warn!("timed out ensuring database exists"),
    }
}

/// Log a startup failure with its cause and a remediation hint.
pub fn report(err: &StartupError) {
    match err {
        StartupError::Database(e) => {
            let failure = ConnectFailure::classify(e);
            tracing::error!(error = %e, cause = %failure, "database connection failed");
            tracing::error!("hint: {}", failure.hint());
            tracing::error!("refusing to start without a database connection");
        }
        StartupError::Bind { addr, source } if source.kind() == io::ErrorKind::AddrInUse => {
            tracing::error!(%addr, "port {} is already in use", addr.port());
            tracing::error!(
                "hint: stop the process using port {} or set PORT to a free port",
                addr.port()
            );
        }
        StartupError::Bind { addr, source } => {
            tracing::error!(%addr, error = %source, "failed to bind listener");
        }
        StartupError::Serve(e) => tracing::error!(error = %e, "server stopped"),
    }
}
