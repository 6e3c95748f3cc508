use std::process::ExitCode;
use todo_api::config::{Config, DEFAULT_LOG_FILTER};
use todo_api::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let filter = config
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    config.log_summary();

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            server::report(&e);
            ExitCode::FAILURE
        }
    }
}
