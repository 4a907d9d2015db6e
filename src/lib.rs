pub mod api; // HTTP API
pub mod auth; // Accounts, passwords, sessions
pub mod authorization;
pub mod clinic; // Validated CRUD services
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod options;
pub mod search; // Appointment filter composer
pub mod validation;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Failures that stop the service before or while it runs.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Startup error: {0}")]
    Core(#[from] core_state::CoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Cannot listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Start Klinika and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Klinika starting v{}", config::APP_VERSION);

    let config = config::ServerConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let core = Arc::new(core_state::CoreState::initialize(&config.db_path)?);
    if let Some(seed) = &config.admin {
        core.seed_admin(seed)?;
    }

    let mut server = api::start_server(core, config.bind).await?;
    tracing::info!(addr = %server.local_addr(), "Klinika ready");

    let signal = tokio::signal::ctrl_c().await;
    server.shutdown();
    server.wait().await;
    signal.map_err(StartupError::Signal)
}
