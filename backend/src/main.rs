//! Backend entry-point: loads settings, prepares storage, and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use project_domains::inbound::http::health::HealthState;
use project_domains::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Translate loaded settings into a server configuration, running pending
/// migrations when a database is configured.
async fn server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io_error("settings", err))?;
    let mut config = ServerConfig::new(
        bind_addr,
        settings.provider_nameservers(),
        settings.domain_validator(),
        settings.poll_config(),
    );

    if let Some(registrar) = settings
        .registrar_config()
        .map_err(|err| io_error("settings", err))?
    {
        config = config.with_registrar(registrar);
    }

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| io_error("database migrations failed", err))?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|err| io_error("database pool", err))?;
        config = config.with_db_pool(pool);
    }

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io_error("failed to load settings", err))?;
    let config = server_config(&settings).await?;
    info!(bind_addr = %config.bind_addr, "starting project domains server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
