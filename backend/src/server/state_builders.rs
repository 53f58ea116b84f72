//! Builders wiring adapters and domain services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use project_domains::domain::ports::{
    DomainRegistrar, FixtureDomainRegistrar, NameserverResolver, ProjectRepository, TokioSleeper,
    VerificationSleeper,
};
use project_domains::domain::{
    DomainWorkflowService, ProjectService, RegistrarService, VerificationPoller,
};
use project_domains::inbound::http::state::HttpState;
use project_domains::outbound::dns::SystemNameserverResolver;
use project_domains::outbound::persistence::{DieselProjectRepository, InMemoryProjectRepository};
use project_domains::outbound::registrar::RegistrarHttpClient;

use super::ServerConfig;

/// Select the project store: Diesel when a pool is configured, otherwise the
/// in-memory repository.
fn build_repository(config: &ServerConfig) -> Arc<dyn ProjectRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselProjectRepository::new(pool.clone())),
        None => {
            warn!("no database configured; projects are kept in memory");
            Arc::new(InMemoryProjectRepository::default())
        }
    }
}

/// Select the registrar: the HTTP client when configured, otherwise the
/// fixture that accepts every request.
///
/// # Errors
/// Returns [`std::io::Error`] when the HTTP client cannot be built.
fn build_registrar(config: &ServerConfig) -> std::io::Result<Arc<dyn DomainRegistrar>> {
    match &config.registrar {
        Some(registrar) => {
            info!(registrar = ?registrar, "using HTTP registrar");
            let client = RegistrarHttpClient::new(registrar.clone())
                .map_err(|err| std::io::Error::other(format!("registrar client: {err}")))?;
            Ok(Arc::new(client))
        }
        None => {
            warn!("no registrar token configured; using fixture registrar");
            Ok(Arc::new(FixtureDomainRegistrar))
        }
    }
}

/// Assemble domain services over the given adapters.
pub(crate) fn build_http_state_with(
    config: &ServerConfig,
    repository: Arc<dyn ProjectRepository>,
    registrar: Arc<dyn DomainRegistrar>,
    resolver: Arc<dyn NameserverResolver>,
    sleeper: Arc<dyn VerificationSleeper>,
) -> web::Data<HttpState> {
    let registrar = RegistrarService::new(registrar, resolver, config.nameservers.clone());
    let poller = VerificationPoller::new(
        repository.clone(),
        registrar.clone(),
        sleeper,
        config.poll,
    );
    let workflow = DomainWorkflowService::new(
        repository.clone(),
        registrar,
        Arc::new(config.validator.clone()),
        poller,
    );
    let projects = ProjectService::new(repository, Arc::new(DefaultClock));
    web::Data::new(HttpState::new(Arc::new(workflow), Arc::new(projects)))
}

/// Build HTTP state from configuration using production adapters.
///
/// # Errors
/// Returns [`std::io::Error`] when an adapter cannot be constructed.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let repository = build_repository(config);
    let registrar = build_registrar(config)?;
    Ok(build_http_state_with(
        config,
        repository,
        registrar,
        Arc::new(SystemNameserverResolver::new()),
        Arc::new(TokioSleeper),
    ))
}
