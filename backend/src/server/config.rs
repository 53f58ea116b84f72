//! Application settings and the server configuration built from them.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use project_domains::domain::{DomainValidator, ProviderNameservers, VerificationPollConfig};
use project_domains::outbound::persistence::DbPool;
use project_domains::outbound::registrar::RegistrarConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REGISTRAR_API_BASE: &str = "https://api.vercel.com";
const DEFAULT_REGISTRAR_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_PROVIDER_NAMESERVERS: [&str; 2] = ["ns1.vercel-dns.com", "ns2.vercel-dns.com"];
const DEFAULT_BASE_DOMAIN: &str = "myapp.dev";

/// Settings loaded from CLI flags, `PROJECT_DOMAINS_*` environment
/// variables, and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROJECT_DOMAINS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Postgres URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Registrar API root.
    pub registrar_api_base: Option<String>,
    /// Registrar bearer token; the fixture registrar is used when absent.
    pub registrar_token: Option<String>,
    /// Provider project that custom domains are attached to.
    pub registrar_project_id: Option<String>,
    pub registrar_team_id: Option<String>,
    pub registrar_timeout_ms: Option<u64>,
    /// Comma-separated provider nameservers.
    pub provider_nameservers: Option<String>,
    /// Base domain that project subdomains live under.
    pub base_domain: Option<String>,
    /// Comma-separated extra reserved domains.
    pub extra_reserved: Option<String>,
    pub poll_max_attempts: Option<u32>,
    pub poll_initial_backoff_ms: Option<u64>,
    pub poll_max_backoff_ms: Option<u64>,
}

/// Errors raised while turning settings into a server configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid registrar API base {value}: {message}")]
    RegistrarApiBase { value: String, message: String },
    #[error("registrar project id is required when a registrar token is set")]
    MissingRegistrarProject,
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

impl AppSettings {
    /// Parse the listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn base_domain(&self) -> &str {
        self.base_domain.as_deref().unwrap_or(DEFAULT_BASE_DOMAIN)
    }

    /// Provider nameservers, defaulting to the provider's published pair.
    pub fn provider_nameservers(&self) -> ProviderNameservers {
        match self.provider_nameservers.as_deref() {
            Some(raw) if !split_csv(raw).is_empty() => ProviderNameservers::new(split_csv(raw)),
            _ => ProviderNameservers::new(DEFAULT_PROVIDER_NAMESERVERS),
        }
    }

    /// Validator reserving the base domain, the default denylist, and any
    /// configured extras.
    pub fn domain_validator(&self) -> DomainValidator {
        let extra = self
            .extra_reserved
            .as_deref()
            .map(split_csv)
            .unwrap_or_default();
        DomainValidator::new(self.base_domain(), extra)
    }

    pub fn poll_config(&self) -> VerificationPollConfig {
        let defaults = VerificationPollConfig::default();
        VerificationPollConfig {
            max_attempts: self.poll_max_attempts.unwrap_or(defaults.max_attempts),
            initial_backoff: self
                .poll_initial_backoff_ms
                .map_or(defaults.initial_backoff, Duration::from_millis),
            max_backoff: self
                .poll_max_backoff_ms
                .map_or(defaults.max_backoff, Duration::from_millis),
        }
    }

    /// Registrar client configuration, or `None` when no token is set.
    pub fn registrar_config(&self) -> Result<Option<RegistrarConfig>, SettingsError> {
        let Some(token) = self.registrar_token.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let project_id = self
            .registrar_project_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(SettingsError::MissingRegistrarProject)?;
        let base = self
            .registrar_api_base
            .as_deref()
            .unwrap_or(DEFAULT_REGISTRAR_API_BASE);
        let api_base = Url::parse(base).map_err(|err| SettingsError::RegistrarApiBase {
            value: base.to_owned(),
            message: err.to_string(),
        })?;
        Ok(Some(RegistrarConfig {
            api_base,
            token: Zeroizing::new(token.to_owned()),
            project_id,
            team_id: self.registrar_team_id.clone(),
            timeout: Duration::from_millis(
                self.registrar_timeout_ms
                    .unwrap_or(DEFAULT_REGISTRAR_TIMEOUT_MS),
            ),
        }))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) registrar: Option<RegistrarConfig>,
    pub(crate) nameservers: ProviderNameservers,
    pub(crate) validator: DomainValidator,
    pub(crate) poll: VerificationPollConfig,
}

impl ServerConfig {
    /// Construct a server configuration with in-memory storage and the
    /// fixture registrar.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        nameservers: ProviderNameservers,
        validator: DomainValidator,
        poll: VerificationPollConfig,
    ) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            registrar: None,
            nameservers,
            validator,
            poll,
        }
    }

    /// Attach a database connection pool for the Diesel project store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use the HTTP registrar adapter instead of the fixture.
    #[must_use]
    pub fn with_registrar(mut self, registrar: RegistrarConfig) -> Self {
        self.registrar = Some(registrar);
        self
    }
}
