//! Reqwest-backed registrar adapter.
//!
//! This adapter owns transport details only: URL construction, bearer
//! authentication, status mapping, and JSON decoding into domain types.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    AddDomainBody, DomainConfigDto, DomainListDto, ErrorEnvelopeDto, ProjectDomainDto,
};
use crate::domain::DomainName;
use crate::domain::ports::{DomainConfig, DomainRegistrar, DomainRegistrarError, RegisteredDomain};

/// Explicit registrar configuration handed to [`RegistrarHttpClient::new`].
#[derive(Clone)]
pub struct RegistrarConfig {
    /// API root, e.g. `https://api.vercel.com`.
    pub api_base: Url,
    /// Bearer token.
    pub token: Zeroizing<String>,
    /// Provider project the domains are attached to.
    pub project_id: String,
    /// Team scope, sent as the `teamId` query parameter.
    pub team_id: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for RegistrarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrarConfig")
            .field("api_base", &self.api_base.as_str())
            .field("token", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("team_id", &self.team_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Errors raised while building the client.
#[derive(Debug, thiserror::Error)]
pub enum RegistrarClientBuildError {
    #[error("registrar API base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),
    #[error("registrar HTTP client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}

/// Registrar adapter speaking the provider's versioned REST API.
pub struct RegistrarHttpClient {
    client: Client,
    config: RegistrarConfig,
}

impl RegistrarHttpClient {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot be extended with path segments or the
    /// reqwest client cannot be constructed.
    pub fn new(config: RegistrarConfig) -> Result<Self, RegistrarClientBuildError> {
        if config.api_base.cannot_be_a_base() {
            return Err(RegistrarClientBuildError::InvalidBaseUrl(
                config.api_base.to_string(),
            ));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainRegistrarError> {
        let mut url = self.config.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| DomainRegistrarError::transport("registrar base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        if let Some(team_id) = self.config.team_id.as_deref() {
            url.query_pairs_mut().append_pair("teamId", team_id);
        }
        Ok(url)
    }

    fn project_domain(
        &self,
        version: &str,
        name: &DomainName,
    ) -> Result<Url, DomainRegistrarError> {
        self.endpoint(&[
            version,
            "projects",
            self.config.project_id.as_str(),
            "domains",
            name.as_str(),
        ])
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, DomainRegistrarError> {
        let response = request
            .bearer_auth(self.config.token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            debug!(%error, status = status.as_u16(), "registrar returned an error status");
            return Err(error);
        }
        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, DomainRegistrarError> {
        let body = self.send(request).await?;
        decode(&body)
    }
}

#[async_trait]
impl DomainRegistrar for RegistrarHttpClient {
    async fn add_domain(&self, name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError> {
        let url = self.endpoint(&["v10", "projects", self.config.project_id.as_str(), "domains"])?;
        let request = self.client.post(url).json(&AddDomainBody {
            name: name.as_str(),
        });
        let dto: ProjectDomainDto = self.send_json(request).await?;
        Ok(dto.into_domain())
    }

    async fn get_domain(&self, name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError> {
        let url = self.project_domain("v9", name)?;
        let dto: ProjectDomainDto = self.send_json(self.client.get(url)).await?;
        Ok(dto.into_domain())
    }

    async fn verify_domain(
        &self,
        name: &DomainName,
    ) -> Result<RegisteredDomain, DomainRegistrarError> {
        let mut url = self.project_domain("v9", name)?;
        url.path_segments_mut()
            .map_err(|()| DomainRegistrarError::transport("registrar base URL cannot carry a path"))?
            .push("verify");
        let dto: ProjectDomainDto = self.send_json(self.client.post(url)).await?;
        Ok(dto.into_domain())
    }

    async fn remove_domain(&self, name: &DomainName) -> Result<(), DomainRegistrarError> {
        let url = self.project_domain("v9", name)?;
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn list_domains(&self) -> Result<Vec<RegisteredDomain>, DomainRegistrarError> {
        let url = self.endpoint(&["v9", "projects", self.config.project_id.as_str(), "domains"])?;
        let dto: DomainListDto = self.send_json(self.client.get(url)).await?;
        Ok(dto.into_domains())
    }

    async fn domain_config(&self, name: &DomainName) -> Result<DomainConfig, DomainRegistrarError> {
        let url = self.endpoint(&["v6", "domains", name.as_str(), "config"])?;
        let dto: DomainConfigDto = self.send_json(self.client.get(url)).await?;
        Ok(dto.into_domain())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, DomainRegistrarError> {
    serde_json::from_slice(body).map_err(|error| {
        DomainRegistrarError::decode(format!("invalid registrar JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> DomainRegistrarError {
    if error.is_timeout() {
        DomainRegistrarError::transport(format!("request timed out: {error}"))
    } else {
        DomainRegistrarError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DomainRegistrarError {
    if status == StatusCode::NOT_FOUND {
        return DomainRegistrarError::not_found(status.as_u16());
    }

    let message = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| envelope.error.message.or(envelope.error.code))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let preview = body_preview(body);
            if preview.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                format!("status {}: {}", status.as_u16(), preview)
            }
        });
    DomainRegistrarError::upstream(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
