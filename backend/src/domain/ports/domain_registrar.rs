//! Driven port for the hosting provider's domain API.
//!
//! The registrar owns DNS and domain-attachment state for the deployed
//! project. The domain only sees the narrow contract below; HTTP shapes live
//! in the outbound adapter.

use async_trait::async_trait;

use crate::domain::DomainName;

use super::define_port_error;

/// DNS record the registrant must publish to prove ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRecord {
    /// Record type, e.g. `TXT`.
    pub record_type: String,
    /// Host the record must be published on.
    pub domain: String,
    /// Expected record value.
    pub value: String,
    /// Provider explanation of why the record is required.
    pub reason: String,
}

/// Provider-owned view of a domain registered under the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDomain {
    pub name: String,
    /// Registrable apex, e.g. `example.com` for `shop.example.com`.
    pub apex_name: String,
    /// Provider-reported verification flag.
    pub verified: bool,
    /// Outstanding verification challenges.
    pub verification: Vec<VerificationRecord>,
}

/// Provider's view of the domain's DNS configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DomainConfig {
    /// The provider sees DNS records that do not point at it.
    pub misconfigured: bool,
}

define_port_error! {
    /// Errors surfaced by registrar adapters.
    pub enum DomainRegistrarError {
        /// The provider has no record of the domain.
        NotFound { status: u16 } =>
            "registrar has no record of the domain (status {status})",
        /// The provider answered with a non-success status.
        Upstream { status: Option<u16>, message: String } =>
            "registrar request failed: {message}",
        /// The request never produced a response.
        Transport { message: String } =>
            "registrar transport failed: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "registrar response decode failed: {message}",
    }
}

impl DomainRegistrarError {
    /// Whether the provider reported the domain as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Upstream message suitable for the caller, when one exists.
    pub fn upstream_message(&self) -> &str {
        match self {
            Self::Upstream { message, .. } if !message.trim().is_empty() => message.as_str(),
            Self::NotFound { .. } => "domain not found at registrar",
            _ => "registrar request failed",
        }
    }
}

/// Port for domain operations scoped to the configured provider project.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainRegistrar: Send + Sync {
    /// Register `name` under the project.
    async fn add_domain(&self, name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError>;

    /// Fetch the provider's record for `name`.
    ///
    /// A missing domain is reported as [`DomainRegistrarError::NotFound`]
    /// carrying the original status.
    async fn get_domain(&self, name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError>;

    /// Ask the provider to re-check the domain's DNS records. Idempotent.
    async fn verify_domain(
        &self,
        name: &DomainName,
    ) -> Result<RegisteredDomain, DomainRegistrarError>;

    /// Detach `name` from the project.
    async fn remove_domain(&self, name: &DomainName) -> Result<(), DomainRegistrarError>;

    /// List every domain registered under the project.
    async fn list_domains(&self) -> Result<Vec<RegisteredDomain>, DomainRegistrarError>;

    /// Fetch the provider's DNS configuration assessment for `name`.
    async fn domain_config(&self, name: &DomainName) -> Result<DomainConfig, DomainRegistrarError>;
}

/// Fixture registrar that knows no domains and accepts every add.
///
/// Used when no registrar credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDomainRegistrar;

impl FixtureDomainRegistrar {
    fn unverified(name: &DomainName) -> RegisteredDomain {
        RegisteredDomain {
            name: name.to_string(),
            apex_name: name.to_string(),
            verified: false,
            verification: Vec::new(),
        }
    }
}

#[async_trait]
impl DomainRegistrar for FixtureDomainRegistrar {
    async fn add_domain(&self, name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError> {
        Ok(Self::unverified(name))
    }

    async fn get_domain(&self, _name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError> {
        Err(DomainRegistrarError::not_found(404_u16))
    }

    async fn verify_domain(
        &self,
        name: &DomainName,
    ) -> Result<RegisteredDomain, DomainRegistrarError> {
        Ok(Self::unverified(name))
    }

    async fn remove_domain(&self, _name: &DomainName) -> Result<(), DomainRegistrarError> {
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<RegisteredDomain>, DomainRegistrarError> {
        Ok(Vec::new())
    }

    async fn domain_config(&self, _name: &DomainName) -> Result<DomainConfig, DomainRegistrarError> {
        Ok(DomainConfig::default())
    }
}
