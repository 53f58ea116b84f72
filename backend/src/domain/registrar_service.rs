//! Registrar helpers composing the provider API with DNS lookups.
//!
//! The provider's `verified` flag alone is not trusted: a domain can report
//! verified while its nameservers still point elsewhere. Full verification
//! requires both the provider flag and a nameserver match.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::DomainName;
use crate::domain::ports::{
    DomainRegistrar, DomainRegistrarError, NameserverResolver, VerificationRecord,
};

/// One DNS record the registrant must publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub record_type: String,
    pub name: String,
    pub value: String,
}

/// Combined provider and DNS view of a domain's verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationStatus {
    /// Provider-reported flag.
    pub verified: bool,
    pub verification: Vec<VerificationRecord>,
    /// Every resolved nameserver belongs to the provider.
    pub using_provider_dns: bool,
    /// Provider misconfiguration flag; `None` when it could not be fetched.
    pub misconfigured: Option<bool>,
}

impl VerificationStatus {
    fn not_registered() -> Self {
        Self {
            verified: false,
            verification: Vec::new(),
            using_provider_dns: false,
            misconfigured: Some(false),
        }
    }

    /// Provider verified and DNS delegated to the provider.
    pub fn is_fully_verified(&self) -> bool {
        self.verified && self.using_provider_dns
    }
}

/// Provider nameserver set, normalised for comparison.
///
/// # Examples
/// ```
/// use project_domains::domain::ProviderNameservers;
///
/// let set = ProviderNameservers::new(["NS1.Vercel-DNS.com."]);
/// assert!(set.contains("ns1.vercel-dns.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderNameservers(BTreeSet<String>);

impl ProviderNameservers {
    pub fn new<I, S>(nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            nameservers
                .into_iter()
                .map(|ns| normalise_nameserver(ns.as_ref()))
                .filter(|ns| !ns.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, nameserver: &str) -> bool {
        self.0.contains(&normalise_nameserver(nameserver))
    }

    /// Whether a non-empty resolved set lies entirely within the provider's.
    pub fn covers(&self, resolved: &[String]) -> bool {
        !resolved.is_empty() && resolved.iter().all(|ns| self.contains(ns))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn normalise_nameserver(raw: &str) -> String {
    raw.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Registrar operations that need more than one provider call.
#[derive(Clone)]
pub struct RegistrarService {
    registrar: Arc<dyn DomainRegistrar>,
    resolver: Arc<dyn NameserverResolver>,
    nameservers: ProviderNameservers,
}

impl RegistrarService {
    pub fn new(
        registrar: Arc<dyn DomainRegistrar>,
        resolver: Arc<dyn NameserverResolver>,
        nameservers: ProviderNameservers,
    ) -> Self {
        Self {
            registrar,
            resolver,
            nameservers,
        }
    }

    /// Underlying registrar port.
    pub fn registrar(&self) -> &dyn DomainRegistrar {
        self.registrar.as_ref()
    }

    /// Fetch the provider record and compare the apex's NS records with the
    /// provider's nameservers.
    ///
    /// A provider 404 is a benign "not attached yet" state and yields an
    /// all-false status. DNS failures fail closed.
    pub async fn check_verification_status(
        &self,
        name: &DomainName,
    ) -> Result<VerificationStatus, DomainRegistrarError> {
        let domain = match self.registrar.get_domain(name).await {
            Ok(domain) => domain,
            Err(error) if error.is_not_found() => return Ok(VerificationStatus::not_registered()),
            Err(error) => return Err(error),
        };

        let zone = if domain.apex_name.is_empty() {
            name.as_str()
        } else {
            domain.apex_name.as_str()
        };
        let using_provider_dns = match self.resolver.nameservers(zone).await {
            Ok(resolved) => self.nameservers.covers(&resolved),
            Err(error) => {
                debug!(%error, zone, "nameserver lookup failed; treating as foreign DNS");
                false
            }
        };

        let misconfigured = match self.registrar.domain_config(name).await {
            Ok(config) => Some(config.misconfigured),
            Err(error) => {
                debug!(%error, domain = %name, "domain config unavailable");
                None
            }
        };

        Ok(VerificationStatus {
            verified: domain.verified,
            verification: domain.verification,
            using_provider_dns,
            misconfigured,
        })
    }

    /// `true` exactly when the provider has no record of `name`.
    pub async fn is_domain_available(
        &self,
        name: &DomainName,
    ) -> Result<bool, DomainRegistrarError> {
        match self.registrar.get_domain(name).await {
            Ok(_) => Ok(false),
            Err(error) if error.is_not_found() => Ok(true),
            Err(error) => Err(error),
        }
    }

    /// NS records delegating a zone to the provider.
    pub fn setup_instructions(&self) -> Vec<DnsRecord> {
        self.nameservers
            .iter()
            .map(|ns| DnsRecord {
                record_type: "NS".to_owned(),
                name: "@".to_owned(),
                value: ns.to_owned(),
            })
            .collect()
    }
}
