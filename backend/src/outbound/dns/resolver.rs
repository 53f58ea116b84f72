//! trust-dns backed nameserver resolver.

use async_trait::async_trait;
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use tracing::warn;

use crate::domain::ports::{NameserverLookupError, NameserverResolver};

/// Resolver using the host's resolv.conf, or public defaults when that
/// cannot be read.
pub struct SystemNameserverResolver {
    resolver: TokioAsyncResolver,
}

impl SystemNameserverResolver {
    pub fn new() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|error| {
            warn!(%error, "system resolver configuration unavailable; using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }
}

impl Default for SystemNameserverResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameserverResolver for SystemNameserverResolver {
    async fn nameservers(&self, zone: &str) -> Result<Vec<String>, NameserverLookupError> {
        match self.resolver.ns_lookup(zone).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|ns| normalise(&ns.to_string()))
                .collect()),
            Err(error) if matches!(error.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                Ok(Vec::new())
            }
            Err(error) => Err(NameserverLookupError::lookup(error.to_string())),
        }
    }
}

fn normalise(raw: &str) -> String {
    raw.trim_end_matches('.').to_ascii_lowercase()
}
