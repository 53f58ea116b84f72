//! Driven port for authoritative nameserver lookups.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving NS records.
    pub enum NameserverLookupError {
        /// The resolver could not answer the query.
        Lookup { message: String } => "nameserver lookup failed: {message}",
    }
}

/// Port resolving the NS records published for a zone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NameserverResolver: Send + Sync {
    /// Return the nameservers for `zone`, lowercased without a trailing dot.
    async fn nameservers(&self, zone: &str) -> Result<Vec<String>, NameserverLookupError>;
}

/// Fixture resolver that answers every query with a fixed set.
#[derive(Debug, Clone, Default)]
pub struct FixtureNameserverResolver {
    nameservers: Vec<String>,
}

impl FixtureNameserverResolver {
    pub fn new<I, S>(nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nameservers: nameservers.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl NameserverResolver for FixtureNameserverResolver {
    async fn nameservers(&self, _zone: &str) -> Result<Vec<String>, NameserverLookupError> {
        Ok(self.nameservers.clone())
    }
}
