//! Driving port for project creation.

use async_trait::async_trait;

use crate::domain::{Error, Project};

/// Inbound contract for creating projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectCommand: Send + Sync {
    /// Create a project and derive its subdomain from `name`.
    ///
    /// # Errors
    ///
    /// `INVALID_REQUEST` for a blank or overlong name, `SUBDOMAIN_IN_USE`
    /// when the derived subdomain is taken, or `PERSISTENCE_ERROR`.
    async fn create_project(&self, name: String) -> Result<Project, Error>;
}
