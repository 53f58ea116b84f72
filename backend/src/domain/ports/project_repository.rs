//! Port for project persistence.
//!
//! Uniqueness of subdomains and custom domains is enforced by the store,
//! not by callers: a conflicting write fails with
//! [`ProjectRepositoryError::SubdomainTaken`] or
//! [`ProjectRepositoryError::CustomDomainTaken`] and that failure is the
//! authoritative rejection.

use async_trait::async_trait;

use crate::domain::{DomainName, DomainStatus, Project, ProjectId, Subdomain};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "project repository query failed: {message}",
        /// Another project already owns the subdomain.
        SubdomainTaken { subdomain: String } =>
            "subdomain {subdomain} is already taken",
        /// Another project already owns the custom domain.
        CustomDomainTaken { domain: String } =>
            "custom domain {domain} is already attached to a project",
        /// The project already holds a custom domain.
        DomainAlreadyAttached { project_id: String } =>
            "project {project_id} already has a custom domain",
        /// The targeted project does not exist, or does not hold the custom
        /// domain a write requires.
        NotFound { project_id: String } =>
            "project {project_id} not found",
    }
}

/// Port for reading and mutating projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError>;

    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    async fn find_by_custom_domain(
        &self,
        domain: &DomainName,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Insert a new project; fails with `SubdomainTaken` on conflict.
    async fn create(&self, project: &Project) -> Result<(), ProjectRepositoryError>;

    /// Claim `domain` for a project that holds no custom domain.
    ///
    /// Fails with `CustomDomainTaken` when another project holds `domain`
    /// and with `DomainAlreadyAttached` when the project already holds one.
    async fn attach_domain(
        &self,
        id: &ProjectId,
        domain: &DomainName,
        status: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError>;

    /// Change the status of the attached domain.
    ///
    /// Fails with `NotFound` when the project holds no custom domain.
    async fn update_status(
        &self,
        id: &ProjectId,
        status: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError>;

    /// Move the attachment from `from` to `to` only while the project still
    /// holds `domain` with status `from`.
    ///
    /// Fails with `NotFound` when the attachment has changed.
    async fn transition_status(
        &self,
        id: &ProjectId,
        domain: &DomainName,
        from: DomainStatus,
        to: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError>;

    /// Clear the custom domain and its status together.
    async fn clear_domain(&self, id: &ProjectId) -> Result<Project, ProjectRepositoryError>;
}
