//! Project creation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::port_error_mapping::{map_project_validation_error, map_repository_error};
use crate::domain::ports::{ProjectCommand, ProjectRepository};
use crate::domain::{Error, ErrorCode, Project, ProjectName, Subdomain};

/// Creates projects and their derived subdomains.
#[derive(Clone)]
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Create a project named `name` with a subdomain derived from it.
    ///
    /// The lookup beforehand only produces an early answer; the store's
    /// unique constraint is what rejects a concurrent duplicate.
    pub async fn create_project(&self, name: &str) -> Result<Project, Error> {
        let name = ProjectName::new(name).map_err(map_project_validation_error)?;
        let subdomain = Subdomain::derive(&name).map_err(map_project_validation_error)?;

        let existing = self
            .repository
            .find_by_subdomain(&subdomain)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(Error::new(
                ErrorCode::SubdomainInUse,
                format!("subdomain {subdomain} is already in use"),
            ));
        }

        let project = Project::new(name, subdomain, self.clock.utc());
        self.repository
            .create(&project)
            .await
            .map_err(map_repository_error)?;
        info!(project_id = %project.id, subdomain = %project.subdomain, "project created");
        Ok(project)
    }
}

#[async_trait]
impl ProjectCommand for ProjectService {
    async fn create_project(&self, name: String) -> Result<Project, Error> {
        ProjectService::create_project(self, &name).await
    }
}
