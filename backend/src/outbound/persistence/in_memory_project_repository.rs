//! Process-local `ProjectRepository` used when no database is configured.
//!
//! Every operation runs under one lock, so the uniqueness checks and the
//! write that follows them are atomic with respect to other callers.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{DomainAttachment, DomainName, DomainStatus, Project, ProjectId, Subdomain};

/// In-memory project store keyed by project id.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ProjectId, Project>> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn modify(
        &self,
        id: &ProjectId,
        change: impl FnOnce(
            &HashMap<ProjectId, Project>,
            &mut Project,
        ) -> Result<(), ProjectRepositoryError>,
    ) -> Result<Project, ProjectRepositoryError> {
        let mut projects = self.lock();
        let mut project = projects
            .get(id)
            .cloned()
            .ok_or_else(|| ProjectRepositoryError::not_found(id.to_string()))?;
        change(&projects, &mut project)?;
        project.updated_at = Utc::now();
        projects.insert(*id, project.clone());
        Ok(project)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(self.lock().get(id).cloned())
    }

    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(self
            .lock()
            .values()
            .find(|project| &project.subdomain == subdomain)
            .cloned())
    }

    async fn find_by_custom_domain(
        &self,
        domain: &DomainName,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(self
            .lock()
            .values()
            .find(|project| project.domain() == Some(domain))
            .cloned())
    }

    async fn create(&self, project: &Project) -> Result<(), ProjectRepositoryError> {
        let mut projects = self.lock();
        if projects
            .values()
            .any(|existing| existing.subdomain == project.subdomain)
        {
            return Err(ProjectRepositoryError::subdomain_taken(
                project.subdomain.as_str(),
            ));
        }
        if projects.contains_key(&project.id) {
            return Err(ProjectRepositoryError::query("duplicate project id"));
        }
        projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn attach_domain(
        &self,
        id: &ProjectId,
        domain: &DomainName,
        status: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError> {
        self.modify(id, |projects, project| {
            if project.custom_domain.is_some() {
                return Err(ProjectRepositoryError::domain_already_attached(
                    id.to_string(),
                ));
            }
            let held_elsewhere = projects
                .values()
                .any(|other| other.id != *id && other.domain() == Some(domain));
            if held_elsewhere {
                return Err(ProjectRepositoryError::custom_domain_taken(domain.as_str()));
            }
            project.custom_domain = Some(DomainAttachment {
                domain: domain.clone(),
                status,
            });
            Ok(())
        })
    }

    async fn update_status(
        &self,
        id: &ProjectId,
        status: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError> {
        self.modify(id, |_, project| match project.custom_domain.as_mut() {
            Some(attachment) => {
                attachment.status = status;
                Ok(())
            }
            None => Err(ProjectRepositoryError::not_found(id.to_string())),
        })
    }

    async fn transition_status(
        &self,
        id: &ProjectId,
        domain: &DomainName,
        from: DomainStatus,
        to: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError> {
        self.modify(id, |_, project| match project.custom_domain.as_mut() {
            Some(attachment) if attachment.is(domain, from) => {
                attachment.status = to;
                Ok(())
            }
            _ => Err(ProjectRepositoryError::not_found(id.to_string())),
        })
    }

    async fn clear_domain(&self, id: &ProjectId) -> Result<Project, ProjectRepositoryError> {
        self.modify(id, |_, project| {
            project.custom_domain = None;
            Ok(())
        })
    }
}
