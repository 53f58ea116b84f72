//! Custom-domain workflow orchestrator.
//!
//! Coordinates the validator, the registrar, and the project store through
//! the attachment state machine:
//!
//! ```text
//! (none) --attach--> pending --registrar ok--> added --verify--> verified
//!                       |                        |
//!                       +--registrar error--> failed
//! added | verified | failed --remove--> (none)
//! ```
//!
//! Attach claims the domain locally before calling the registrar, so the
//! store's uniqueness constraint decides concurrent attaches. When the
//! registrar accepts a domain but the local write then fails, the registrar
//! side is compensated on a best-effort basis.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::port_error_mapping::{
    map_domain_validation_error, map_registrar_error, map_repository_error,
};
use crate::domain::ports::{
    AttachDomainOutcome, AttachDomainRequest, DomainAvailability, DomainWorkflow,
    ProjectDomainRequest, ProjectRepository, RemoveDomainOutcome, SetupInstructions,
    UnavailableReason, VerifyDomainOutcome,
};
use crate::domain::{
    DomainName, DomainStatus, DomainValidator, Error, ErrorCode, Project, ProjectId,
    RegistrarService, VerificationPoller, VerificationStatus,
};

/// Domain service implementing [`DomainWorkflow`].
#[derive(Clone)]
pub struct DomainWorkflowService {
    repository: Arc<dyn ProjectRepository>,
    registrar: RegistrarService,
    validator: Arc<DomainValidator>,
    poller: VerificationPoller,
}

impl DomainWorkflowService {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        registrar: RegistrarService,
        validator: Arc<DomainValidator>,
        poller: VerificationPoller,
    ) -> Self {
        Self {
            repository,
            registrar,
            validator,
            poller,
        }
    }

    fn validate(&self, raw: &str) -> Result<DomainName, Error> {
        self.validator.validate(raw).map_err(map_domain_validation_error)
    }

    async fn load_project(&self, id: &ProjectId) -> Result<Project, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("project {id} not found")))
    }

    /// The project's domain when it equals `requested` exactly.
    fn matching_domain(project: &Project, requested: &str) -> Result<DomainName, Error> {
        match project.domain() {
            Some(current) if current.as_str() == requested => Ok(current.clone()),
            _ => Err(Error::new(
                ErrorCode::DomainMismatch,
                format!("{requested} is not the custom domain of project {}", project.id),
            )),
        }
    }

    async fn record_add_failure(&self, id: &ProjectId) {
        if let Err(error) = self.repository.update_status(id, DomainStatus::Failed).await {
            warn!(%error, project_id = %id, "failed to record failed domain attachment");
        }
    }

    /// Undo a registrar add whose local write did not land. Never fails.
    async fn compensate_attach(&self, id: &ProjectId, domain: &DomainName) {
        if let Err(error) = self.registrar.registrar().remove_domain(domain).await {
            warn!(%error, %domain, "compensating registrar removal failed");
        }
        if let Err(error) = self.repository.clear_domain(id).await {
            warn!(%error, project_id = %id, %domain, "compensating local clear failed");
        }
    }

    fn verification_message(status: &VerificationStatus) -> &'static str {
        match (status.verified, status.using_provider_dns) {
            (true, true) => "Domain verified",
            (true, false) => "Domain verified but not using provider DNS",
            _ => "Domain not yet verified",
        }
    }
}

#[async_trait]
impl DomainWorkflow for DomainWorkflowService {
    async fn attach(&self, request: AttachDomainRequest) -> Result<AttachDomainOutcome, Error> {
        let domain = self.validate(&request.domain)?;
        let project = self.load_project(&request.project_id).await?;

        let holder = self
            .repository
            .find_by_custom_domain(&domain)
            .await
            .map_err(map_repository_error)?;
        if holder.is_some() {
            return Err(Error::domain_in_use(format!(
                "{domain} is already attached to a project"
            )));
        }
        if let Some(current) = project.domain() {
            return Err(Error::new(
                ErrorCode::DomainAlreadyAttached,
                format!("project already uses {current}; remove it before attaching another"),
            ));
        }

        let available = self
            .registrar
            .is_domain_available(&domain)
            .await
            .map_err(|error| map_registrar_error(&error))?;
        if !available {
            return Err(Error::domain_not_available(format!(
                "{domain} is already configured with the hosting provider"
            )));
        }

        self.repository
            .attach_domain(&project.id, &domain, DomainStatus::Pending)
            .await
            .map_err(map_repository_error)?;
        debug!(project_id = %project.id, %domain, "custom domain claimed");

        let registered = match self.registrar.registrar().add_domain(&domain).await {
            Ok(registered) => registered,
            Err(error) => {
                self.record_add_failure(&project.id).await;
                return Err(map_registrar_error(&error));
            }
        };

        match self
            .repository
            .update_status(&project.id, DomainStatus::Added)
            .await
        {
            Ok(project) => {
                info!(project_id = %project.id, %domain, "custom domain attached");
                Ok(AttachDomainOutcome {
                    project,
                    registered,
                })
            }
            Err(error) => {
                warn!(%error, project_id = %project.id, %domain, "recording attached domain failed; rolling back");
                self.compensate_attach(&project.id, &domain).await;
                Err(Error::persistence("failed to record the attached domain"))
            }
        }
    }

    async fn verify(&self, request: ProjectDomainRequest) -> Result<VerifyDomainOutcome, Error> {
        let project = self.load_project(&request.project_id).await?;
        let Some(attachment) = project.custom_domain.as_ref() else {
            return Err(Error::new(
                ErrorCode::NoCustomDomain,
                format!("project {} has no custom domain", project.id),
            ));
        };
        let domain = Self::matching_domain(&project, &request.domain)?;
        match attachment.status {
            DomainStatus::Added => {}
            DomainStatus::Pending => {
                return Err(Error::new(
                    ErrorCode::DomainPending,
                    "domain is still being added; retry later",
                ));
            }
            DomainStatus::Verified => {
                return Err(Error::new(
                    ErrorCode::DomainAlreadyVerified,
                    "domain is already verified",
                ));
            }
            DomainStatus::Failed => {
                return Err(Error::new(
                    ErrorCode::DomainFailed,
                    "domain attachment failed; remove it and attach it again",
                ));
            }
        }

        if let Err(error) = self.registrar.registrar().verify_domain(&domain).await {
            debug!(%error, %domain, "verification trigger rejected; checking status anyway");
        }
        let verification = self
            .registrar
            .check_verification_status(&domain)
            .await
            .map_err(|error| map_registrar_error(&error))?;

        let (status, polling_scheduled) = if verification.is_fully_verified() {
            self.repository
                .update_status(&project.id, DomainStatus::Verified)
                .await
                .map_err(map_repository_error)?;
            self.poller.cancel(&project.id);
            info!(project_id = %project.id, %domain, "custom domain verified");
            (DomainStatus::Verified, false)
        } else {
            let scheduled = self.poller.schedule(project.id, domain.clone());
            (DomainStatus::Added, scheduled)
        };

        Ok(VerifyDomainOutcome {
            message: Self::verification_message(&verification).to_owned(),
            domain,
            status,
            verification,
            polling_scheduled,
        })
    }

    async fn remove(&self, request: ProjectDomainRequest) -> Result<RemoveDomainOutcome, Error> {
        let project = self.load_project(&request.project_id).await?;
        let domain = Self::matching_domain(&project, &request.domain)?;

        self.poller.cancel(&project.id);
        match self.registrar.registrar().remove_domain(&domain).await {
            Ok(()) => {}
            Err(error) if error.is_not_found() => {
                debug!(%domain, "registrar had no record of the removed domain");
            }
            Err(error) => return Err(map_registrar_error(&error)),
        }

        let project = self
            .repository
            .clear_domain(&project.id)
            .await
            .map_err(map_repository_error)?;
        info!(project_id = %project.id, %domain, "custom domain removed");
        Ok(RemoveDomainOutcome {
            project,
            removed: domain,
        })
    }

    async fn check_availability(&self, domain: String) -> Result<DomainAvailability, Error> {
        let domain = self.validate(&domain)?;
        let held_locally = self
            .repository
            .find_by_custom_domain(&domain)
            .await
            .map_err(map_repository_error)?
            .is_some();
        let reason = if held_locally {
            Some(UnavailableReason::InUse)
        } else if self
            .registrar
            .is_domain_available(&domain)
            .await
            .map_err(|error| map_registrar_error(&error))?
        {
            None
        } else {
            Some(UnavailableReason::RegisteredElsewhere)
        };

        Ok(DomainAvailability {
            domain,
            available: reason.is_none(),
            reason,
        })
    }

    async fn instructions(&self, domain: String) -> Result<SetupInstructions, Error> {
        let domain = self.validate(&domain)?;
        let records = self.registrar.setup_instructions();
        let status = match self.registrar.check_verification_status(&domain).await {
            Ok(status) => Some(status),
            Err(error) => {
                warn!(%error, %domain, "verification status unavailable for setup instructions");
                None
            }
        };
        Ok(SetupInstructions {
            domain,
            records,
            status,
        })
    }
}

#[cfg(test)]
#[path = "domain_workflow_service_tests.rs"]
mod tests;
