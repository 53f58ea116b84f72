//! Driving port for the custom-domain workflow.
//!
//! HTTP handlers call [`DomainWorkflow`] with raw domain strings; the
//! implementation validates and normalises them.

use async_trait::async_trait;

use crate::domain::{
    DnsRecord, DomainName, DomainStatus, Error, Project, ProjectId, VerificationStatus,
};

use super::RegisteredDomain;

/// Request to attach a custom domain to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachDomainRequest {
    pub project_id: ProjectId,
    pub domain: String,
}

/// Result of a successful attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachDomainOutcome {
    /// Project after the domain was recorded as `added`.
    pub project: Project,
    /// Provider record, including outstanding verification challenges.
    pub registered: RegisteredDomain,
}

/// Request naming a project and the domain it is expected to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDomainRequest {
    pub project_id: ProjectId,
    pub domain: String,
}

/// Result of a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyDomainOutcome {
    pub domain: DomainName,
    /// Status persisted after the check.
    pub status: DomainStatus,
    pub verification: VerificationStatus,
    /// Human-readable summary of the outcome.
    pub message: String,
    /// A background poll will keep re-checking the domain.
    pub polling_scheduled: bool,
}

/// Result of a successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveDomainOutcome {
    pub project: Project,
    pub removed: DomainName,
}

/// Why a well-formed domain cannot be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Another project already holds it locally.
    InUse,
    /// The provider already has it configured.
    RegisteredElsewhere,
}

impl UnavailableReason {
    /// Machine-readable tag matching the attach rejection code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InUse => "DOMAIN_IN_USE",
            Self::RegisteredElsewhere => "DOMAIN_NOT_AVAILABLE",
        }
    }
}

/// Availability probe result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAvailability {
    pub domain: DomainName,
    pub available: bool,
    pub reason: Option<UnavailableReason>,
}

/// DNS setup guidance for a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupInstructions {
    pub domain: DomainName,
    pub records: Vec<DnsRecord>,
    /// Current provider status; `None` when the provider could not be asked.
    pub status: Option<VerificationStatus>,
}

/// Inbound contract for attaching, verifying, and removing custom domains.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainWorkflow: Send + Sync {
    /// Validate, claim, and register a custom domain for a project.
    ///
    /// # Errors
    ///
    /// `INVALID_DOMAIN`, `NOT_FOUND`, `DOMAIN_IN_USE`,
    /// `DOMAIN_ALREADY_ATTACHED`, `DOMAIN_NOT_AVAILABLE`, `REGISTRAR_ERROR`,
    /// or `PERSISTENCE_ERROR`.
    async fn attach(&self, request: AttachDomainRequest) -> Result<AttachDomainOutcome, Error>;

    /// Re-check an `added` domain and promote it to `verified` when both
    /// the provider and DNS agree.
    async fn verify(&self, request: ProjectDomainRequest) -> Result<VerifyDomainOutcome, Error>;

    /// Detach the project's custom domain from the provider and the store.
    async fn remove(&self, request: ProjectDomainRequest) -> Result<RemoveDomainOutcome, Error>;

    /// Report whether a domain could be attached right now. Never mutates.
    async fn check_availability(&self, domain: String) -> Result<DomainAvailability, Error>;

    /// Return the DNS records the registrant must configure.
    async fn instructions(&self, domain: String) -> Result<SetupInstructions, Error>;
}
