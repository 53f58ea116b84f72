//! Domain primitives, services, and ports.
//!
//! Purpose: model projects and their custom domains, validate candidate
//! domains, and orchestrate the attach/verify/remove workflow against the
//! registrar and project store ports. Nothing here knows about HTTP,
//! Postgres, or DNS wire formats.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - Project, DomainName, DomainStatus — the aggregate and its values.
//! - DomainValidator — pure domain validation policy.
//! - DomainWorkflowService — driving-port implementation.
//! - VerificationPoller — bounded background verification.

pub mod domain_name;
pub mod domain_workflow_service;
pub mod error;
mod port_error_mapping;
pub mod ports;
pub mod project;
pub mod project_service;
pub mod registrar_service;
pub mod trace_id;
pub mod verification_poller;

pub use self::domain_name::{
    DOMAIN_LABEL_MAX, DOMAIN_NAME_MAX, DomainName, DomainValidationError, DomainValidator,
};
pub use self::domain_workflow_service::DomainWorkflowService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::project::{
    DomainAttachment, DomainStatus, PROJECT_NAME_MAX, Project, ProjectId, ProjectName,
    ProjectValidationError, SUBDOMAIN_MAX, Subdomain,
};
pub use self::project_service::ProjectService;
pub use self::registrar_service::{
    DnsRecord, ProviderNameservers, RegistrarService, VerificationStatus,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::verification_poller::{PollOutcome, VerificationPollConfig, VerificationPoller};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use project_domains::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such project"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
