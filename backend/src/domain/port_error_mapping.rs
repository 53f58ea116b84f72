//! Translate port and validation errors into domain [`Error`]s.
//!
//! Adapter detail (SQL text, transport errors) is logged here and never
//! copied into the caller-facing message.

use serde_json::json;
use tracing::error;

use crate::domain::ports::{DomainRegistrarError, ProjectRepositoryError};
use crate::domain::{DomainValidationError, Error, ErrorCode, ProjectValidationError};

pub(crate) fn map_domain_validation_error(err: DomainValidationError) -> Error {
    Error::invalid_domain(err.to_string()).with_details(json!({ "reason": err.code() }))
}

pub(crate) fn map_project_validation_error(err: ProjectValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

pub(crate) fn map_repository_error(err: ProjectRepositoryError) -> Error {
    match err {
        ProjectRepositoryError::SubdomainTaken { subdomain } => Error::new(
            ErrorCode::SubdomainInUse,
            format!("subdomain {subdomain} is already in use"),
        ),
        ProjectRepositoryError::CustomDomainTaken { domain } => {
            Error::domain_in_use(format!("{domain} is already attached to a project"))
        }
        ProjectRepositoryError::DomainAlreadyAttached { project_id } => Error::new(
            ErrorCode::DomainAlreadyAttached,
            format!("project {project_id} already has a custom domain; remove it first"),
        ),
        ProjectRepositoryError::NotFound { project_id } => {
            Error::not_found(format!("project {project_id} not found"))
        }
        ProjectRepositoryError::Connection { message } | ProjectRepositoryError::Query { message } => {
            error!(%message, "project store failure");
            Error::persistence("project store is unavailable")
        }
    }
}

pub(crate) fn map_registrar_error(err: &DomainRegistrarError) -> Error {
    error!(error = %err, "registrar call failed");
    let mapped = Error::registrar(err.upstream_message());
    match err {
        DomainRegistrarError::Upstream {
            status: Some(status),
            ..
        }
        | DomainRegistrarError::NotFound { status } => {
            mapped.with_details(json!({ "upstreamStatus": status }))
        }
        _ => mapped,
    }
}
