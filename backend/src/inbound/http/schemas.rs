//! OpenAPI schema mirrors for domain types.
//!
//! Domain types stay free of `ToSchema`; these wrappers describe their wire
//! form for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "INVALID_REQUEST")]
    InvalidRequest,
    #[schema(rename = "INVALID_DOMAIN")]
    InvalidDomain,
    #[schema(rename = "DOMAIN_IN_USE")]
    DomainInUse,
    #[schema(rename = "DOMAIN_NOT_AVAILABLE")]
    DomainNotAvailable,
    #[schema(rename = "DOMAIN_ALREADY_ATTACHED")]
    DomainAlreadyAttached,
    #[schema(rename = "DOMAIN_MISMATCH")]
    DomainMismatch,
    #[schema(rename = "NO_CUSTOM_DOMAIN")]
    NoCustomDomain,
    #[schema(rename = "DOMAIN_PENDING")]
    DomainPending,
    #[schema(rename = "DOMAIN_ALREADY_VERIFIED")]
    DomainAlreadyVerified,
    #[schema(rename = "DOMAIN_FAILED")]
    DomainFailed,
    #[schema(rename = "SUBDOMAIN_IN_USE")]
    SubdomainInUse,
    #[schema(rename = "NOT_FOUND")]
    NotFound,
    #[schema(rename = "REGISTRAR_ERROR")]
    RegistrarError,
    #[schema(rename = "PERSISTENCE_ERROR")]
    PersistenceError,
    #[schema(rename = "INTERNAL_ERROR")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`]: the failure envelope.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    /// Stable machine-readable tag.
    error: ErrorCodeSchema,
    #[schema(example = "shop.example.org is already attached to a project")]
    message: String,
    /// Supplementary context, e.g. `{"reason": "RESERVED"}`.
    details: Option<serde_json::Value>,
}
