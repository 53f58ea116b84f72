//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope. The serialised form is
//! the failure half of the API envelope: `{success: false, error, message}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TraceId;

/// Stable machine-readable error tag describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request body or path is malformed.
    InvalidRequest,
    /// The candidate domain failed syntactic or denylist validation.
    InvalidDomain,
    /// Another project already claims the custom domain locally.
    DomainInUse,
    /// The registrar already has the domain configured elsewhere.
    DomainNotAvailable,
    /// The project already holds a different custom domain.
    DomainAlreadyAttached,
    /// The supplied domain does not match the project's custom domain.
    DomainMismatch,
    /// The project has no custom domain to operate on.
    NoCustomDomain,
    /// The domain is still being added; retry later.
    DomainPending,
    /// The domain has already been verified.
    DomainAlreadyVerified,
    /// The domain attachment failed and needs manual intervention.
    DomainFailed,
    /// The derived subdomain is already taken.
    SubdomainInUse,
    /// The requested project or domain does not exist.
    NotFound,
    /// The registrar call failed upstream.
    RegistrarError,
    /// The project store failed.
    PersistenceError,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Tag as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidDomain => "INVALID_DOMAIN",
            Self::DomainInUse => "DOMAIN_IN_USE",
            Self::DomainNotAvailable => "DOMAIN_NOT_AVAILABLE",
            Self::DomainAlreadyAttached => "DOMAIN_ALREADY_ATTACHED",
            Self::DomainMismatch => "DOMAIN_MISMATCH",
            Self::NoCustomDomain => "NO_CUSTOM_DOMAIN",
            Self::DomainPending => "DOMAIN_PENDING",
            Self::DomainAlreadyVerified => "DOMAIN_ALREADY_VERIFIED",
            Self::DomainFailed => "DOMAIN_FAILED",
            Self::SubdomainInUse => "SUBDOMAIN_IN_USE",
            Self::NotFound => "NOT_FOUND",
            Self::RegistrarError => "REGISTRAR_ERROR",
            Self::PersistenceError => "PERSISTENCE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `trace_id` is captured from the request scope at construction and is
///   never serialised into the body.
///
/// # Examples
/// ```
/// use project_domains::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// Only call this with literal or formatted non-empty messages.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    ///
    /// The active request trace identifier, when one is in scope, is
    /// attached automatically.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier of the request that produced the error.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use project_domains::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_domain("bad").with_details(json!({ "reason": "FORMAT" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Replace the trace identifier, panicking on blank input.
    pub fn with_trace_id(self, trace_id: impl Into<String>) -> Self {
        match self.try_with_trace_id(trace_id) {
            Ok(value) => value,
            Err(err) => panic!("trace identifiers must satisfy validation: {err}"),
        }
    }

    /// Fallible variant of [`Error::with_trace_id`].
    pub fn try_with_trace_id(
        mut self,
        trace_id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let trace_id = trace_id.into();
        if trace_id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        self.trace_id = Some(trace_id);
        Ok(self)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidDomain`].
    pub fn invalid_domain(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidDomain, message)
    }

    /// Convenience constructor for [`ErrorCode::DomainInUse`].
    pub fn domain_in_use(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DomainInUse, message)
    }

    /// Convenience constructor for [`ErrorCode::DomainNotAvailable`].
    pub fn domain_not_available(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DomainNotAvailable, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::RegistrarError`].
    pub fn registrar(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RegistrarError, message)
    }

    /// Convenience constructor for [`ErrorCode::PersistenceError`].
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PersistenceError, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    success: bool,
    error: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            success: false,
            error: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            error,
            message,
            details,
            ..
        } = value;

        let mut decoded = Error::try_new(error, message)?;
        decoded.details = details;
        Ok(decoded)
    }
}
