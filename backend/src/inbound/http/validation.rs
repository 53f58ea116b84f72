//! Request validation helpers shared by the HTTP handlers.

use actix_web::web;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, ProjectId};

/// Machine-readable validation codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    MalformedBody,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::MalformedBody => "malformed_body",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const PROJECT_ID: FieldName = FieldName::new("projectId");
pub(crate) const DOMAIN: FieldName = FieldName::new("domain");
pub(crate) const NAME: FieldName = FieldName::new("name");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ValidationCode::MissingField.as_str(),
    }))
}

/// Require a present, non-blank string field.
pub(crate) fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_project_id(value: &str, field: FieldName) -> Result<ProjectId, Error> {
    Uuid::parse_str(value.trim())
        .map(ProjectId::from)
        .map_err(|_| {
            let field = field.as_str();
            Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
                "field": field,
                "value": value,
                "code": ValidationCode::InvalidUuid.as_str(),
            }))
        })
}

/// JSON extractor settings that report malformed bodies in the API envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}"))
            .with_details(json!({ "code": ValidationCode::MalformedBody.as_str() }))
            .into()
    })
}
