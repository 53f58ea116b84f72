//! Wire shapes for the hosting provider's domain API.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{DomainConfig, RegisteredDomain, VerificationRecord};

#[derive(Debug, Serialize)]
pub(super) struct AddDomainBody<'a> {
    pub(super) name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProjectDomainDto {
    name: String,
    #[serde(default)]
    apex_name: Option<String>,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    verification: Vec<VerificationDto>,
}

impl ProjectDomainDto {
    pub(super) fn into_domain(self) -> RegisteredDomain {
        let apex_name = self.apex_name.unwrap_or_else(|| self.name.clone());
        RegisteredDomain {
            name: self.name,
            apex_name,
            verified: self.verified,
            verification: self
                .verification
                .into_iter()
                .map(VerificationDto::into_domain)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerificationDto {
    #[serde(rename = "type")]
    record_type: String,
    domain: String,
    value: String,
    #[serde(default)]
    reason: String,
}

impl VerificationDto {
    fn into_domain(self) -> VerificationRecord {
        VerificationRecord {
            record_type: self.record_type,
            domain: self.domain,
            value: self.value,
            reason: self.reason,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DomainListDto {
    #[serde(default)]
    domains: Vec<ProjectDomainDto>,
}

impl DomainListDto {
    pub(super) fn into_domains(self) -> Vec<RegisteredDomain> {
        self.domains
            .into_iter()
            .map(ProjectDomainDto::into_domain)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DomainConfigDto {
    #[serde(default)]
    misconfigured: bool,
}

impl DomainConfigDto {
    pub(super) fn into_domain(self) -> DomainConfig {
        DomainConfig {
            misconfigured: self.misconfigured,
        }
    }
}

/// Provider error body: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) code: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}
