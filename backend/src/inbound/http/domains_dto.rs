//! Request and response payloads for the custom-domain endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    AttachDomainOutcome, DomainAvailability, RegisteredDomain, RemoveDomainOutcome,
    SetupInstructions, VerificationRecord, VerifyDomainOutcome,
};
use crate::domain::{DnsRecord, Project, VerificationStatus};

/// Body of `POST /api/domains`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachDomainBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub project_id: Option<String>,
    #[schema(example = "shop.example.org")]
    pub domain: Option<String>,
}

/// Body of the verify and remove endpoints.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct DomainBody {
    #[schema(example = "shop.example.org")]
    pub domain: Option<String>,
}

/// Project as returned by the API.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub project_name: String,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    /// `pending`, `added`, `verified`, or `failed`; null without a domain.
    pub domain_status: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        let (custom_domain, domain_status) = match project.custom_domain {
            Some(attachment) => (
                Some(attachment.domain.into()),
                Some(attachment.status.as_str().to_owned()),
            ),
            None => (None, None),
        };
        Self {
            id: project.id.to_string(),
            project_name: project.name.into(),
            subdomain: project.subdomain.into(),
            custom_domain,
            domain_status,
            created_at: project.created_at.to_rfc3339(),
            updated_at: project.updated_at.to_rfc3339(),
        }
    }
}

/// A record the provider asks the registrant to publish.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationRecordResponse {
    #[serde(rename = "type")]
    pub record_type: String,
    pub domain: String,
    pub value: String,
    pub reason: String,
}

impl From<VerificationRecord> for VerificationRecordResponse {
    fn from(record: VerificationRecord) -> Self {
        Self {
            record_type: record.record_type,
            domain: record.domain,
            value: record.value,
            reason: record.reason,
        }
    }
}

fn records(verification: Vec<VerificationRecord>) -> Vec<VerificationRecordResponse> {
    verification.into_iter().map(Into::into).collect()
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDomainResponse {
    pub name: String,
    pub apex_name: String,
    pub verified: bool,
    pub verification: Vec<VerificationRecordResponse>,
}

impl From<RegisteredDomain> for RegisteredDomainResponse {
    fn from(domain: RegisteredDomain) -> Self {
        Self {
            name: domain.name,
            apex_name: domain.apex_name,
            verified: domain.verified,
            verification: records(domain.verification),
        }
    }
}

/// Response of `POST /api/domains`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttachDomainResponse {
    pub success: bool,
    pub project: ProjectResponse,
    pub domain: RegisteredDomainResponse,
}

impl From<AttachDomainOutcome> for AttachDomainResponse {
    fn from(outcome: AttachDomainOutcome) -> Self {
        Self {
            success: true,
            project: outcome.project.into(),
            domain: outcome.registered.into(),
        }
    }
}

/// Provider and DNS view of a domain's verification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatusResponse {
    pub verified: bool,
    pub using_provider_dns: bool,
    /// Null when the provider's configuration check could not be read.
    pub misconfigured: Option<bool>,
    pub verification: Vec<VerificationRecordResponse>,
}

impl From<VerificationStatus> for VerificationStatusResponse {
    fn from(status: VerificationStatus) -> Self {
        Self {
            verified: status.verified,
            using_provider_dns: status.using_provider_dns,
            misconfigured: status.misconfigured,
            verification: records(status.verification),
        }
    }
}

/// Response of `POST /api/domains/{projectId}/verify`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDomainResponse {
    pub success: bool,
    pub domain: String,
    pub status: String,
    #[serde(flatten)]
    pub verification: VerificationStatusResponse,
    #[schema(example = "Domain not yet verified")]
    pub message: String,
    /// Whether a background re-check was scheduled.
    pub polling_scheduled: bool,
}

impl From<VerifyDomainOutcome> for VerifyDomainResponse {
    fn from(outcome: VerifyDomainOutcome) -> Self {
        Self {
            success: true,
            domain: outcome.domain.into(),
            status: outcome.status.as_str().to_owned(),
            verification: outcome.verification.into(),
            message: outcome.message,
            polling_scheduled: outcome.polling_scheduled,
        }
    }
}

/// Response of `DELETE /api/domains/{projectId}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDomainResponse {
    pub success: bool,
    pub project: ProjectResponse,
    pub removed_domain: String,
}

impl From<RemoveDomainOutcome> for RemoveDomainResponse {
    fn from(outcome: RemoveDomainOutcome) -> Self {
        Self {
            success: true,
            project: outcome.project.into(),
            removed_domain: outcome.removed.into(),
        }
    }
}

/// Response of `GET /api/domains/check/{domain}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub success: bool,
    pub domain: String,
    pub available: bool,
    /// `DOMAIN_IN_USE` or `DOMAIN_NOT_AVAILABLE` when unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<DomainAvailability> for AvailabilityResponse {
    fn from(availability: DomainAvailability) -> Self {
        Self {
            success: true,
            domain: availability.domain.into(),
            available: availability.available,
            reason: availability.reason.map(|reason| reason.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DnsRecordResponse {
    #[serde(rename = "type")]
    #[schema(example = "NS")]
    pub record_type: String,
    #[schema(example = "@")]
    pub name: String,
    #[schema(example = "ns1.vercel-dns.com")]
    pub value: String,
}

impl From<DnsRecord> for DnsRecordResponse {
    fn from(record: DnsRecord) -> Self {
        Self {
            record_type: record.record_type,
            name: record.name,
            value: record.value,
        }
    }
}

/// Response of `GET /api/domains/instructions/{domain}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructionsResponse {
    pub success: bool,
    pub domain: String,
    pub dns_records: Vec<DnsRecordResponse>,
    /// Null when the provider could not be queried.
    pub status: Option<VerificationStatusResponse>,
}

impl From<SetupInstructions> for InstructionsResponse {
    fn from(instructions: SetupInstructions) -> Self {
        Self {
            success: true,
            domain: instructions.domain.into(),
            dns_records: instructions.records.into_iter().map(Into::into).collect(),
            status: instructions.status.map(Into::into),
        }
    }
}
