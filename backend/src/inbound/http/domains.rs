//! Custom-domain HTTP handlers.
//!
//! ```text
//! POST   /api/domains
//! POST   /api/domains/{projectId}/verify
//! DELETE /api/domains/{projectId}
//! GET    /api/domains/check/{domain}
//! GET    /api/domains/instructions/{domain}
//! ```
//!
//! Handlers only parse and shape payloads; every decision is made by the
//! [`DomainWorkflow`](crate::domain::ports::DomainWorkflow) port.

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::ProjectId;
use crate::domain::ports::{AttachDomainRequest, ProjectDomainRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::domains_dto::{
    AttachDomainBody, AttachDomainResponse, AvailabilityResponse, DomainBody,
    InstructionsResponse, RemoveDomainResponse, VerifyDomainResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{DOMAIN, PROJECT_ID, parse_project_id, require_field};

fn project_domain_request(
    project_id: &str,
    body: DomainBody,
) -> ApiResult<ProjectDomainRequest> {
    let project_id: ProjectId = parse_project_id(project_id, PROJECT_ID)?;
    let domain = require_field(body.domain, DOMAIN)?;
    Ok(ProjectDomainRequest { project_id, domain })
}

/// Attach a custom domain to a project.
#[utoipa::path(
    post,
    path = "/api/domains",
    request_body = AttachDomainBody,
    responses(
        (status = 201, description = "Domain attached", body = AttachDomainResponse),
        (status = 400, description = "Invalid request or domain", body = ErrorSchema),
        (status = 404, description = "Project not found", body = ErrorSchema),
        (status = 409, description = "Domain already claimed", body = ErrorSchema),
        (status = 500, description = "Registrar or store failure", body = ErrorSchema)
    ),
    tags = ["domains"],
    operation_id = "attachDomain"
)]
#[post("/domains")]
pub async fn attach_domain(
    state: web::Data<HttpState>,
    payload: web::Json<AttachDomainBody>,
) -> ApiResult<HttpResponse> {
    let AttachDomainBody { project_id, domain } = payload.into_inner();
    let project_id = parse_project_id(&require_field(project_id, PROJECT_ID)?, PROJECT_ID)?;
    let domain = require_field(domain, DOMAIN)?;

    let outcome = state
        .domains
        .attach(AttachDomainRequest { project_id, domain })
        .await?;
    Ok(HttpResponse::Created().json(AttachDomainResponse::from(outcome)))
}

/// Re-check verification of the project's custom domain.
#[utoipa::path(
    post,
    path = "/api/domains/{projectId}/verify",
    params(("projectId" = String, Path, description = "Project identifier")),
    request_body = DomainBody,
    responses(
        (status = 200, description = "Verification result", body = VerifyDomainResponse),
        (status = 400, description = "Invalid request or domain mismatch", body = ErrorSchema),
        (status = 404, description = "Project not found", body = ErrorSchema),
        (status = 409, description = "Domain not in a verifiable state", body = ErrorSchema),
        (status = 500, description = "Registrar or store failure", body = ErrorSchema)
    ),
    tags = ["domains"],
    operation_id = "verifyDomain"
)]
#[post("/domains/{project_id}/verify")]
pub async fn verify_domain(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<DomainBody>,
) -> ApiResult<web::Json<VerifyDomainResponse>> {
    let request = project_domain_request(&path.into_inner(), payload.into_inner())?;
    let outcome = state.domains.verify(request).await?;
    Ok(web::Json(VerifyDomainResponse::from(outcome)))
}

/// Detach the project's custom domain.
#[utoipa::path(
    delete,
    path = "/api/domains/{projectId}",
    params(("projectId" = String, Path, description = "Project identifier")),
    request_body = DomainBody,
    responses(
        (status = 200, description = "Domain removed", body = RemoveDomainResponse),
        (status = 400, description = "Invalid request or domain mismatch", body = ErrorSchema),
        (status = 404, description = "Project not found", body = ErrorSchema),
        (status = 500, description = "Registrar or store failure", body = ErrorSchema)
    ),
    tags = ["domains"],
    operation_id = "removeDomain"
)]
#[delete("/domains/{project_id}")]
pub async fn remove_domain(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<DomainBody>,
) -> ApiResult<web::Json<RemoveDomainResponse>> {
    let request = project_domain_request(&path.into_inner(), payload.into_inner())?;
    let outcome = state.domains.remove(request).await?;
    Ok(web::Json(RemoveDomainResponse::from(outcome)))
}

/// Report whether a domain could be attached now.
#[utoipa::path(
    get,
    path = "/api/domains/check/{domain}",
    params(("domain" = String, Path, description = "Candidate domain")),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Invalid domain", body = ErrorSchema),
        (status = 500, description = "Registrar or store failure", body = ErrorSchema)
    ),
    tags = ["domains"],
    operation_id = "checkDomainAvailability"
)]
#[get("/domains/check/{domain}")]
pub async fn check_domain(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let availability = state.domains.check_availability(path.into_inner()).await?;
    Ok(web::Json(AvailabilityResponse::from(availability)))
}

/// DNS records to configure plus the current verification state.
#[utoipa::path(
    get,
    path = "/api/domains/instructions/{domain}",
    params(("domain" = String, Path, description = "Domain being configured")),
    responses(
        (status = 200, description = "Setup instructions", body = InstructionsResponse),
        (status = 400, description = "Invalid domain", body = ErrorSchema)
    ),
    tags = ["domains"],
    operation_id = "getDomainInstructions"
)]
#[get("/domains/instructions/{domain}")]
pub async fn domain_instructions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<InstructionsResponse>> {
    let instructions = state.domains.instructions(path.into_inner()).await?;
    Ok(web::Json(InstructionsResponse::from(instructions)))
}

#[cfg(test)]
#[path = "domains_tests.rs"]
mod tests;
