//! OpenAPI document for the REST API.
//!
//! Registers the domain and project endpoints, the health probes, and the
//! error envelope schemas. Served by Swagger UI in debug builds.

use crate::inbound::http::domains_dto::{
    AttachDomainBody, AttachDomainResponse, AvailabilityResponse, DnsRecordResponse, DomainBody,
    InstructionsResponse, ProjectResponse, RegisteredDomainResponse, RemoveDomainResponse,
    VerificationRecordResponse, VerificationStatusResponse, VerifyDomainResponse,
};
use crate::inbound::http::projects::{CreateProjectBody, CreateProjectResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Project domains API",
        description = "Projects, derived subdomains, and registrar-backed custom domains."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::projects::create_project,
        crate::inbound::http::domains::attach_domain,
        crate::inbound::http::domains::verify_domain,
        crate::inbound::http::domains::remove_domain,
        crate::inbound::http::domains::check_domain,
        crate::inbound::http::domains::domain_instructions,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateProjectBody,
        CreateProjectResponse,
        ProjectResponse,
        AttachDomainBody,
        AttachDomainResponse,
        RegisteredDomainResponse,
        VerificationRecordResponse,
        DomainBody,
        VerifyDomainResponse,
        VerificationStatusResponse,
        RemoveDomainResponse,
        AvailabilityResponse,
        InstructionsResponse,
        DnsRecordResponse,
    )),
    tags(
        (name = "projects", description = "Project creation"),
        (name = "domains", description = "Custom domain attach, verify, and removal"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
