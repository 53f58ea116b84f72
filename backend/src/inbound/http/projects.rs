//! Project creation endpoint.
//!
//! ```text
//! POST /api/projects
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::domains_dto::ProjectResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{NAME, require_field};

/// Body of `POST /api/projects`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateProjectBody {
    #[schema(example = "My Shop")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateProjectResponse {
    pub success: bool,
    pub project: ProjectResponse,
}

/// Create a project; its subdomain is derived from the name.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectBody,
    responses(
        (status = 201, description = "Project created", body = CreateProjectResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 409, description = "Subdomain already in use", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    payload: web::Json<CreateProjectBody>,
) -> ApiResult<HttpResponse> {
    let name = require_field(payload.into_inner().name, NAME)?;
    let project = state.projects.create_project(name).await?;
    Ok(HttpResponse::Created().json(CreateProjectResponse {
        success: true,
        project: project.into(),
    }))
}
