//! PostgreSQL-backed `ProjectRepository` using Diesel.
//!
//! Uniqueness of subdomains and custom domains lives in the table's unique
//! constraints; violations are translated into the port's `*Taken`
//! variants by constraint name.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::{DomainName, DomainStatus, Project, ProjectId, Subdomain};

use super::models::{DomainAttachmentUpdate, NewProjectRow, ProjectRow};
use super::pool::{DbPool, PoolError};
use super::schema::projects;

const SUBDOMAIN_CONSTRAINT: &str = "projects_subdomain_key";
const CUSTOM_DOMAIN_CONSTRAINT: &str = "projects_custom_domain_key";

/// Diesel implementation of [`ProjectRepository`].
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Value a write was trying to claim, used to word unique violations.
#[derive(Debug, Clone, Copy)]
enum Claim<'a> {
    Subdomain(&'a Subdomain),
    CustomDomain(&'a DomainName),
    Nothing,
}

fn map_pool_error(error: PoolError) -> ProjectRepositoryError {
    ProjectRepositoryError::connection(error.message())
}

fn map_unique_violation(constraint: Option<&str>, claim: Claim<'_>) -> ProjectRepositoryError {
    match (constraint, claim) {
        (Some(SUBDOMAIN_CONSTRAINT), Claim::Subdomain(subdomain)) => {
            ProjectRepositoryError::subdomain_taken(subdomain.as_str())
        }
        (Some(CUSTOM_DOMAIN_CONSTRAINT), Claim::CustomDomain(domain)) => {
            ProjectRepositoryError::custom_domain_taken(domain.as_str())
        }
        _ => {
            warn!(
                constraint_name = ?constraint,
                ?claim,
                "unrecognised unique violation on projects"
            );
            ProjectRepositoryError::query("unique constraint violated")
        }
    }
}

fn map_diesel_error(error: DieselError, claim: Claim<'_>) -> ProjectRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => ProjectRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ProjectRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            map_unique_violation(info.constraint_name(), claim)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProjectRepositoryError::connection("database connection error")
        }
        _ => ProjectRepositoryError::query("database error"),
    }
}

fn row_to_project(row: ProjectRow) -> Result<Project, ProjectRepositoryError> {
    Project::try_from(row).map_err(ProjectRepositoryError::query)
}

fn require_row(
    row: Option<ProjectRow>,
    id: &ProjectId,
) -> Result<Project, ProjectRepositoryError> {
    row.map_or_else(
        || Err(ProjectRepositoryError::not_found(id.to_string())),
        row_to_project,
    )
}

/// Explain a claim that matched no row: the project either vanished or
/// already holds a domain.
fn missed_claim(project_exists: bool, id: &ProjectId) -> ProjectRepositoryError {
    if project_exists {
        ProjectRepositoryError::domain_already_attached(id.to_string())
    } else {
        ProjectRepositoryError::not_found(id.to_string())
    }
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = projects::table
            .find(*id.as_uuid())
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Claim::Nothing))?;

        row.map(row_to_project).transpose()
    }

    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = projects::table
            .filter(projects::subdomain.eq(subdomain.as_str()))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Claim::Nothing))?;

        row.map(row_to_project).transpose()
    }

    async fn find_by_custom_domain(
        &self,
        domain: &DomainName,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = projects::table
            .filter(projects::custom_domain.eq(domain.as_str()))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Claim::Nothing))?;

        row.map(row_to_project).transpose()
    }

    async fn create(&self, project: &Project) -> Result<(), ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(projects::table)
            .values(NewProjectRow::from(project))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, Claim::Subdomain(&project.subdomain)))
    }

    async fn attach_domain(
        &self,
        id: &ProjectId,
        domain: &DomainName,
        status: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = DomainAttachmentUpdate {
            custom_domain: Some(domain.as_str()),
            domain_status: Some(status.as_str()),
            updated_at: Utc::now(),
        };

        let row: Option<ProjectRow> = diesel::update(
            projects::table
                .find(*id.as_uuid())
                .filter(projects::custom_domain.is_null()),
        )
        .set(&update)
        .returning(ProjectRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, Claim::CustomDomain(domain)))?;

        if let Some(row) = row {
            return row_to_project(row);
        }
        let existing: Option<uuid::Uuid> = projects::table
            .find(*id.as_uuid())
            .select(projects::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Claim::Nothing))?;
        Err(missed_claim(existing.is_some(), id))
    }

    async fn update_status(
        &self,
        id: &ProjectId,
        status: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = diesel::update(
            projects::table
                .find(*id.as_uuid())
                .filter(projects::custom_domain.is_not_null()),
        )
        .set((
            projects::domain_status.eq(status.as_str()),
            projects::updated_at.eq(Utc::now()),
        ))
        .returning(ProjectRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, Claim::Nothing))?;

        require_row(row, id)
    }

    async fn transition_status(
        &self,
        id: &ProjectId,
        domain: &DomainName,
        from: DomainStatus,
        to: DomainStatus,
    ) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = diesel::update(
            projects::table
                .find(*id.as_uuid())
                .filter(projects::custom_domain.eq(domain.as_str()))
                .filter(projects::domain_status.eq(from.as_str())),
        )
        .set((
            projects::domain_status.eq(to.as_str()),
            projects::updated_at.eq(Utc::now()),
        ))
        .returning(ProjectRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, Claim::Nothing))?;

        require_row(row, id)
    }

    async fn clear_domain(&self, id: &ProjectId) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = DomainAttachmentUpdate {
            custom_domain: None,
            domain_status: None,
            updated_at: Utc::now(),
        };

        let row: Option<ProjectRow> = diesel::update(projects::table.find(*id.as_uuid()))
            .set(&update)
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, Claim::Nothing))?;

        require_row(row, id)
    }
}
