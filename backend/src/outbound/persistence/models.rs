//! Diesel row structs for the `projects` table.
//!
//! Internal to the persistence adapter; the domain only ever sees
//! [`Project`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    DomainAttachment, DomainName, DomainStatus, Project, ProjectId, ProjectName, Subdomain,
};

use super::schema::projects;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: Uuid,
    pub project_name: String,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub domain_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub id: Uuid,
    pub project_name: &'a str,
    pub subdomain: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writes `custom_domain` and `domain_status` together.
///
/// `None` fields are written as SQL `NULL`, which is how a domain is
/// cleared.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DomainAttachmentUpdate<'a> {
    pub custom_domain: Option<&'a str>,
    pub domain_status: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Project> for NewProjectRow<'a> {
    fn from(project: &'a Project) -> Self {
        Self {
            id: *project.id.as_uuid(),
            project_name: project.name.as_str(),
            subdomain: project.subdomain.as_str(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl TryFrom<ProjectRow> for Project {
    type Error = String;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let name = ProjectName::new(row.project_name)
            .map_err(|err| format!("stored project name: {err}"))?;
        let subdomain =
            Subdomain::new(row.subdomain).map_err(|err| format!("stored subdomain: {err}"))?;
        let custom_domain = match (row.custom_domain, row.domain_status) {
            (None, None) => None,
            (Some(domain), Some(status)) => Some(DomainAttachment {
                domain: DomainName::from_trusted(domain)
                    .map_err(|err| format!("stored custom domain: {err}"))?,
                status: status
                    .parse::<DomainStatus>()
                    .map_err(|err| format!("stored domain status: {err}"))?,
            }),
            (domain, status) => {
                return Err(format!(
                    "custom domain {domain:?} and status {status:?} must be set together"
                ));
            }
        };

        Ok(Self {
            id: ProjectId::from(row.id),
            name,
            subdomain,
            custom_domain,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
