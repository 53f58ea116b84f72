//! Project aggregate and its value types.
//!
//! A project carries a display name, a unique subdomain derived from that
//! name, and at most one custom domain. The custom domain and its
//! attachment status always travel together as a [`DomainAttachment`], so a
//! project without a custom domain has no status at all.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainName;

/// Maximum length of a project name, in characters.
pub const PROJECT_NAME_MAX: usize = 50;
/// Maximum length of a derived subdomain.
pub const SUBDOMAIN_MAX: usize = 50;

/// Validation errors for project value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectValidationError {
    #[error("project id must be a valid UUID")]
    InvalidId,
    #[error("project name must not be empty")]
    EmptyName,
    #[error("project name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("project name does not produce a usable subdomain")]
    EmptySubdomain,
    #[error("subdomain must be 1-{SUBDOMAIN_MAX} lowercase letters, digits, or inner hyphens")]
    InvalidSubdomain,
    #[error("unknown domain status: {0}")]
    UnknownStatus(String),
}

/// Stable project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ProjectId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for ProjectId {
    type Err = ProjectValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ProjectValidationError::InvalidId)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trimmed, non-empty display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        if trimmed.chars().count() > PROJECT_NAME_MAX {
            return Err(ProjectValidationError::NameTooLong {
                max: PROJECT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locally unique slug used as the project's default access path.
///
/// # Examples
/// ```
/// use project_domains::domain::{ProjectName, Subdomain};
///
/// let name = ProjectName::new("  My Shop!! 2024 ").expect("valid name");
/// let subdomain = Subdomain::derive(&name).expect("derivable");
/// assert_eq!(subdomain.as_str(), "my-shop-2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subdomain(String);

impl Subdomain {
    /// Derive a subdomain from a project name.
    ///
    /// Every run of characters outside `[a-z0-9]` collapses to one hyphen,
    /// edge hyphens are trimmed, and the result is cut to [`SUBDOMAIN_MAX`].
    pub fn derive(name: &ProjectName) -> Result<Self, ProjectValidationError> {
        let mut slug = String::with_capacity(name.as_str().len());
        for ch in name.as_str().chars().flat_map(char::to_lowercase) {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                slug.push(ch);
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        let trimmed: String = slug.trim_matches('-').chars().take(SUBDOMAIN_MAX).collect();
        let trimmed = trimmed.trim_end_matches('-');
        if trimmed.is_empty() {
            return Err(ProjectValidationError::EmptySubdomain);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Validate a stored subdomain.
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectValidationError> {
        let raw = value.into();
        let well_formed = (1..=SUBDOMAIN_MAX).contains(&raw.len())
            && !raw.starts_with('-')
            && !raw.ends_with('-')
            && raw
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        if !well_formed {
            return Err(ProjectValidationError::InvalidSubdomain);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Subdomain {
    type Error = ProjectValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Subdomain> for String {
    fn from(value: Subdomain) -> Self {
        value.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment state of a custom domain.
///
/// `Pending` is the local claim made before the registrar call, `Added`
/// means the registrar accepted the domain, `Verified` means the provider
/// reports it verified and its nameservers point at the provider, and
/// `Failed` means the registrar rejected the add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Pending,
    Added,
    Verified,
    Failed,
}

impl DomainStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Added => "added",
            Self::Verified => "verified",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainStatus {
    type Err = ProjectValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "added" => Ok(Self::Added),
            "verified" => Ok(Self::Verified),
            "failed" => Ok(Self::Failed),
            other => Err(ProjectValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// A custom domain bound to a project together with its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAttachment {
    pub domain: DomainName,
    pub status: DomainStatus,
}

impl DomainAttachment {
    /// Whether this attachment is exactly `domain` in `status`.
    pub fn is(&self, domain: &DomainName, status: DomainStatus) -> bool {
        &self.domain == domain && self.status == status
    }
}

/// Project aggregate as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: ProjectName,
    pub subdomain: Subdomain,
    pub custom_domain: Option<DomainAttachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a new project with no custom domain.
    pub fn new(name: ProjectName, subdomain: Subdomain, now: DateTime<Utc>) -> Self {
        Self {
            id: ProjectId::random(),
            name,
            subdomain,
            custom_domain: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Currently attached domain name, if any.
    pub fn domain(&self) -> Option<&DomainName> {
        self.custom_domain.as_ref().map(|attachment| &attachment.domain)
    }

    /// Current attachment status, if a domain is attached.
    pub fn domain_status(&self) -> Option<DomainStatus> {
        self.custom_domain.as_ref().map(|attachment| attachment.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn name(raw: &str) -> ProjectName {
        ProjectName::new(raw).expect("valid project name")
    }

    #[rstest]
    #[case("My Shop", "my-shop")]
    #[case("  Hello,   World!! ", "hello-world")]
    #[case("ALLCAPS", "allcaps")]
    #[case("café au lait", "caf-au-lait")]
    #[case("--edge--case--", "edge-case")]
    #[case("v2.0 release", "v2-0-release")]
    fn derives_subdomains(#[case] raw: &str, #[case] expected: &str) {
        let subdomain = Subdomain::derive(&name(raw)).expect("derivable");
        assert_eq!(subdomain.as_str(), expected);
    }

    #[rstest]
    fn derived_subdomain_is_truncated_without_trailing_hyphen() {
        let raw = format!("{} tail", "a".repeat(SUBDOMAIN_MAX - 1));
        let subdomain = Subdomain::derive(&name(&raw)).expect("derivable");
        assert_eq!(subdomain.as_str(), "a".repeat(SUBDOMAIN_MAX - 1));
    }

    #[rstest]
    fn symbol_only_names_cannot_derive_a_subdomain() {
        let result = Subdomain::derive(&name("!!! ???"));
        assert_eq!(result, Err(ProjectValidationError::EmptySubdomain));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(#[case] raw: &str) {
        assert_eq!(ProjectName::new(raw), Err(ProjectValidationError::EmptyName));
    }

    #[rstest]
    fn overlong_names_are_rejected() {
        let raw = "n".repeat(PROJECT_NAME_MAX + 1);
        assert_eq!(
            ProjectName::new(raw),
            Err(ProjectValidationError::NameTooLong {
                max: PROJECT_NAME_MAX
            })
        );
    }

    #[rstest]
    #[case("-lead")]
    #[case("trail-")]
    #[case("Upper")]
    #[case("")]
    fn stored_subdomains_are_validated(#[case] raw: &str) {
        assert_eq!(
            Subdomain::new(raw),
            Err(ProjectValidationError::InvalidSubdomain)
        );
    }

    #[rstest]
    #[case(DomainStatus::Pending)]
    #[case(DomainStatus::Added)]
    #[case(DomainStatus::Verified)]
    #[case(DomainStatus::Failed)]
    fn status_parses_its_own_tag(#[case] status: DomainStatus) {
        assert_eq!(status.as_str().parse::<DomainStatus>(), Ok(status));
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            "gone".parse::<DomainStatus>(),
            Err(ProjectValidationError::UnknownStatus(tag)) if tag == "gone"
        ));
    }

    #[rstest]
    fn new_projects_have_no_domain_or_status() {
        let project_name = name("Docs");
        let subdomain = Subdomain::derive(&project_name).expect("derivable");
        let project = Project::new(project_name, subdomain, Utc::now());
        assert!(project.domain().is_none());
        assert!(project.domain_status().is_none());
    }
}
