//! Custom domain names and their validation policy.
//!
//! Validation is pure: no DNS or registrar lookups happen here. Input is
//! trimmed and lowercased before checks run, and checks run in a fixed
//! order: empty, length, label syntax, reserved denylist.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Maximum length of a fully qualified domain name.
pub const DOMAIN_NAME_MAX: usize = 253;
/// Maximum length of one dot-separated label.
pub const DOMAIN_LABEL_MAX: usize = 63;

const DEFAULT_RESERVED: &[&str] = &[
    "vercel.app",
    "vercel.com",
    "netlify.app",
    "herokuapp.com",
    "supabase.co",
    "firebaseapp.com",
    "mongodb.net",
    "localhost",
    "local",
    "test",
    "invalid",
    "example",
];

/// Reasons a candidate domain is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomainValidationError {
    /// Input was empty or whitespace.
    #[error("domain must not be empty")]
    Empty,
    /// Input exceeds [`DOMAIN_NAME_MAX`] characters.
    #[error("domain must be at most {DOMAIN_NAME_MAX} characters")]
    TooLong,
    /// Input is not a dot-separated sequence of valid DNS labels.
    #[error("domain is not a valid DNS name")]
    Format,
    /// Input, or its top-level label, is on the reserved denylist.
    #[error("domain is reserved and cannot be attached")]
    Reserved,
}

impl DomainValidationError {
    /// Machine-readable reason tag.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::TooLong => "TOO_LONG",
            Self::Format => "FORMAT",
            Self::Reserved => "RESERVED",
        }
    }
}

/// A syntactically valid, non-reserved, lowercase domain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Borrow the normalised name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Top-level label, e.g. `com` for `app.example.com`.
    pub fn top_level_label(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(self.0.as_str())
    }

    /// Rebuild a name already validated elsewhere, such as a stored row.
    ///
    /// Only syntax is checked; the denylist is not consulted because the
    /// value was accepted when it was first attached.
    pub fn from_trusted(value: impl Into<String>) -> Result<Self, DomainValidationError> {
        let normalised = normalise(&value.into());
        check_syntax(&normalised)?;
        Ok(Self(normalised))
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

/// Validation policy holding the reserved-name denylist.
///
/// # Examples
/// ```
/// use project_domains::domain::{DomainValidationError, DomainValidator};
///
/// let validator = DomainValidator::new("myapp.dev", Vec::<String>::new());
/// assert_eq!(validator.validate(" Shop.Example.COM ").unwrap().as_str(), "shop.example.com");
/// assert_eq!(validator.validate("myapp.dev"), Err(DomainValidationError::Reserved));
/// ```
#[derive(Debug, Clone)]
pub struct DomainValidator {
    reserved: BTreeSet<String>,
}

impl Default for DomainValidator {
    fn default() -> Self {
        Self {
            reserved: DEFAULT_RESERVED.iter().map(|name| (*name).to_owned()).collect(),
        }
    }
}

impl DomainValidator {
    /// Build a validator reserving the service base domain, the default
    /// vendor denylist, and any extra entries.
    pub fn new<I, S>(base_domain: &str, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validator = Self::default();
        validator.reserve(base_domain);
        for entry in extra {
            validator.reserve(entry.as_ref());
        }
        validator
    }

    fn reserve(&mut self, entry: &str) {
        let normalised = normalise(entry);
        if !normalised.is_empty() {
            self.reserved.insert(normalised);
        }
    }

    /// Validate `raw` and return its normalised form.
    pub fn validate(&self, raw: &str) -> Result<DomainName, DomainValidationError> {
        let candidate = normalise(raw);
        check_syntax(&candidate)?;
        let name = DomainName(candidate);
        if self.reserved.contains(name.as_str()) || self.reserved.contains(name.top_level_label()) {
            return Err(DomainValidationError::Reserved);
        }
        Ok(name)
    }
}

fn normalise(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn check_syntax(candidate: &str) -> Result<(), DomainValidationError> {
    if candidate.is_empty() {
        return Err(DomainValidationError::Empty);
    }
    if candidate.len() > DOMAIN_NAME_MAX {
        return Err(DomainValidationError::TooLong);
    }
    let labels: Vec<&str> = candidate.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_valid_label(label)) {
        return Err(DomainValidationError::Format);
    }
    let tld_is_alphabetic = labels
        .last()
        .is_some_and(|tld| tld.chars().all(|ch| ch.is_ascii_alphabetic()));
    if !tld_is_alphabetic {
        return Err(DomainValidationError::Format);
    }
    Ok(())
}

fn is_valid_label(label: &str) -> bool {
    (1..=DOMAIN_LABEL_MAX).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}
