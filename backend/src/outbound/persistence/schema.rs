//! Diesel table definitions.
//!
//! Must match `backend/migrations`. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Projects and their optional custom domain.
    ///
    /// `subdomain` and `custom_domain` carry unique constraints named
    /// `projects_subdomain_key` and `projects_custom_domain_key`.
    /// `custom_domain` and `domain_status` are either both null or both set.
    projects (id) {
        id -> Uuid,
        project_name -> Varchar,
        subdomain -> Varchar,
        custom_domain -> Nullable<Varchar>,
        /// One of `pending`, `added`, `verified`, `failed`.
        domain_status -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
