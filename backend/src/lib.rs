//! Project and custom-domain service library.
//!
//! Hexagonal layout: `domain` holds types, services, and ports; `outbound`
//! implements those ports against the registrar API, DNS, and Postgres;
//! `inbound` exposes the driving ports over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
