//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports,
//! so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DomainWorkflow, ProjectCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub domains: Arc<dyn DomainWorkflow>,
    pub projects: Arc<dyn ProjectCommand>,
}

impl HttpState {
    pub fn new(domains: Arc<dyn DomainWorkflow>, projects: Arc<dyn ProjectCommand>) -> Self {
        Self { domains, projects }
    }
}
