//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod domain_registrar;
mod domain_workflow;
mod nameserver_resolver;
mod project_command;
mod project_repository;
mod verification_sleeper;

#[cfg(test)]
pub use domain_registrar::MockDomainRegistrar;
pub use domain_registrar::{
    DomainConfig, DomainRegistrar, DomainRegistrarError, FixtureDomainRegistrar,
    RegisteredDomain, VerificationRecord,
};
#[cfg(test)]
pub use domain_workflow::MockDomainWorkflow;
pub use domain_workflow::{
    AttachDomainOutcome, AttachDomainRequest, DomainAvailability, DomainWorkflow,
    ProjectDomainRequest, RemoveDomainOutcome, SetupInstructions, UnavailableReason,
    VerifyDomainOutcome,
};
#[cfg(test)]
pub use nameserver_resolver::MockNameserverResolver;
pub use nameserver_resolver::{
    FixtureNameserverResolver, NameserverLookupError, NameserverResolver,
};
#[cfg(test)]
pub use project_command::MockProjectCommand;
pub use project_command::ProjectCommand;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectRepository, ProjectRepositoryError};
pub use verification_sleeper::{NoopSleeper, TokioSleeper, VerificationSleeper};
