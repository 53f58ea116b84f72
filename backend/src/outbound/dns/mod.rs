//! DNS outbound adapters.

mod resolver;

pub use resolver::SystemNameserverResolver;
