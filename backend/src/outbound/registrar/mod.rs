//! Registrar outbound adapters.
//!
//! This module provides an HTTP implementation of the `DomainRegistrar`
//! port against the hosting provider's domain API.

mod dto;
mod http_client;

pub use http_client::{RegistrarClientBuildError, RegistrarConfig, RegistrarHttpClient};
