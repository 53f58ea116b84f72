//! HTTP inbound adapter exposing REST endpoints.

pub mod domains;
pub mod domains_dto;
pub mod error;
pub mod health;
pub mod projects;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;
