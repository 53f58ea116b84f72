//! Project store adapters.
//!
//! `DieselProjectRepository` persists projects in PostgreSQL through
//! `diesel-async` and a `bb8` pool; row structs and the table definition
//! stay private to this module. `InMemoryProjectRepository` backs local
//! runs and tests when no database URL is configured.
//!
//! # Example
//!
//! ```ignore
//! use project_domains::outbound::persistence::{DbPool, DieselProjectRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/projects")).await?;
//! let repo = DieselProjectRepository::new(pool);
//! ```

mod diesel_project_repository;
mod in_memory_project_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_project_repository::DieselProjectRepository;
pub use in_memory_project_repository::InMemoryProjectRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
