//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **registrar**: hosting provider domain API over `reqwest`
//! - **dns**: authoritative nameserver lookups via `trust-dns-resolver`
//! - **persistence**: PostgreSQL project store using Diesel, plus an
//!   in-memory store for database-less runs
//!
//! Adapters translate between domain types and wire or row formats. They
//! contain no business logic.

pub mod dns;
pub mod persistence;
pub mod registrar;
