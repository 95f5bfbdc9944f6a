//! Shared infrastructure for hrdesk services: health probes, request ids,
//! tracing setup, serde helpers, sea-orm query helpers and validation errors.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
pub mod validation;
