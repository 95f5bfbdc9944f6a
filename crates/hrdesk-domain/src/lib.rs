//! Domain types shared across hrdesk services.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod access;
pub mod audit;
pub mod employee;
pub mod layout;
pub mod pagination;
pub mod user;
