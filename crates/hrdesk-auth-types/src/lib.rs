//! Request identity types shared across hrdesk services.
//!
//! Provides the `IdentityHeaders` extractor and the audit `RequestContext`.

pub mod context;
pub mod identity;
