//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

use hrdesk_domain::user::{Actor, UserRole};

pub const USER_ID_HEADER: &str = "x-hrdesk-user-id";
pub const USER_ROLE_HEADER: &str = "x-hrdesk-user-role";

/// Account identity injected by the gateway via `x-hrdesk-user-id` and `x-hrdesk-user-role`.
///
/// Returns 401 if either header is absent or malformed.
/// Capability checks (403) happen in the service's route guard.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub user_id: i32,
    pub user_role: UserRole,
}

impl IdentityHeaders {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.user_role,
        }
    }

    /// Read identity from request headers without rejecting.
    pub fn from_parts(parts: &Parts) -> Option<Self> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i32>().ok())?;
        let user_role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<UserRole>().ok())?;
        Some(Self { user_id, user_role })
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously and return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = Self::from_parts(parts);
        async move { identity.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
