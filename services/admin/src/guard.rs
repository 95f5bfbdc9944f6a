//! Per-route capability checks.

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;

use hrdesk_auth_types::identity::IdentityHeaders;
use hrdesk_domain::access::{Capability, permits};

use crate::error::AdminServiceError;

/// Reject the request unless the caller's role holds `capability`.
///
/// Missing identity headers are rejected with 401 by the extractor.
pub async fn require_capability(
    State(capability): State<Capability>,
    identity: IdentityHeaders,
    request: Request,
    next: Next,
) -> Result<Response, AdminServiceError> {
    if !permits(identity.user_role, capability) {
        tracing::info!(
            user_id = identity.user_id,
            role = %identity.user_role,
            ?capability,
            "capability denied"
        );
        return Err(AdminServiceError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Attach a capability check to one method route.
pub fn guarded<S>(route: MethodRouter<S>, capability: Capability) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(capability, require_capability))
}
