//! Request context captured for the audit trail.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum_extra::headers::{HeaderMapExt, UserAgent};
use http::request::Parts;

use hrdesk_domain::user::Actor;

use crate::identity::IdentityHeaders;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Who is acting and from where. Every field degrades to `None` when the
/// information is unavailable; extraction never rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub actor: Option<Actor>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Context for work not triggered by an HTTP request.
    pub fn system() -> Self {
        Self::default()
    }

    pub fn actor_id(&self) -> Option<i32> {
        self.actor.map(|actor| actor.user_id)
    }

    pub fn from_parts(parts: &Parts) -> Self {
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        let user_agent = parts
            .headers
            .typed_get::<UserAgent>()
            .map(|ua| ua.as_str().to_owned());

        Self {
            actor: IdentityHeaders::from_parts(parts).map(|identity| identity.actor()),
            ip_address: forwarded.or(peer),
            user_agent,
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let context = Self::from_parts(parts);
        async move { Ok(context) }
    }
}
