//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-hrdesk-user-id` + `x-hrdesk-user-role` headers
//! injected by the gateway. In tests, `MockAuth` produces these headers directly
//! so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use hrdesk_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use hrdesk_domain::user::UserRole;

/// Configurable identity injected into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: i32,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: i32, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn admin(user_id: i32) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    pub fn hr(user_id: i32) -> Self {
        Self::new(user_id, UserRole::Hr)
    }

    pub fn user_id_header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from(self.user_id),
        )
    }

    pub fn user_role_header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static(self.user_role.as_str()),
        )
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let (name, value) = self.user_id_header();
        map.insert(name, value);
        let (name, value) = self.user_role_header();
        map.insert(name, value);
        map
    }
}
