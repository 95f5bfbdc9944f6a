pub mod activity_log;
pub mod business_unit;
pub mod employee;
pub mod form;
pub mod health;
pub mod settings;
pub mod template;
pub mod user;

use serde::Serialize;
use serde::de::DeserializeOwned;

use hrdesk_domain::pagination::{Page, PageMeta};

use crate::error::AdminServiceError;

/// Decode a bracket-style query string (`action[]=a&action[]=b`).
pub(crate) fn parse_query<T>(raw_query: Option<&str>) -> Result<T, AdminServiceError>
where
    T: DeserializeOwned + Default,
{
    Ok(raw_query
        .filter(|q| !q.is_empty())
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| {
            tracing::debug!(error = %e, "malformed query string");
            AdminServiceError::MalformedRequest
        })?
        .unwrap_or_default())
}

/// Paginated listing as rendered to the client.
#[derive(Serialize)]
pub struct PageResponse<T, F> {
    pub data: Vec<T>,
    pub meta: PageMeta,
    pub filters: F,
}

impl<T, F> PageResponse<T, F> {
    pub fn new<U>(page: Page<U>, filters: F, f: impl FnMut(U) -> T) -> Self {
        let page = page.map(f);
        Self {
            data: page.items,
            meta: page.meta,
            filters,
        }
    }
}
