use serde::Serialize;
use serde_json::{Map, Value, json};

use hrdesk_auth_types::context::RequestContext;
use hrdesk_domain::audit::{AuditAction, AuditTarget};

use crate::domain::repository::ActivityLogRepository;
use crate::domain::types::{ActivityLog, NewActivityLog};

/// One thing an actor did, as handed to [`AuditTrail::record`].
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub description: Option<String>,
    pub target: Option<AuditTarget>,
    pub properties: Option<Value>,
}

impl AuditEvent {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            description: None,
            target: None,
            properties: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn target(mut self, target: AuditTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn properties(mut self, properties: Value) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// Single write path into the activity log.
///
/// Recording happens after the primary write has committed. A failed insert
/// is logged and swallowed so an audit outage never fails a mutation.
pub struct AuditTrail<A: ActivityLogRepository> {
    pub repo: A,
}

impl<A: ActivityLogRepository> AuditTrail<A> {
    pub async fn record(&self, ctx: &RequestContext, event: AuditEvent) -> Option<ActivityLog> {
        let entry = NewActivityLog {
            user_id: ctx.actor_id(),
            action: event.action.as_str().to_owned(),
            description: event.description,
            target: event.target,
            properties: event.properties,
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
        };
        match self.repo.insert(&entry).await {
            Ok(log) => Some(log),
            Err(e) => {
                tracing::warn!(error = ?e, action = %entry.action, "failed to write activity log");
                None
            }
        }
    }
}

/// Field-level `{old, new}` pairs for fields whose value actually changed.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet(Map<String, Value>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track<T>(&mut self, field: &str, old: &T, new: &T)
    where
        T: Serialize + PartialEq + ?Sized,
    {
        if old != new {
            self.0
                .insert(field.to_owned(), json!({ "old": old, "new": new }));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `{"changes": {field: {"old", "new"}}}`
    pub fn into_properties(self) -> Value {
        json!({ "changes": self.0 })
    }
}
