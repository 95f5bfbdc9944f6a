use hrdesk_domain::pagination::{Page, PageRequest};
use hrdesk_domain::user::Actor;

use crate::domain::repository::ActivityLogRepository;
use crate::domain::types::{ActivityLog, ActivityLogFilter};
use crate::error::AdminServiceError;

pub struct ActivityLogIndex {
    pub logs: Page<ActivityLog>,
    /// Distinct stored action tags, for the filter dropdown.
    pub actions: Vec<String>,
}

// ── ListActivityLogs ─────────────────────────────────────────────────────────

pub struct ListActivityLogsUseCase<A: ActivityLogRepository> {
    pub repo: A,
}

impl<A: ActivityLogRepository> ListActivityLogsUseCase<A> {
    pub async fn execute(
        &self,
        mut filter: ActivityLogFilter,
        page: PageRequest,
    ) -> Result<ActivityLogIndex, AdminServiceError> {
        filter.search = filter
            .search
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        filter.actions.retain(|action| !action.trim().is_empty());

        let logs = self.repo.list(&filter, page.clamped()).await?;
        let actions = self.repo.actions().await?;
        Ok(ActivityLogIndex { logs, actions })
    }
}

// ── ClearActivityLogs ────────────────────────────────────────────────────────

pub struct ClearActivityLogsUseCase<A: ActivityLogRepository> {
    pub repo: A,
}

impl<A: ActivityLogRepository> ClearActivityLogsUseCase<A> {
    /// Remove every entry. The clear itself is only traced, never logged to the table.
    pub async fn execute(&self, actor: Actor) -> Result<u64, AdminServiceError> {
        let deleted = self.repo.clear().await?;
        tracing::info!(
            user_id = actor.user_id,
            role = %actor.role,
            deleted,
            "activity log cleared"
        );
        Ok(deleted)
    }
}
