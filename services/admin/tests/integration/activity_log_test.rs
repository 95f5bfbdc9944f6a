use std::path::Path;

use hrdesk_admin::domain::types::ActivityLogFilter;
use hrdesk_admin::error::AdminServiceError;
use hrdesk_admin::usecase::activity_log::{ClearActivityLogsUseCase, ListActivityLogsUseCase};
use hrdesk_admin::usecase::audit::AuditEvent;
use hrdesk_admin::usecase::network_path::{GetNetworkPathUseCase, UpdateNetworkPathUseCase};
use hrdesk_auth_types::context::RequestContext;
use hrdesk_domain::audit::{AuditAction, AuditTarget};
use hrdesk_domain::pagination::PageRequest;

use crate::helpers::{MockActivityLogRepo, MockNetworkPathRepo, admin, ctx, hr};

async fn seeded() -> MockActivityLogRepo {
    let repo = MockActivityLogRepo::default();
    let trail = repo.trail();
    trail
        .record(
            &ctx(admin()),
            AuditEvent::new(AuditAction::UserCreated)
                .description("Created user Maria")
                .target(AuditTarget::User(7)),
        )
        .await;
    trail
        .record(
            &ctx(hr()),
            AuditEvent::new(AuditAction::BusinessUnitCreated).description("Created business unit Ops"),
        )
        .await;
    trail
        .record(
            &RequestContext::system(),
            AuditEvent::new(AuditAction::UserDeleted).description("Deleted user Pedro"),
        )
        .await;
    repo
}

#[tokio::test]
async fn should_list_newest_first_with_distinct_actions() {
    let repo = seeded().await;

    let index = ListActivityLogsUseCase { repo }
        .execute(ActivityLogFilter::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(index.logs.meta.total, 3);
    assert_eq!(index.logs.items[0].action, "user_deleted");
    assert_eq!(index.logs.items[0].user_id, None);
    assert_eq!(index.logs.items[2].action, "user_created");
    assert_eq!(
        index.actions,
        vec!["business_unit_created", "user_created", "user_deleted"]
    );
}

#[tokio::test]
async fn should_filter_by_actions_and_ignore_blank_ones() {
    let repo = seeded().await;

    let index = ListActivityLogsUseCase { repo }
        .execute(
            ActivityLogFilter {
                search: Some("   ".to_owned()),
                user_id: None,
                actions: vec!["user_created".to_owned(), String::new(), "user_deleted".to_owned()],
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(index.logs.meta.total, 2);
    assert!(index.logs.items.iter().all(|log| log.action.starts_with("user_")));
}

#[tokio::test]
async fn should_filter_by_actor_and_search() {
    let repo = seeded().await;

    let index = ListActivityLogsUseCase { repo }
        .execute(
            ActivityLogFilter {
                search: Some("maria".to_owned()),
                user_id: Some(1),
                actions: vec![],
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(index.logs.meta.total, 1);
    assert_eq!(index.logs.items[0].target, Some(AuditTarget::User(7)));
}

#[tokio::test]
async fn should_leave_log_empty_after_clear() {
    let repo = seeded().await;

    let deleted = ClearActivityLogsUseCase { repo: repo.clone() }
        .execute(admin())
        .await
        .unwrap();

    assert_eq!(deleted, 3);
    let index = ListActivityLogsUseCase { repo }
        .execute(ActivityLogFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(index.logs.meta.total, 0);
    assert!(index.actions.is_empty());
}

// ── Network path setting ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_fall_back_to_configured_network_root() {
    let setting = GetNetworkPathUseCase {
        repo: MockNetworkPathRepo::default(),
        fallback: Path::new("/mnt/ids"),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(setting.value, "/mnt/ids");
    assert!(!setting.overridden);
}

#[tokio::test]
async fn should_store_and_audit_network_root_change() {
    let repo = MockNetworkPathRepo::default();
    let logs = MockActivityLogRepo::default();
    let uc = UpdateNetworkPathUseCase {
        repo: repo.clone(),
        fallback: Path::new("/mnt/ids"),
        audit: logs.trail(),
    };

    let setting = uc.execute(&ctx(admin()), Some(" //nas/ids ")).await.unwrap();
    assert_eq!(setting.value, "//nas/ids");
    assert!(setting.overridden);

    // Saving the same value again is a no-op.
    uc.execute(&ctx(admin()), Some("//nas/ids")).await.unwrap();

    let stored = GetNetworkPathUseCase {
        repo,
        fallback: Path::new("/mnt/ids"),
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(stored.value, "//nas/ids");

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "network_path_updated");
    assert_eq!(logs[0].properties.as_ref().unwrap()["old"], "/mnt/ids");
    assert_eq!(logs[0].properties.as_ref().unwrap()["new"], "//nas/ids");
}

#[tokio::test]
async fn should_reject_blank_network_root() {
    let result = UpdateNetworkPathUseCase {
        repo: MockNetworkPathRepo::default(),
        fallback: Path::new("/mnt/ids"),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), Some("  "))
    .await;

    assert!(
        matches!(&result, Err(AdminServiceError::Validation(errors)) if errors.contains("value")),
        "expected value error, got {result:?}"
    );
}
