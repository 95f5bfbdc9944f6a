use hrdesk_admin::error::AdminServiceError;
use hrdesk_admin::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, ListUsersUseCase, UpdateUserInput,
    UpdateUserUseCase,
};
use hrdesk_domain::audit::AuditTarget;
use hrdesk_domain::pagination::PageRequest;
use hrdesk_domain::user::{Actor, UserRole};

use crate::helpers::{
    MockActivityLogRepo, MockPasswordHasher, MockUserRepo, admin, ctx, hr, test_user,
};

fn create_input(email: &str, role: Option<&str>) -> CreateUserInput {
    CreateUserInput {
        name: " Maria Santos ".to_owned(),
        email: email.to_owned(),
        password: "secret-pass".to_owned(),
        password_confirmation: "secret-pass".to_owned(),
        role: role.map(str::to_owned),
    }
}

fn update_input(email: &str) -> UpdateUserInput {
    UpdateUserInput {
        name: "Renamed".to_owned(),
        email: email.to_owned(),
        role: Some("HR".to_owned()),
        password: None,
        password_confirmation: None,
    }
}

#[tokio::test]
async fn should_create_verified_user_with_hashed_password() {
    let repo = MockUserRepo::default();
    let logs = MockActivityLogRepo::default();

    let user = CreateUserUseCase {
        repo: repo.clone(),
        hasher: MockPasswordHasher,
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), admin(), create_input(" Maria@Example.COM ", Some("Admin")))
    .await
    .unwrap();

    assert_eq!(user.name, "Maria Santos");
    assert_eq!(user.email, "maria@example.com");
    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(user.password_hash, "hashed:secret-pass");
    assert!(user.email_verified_at.is_some());

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].action, "user_created");
    assert_eq!(logs[0].target, Some(AuditTarget::User(user.id)));
    assert_eq!(logs[0].properties.as_ref().unwrap()["role"], "Admin");
}

#[tokio::test]
async fn should_force_hr_role_when_hr_creates_admin() {
    let user = CreateUserUseCase {
        repo: MockUserRepo::default(),
        hasher: MockPasswordHasher,
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(hr()), hr(), create_input("new@example.com", Some("Admin")))
    .await
    .unwrap();

    assert_eq!(user.role, UserRole::Hr);
}

#[tokio::test]
async fn should_reject_taken_email_and_mismatched_confirmation() {
    let repo = MockUserRepo::new(vec![test_user(3, "taken@example.com", UserRole::Hr)]);

    let mut input = create_input("TAKEN@example.com", None);
    input.password_confirmation = "different".to_owned();
    let result = CreateUserUseCase {
        repo: repo.clone(),
        hasher: MockPasswordHasher,
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), admin(), input)
    .await;

    match result {
        Err(AdminServiceError::Validation(errors)) => {
            assert!(errors.contains("email"));
            assert!(errors.contains("password_confirmation"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(repo.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_unknown_role() {
    let result = CreateUserUseCase {
        repo: MockUserRepo::default(),
        hasher: MockPasswordHasher,
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), admin(), create_input("x@example.com", Some("Owner")))
    .await;

    assert!(
        matches!(&result, Err(AdminServiceError::Validation(errors)) if errors.contains("role")),
        "expected role error, got {result:?}"
    );
}

#[tokio::test]
async fn should_keep_password_when_update_leaves_it_blank() {
    let repo = MockUserRepo::new(vec![test_user(3, "hr@example.com", UserRole::Hr)]);
    let logs = MockActivityLogRepo::default();

    let mut input = update_input("hr@example.com");
    input.password = Some(String::new());
    let user = UpdateUserUseCase {
        repo: repo.clone(),
        hasher: MockPasswordHasher,
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), admin(), 3, input)
    .await
    .unwrap();

    assert_eq!(user.name, "Renamed");
    assert_eq!(user.password_hash, "hashed:original");
    let logs = logs.logs_handle();
    assert_eq!(
        logs.lock().unwrap()[0].properties.as_ref().unwrap()["password_changed"],
        false
    );
}

#[tokio::test]
async fn should_change_password_when_confirmed() {
    let repo = MockUserRepo::new(vec![test_user(3, "hr@example.com", UserRole::Hr)]);

    let mut input = update_input("hr@example.com");
    input.password = Some("brand-new-pass".to_owned());
    input.password_confirmation = Some("brand-new-pass".to_owned());
    let user = UpdateUserUseCase {
        repo,
        hasher: MockPasswordHasher,
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), admin(), 3, input)
    .await
    .unwrap();

    assert_eq!(user.password_hash, "hashed:brand-new-pass");
}

#[tokio::test]
async fn should_forbid_updating_own_account() {
    let repo = MockUserRepo::new(vec![test_user(1, "admin@example.com", UserRole::Admin)]);

    let result = UpdateUserUseCase {
        repo,
        hasher: MockPasswordHasher,
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), admin(), 1, update_input("admin@example.com"))
    .await;

    assert!(matches!(result, Err(AdminServiceError::SelfModificationForbidden)));
}

#[tokio::test]
async fn should_forbid_deleting_own_account() {
    let me = Actor {
        user_id: 5,
        role: UserRole::Admin,
    };
    let repo = MockUserRepo::new(vec![
        test_user(5, "me@example.com", UserRole::Admin),
        test_user(6, "other@example.com", UserRole::Hr),
    ]);
    let logs = MockActivityLogRepo::default();

    let result = DeleteUserUseCase {
        repo: repo.clone(),
        audit: logs.trail(),
    }
    .execute(&ctx(me), me, 5)
    .await;

    assert!(matches!(result, Err(AdminServiceError::SelfDeletionForbidden)));
    assert_eq!(repo.users_handle().lock().unwrap().len(), 2);
    assert!(logs.logs_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_log_name_of_deleted_user() {
    let repo = MockUserRepo::new(vec![test_user(6, "other@example.com", UserRole::Hr)]);
    let logs = MockActivityLogRepo::default();

    DeleteUserUseCase {
        repo: repo.clone(),
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), admin(), 6)
    .await
    .unwrap();

    assert!(repo.users_handle().lock().unwrap().is_empty());
    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].action, "user_deleted");
    assert_eq!(logs[0].properties.as_ref().unwrap()["name"], "User 6");
}

#[tokio::test]
async fn should_search_users_by_name_or_email() {
    let repo = MockUserRepo::new(vec![
        test_user(1, "admin@example.com", UserRole::Admin),
        test_user(2, "maria@hr.example.com", UserRole::Hr),
    ]);

    let page = ListUsersUseCase { repo }
        .execute(Some("HR.example"), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.meta.total, 1);
    assert_eq!(page.items[0].id, 2);
}
