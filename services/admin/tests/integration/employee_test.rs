use chrono::Months;
use uuid::Uuid;

use hrdesk_admin::domain::types::{BlobBucket, EmployeeFilter, EmployeeSort};
use hrdesk_admin::error::AdminServiceError;
use hrdesk_admin::usecase::audit::AuditTrail;
use hrdesk_admin::usecase::employee::{
    BulkDeleteEmployeesUseCase, CreateEmployeeUseCase, DeleteEmployeeUseCase, EmployeeInput,
    ListEmployeesUseCase, RecordIdIssuanceUseCase, UpdateEmployeeUseCase,
};
use hrdesk_domain::audit::AuditTarget;
use hrdesk_domain::employee::{EmployeeSortField, IdStatus};
use hrdesk_domain::pagination::{PageRequest, Sort};

use crate::helpers::{
    FailingActivityLogRepo, MockActivityLogRepo, MockBlobStore, MockBusinessUnitRepo,
    MockEmployeeRepo, MockHrData, admin, ctx, employee_input, png, test_unit,
};

fn data() -> MockHrData {
    MockHrData::with_units(vec![test_unit("bu-1", "Operations", Some("OPS"))])
}

fn create_usecase(
    data: &MockHrData,
    blobs: &MockBlobStore,
    logs: &MockActivityLogRepo,
) -> CreateEmployeeUseCase<MockEmployeeRepo, MockBusinessUnitRepo, MockBlobStore, MockActivityLogRepo>
{
    CreateEmployeeUseCase {
        employees: data.employees(),
        business_units: data.business_units(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
}

#[tokio::test]
async fn should_assign_sequential_zero_padded_id_numbers() {
    let data = data();
    let logs = MockActivityLogRepo::default();
    let uc = create_usecase(&data, &MockBlobStore::default(), &logs);

    let first = uc.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();
    let second = uc.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();

    assert_eq!(first.id_number, "000001");
    assert_eq!(second.id_number, "000002");

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].action, "employee_created");
    assert_eq!(logs[0].target, Some(AuditTarget::Employee(first.id)));
    assert_eq!(logs[0].user_id, Some(1));
    assert_eq!(logs[0].ip_address.as_deref(), Some("10.0.0.7"));
}

#[tokio::test]
async fn should_not_reuse_id_number_of_deleted_employee() {
    let data = data();
    let logs = MockActivityLogRepo::default();
    let blobs = MockBlobStore::default();
    let create = create_usecase(&data, &blobs, &logs);

    create.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();
    let second = create.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();

    DeleteEmployeeUseCase {
        employees: data.employees(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), second.id)
    .await
    .unwrap();

    let third = create.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();
    assert_eq!(third.id_number, "000003");
}

#[tokio::test]
async fn should_reject_unknown_business_unit_without_storing_files() {
    let data = data();
    let blobs = MockBlobStore::default();
    let uc = create_usecase(&data, &blobs, &MockActivityLogRepo::default());

    let input = EmployeeInput {
        photo: Some(png("photo.png")),
        ..employee_input("bu-missing")
    };
    let result = uc.execute(&ctx(admin()), input).await;

    match result {
        Err(AdminServiceError::Validation(errors)) => {
            assert!(errors.contains("business_unit_id"), "{errors:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(blobs.blobs_handle().lock().unwrap().is_empty());
    assert!(data.employees.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_unsupported_upload_type() {
    let data = data();
    let uc = create_usecase(&data, &MockBlobStore::default(), &MockActivityLogRepo::default());

    let input = EmployeeInput {
        signature: Some(png("signature.svg")),
        ..employee_input("bu-1")
    };
    let result = uc.execute(&ctx(admin()), input).await;

    assert!(
        matches!(&result, Err(AdminServiceError::Validation(errors)) if errors.contains("signature")),
        "expected signature validation error, got {result:?}"
    );
}

#[tokio::test]
async fn should_remove_stored_files_when_a_later_upload_fails() {
    let data = data();
    let blobs = MockBlobStore::failing_after(1);
    let uc = create_usecase(&data, &blobs, &MockActivityLogRepo::default());

    let input = EmployeeInput {
        photo: Some(png("photo.png")),
        signature: Some(png("signature.png")),
        ..employee_input("bu-1")
    };
    let result = uc.execute(&ctx(admin()), input).await;

    assert!(matches!(result, Err(AdminServiceError::Internal(_))));
    assert!(blobs.blobs_handle().lock().unwrap().is_empty());
    assert!(data.employees.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_replace_photo_and_discard_the_old_file() {
    let data = data();
    let blobs = MockBlobStore::default();
    let logs = MockActivityLogRepo::default();
    let created = create_usecase(&data, &blobs, &logs)
        .execute(
            &ctx(admin()),
            EmployeeInput {
                photo: Some(png("old.png")),
                qr_code: Some(png("qr.png")),
                ..employee_input("bu-1")
            },
        )
        .await
        .unwrap();
    let old_photo = data.employees.lock().unwrap()[0].profile.photo.clone().unwrap();

    let updated = UpdateEmployeeUseCase {
        employees: data.employees(),
        business_units: data.business_units(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(admin()),
        created.id,
        EmployeeInput {
            photo: Some(png("new.jpg")),
            ..EmployeeInput::default()
        },
    )
    .await
    .unwrap();

    let new_photo = updated.profile.photo.clone().unwrap();
    assert_ne!(new_photo, old_photo);
    assert!(new_photo.ends_with(".jpg"));
    assert_eq!(updated.profile.first_name, "Ana");

    let stored = blobs.blobs_handle();
    let stored = stored.lock().unwrap();
    assert!(!stored.iter().any(|b| b.key == old_photo));
    assert!(stored.iter().any(|b| b.bucket == BlobBucket::EmployeePhotos && b.key == new_photo));
    assert!(stored.iter().any(|b| b.bucket == BlobBucket::EmployeeQrCodes));

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    let update = logs.last().unwrap();
    assert_eq!(update.action, "employee_updated");
    let changes = update.properties.as_ref().unwrap()["changes"].as_object().unwrap();
    assert_eq!(changes.keys().collect::<Vec<_>>(), vec!["photo"]);
}

#[tokio::test]
async fn should_skip_write_and_audit_when_update_changes_nothing() {
    let data = data();
    let logs = MockActivityLogRepo::default();
    let created = create_usecase(&data, &MockBlobStore::default(), &logs)
        .execute(&ctx(admin()), employee_input("bu-1"))
        .await
        .unwrap();
    let before = data.employees.lock().unwrap()[0].clone();

    let unchanged = UpdateEmployeeUseCase {
        employees: data.employees(),
        business_units: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), created.id, employee_input("bu-1"))
    .await
    .unwrap();

    assert_eq!(unchanged.updated_at, before.updated_at);
    assert_eq!(data.employees.lock().unwrap()[0].updated_at, before.updated_at);
    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "employee_created");
}

#[tokio::test]
async fn should_return_not_found_when_updating_missing_employee() {
    let data = data();
    let result = UpdateEmployeeUseCase {
        employees: data.employees(),
        business_units: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), Uuid::new_v4(), EmployeeInput::default())
    .await;

    assert!(matches!(result, Err(AdminServiceError::EmployeeNotFound)));
}

#[tokio::test]
async fn should_delete_each_listed_employee_once() {
    let data = data();
    let blobs = MockBlobStore::default();
    let logs = MockActivityLogRepo::default();
    let create = create_usecase(&data, &blobs, &logs);
    let a = create
        .execute(
            &ctx(admin()),
            EmployeeInput {
                photo: Some(png("a.png")),
                ..employee_input("bu-1")
            },
        )
        .await
        .unwrap();
    let b = create.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();
    let kept = create.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();

    let deleted = BulkDeleteEmployeesUseCase {
        employees: data.employees(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), vec![a.id, a.id, b.id])
    .await
    .unwrap();

    assert_eq!(deleted, 2);
    let remaining = data.employees.lock().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
    assert!(blobs.blobs_handle().lock().unwrap().is_empty());

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    let entry = logs.last().unwrap();
    assert_eq!(entry.action, "employees_bulk_deleted");
    assert_eq!(entry.properties.as_ref().unwrap()["count"], 2);
}

#[tokio::test]
async fn should_reject_empty_bulk_delete() {
    let data = data();
    let result = BulkDeleteEmployeesUseCase {
        employees: data.employees(),
        blobs: MockBlobStore::default(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), vec![])
    .await;

    assert!(
        matches!(&result, Err(AdminServiceError::Validation(errors)) if errors.contains("ids")),
        "expected ids validation error, got {result:?}"
    );
}

#[tokio::test]
async fn should_record_id_issuance_with_two_year_expiry() {
    let data = data();
    let logs = MockActivityLogRepo::default();
    let created = create_usecase(&data, &MockBlobStore::default(), &logs)
        .execute(&ctx(admin()), employee_input("bu-1"))
        .await
        .unwrap();

    let uc = RecordIdIssuanceUseCase {
        employees: data.employees(),
        audit: logs.trail(),
    };
    uc.execute(&ctx(admin()), created.id).await.unwrap();
    let employee = uc.execute(&ctx(admin()), created.id).await.unwrap();

    assert_eq!(employee.issuance_count, 2);
    assert_eq!(employee.profile.id_status, IdStatus::Printed);
    let exported_at = employee.exported_at.unwrap();
    assert_eq!(
        employee.id_expires_at(),
        exported_at.checked_add_months(Months::new(24))
    );

    let logs = logs.logs_handle();
    assert_eq!(logs.lock().unwrap().last().unwrap().action, "employee_id_issued");
}

#[tokio::test]
async fn should_succeed_even_when_activity_log_is_unavailable() {
    let data = data();
    let uc = CreateEmployeeUseCase {
        employees: data.employees(),
        business_units: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: AuditTrail {
            repo: FailingActivityLogRepo,
        },
    };

    let created = uc.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();

    assert_eq!(created.id_number, "000001");
    assert_eq!(data.employees.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_list_by_unit_and_match_search_on_unit_name() {
    let data = MockHrData::with_units(vec![
        test_unit("bu-1", "Operations", Some("OPS")),
        test_unit("bu-2", "Finance", Some("FIN")),
    ]);
    let logs = MockActivityLogRepo::default();
    let create = create_usecase(&data, &MockBlobStore::default(), &logs);
    let ops = create.execute(&ctx(admin()), employee_input("bu-1")).await.unwrap();
    let fin = create.execute(&ctx(admin()), employee_input("bu-2")).await.unwrap();

    let uc = ListEmployeesUseCase {
        employees: data.employees(),
        business_units: data.business_units(),
    };

    let by_unit = uc
        .execute(
            &EmployeeFilter {
                search: None,
                business_unit_id: Some("bu-1".to_owned()),
            },
            EmployeeSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_unit.employees.meta.total, 1);
    assert_eq!(by_unit.employees.items[0].employee.id, ops.id);
    assert_eq!(by_unit.business_units.len(), 2);

    let by_unit_name = uc
        .execute(
            &EmployeeFilter {
                search: Some("finan".to_owned()),
                business_unit_id: None,
            },
            EmployeeSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_unit_name.employees.meta.total, 1);
    let record = &by_unit_name.employees.items[0];
    assert_eq!(record.employee.id, fin.id);
    assert_eq!(record.business_unit_name.as_deref(), Some("Finance"));

    let by_unit_desc = uc
        .execute(
            &EmployeeFilter::default(),
            EmployeeSort {
                field: EmployeeSortField::BusinessUnitName,
                direction: Sort::Desc,
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    let ids: Vec<_> = by_unit_desc
        .employees
        .items
        .iter()
        .map(|record| record.employee.id)
        .collect();
    assert_eq!(ids, vec![fin.id, ops.id]);
}
