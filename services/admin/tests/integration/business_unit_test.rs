use serde_json::json;

use hrdesk_admin::domain::types::{BlobBucket, BlobRef};
use hrdesk_admin::error::AdminServiceError;
use hrdesk_admin::usecase::business_unit::{
    BulkDeleteBusinessUnitsUseCase, BusinessUnitInput, CreateBusinessUnitUseCase,
    DeleteBusinessUnitUseCase, UpdateBusinessUnitUseCase,
};
use hrdesk_admin::usecase::employee::{CreateEmployeeUseCase, EmployeeInput};

use crate::helpers::{
    MockActivityLogRepo, MockBlobStore, MockHrData, admin, ctx, employee_input, hr, png,
    test_template, test_unit,
};

#[tokio::test]
async fn should_create_business_unit_with_logo() {
    let data = MockHrData::default();
    let blobs = MockBlobStore::default();
    let logs = MockActivityLogRepo::default();

    let unit = CreateBusinessUnitUseCase {
        repo: data.business_units(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(hr()),
        BusinessUnitInput {
            name: Some("  Operations ".to_owned()),
            code: Some("OPS".to_owned()),
            image: Some(png("logo.png")),
            remove_image: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(unit.name, "Operations");
    assert_eq!(unit.code.as_deref(), Some("OPS"));
    let logo = unit.image.clone().unwrap();
    assert_eq!(
        blobs.blobs_handle().lock().unwrap().as_slice(),
        &[BlobRef::new(BlobBucket::BusinessUnitLogos, logo)]
    );

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].action, "business_unit_created");
    let properties = logs[0].properties.as_ref().unwrap();
    assert_eq!(properties["created_by"], 2);
    assert_eq!(properties["has_image"], true);
}

#[tokio::test]
async fn should_reject_duplicate_code_and_blank_name() {
    let data = MockHrData::with_units(vec![test_unit("bu-1", "Operations", Some("OPS"))]);

    let result = CreateBusinessUnitUseCase {
        repo: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(
        &ctx(admin()),
        BusinessUnitInput {
            name: Some("   ".to_owned()),
            code: Some("OPS".to_owned()),
            ..BusinessUnitInput::default()
        },
    )
    .await;

    match result {
        Err(AdminServiceError::Validation(errors)) => {
            assert!(errors.contains("name"));
            assert_eq!(
                errors.get("code"),
                Some(&["the code has already been taken".to_owned()][..])
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(data.units.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_log_only_the_changed_code() {
    let data = MockHrData::with_units(vec![test_unit("bu-1", "Operations", Some("OPS"))]);
    let logs = MockActivityLogRepo::default();

    let updated = UpdateBusinessUnitUseCase {
        repo: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(admin()),
        "bu-1",
        BusinessUnitInput {
            name: Some("Operations".to_owned()),
            code: Some("OPX".to_owned()),
            ..BusinessUnitInput::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.code.as_deref(), Some("OPX"));
    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(
        logs[0].properties,
        Some(json!({"changes": {"code": {"old": "OPS", "new": "OPX"}}}))
    );
}

#[tokio::test]
async fn should_skip_audit_when_nothing_changed() {
    let data = MockHrData::with_units(vec![test_unit("bu-1", "Operations", Some("OPS"))]);
    let logs = MockActivityLogRepo::default();

    UpdateBusinessUnitUseCase {
        repo: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(admin()),
        "bu-1",
        BusinessUnitInput {
            name: Some("Operations".to_owned()),
            code: Some("OPS".to_owned()),
            ..BusinessUnitInput::default()
        },
    )
    .await
    .unwrap();

    assert!(logs.logs_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_remove_logo_on_request() {
    let mut unit = test_unit("bu-1", "Operations", None);
    unit.image = Some("logo.png".to_owned());
    let data = MockHrData::with_units(vec![unit]);
    let blobs =
        MockBlobStore::with_blobs(vec![BlobRef::new(BlobBucket::BusinessUnitLogos, "logo.png")]);

    let updated = UpdateBusinessUnitUseCase {
        repo: data.business_units(),
        blobs: blobs.clone(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(
        &ctx(admin()),
        "bu-1",
        BusinessUnitInput {
            remove_image: true,
            ..BusinessUnitInput::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.image, None);
    assert_eq!(data.units.lock().unwrap()[0].image, None);
    assert!(blobs.blobs_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_cascade_to_employees_templates_and_their_files() {
    let data = MockHrData::with_units(vec![
        test_unit("bu-1", "Operations", None),
        test_unit("bu-2", "Finance", None),
    ]);
    let blobs = MockBlobStore::default();
    let logs = MockActivityLogRepo::default();

    let create = CreateEmployeeUseCase {
        employees: data.employees(),
        business_units: data.business_units(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    };
    create
        .execute(
            &ctx(admin()),
            EmployeeInput {
                photo: Some(png("photo.png")),
                ..employee_input("bu-1")
            },
        )
        .await
        .unwrap();
    create.execute(&ctx(admin()), employee_input("bu-2")).await.unwrap();

    let template = test_template(1, "bu-1");
    blobs.blobs_handle().lock().unwrap().extend(template.blobs());
    data.templates.lock().unwrap().push(template);

    DeleteBusinessUnitUseCase {
        repo: data.business_units(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), "bu-1")
    .await
    .unwrap();

    assert_eq!(data.units.lock().unwrap().len(), 1);
    let employees = data.employees.lock().unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].profile.business_unit_id, "bu-2");
    assert!(data.templates.lock().unwrap().is_empty());
    assert!(blobs.blobs_handle().lock().unwrap().is_empty());

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    let entry = logs.last().unwrap();
    assert_eq!(entry.action, "business_unit_deleted");
    assert_eq!(entry.properties.as_ref().unwrap()["name"], "Operations");
    assert_eq!(entry.properties.as_ref().unwrap()["deleted_by_role"], "Admin");
}

#[tokio::test]
async fn should_reject_bulk_delete_naming_unknown_units() {
    let data = MockHrData::with_units(vec![test_unit("bu-1", "Operations", None)]);

    let result = BulkDeleteBusinessUnitsUseCase {
        repo: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(&ctx(admin()), vec!["bu-1".to_owned(), "bu-404".to_owned()])
    .await;

    match result {
        Err(AdminServiceError::Validation(errors)) => {
            let messages = errors.get("ids").unwrap();
            assert!(messages[0].contains("bu-404"), "{messages:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(data.units.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_bulk_delete_duplicates_once() {
    let data = MockHrData::with_units(vec![
        test_unit("bu-1", "Operations", None),
        test_unit("bu-2", "Finance", None),
        test_unit("bu-3", "Legal", None),
    ]);
    let logs = MockActivityLogRepo::default();

    let deleted = BulkDeleteBusinessUnitsUseCase {
        repo: data.business_units(),
        blobs: MockBlobStore::default(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(admin()),
        vec!["bu-1".to_owned(), "bu-2".to_owned(), "bu-1".to_owned()],
    )
    .await
    .unwrap();

    assert_eq!(deleted, 2);
    let units = data.units.lock().unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].id, "bu-3");

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].action, "business_units_bulk_deleted");
    assert_eq!(logs[0].properties.as_ref().unwrap()["count"], 2);
}
