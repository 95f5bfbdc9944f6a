use serde_json::{Map, Value, json};

use hrdesk_admin::domain::types::{BlobBucket, BlobRef};
use hrdesk_admin::error::AdminServiceError;
use hrdesk_admin::usecase::template::{
    CreateTemplateUseCase, DeleteTemplateUseCase, PositionUpdate, TemplateInput,
    UpdateTemplatePositionsUseCase, UpdateTemplateUseCase,
};
use hrdesk_domain::layout::LayoutField;

use crate::helpers::{
    MockActivityLogRepo, MockBlobStore, MockHrData, admin, ctx, png, test_template, test_unit,
};

fn data_with_template() -> (MockHrData, MockBlobStore) {
    let data = MockHrData::with_units(vec![
        test_unit("bu-1", "Operations", None),
        test_unit("bu-2", "Finance", None),
    ]);
    let template = test_template(1, "bu-1");
    let blobs = MockBlobStore::with_blobs(template.blobs());
    data.templates.lock().unwrap().push(template);
    (data, blobs)
}

fn payload(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn should_create_template_with_empty_layout() {
    let data = MockHrData::with_units(vec![test_unit("bu-1", "Operations", None)]);
    let blobs = MockBlobStore::default();
    let logs = MockActivityLogRepo::default();

    let template = CreateTemplateUseCase {
        templates: data.templates(),
        business_units: data.business_units(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(admin()),
        TemplateInput {
            business_unit_id: Some("bu-1".to_owned()),
            front_image: Some(png("front.png")),
            back_image: Some(png("back.png")),
        },
    )
    .await
    .unwrap();

    assert!(template.layout.is_empty());
    assert!(template.layout.to_full_json().as_object().unwrap().values().all(Value::is_null));
    assert_eq!(blobs.blobs_handle().lock().unwrap().len(), 2);
    assert_eq!(logs.logs_handle().lock().unwrap()[0].action, "template_created");
}

#[tokio::test]
async fn should_require_both_images_on_create() {
    let data = MockHrData::with_units(vec![test_unit("bu-1", "Operations", None)]);
    let blobs = MockBlobStore::default();

    let result = CreateTemplateUseCase {
        templates: data.templates(),
        business_units: data.business_units(),
        blobs: blobs.clone(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(
        &ctx(admin()),
        TemplateInput {
            business_unit_id: Some("bu-1".to_owned()),
            front_image: Some(png("front.png")),
            back_image: None,
        },
    )
    .await;

    match result {
        Err(AdminServiceError::Validation(errors)) => {
            assert!(errors.contains("back_image"));
            assert!(!errors.contains("front_image"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(blobs.blobs_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_replace_front_only_and_keep_back() {
    let (data, blobs) = data_with_template();
    let logs = MockActivityLogRepo::default();

    let updated = UpdateTemplateUseCase {
        templates: data.templates(),
        business_units: data.business_units(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(admin()),
        1,
        TemplateInput {
            front_image: Some(png("new-front.png")),
            ..TemplateInput::default()
        },
    )
    .await
    .unwrap();

    assert_ne!(updated.front_image, "front-1.png");
    assert_eq!(updated.back_image, "back-1.png");
    assert_eq!(updated.business_unit_id, "bu-1");

    let stored = blobs.blobs_handle();
    let stored = stored.lock().unwrap();
    assert!(!stored.contains(&BlobRef::new(BlobBucket::TemplateArtwork, "front-1.png")));
    assert!(stored.contains(&BlobRef::new(BlobBucket::TemplateArtwork, "back-1.png")));
    assert!(stored.contains(&BlobRef::new(BlobBucket::TemplateArtwork, &updated.front_image)));

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].action, "template_updated");
    assert_eq!(logs[0].properties.as_ref().unwrap()["changed"], json!(["front_image"]));
}

#[tokio::test]
async fn should_reject_move_to_unknown_business_unit() {
    let (data, blobs) = data_with_template();

    let result = UpdateTemplateUseCase {
        templates: data.templates(),
        business_units: data.business_units(),
        blobs,
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(
        &ctx(admin()),
        1,
        TemplateInput {
            business_unit_id: Some("bu-404".to_owned()),
            ..TemplateInput::default()
        },
    )
    .await;

    assert!(
        matches!(&result, Err(AdminServiceError::Validation(errors)) if errors.contains("business_unit_id")),
        "expected business_unit_id error, got {result:?}"
    );
}

#[tokio::test]
async fn should_patch_only_submitted_positions() {
    let (data, _blobs) = data_with_template();
    data.templates.lock().unwrap()[0]
        .layout
        .set(LayoutField::NameX, 40.0);
    let logs = MockActivityLogRepo::default();

    let updated = UpdateTemplatePositionsUseCase {
        templates: data.templates(),
        audit: logs.trail(),
    }
    .execute(
        &ctx(admin()),
        1,
        &payload(json!({"qr_x": 120, "qr_y": 80.5})),
        PositionUpdate::Partial,
    )
    .await
    .unwrap();

    assert_eq!(updated.layout.get(LayoutField::QrX), Some(120.0));
    assert_eq!(updated.layout.get(LayoutField::QrY), Some(80.5));
    assert_eq!(updated.layout.get(LayoutField::NameX), Some(40.0));

    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].action, "template_positions_updated");
    assert_eq!(
        logs[0].properties,
        Some(json!({
            "old": {"qr_x": null, "qr_y": null},
            "new": {"qr_x": 120.0, "qr_y": 80.5},
        }))
    );
}

#[tokio::test]
async fn should_require_every_position_in_full_update() {
    let (data, _blobs) = data_with_template();

    let result = UpdateTemplatePositionsUseCase {
        templates: data.templates(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(
        &ctx(admin()),
        1,
        &payload(json!({"qr_x": 1})),
        PositionUpdate::Full,
    )
    .await;

    assert!(
        matches!(&result, Err(AdminServiceError::Validation(errors)) if errors.contains("photo_x")),
        "expected photo_x error, got {result:?}"
    );
    assert!(data.templates.lock().unwrap()[0].layout.is_empty());
}

#[tokio::test]
async fn should_return_not_found_for_missing_template_positions() {
    let data = MockHrData::default();

    let result = UpdateTemplatePositionsUseCase {
        templates: data.templates(),
        audit: MockActivityLogRepo::default().trail(),
    }
    .execute(
        &ctx(admin()),
        9,
        &payload(json!({"qr_x": 1})),
        PositionUpdate::Partial,
    )
    .await;

    assert!(matches!(result, Err(AdminServiceError::TemplateNotFound)));
}

#[tokio::test]
async fn should_delete_template_and_both_images() {
    let (data, blobs) = data_with_template();
    let logs = MockActivityLogRepo::default();

    DeleteTemplateUseCase {
        templates: data.templates(),
        blobs: blobs.clone(),
        audit: logs.trail(),
    }
    .execute(&ctx(admin()), 1)
    .await
    .unwrap();

    assert!(data.templates.lock().unwrap().is_empty());
    assert!(blobs.blobs_handle().lock().unwrap().is_empty());
    let logs = logs.logs_handle();
    let logs = logs.lock().unwrap();
    assert_eq!(logs[0].action, "template_deleted");
    assert_eq!(logs[0].properties.as_ref().unwrap()["front_image"], "front-1.png");
}
