use std::str::FromStr as _;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel as _, ModelTrait as _, Order, PaginatorTrait as _, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
    sea_query::{ColumnRef, Expr, IntoColumnRef as _, OnConflict},
};
use uuid::Uuid;

use hrdesk_admin_schema::{
    activity_logs, business_units, employee_sequences, employees, network_paths, template_images,
    users,
};
use hrdesk_core::sea_ext::FilterContainsAny as _;
use hrdesk_domain::audit::AuditTarget;
use hrdesk_domain::employee::{EmployeeSortField, IdStatus, format_id_number, next_id_counter};
use hrdesk_domain::layout::LayoutField;
use hrdesk_domain::pagination::{Page, PageRequest, Sort};

use crate::domain::repository::{
    ActivityLogRepository, BusinessUnitRepository, EmployeeRepository, NetworkPathRepository,
    TemplateRepository, UserRepository,
};
use crate::domain::types::{
    ActivityLog, ActivityLogFilter, BlobBucket, BlobRef, BusinessUnit, DeletedBusinessUnits,
    Employee, EmployeeFilter, EmployeeProfile, EmployeeRecord, EmployeeSort, NewActivityLog,
    NewEmployee, NewTemplate, NewUser, TemplateImage, TemplateLayout, TemplateRecord, User,
    UserChanges,
};
use crate::error::AdminServiceError;

fn order(sort: Sort) -> Order {
    match sort {
        Sort::Asc => Order::Asc,
        Sort::Desc => Order::Desc,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, AdminServiceError> {
        let page = page.clamped();
        let paginator = users::Entity::find()
            .filter_contains_any([users::Column::Name, users::Column::Email], search)
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .paginate(&self.db, u64::from(page.per_page));
        let total = paginator.num_items().await.context("count users")?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Page::new(users, page, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AdminServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn email_taken(
        &self,
        email: &str,
        except: Option<i32>,
    ) -> Result<bool, AdminServiceError> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.context("check user email")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &NewUser) -> Result<User, AdminServiceError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            email_verified_at: Set(user.email_verified_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(user_from_model(model)?)
    }

    async fn update(
        &self,
        id: i32,
        changes: &UserChanges,
    ) -> Result<Option<User>, AdminServiceError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        am.name = Set(changes.name.clone());
        am.email = Set(changes.email.clone());
        am.role = Set(changes.role.as_str().to_owned());
        if let Some(hash) = &changes.password_hash {
            am.password = Set(hash.clone());
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update user")?;
        Ok(Some(user_from_model(model)?))
    }

    async fn delete(&self, id: i32) -> Result<bool, AdminServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    Ok(User {
        role: model
            .role
            .parse()
            .with_context(|| format!("user {} has an unknown role", model.id))?,
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password,
        email_verified_at: model.email_verified_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Business unit repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBusinessUnitRepository {
    pub db: DatabaseConnection,
}

impl BusinessUnitRepository for DbBusinessUnitRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<BusinessUnit>, AdminServiceError> {
        let page = page.clamped();
        let paginator = business_units::Entity::find()
            .filter_contains_any(
                [business_units::Column::Name, business_units::Column::Code],
                search,
            )
            .order_by_asc(business_units::Column::Name)
            .order_by_asc(business_units::Column::Id)
            .paginate(&self.db, u64::from(page.per_page));
        let total = paginator.num_items().await.context("count business units")?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .context("list business units")?;
        Ok(Page::new(
            models.into_iter().map(business_unit_from_model).collect(),
            page,
            total,
        ))
    }

    async fn all(&self) -> Result<Vec<BusinessUnit>, AdminServiceError> {
        let models = business_units::Entity::find()
            .order_by_asc(business_units::Column::Name)
            .all(&self.db)
            .await
            .context("list all business units")?;
        Ok(models.into_iter().map(business_unit_from_model).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BusinessUnit>, AdminServiceError> {
        let model = business_units::Entity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .context("find business unit by id")?;
        Ok(model.map(business_unit_from_model))
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<BusinessUnit>, AdminServiceError> {
        let models = business_units::Entity::find()
            .filter(business_units::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .context("find business units by ids")?;
        Ok(models.into_iter().map(business_unit_from_model).collect())
    }

    async fn code_taken(
        &self,
        code: &str,
        except: Option<&str>,
    ) -> Result<bool, AdminServiceError> {
        let mut query =
            business_units::Entity::find().filter(business_units::Column::Code.eq(code));
        if let Some(id) = except {
            query = query.filter(business_units::Column::Id.ne(id));
        }
        let count = query
            .count(&self.db)
            .await
            .context("check business unit code")?;
        Ok(count > 0)
    }

    async fn create(&self, unit: &BusinessUnit) -> Result<(), AdminServiceError> {
        business_units::ActiveModel {
            id: Set(unit.id.clone()),
            name: Set(unit.name.clone()),
            code: Set(unit.code.clone()),
            image: Set(unit.image.clone()),
            created_at: Set(unit.created_at),
            updated_at: Set(unit.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create business unit")?;
        Ok(())
    }

    async fn update(&self, unit: &BusinessUnit) -> Result<(), AdminServiceError> {
        business_units::ActiveModel {
            id: Set(unit.id.clone()),
            name: Set(unit.name.clone()),
            code: Set(unit.code.clone()),
            image: Set(unit.image.clone()),
            updated_at: Set(unit.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update business unit")?;
        Ok(())
    }

    async fn delete_many(
        &self,
        ids: &[String],
    ) -> Result<DeletedBusinessUnits, AdminServiceError> {
        let (deleted, staff, templates) = self
            .db
            .transaction::<_, (u64, Vec<employees::Model>, Vec<template_images::Model>), sea_orm::DbErr>(
                |txn| {
                    let ids = ids.to_vec();
                    Box::pin(async move {
                        // Read what the cascade is about to remove so its blobs can follow.
                        let staff = employees::Entity::find()
                            .filter(employees::Column::BusinessUnitId.is_in(ids.clone()))
                            .all(txn)
                            .await?;
                        let templates = template_images::Entity::find()
                            .filter(template_images::Column::BusinessUnitId.is_in(ids.clone()))
                            .all(txn)
                            .await?;
                        let result = business_units::Entity::delete_many()
                            .filter(business_units::Column::Id.is_in(ids))
                            .exec(txn)
                            .await?;
                        Ok((result.rows_affected, staff, templates))
                    })
                },
            )
            .await
            .context("delete business units")?;

        let dependent_blobs = staff
            .iter()
            .flat_map(employee_model_blobs)
            .chain(templates.iter().flat_map(|t| {
                [
                    BlobRef::new(BlobBucket::TemplateArtwork, &t.front_image),
                    BlobRef::new(BlobBucket::TemplateArtwork, &t.back_image),
                ]
            }))
            .collect();
        Ok(DeletedBusinessUnits {
            deleted,
            dependent_blobs,
        })
    }
}

fn business_unit_from_model(model: business_units::Model) -> BusinessUnit {
    BusinessUnit {
        id: model.id,
        name: model.name,
        code: model.code,
        image: model.image,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Employee repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmployeeRepository {
    pub db: DatabaseConnection,
}

fn employee_search_columns() -> [ColumnRef; 6] {
    [
        (employees::Entity, employees::Column::FirstName).into_column_ref(),
        (employees::Entity, employees::Column::MiddleName).into_column_ref(),
        (employees::Entity, employees::Column::LastName).into_column_ref(),
        (employees::Entity, employees::Column::IdNumber).into_column_ref(),
        (employees::Entity, employees::Column::Position).into_column_ref(),
        (business_units::Entity, business_units::Column::Name).into_column_ref(),
    ]
}

fn employee_sort_column(field: EmployeeSortField) -> employees::Column {
    match field {
        EmployeeSortField::IdNumber => employees::Column::IdNumber,
        EmployeeSortField::FirstName => employees::Column::FirstName,
        EmployeeSortField::LastName => employees::Column::LastName,
        EmployeeSortField::Position => employees::Column::Position,
        EmployeeSortField::EmploymentStatus => employees::Column::EmploymentStatus,
        EmployeeSortField::IdStatus => employees::Column::IdStatus,
        EmployeeSortField::HireDate => employees::Column::HireDate,
        EmployeeSortField::CreatedAt => employees::Column::CreatedAt,
        EmployeeSortField::BusinessUnitName => employees::Column::BusinessUnitId,
    }
}

impl EmployeeRepository for DbEmployeeRepository {
    async fn list(
        &self,
        filter: &EmployeeFilter,
        sort: EmployeeSort,
        page: PageRequest,
    ) -> Result<Page<EmployeeRecord>, AdminServiceError> {
        let page = page.clamped();
        let mut query = employees::Entity::find()
            .find_also_related(business_units::Entity)
            .filter_contains_any(employee_search_columns(), filter.search.as_deref());
        if let Some(unit) = &filter.business_unit_id {
            query = query.filter(employees::Column::BusinessUnitId.eq(unit.as_str()));
        }
        let paginator = query
            .order_by(employee_sort_column(sort.field), order(sort.direction))
            .order_by_asc(employees::Column::IdCounter)
            .paginate(&self.db, u64::from(page.per_page));
        let total = paginator.num_items().await.context("count employees")?;
        let rows = paginator
            .fetch_page(page.index())
            .await
            .context("list employees")?;
        let records = rows
            .into_iter()
            .map(|(employee, unit)| employee_record(employee, unit))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Page::new(records, page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AdminServiceError> {
        let row = employees::Entity::find_by_id(id)
            .find_also_related(business_units::Entity)
            .one(&self.db)
            .await
            .context("find employee by id")?;
        Ok(row
            .map(|(employee, unit)| employee_record(employee, unit))
            .transpose()?)
    }

    async fn create(&self, employee: &NewEmployee) -> Result<Employee, AdminServiceError> {
        let model = self
            .db
            .transaction::<_, employees::Model, sea_orm::DbErr>(|txn| {
                let employee = employee.clone();
                Box::pin(async move {
                    let sequence =
                        employee_sequences::Entity::find_by_id(employee_sequences::EMPLOYEE_ID_SEQUENCE)
                            .lock_exclusive()
                            .one(txn)
                            .await?;
                    let current_max = employees::Entity::find()
                        .select_only()
                        .column_as(Expr::col(employees::Column::IdCounter).max(), "max")
                        .into_tuple::<Option<i32>>()
                        .one(txn)
                        .await?
                        .flatten();
                    let counter =
                        next_id_counter(current_max, sequence.map(|s| s.last_value));

                    employee_sequences::Entity::insert(employee_sequences::ActiveModel {
                        name: Set(employee_sequences::EMPLOYEE_ID_SEQUENCE.to_owned()),
                        last_value: Set(counter),
                    })
                    .on_conflict(
                        OnConflict::column(employee_sequences::Column::Name)
                            .update_column(employee_sequences::Column::LastValue)
                            .to_owned(),
                    )
                    .exec_without_returning(txn)
                    .await?;

                    let now = Utc::now();
                    let mut am = employees::ActiveModel {
                        id: Set(employee.id),
                        id_number: Set(format_id_number(counter)),
                        id_counter: Set(counter),
                        hire_date: Set(employee.hire_date),
                        issuance_count: Set(0),
                        exported_at: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    apply_profile(&mut am, &employee.profile);
                    am.insert(txn).await
                })
            })
            .await
            .context("create employee")?;
        Ok(employee_from_model(model)?)
    }

    async fn update(
        &self,
        id: Uuid,
        profile: &EmployeeProfile,
    ) -> Result<Option<Employee>, AdminServiceError> {
        let Some(model) = employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find employee for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        apply_profile(&mut am, profile);
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update employee")?;
        Ok(Some(employee_from_model(model)?))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Employee>, AdminServiceError> {
        let models = self
            .db
            .transaction::<_, Vec<employees::Model>, sea_orm::DbErr>(|txn| {
                let ids = ids.to_vec();
                Box::pin(async move {
                    let models = employees::Entity::find()
                        .filter(employees::Column::Id.is_in(ids.clone()))
                        .all(txn)
                        .await?;
                    employees::Entity::delete_many()
                        .filter(employees::Column::Id.is_in(ids))
                        .exec(txn)
                        .await?;
                    Ok(models)
                })
            })
            .await
            .context("delete employees")?;
        Ok(models
            .into_iter()
            .map(employee_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn record_issuance(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Employee>, AdminServiceError> {
        let result = employees::Entity::update_many()
            .col_expr(
                employees::Column::IssuanceCount,
                Expr::col(employees::Column::IssuanceCount).add(1),
            )
            .col_expr(employees::Column::ExportedAt, Expr::value(at))
            .col_expr(
                employees::Column::IdStatus,
                Expr::value(IdStatus::Printed.as_str()),
            )
            .col_expr(employees::Column::UpdatedAt, Expr::value(at))
            .filter(employees::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("record id issuance")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        let model = employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("reload employee after issuance")?;
        Ok(model.map(employee_from_model).transpose()?)
    }
}

fn apply_profile(am: &mut employees::ActiveModel, profile: &EmployeeProfile) {
    let p = profile.clone();
    am.first_name = Set(p.first_name);
    am.middle_name = Set(p.middle_name);
    am.last_name = Set(p.last_name);
    am.suffix = Set(p.suffix);
    am.position = Set(p.position);
    am.business_unit_id = Set(p.business_unit_id);
    am.birthday = Set(p.birthday);
    am.address = Set(p.address);
    am.contact_number = Set(p.contact_number);
    am.sss_number = Set(p.sss_number);
    am.philhealth_number = Set(p.philhealth_number);
    am.pagibig_number = Set(p.pagibig_number);
    am.tin_number = Set(p.tin_number);
    am.emergency_contact_name = Set(p.emergency_contact_name);
    am.emergency_contact_number = Set(p.emergency_contact_number);
    am.emergency_contact_address = Set(p.emergency_contact_address);
    am.employment_status = Set(p.employment_status.as_str().to_owned());
    am.id_status = Set(p.id_status.as_str().to_owned());
    am.photo = Set(p.photo);
    am.signature = Set(p.signature);
    am.qr_code = Set(p.qr_code);
}

fn employee_model_blobs(model: &employees::Model) -> Vec<BlobRef> {
    [
        (BlobBucket::EmployeePhotos, &model.photo),
        (BlobBucket::EmployeeSignatures, &model.signature),
        (BlobBucket::EmployeeQrCodes, &model.qr_code),
    ]
    .into_iter()
    .filter_map(|(bucket, key)| key.as_deref().map(|key| BlobRef::new(bucket, key)))
    .collect()
}

fn employee_from_model(model: employees::Model) -> anyhow::Result<Employee> {
    let employment_status = model
        .employment_status
        .parse()
        .with_context(|| format!("employee {} has an unknown employment status", model.id))?;
    let id_status = model
        .id_status
        .parse()
        .with_context(|| format!("employee {} has an unknown id status", model.id))?;
    Ok(Employee {
        id: model.id,
        id_number: model.id_number,
        id_counter: model.id_counter,
        profile: EmployeeProfile {
            first_name: model.first_name,
            middle_name: model.middle_name,
            last_name: model.last_name,
            suffix: model.suffix,
            position: model.position,
            business_unit_id: model.business_unit_id,
            birthday: model.birthday,
            address: model.address,
            contact_number: model.contact_number,
            sss_number: model.sss_number,
            philhealth_number: model.philhealth_number,
            pagibig_number: model.pagibig_number,
            tin_number: model.tin_number,
            emergency_contact_name: model.emergency_contact_name,
            emergency_contact_number: model.emergency_contact_number,
            emergency_contact_address: model.emergency_contact_address,
            employment_status,
            id_status,
            photo: model.photo,
            signature: model.signature,
            qr_code: model.qr_code,
        },
        hire_date: model.hire_date,
        issuance_count: model.issuance_count,
        exported_at: model.exported_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn employee_record(
    employee: employees::Model,
    unit: Option<business_units::Model>,
) -> anyhow::Result<EmployeeRecord> {
    Ok(EmployeeRecord {
        employee: employee_from_model(employee)?,
        business_unit_name: unit.map(|u| u.name),
    })
}

// ── Template repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTemplateRepository {
    pub db: DatabaseConnection,
}

fn layout_column(field: LayoutField) -> anyhow::Result<template_images::Column> {
    template_images::Column::from_str(field.as_str())
        .map_err(|_| anyhow::anyhow!("no template column for layout field {field}"))
}

impl TemplateRepository for DbTemplateRepository {
    async fn list(
        &self,
        business_unit_id: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<TemplateRecord>, AdminServiceError> {
        let page = page.clamped();
        let mut query = template_images::Entity::find().find_also_related(business_units::Entity);
        if let Some(unit) = business_unit_id {
            query = query.filter(template_images::Column::BusinessUnitId.eq(unit));
        }
        let paginator = query
            .order_by_desc(template_images::Column::CreatedAt)
            .order_by_desc(template_images::Column::Id)
            .paginate(&self.db, u64::from(page.per_page));
        let total = paginator.num_items().await.context("count templates")?;
        let rows = paginator
            .fetch_page(page.index())
            .await
            .context("list templates")?;
        let records = rows
            .into_iter()
            .map(|(template, unit)| TemplateRecord {
                template: template_from_model(template),
                business_unit_name: unit.map(|u| u.name),
            })
            .collect();
        Ok(Page::new(records, page, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<TemplateRecord>, AdminServiceError> {
        let row = template_images::Entity::find_by_id(id)
            .find_also_related(business_units::Entity)
            .one(&self.db)
            .await
            .context("find template by id")?;
        Ok(row.map(|(template, unit)| TemplateRecord {
            template: template_from_model(template),
            business_unit_name: unit.map(|u| u.name),
        }))
    }

    async fn create(&self, template: &NewTemplate) -> Result<TemplateImage, AdminServiceError> {
        let now = Utc::now();
        let model = template_images::ActiveModel {
            business_unit_id: Set(template.business_unit_id.clone()),
            front_image: Set(template.front_image.clone()),
            back_image: Set(template.back_image.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create template")?;
        Ok(template_from_model(model))
    }

    async fn update_images(&self, template: &TemplateImage) -> Result<(), AdminServiceError> {
        template_images::ActiveModel {
            id: Set(template.id),
            business_unit_id: Set(template.business_unit_id.clone()),
            front_image: Set(template.front_image.clone()),
            back_image: Set(template.back_image.clone()),
            updated_at: Set(template.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update template images")?;
        Ok(())
    }

    async fn update_layout(
        &self,
        id: i32,
        changes: &TemplateLayout,
    ) -> Result<Option<TemplateImage>, AdminServiceError> {
        let Some(model) = template_images::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find template for layout update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        for (field, value) in changes.iter() {
            am.set(layout_column(field)?, sea_orm::Value::Double(Some(value)));
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("update template layout")?;
        Ok(Some(template_from_model(model)))
    }

    async fn delete(&self, id: i32) -> Result<bool, AdminServiceError> {
        let result = template_images::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete template")?;
        Ok(result.rows_affected > 0)
    }
}

fn template_from_model(model: template_images::Model) -> TemplateImage {
    let layout = LayoutField::ALL
        .iter()
        .filter_map(|field| {
            let column = layout_column(*field).ok()?;
            match model.get(column) {
                sea_orm::Value::Double(Some(value)) => Some((*field, value)),
                _ => None,
            }
        })
        .collect();
    TemplateImage {
        id: model.id,
        business_unit_id: model.business_unit_id,
        front_image: model.front_image,
        back_image: model.back_image,
        layout,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Activity log repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbActivityLogRepository {
    pub db: DatabaseConnection,
}

impl ActivityLogRepository for DbActivityLogRepository {
    async fn insert(&self, entry: &NewActivityLog) -> Result<ActivityLog, AdminServiceError> {
        let (model_type, model_id) = match entry.target.as_ref().map(AuditTarget::parts) {
            Some((model_type, model_id)) => (Some(model_type.to_owned()), Some(model_id)),
            None => (None, None),
        };
        let model = activity_logs::ActiveModel {
            user_id: Set(entry.user_id),
            action: Set(entry.action.clone()),
            description: Set(entry.description.clone()),
            model_type: Set(model_type),
            model_id: Set(model_id),
            properties: Set(entry.properties.clone()),
            ip_address: Set(entry.ip_address.clone()),
            user_agent: Set(entry.user_agent.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert activity log")?;
        Ok(activity_log_from_model(model, None))
    }

    async fn list(
        &self,
        filter: &ActivityLogFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLog>, AdminServiceError> {
        let page = page.clamped();
        let mut query = activity_logs::Entity::find()
            .find_also_related(users::Entity)
            .filter_contains_any(
                [
                    (activity_logs::Entity, activity_logs::Column::Description).into_column_ref(),
                    (activity_logs::Entity, activity_logs::Column::Action).into_column_ref(),
                    (users::Entity, users::Column::Name).into_column_ref(),
                ],
                filter.search.as_deref(),
            );
        if let Some(user_id) = filter.user_id {
            query = query.filter(activity_logs::Column::UserId.eq(user_id));
        }
        if !filter.actions.is_empty() {
            query = query.filter(activity_logs::Column::Action.is_in(filter.actions.iter().cloned()));
        }
        let paginator = query
            .order_by_desc(activity_logs::Column::CreatedAt)
            .order_by_desc(activity_logs::Column::Id)
            .paginate(&self.db, u64::from(page.per_page));
        let total = paginator.num_items().await.context("count activity logs")?;
        let rows = paginator
            .fetch_page(page.index())
            .await
            .context("list activity logs")?;
        let logs = rows
            .into_iter()
            .map(|(log, user)| activity_log_from_model(log, user.map(|u| u.name)))
            .collect();
        Ok(Page::new(logs, page, total))
    }

    async fn actions(&self) -> Result<Vec<String>, AdminServiceError> {
        let actions = activity_logs::Entity::find()
            .select_only()
            .column(activity_logs::Column::Action)
            .distinct()
            .order_by_asc(activity_logs::Column::Action)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list activity log actions")?;
        Ok(actions)
    }

    async fn clear(&self) -> Result<u64, AdminServiceError> {
        let result = activity_logs::Entity::delete_many()
            .exec(&self.db)
            .await
            .context("clear activity logs")?;
        Ok(result.rows_affected)
    }
}

fn activity_log_from_model(model: activity_logs::Model, user_name: Option<String>) -> ActivityLog {
    let target = match (&model.model_type, &model.model_id) {
        (Some(model_type), Some(model_id)) => AuditTarget::from_parts(model_type, model_id),
        _ => None,
    };
    ActivityLog {
        id: model.id,
        user_id: model.user_id,
        user_name,
        action: model.action,
        description: model.description,
        target,
        properties: model.properties,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        created_at: model.created_at,
    }
}

// ── Network path repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNetworkPathRepository {
    pub db: DatabaseConnection,
}

impl NetworkPathRepository for DbNetworkPathRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, AdminServiceError> {
        let model = network_paths::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await
            .context("get network path")?;
        Ok(model.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AdminServiceError> {
        let now = Utc::now();
        network_paths::Entity::insert(network_paths::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::column(network_paths::Column::Key)
                .update_columns([network_paths::Column::Value, network_paths::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("set network path")?;
        Ok(())
    }
}
