#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use hrdesk_domain::pagination::{Page, PageRequest};

use crate::domain::types::{
    ActivityLog, ActivityLogFilter, BlobBucket, BusinessUnit, DeletedBusinessUnits, Employee,
    EmployeeFilter, EmployeeProfile, EmployeeRecord, EmployeeSort, NewActivityLog, NewEmployee,
    NewTemplate, NewUser, TemplateImage, TemplateLayout, TemplateRecord, Upload, User,
    UserChanges,
};
use crate::error::AdminServiceError;

/// Repository for admin accounts.
pub trait UserRepository: Send + Sync {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, AdminServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AdminServiceError>;
    /// Whether another account (other than `except`) already uses `email`.
    async fn email_taken(&self, email: &str, except: Option<i32>)
    -> Result<bool, AdminServiceError>;
    async fn create(&self, user: &NewUser) -> Result<User, AdminServiceError>;
    async fn update(
        &self,
        id: i32,
        changes: &UserChanges,
    ) -> Result<Option<User>, AdminServiceError>;
    /// Delete an account. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, AdminServiceError>;
}

/// Repository for business units.
pub trait BusinessUnitRepository: Send + Sync {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<BusinessUnit>, AdminServiceError>;
    /// Every unit, ordered by name. Feeds selection lists.
    async fn all(&self) -> Result<Vec<BusinessUnit>, AdminServiceError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<BusinessUnit>, AdminServiceError>;
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<BusinessUnit>, AdminServiceError>;
    /// Whether a unit other than `except` already uses `code`.
    async fn code_taken(&self, code: &str, except: Option<&str>)
    -> Result<bool, AdminServiceError>;
    async fn create(&self, unit: &BusinessUnit) -> Result<(), AdminServiceError>;
    async fn update(&self, unit: &BusinessUnit) -> Result<(), AdminServiceError>;
    /// Delete units in one statement. Dependent employees and templates go with them.
    async fn delete_many(&self, ids: &[String]) -> Result<DeletedBusinessUnits, AdminServiceError>;
}

/// Repository for employees.
pub trait EmployeeRepository: Send + Sync {
    async fn list(
        &self,
        filter: &EmployeeFilter,
        sort: EmployeeSort,
        page: PageRequest,
    ) -> Result<Page<EmployeeRecord>, AdminServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeRecord>, AdminServiceError>;
    /// Insert an employee, assigning the next ID counter atomically.
    async fn create(&self, employee: &NewEmployee) -> Result<Employee, AdminServiceError>;
    async fn update(
        &self,
        id: Uuid,
        profile: &EmployeeProfile,
    ) -> Result<Option<Employee>, AdminServiceError>;
    /// Delete employees by id. Returns the rows that were removed.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Employee>, AdminServiceError>;
    /// Bump the issuance count, stamp `exported_at` and mark the ID printed.
    async fn record_issuance(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Employee>, AdminServiceError>;
}

/// Repository for ID-card templates.
pub trait TemplateRepository: Send + Sync {
    async fn list(
        &self,
        business_unit_id: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<TemplateRecord>, AdminServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<TemplateRecord>, AdminServiceError>;
    async fn create(&self, template: &NewTemplate) -> Result<TemplateImage, AdminServiceError>;
    /// Persist artwork keys and owning unit.
    async fn update_images(&self, template: &TemplateImage) -> Result<(), AdminServiceError>;
    /// Overwrite only the layout fields present in `changes`.
    async fn update_layout(
        &self,
        id: i32,
        changes: &TemplateLayout,
    ) -> Result<Option<TemplateImage>, AdminServiceError>;
    /// Delete a template. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, AdminServiceError>;
}

/// Append-only audit storage.
pub trait ActivityLogRepository: Send + Sync {
    async fn insert(&self, entry: &NewActivityLog) -> Result<ActivityLog, AdminServiceError>;
    /// Newest first.
    async fn list(
        &self,
        filter: &ActivityLogFilter,
        page: PageRequest,
    ) -> Result<Page<ActivityLog>, AdminServiceError>;
    /// Distinct action tags present in the log, sorted.
    async fn actions(&self) -> Result<Vec<String>, AdminServiceError>;
    /// Remove every entry. Returns the number removed.
    async fn clear(&self) -> Result<u64, AdminServiceError>;
}

/// Key-value settings table.
pub trait NetworkPathRepository: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AdminServiceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AdminServiceError>;
}

/// Durable storage for uploaded files, addressed by bucket and key.
pub trait BlobStore: Send + Sync {
    /// Store `upload` under a fresh key and return the key.
    async fn put(&self, bucket: BlobBucket, upload: &Upload) -> Result<String, AdminServiceError>;
    /// Remove a blob. A blob that is already gone is not an error.
    async fn delete(&self, bucket: BlobBucket, key: &str) -> Result<(), AdminServiceError>;
}

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AdminServiceError>;
}
