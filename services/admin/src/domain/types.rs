use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use hrdesk_domain::audit::AuditTarget;
use hrdesk_domain::employee::{EmployeeSortField, EmploymentStatus, IdStatus, id_expiry};
use hrdesk_domain::layout::LayoutField;
use hrdesk_domain::pagination::Sort;
use hrdesk_domain::user::UserRole;

// ── Users ────────────────────────────────────────────────────────────────────

/// Account allowed into the admin tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub email_verified_at: Option<DateTime<Utc>>,
}

/// Replacement values for an account. `password_hash: None` keeps the stored hash.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password_hash: Option<String>,
}

// ── Business units ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessUnit {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    /// Logo key in [`BlobBucket::BusinessUnitLogos`].
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessUnit {
    pub fn blobs(&self) -> Vec<BlobRef> {
        self.image
            .iter()
            .map(|key| BlobRef::new(BlobBucket::BusinessUnitLogos, key))
            .collect()
    }
}

/// Outcome of removing business units together with their dependents.
#[derive(Debug, Clone, Default)]
pub struct DeletedBusinessUnits {
    pub deleted: u64,
    /// Blobs referenced by the employees and templates removed by the cascade.
    pub dependent_blobs: Vec<BlobRef>,
}

// ── Employees ────────────────────────────────────────────────────────────────

/// Editable part of an employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeProfile {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub position: String,
    pub business_unit_id: String,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub sss_number: Option<String>,
    pub philhealth_number: Option<String>,
    pub pagibig_number: Option<String>,
    pub tin_number: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub emergency_contact_address: Option<String>,
    pub employment_status: EmploymentStatus,
    pub id_status: IdStatus,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub qr_code: Option<String>,
}

impl EmployeeProfile {
    /// "First Middle Last Suffix", skipping absent parts.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
            self.suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn blobs(&self) -> Vec<BlobRef> {
        [
            (BlobBucket::EmployeePhotos, &self.photo),
            (BlobBucket::EmployeeSignatures, &self.signature),
            (BlobBucket::EmployeeQrCodes, &self.qr_code),
        ]
        .into_iter()
        .filter_map(|(bucket, key)| key.as_deref().map(|key| BlobRef::new(bucket, key)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub id_number: String,
    pub id_counter: i32,
    pub profile: EmployeeProfile,
    pub hire_date: NaiveDate,
    pub issuance_count: i32,
    pub exported_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn id_expires_at(&self) -> Option<DateTime<Utc>> {
        self.exported_at.and_then(id_expiry)
    }
}

/// Employee joined with the name of its business unit.
#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub employee: Employee,
    pub business_unit_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub id: Uuid,
    pub profile: EmployeeProfile,
    pub hire_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub business_unit_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeSort {
    pub field: EmployeeSortField,
    pub direction: Sort,
}

impl Default for EmployeeSort {
    fn default() -> Self {
        Self {
            field: EmployeeSortField::IdNumber,
            direction: Sort::Asc,
        }
    }
}

// ── Templates ────────────────────────────────────────────────────────────────

/// Overlay coordinates that have been set on a template. Unset fields are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateLayout(BTreeMap<LayoutField, f64>);

impl TemplateLayout {
    pub fn get(&self, field: LayoutField) -> Option<f64> {
        self.0.get(&field).copied()
    }

    pub fn set(&mut self, field: LayoutField, value: f64) {
        self.0.insert(field, value);
    }

    pub fn fields(&self) -> impl Iterator<Item = LayoutField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayoutField, f64)> + '_ {
        self.0.iter().map(|(field, value)| (*field, *value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object of `fields`, unset ones as `null`.
    pub fn to_json<I>(&self, fields: I) -> Value
    where
        I: IntoIterator<Item = LayoutField>,
    {
        let map: Map<String, Value> = fields
            .into_iter()
            .map(|field| (field.as_str().to_owned(), self.get(field).into()))
            .collect();
        Value::Object(map)
    }

    /// Every layout field, unset ones as `null`.
    pub fn to_full_json(&self) -> Value {
        self.to_json(LayoutField::ALL.iter().copied())
    }
}

impl FromIterator<(LayoutField, f64)> for TemplateLayout {
    fn from_iter<T: IntoIterator<Item = (LayoutField, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateImage {
    pub id: i32,
    pub business_unit_id: String,
    /// Key in [`BlobBucket::TemplateArtwork`].
    pub front_image: String,
    /// Key in [`BlobBucket::TemplateArtwork`].
    pub back_image: String,
    pub layout: TemplateLayout,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateImage {
    pub fn blobs(&self) -> Vec<BlobRef> {
        vec![
            BlobRef::new(BlobBucket::TemplateArtwork, &self.front_image),
            BlobRef::new(BlobBucket::TemplateArtwork, &self.back_image),
        ]
    }
}

/// Template joined with the name of its business unit.
#[derive(Debug, Clone)]
pub struct TemplateRecord {
    pub template: TemplateImage,
    pub business_unit_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub business_unit_id: String,
    pub front_image: String,
    pub back_image: String,
}

// ── Activity logs ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: Option<i32>,
    /// Actor name, when the actor still exists.
    pub user_name: Option<String>,
    pub action: String,
    pub description: Option<String>,
    pub target: Option<AuditTarget>,
    pub properties: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityLog {
    pub user_id: Option<i32>,
    pub action: String,
    pub description: Option<String>,
    pub target: Option<AuditTarget>,
    pub properties: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLogFilter {
    pub search: Option<String>,
    pub user_id: Option<i32>,
    pub actions: Vec<String>,
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Network image root in effect, and whether it comes from the settings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPathSetting {
    pub value: String,
    pub overridden: bool,
}

// ── Blob storage ─────────────────────────────────────────────────────────────

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Logical storage area for uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobBucket {
    BusinessUnitLogos,
    EmployeePhotos,
    EmployeeSignatures,
    EmployeeQrCodes,
    TemplateArtwork,
}

impl BlobBucket {
    /// Directory under the bucket's root.
    pub fn dir(self) -> &'static str {
        match self {
            Self::BusinessUnitLogos => "logos",
            Self::EmployeePhotos => "photos",
            Self::EmployeeSignatures => "signatures",
            Self::EmployeeQrCodes => "qr_codes",
            Self::TemplateArtwork => "templates",
        }
    }

    /// Public buckets live on the web-served disk; the rest on the network root.
    pub fn is_public(self) -> bool {
        matches!(self, Self::BusinessUnitLogos)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobRef {
    pub bucket: BlobBucket,
    pub key: String,
}

impl BlobRef {
    pub fn new(bucket: BlobBucket, key: impl Into<String>) -> Self {
        Self {
            bucket,
            key: key.into(),
        }
    }
}

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    /// Lower-cased extension of the original file name.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Reason the upload is unacceptable as an image, if any.
    pub fn check_image(&self) -> Result<(), &'static str> {
        if self.bytes.is_empty() {
            return Err("must not be an empty file");
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err("may not be greater than 2048 kilobytes");
        }
        match self.extension() {
            Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err("must be a file of type: jpg, jpeg, png, gif, webp"),
        }
    }
}
