//! Employee domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the human-readable ID number.
pub const ID_NUMBER_WIDTH: usize = 6;

/// How long a printed ID card stays valid after issuance.
pub const ID_VALIDITY_MONTHS: u32 = 24;

/// Employment status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Active,
    Inactive,
    Resigned,
    Terminated,
}

impl EmploymentStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Inactive, Self::Resigned, Self::Terminated];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Resigned => "resigned",
            Self::Terminated => "terminated",
        }
    }
}

/// Whether the physical ID card has been printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStatus {
    #[default]
    Pending,
    Printed,
}

impl IdStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Printed => "printed",
        }
    }
}

/// Error returned when a string is not a known enumerated value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for EmploymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "employment status",
                value: s.to_owned(),
            })
    }
}

impl FromStr for IdStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "printed" => Ok(Self::Printed),
            _ => Err(UnknownVariant {
                kind: "ID status",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next ID counter given the highest counter still in the table and the last
/// value the sequence handed out. Never reuses a counter.
pub fn next_id_counter(current_max: Option<i32>, last_issued: Option<i32>) -> i32 {
    current_max.unwrap_or(0).max(last_issued.unwrap_or(0)) + 1
}

/// Render a counter as the zero-padded ID number, e.g. `1` → `"000001"`.
pub fn format_id_number(counter: i32) -> String {
    format!("{counter:0width$}", width = ID_NUMBER_WIDTH)
}

/// Expiry of an ID card issued at `exported_at`.
pub fn id_expiry(exported_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    exported_at.checked_add_months(Months::new(ID_VALIDITY_MONTHS))
}

/// Sortable columns of the employee listing.
///
/// `BusinessUnitName` is virtual: storage orders by the business unit key,
/// the client keeps seeing `business_unit_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeSortField {
    #[default]
    IdNumber,
    FirstName,
    LastName,
    Position,
    EmploymentStatus,
    IdStatus,
    HireDate,
    CreatedAt,
    BusinessUnitName,
}

impl EmployeeSortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id_number" => Some(Self::IdNumber),
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "position" => Some(Self::Position),
            "employment_status" => Some(Self::EmploymentStatus),
            "id_status" => Some(Self::IdStatus),
            "hire_date" => Some(Self::HireDate),
            "created_at" => Some(Self::CreatedAt),
            "business_unit_name" | "business_unit_id" => Some(Self::BusinessUnitName),
            _ => None,
        }
    }

    /// Name echoed back to the client.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdNumber => "id_number",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Position => "position",
            Self::EmploymentStatus => "employment_status",
            Self::IdStatus => "id_status",
            Self::HireDate => "hire_date",
            Self::CreatedAt => "created_at",
            Self::BusinessUnitName => "business_unit_name",
        }
    }
}
