//! Department entity.
//!
//! # Invariants
//! - `manager_id`, when set, references an existing employee (enforced by
//!   the store's foreign key).

use super::employee::{EmployeeId, EmployeeRef};
use super::validation::{required_text, ValidationError, NAME_MAX_CHARS};
use serde::{Deserialize, Serialize};

pub type DepartmentId = i64;

/// Persisted department row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub manager_id: Option<EmployeeId>,
}

/// Editable department fields, used for both create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepartmentFields {
    pub name: String,
    pub manager_id: Option<EmployeeId>,
}

impl DepartmentFields {
    /// Fields for a department without a manager.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manager_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("name", &self.name, NAME_MAX_CHARS)
    }
}

impl Department {
    pub(crate) fn from_fields(id: DepartmentId, fields: DepartmentFields) -> Self {
        Self {
            id,
            name: fields.name,
            manager_id: fields.manager_id,
        }
    }

    /// Current editable fields, the starting point for an edit.
    pub fn fields(&self) -> DepartmentFields {
        DepartmentFields {
            name: self.name.clone(),
            manager_id: self.manager_id,
        }
    }
}

/// Lightweight department reference carried by employee listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    pub id: DepartmentId,
    pub name: String,
}

/// Department plus its resolved manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentListing {
    pub department: Department,
    pub manager: Option<EmployeeRef>,
}
