//! Employee entity.
//!
//! # Invariants
//! - `salary` stays within `SALARY_MIN..=SALARY_MAX`.
//! - `department_id`, when set, references an existing department.

use super::department::{DepartmentId, DepartmentRef};
use super::validation::{
    bounded_text, in_range, required_text, ValidationError, PERSON_NAME_MAX_CHARS,
    POSITION_MAX_CHARS, SALARY_MAX, SALARY_MIN,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type EmployeeId = i64;

/// Persisted employee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: i64,
    pub hire_date: NaiveDate,
    pub department_id: Option<DepartmentId>,
}

/// Editable employee fields.
///
/// Updates replace every field, so `department_id = None` moves the
/// employee out of any department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: i64,
    pub hire_date: NaiveDate,
    pub department_id: Option<DepartmentId>,
}

impl EmployeeFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("first_name", &self.first_name, PERSON_NAME_MAX_CHARS)?;
        required_text("last_name", &self.last_name, PERSON_NAME_MAX_CHARS)?;
        bounded_text("position", &self.position, POSITION_MAX_CHARS)?;
        in_range("salary", self.salary, SALARY_MIN, SALARY_MAX)?;
        Ok(())
    }
}

impl Employee {
    pub(crate) fn from_fields(id: EmployeeId, fields: EmployeeFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            position: fields.position,
            salary: fields.salary,
            hire_date: fields.hire_date,
            department_id: fields.department_id,
        }
    }

    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            position: self.position.clone(),
            salary: self.salary,
            hire_date: self.hire_date,
            department_id: self.department_id,
        }
    }
}

/// Employee reference carried by task, department and assignment listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
}

impl EmployeeRef {
    /// "First Last", the form used for display and search.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Employee plus the department it belongs to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeListing {
    pub employee: Employee,
    pub department: Option<DepartmentRef>,
}
