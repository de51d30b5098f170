//! Staffing assignment: which employee works on which project, and as what.

use super::employee::{EmployeeId, EmployeeRef};
use super::project::{ProjectId, ProjectRef};
use super::validation::{required_text, ValidationError, ROLE_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// Join row keyed by `(employee_id, project_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProject {
    pub employee_id: EmployeeId,
    pub project_id: ProjectId,
    pub role: String,
}

impl EmployeeProject {
    pub fn new(employee_id: EmployeeId, project_id: ProjectId, role: impl Into<String>) -> Self {
        Self {
            employee_id,
            project_id,
            role: role.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("role", &self.role, ROLE_MAX_CHARS)
    }
}

/// Assignment with both sides resolved. Both references are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentListing {
    pub assignment: EmployeeProject,
    pub employee: EmployeeRef,
    pub project: ProjectRef,
}
