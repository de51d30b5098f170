//! Task entity and its closed status set.
//!
//! # Invariants
//! - Status is always one of `TaskStatus`; free-form status text is
//!   rejected at parse time with `ValidationError::UnknownStatus`.
//! - Status is stored as `in_progress|completed|cancelled` and shown (and
//!   searched) by its human label.

use super::employee::{EmployeeId, EmployeeRef};
use super::project::{ProjectId, ProjectRef};
use super::validation::{
    bounded_text, required_text, ValidationError, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type TaskId = i64;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::InProgress, Self::Completed, Self::Cancelled];

    /// Human label used for display and search.
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub(crate) fn as_db_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub(crate) fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    /// Accepts either the label or the stored form, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace('_', " ");
        Self::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| ValidationError::UnknownStatus(value.to_string()))
    }
}

/// Persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub project_id: Option<ProjectId>,
    pub assignee_id: Option<EmployeeId>,
}

/// Editable task fields for create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub project_id: Option<ProjectId>,
    pub assignee_id: Option<EmployeeId>,
}

impl TaskFields {
    /// New in-progress task with no project or assignee.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: TaskStatus::InProgress,
            project_id: None,
            assignee_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("name", &self.name, NAME_MAX_CHARS)?;
        bounded_text("description", &self.description, DESCRIPTION_MAX_CHARS)?;
        Ok(())
    }
}

impl Task {
    pub(crate) fn from_fields(id: TaskId, fields: TaskFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            status: fields.status,
            project_id: fields.project_id,
            assignee_id: fields.assignee_id,
        }
    }

    pub fn fields(&self) -> TaskFields {
        TaskFields {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            project_id: self.project_id,
            assignee_id: self.assignee_id,
        }
    }
}

/// Task plus its resolved project and assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListing {
    pub task: Task,
    pub project: Option<ProjectRef>,
    pub assignee: Option<EmployeeRef>,
}

#[cfg(test)]
mod tests {
    use super::TaskStatus;
    use crate::model::ValidationError;

    #[test]
    fn status_parses_label_and_stored_forms() {
        assert_eq!("in progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!(" Completed ".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "paused".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownStatus("paused".to_string()));
    }

    #[test]
    fn db_form_round_trips_for_every_status() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_db_str(status.as_db_str()), Some(status));
        }
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
