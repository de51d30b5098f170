//! Project entity.

use super::validation::{required_text, ValidationError, NAME_MAX_CHARS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ProjectId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: i64,
}

impl ProjectFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text("name", &self.name, NAME_MAX_CHARS)?;
        if self.budget < 0 {
            return Err(ValidationError::OutOfRange {
                field: "budget",
                min: 0,
                max: i64::MAX,
                value: self.budget,
            });
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ValidationError::DateOrder { start, end });
            }
        }
        Ok(())
    }
}

impl Project {
    pub(crate) fn from_fields(id: ProjectId, fields: ProjectFields) -> Self {
        Self {
            id,
            name: fields.name,
            start_date: fields.start_date,
            end_date: fields.end_date,
            budget: fields.budget,
        }
    }

    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::ProjectFields;
    use crate::model::ValidationError;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_before_start_is_rejected() {
        let fields = ProjectFields {
            name: "Migration".to_string(),
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 2, 1)),
            budget: 10,
        };
        assert!(matches!(
            fields.validate(),
            Err(ValidationError::DateOrder { .. })
        ));
    }

    #[test]
    fn open_ended_project_is_valid() {
        let fields = ProjectFields {
            name: "Support".to_string(),
            start_date: Some(date(2024, 3, 1)),
            end_date: None,
            budget: 0,
        };
        fields.validate().unwrap();
    }
}
