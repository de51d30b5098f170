//! Field validation shared by all entity field sets.
//!
//! Limits mirror the column constraints in the schema migrations, so a value
//! that validates here is never rejected by a CHECK constraint.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NAME_MAX_CHARS: usize = 100;
pub const PERSON_NAME_MAX_CHARS: usize = 50;
pub const POSITION_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 255;
pub const ROLE_MAX_CHARS: usize = 50;
pub const SALARY_MIN: i64 = 0;
pub const SALARY_MAX: i64 = 1_000_000;

/// Field-level validation failure. No SQL is executed when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text is empty or whitespace only.
    Blank { field: &'static str },
    /// Text exceeds the column limit (counted in characters).
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Numeric value outside the accepted inclusive range.
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    /// Range end precedes range start.
    DateOrder { start: NaiveDate, end: NaiveDate },
    /// Status text is not one of the known task states.
    UnknownStatus(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is {actual} characters long, limit is {max}")
            }
            Self::OutOfRange {
                field,
                min,
                max,
                value,
            } => write!(f, "{field} must be within {min}..={max}, got {value}"),
            Self::DateOrder { start, end } => {
                write!(f, "end date {end} is earlier than start date {start}")
            }
            Self::UnknownStatus(value) => write!(
                f,
                "unknown task status `{value}`; expected in progress|completed|cancelled"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    bounded_text(field, value, max)
}

pub(crate) fn bounded_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

pub(crate) fn in_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}
