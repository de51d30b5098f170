//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQLite query details from service orchestration.
//! - Classify store failures into semantic errors.
//!
//! # Invariants
//! - Write paths validate fields before any SQL runs.
//! - Every write runs in its own transaction; a failed write is rolled back
//!   before the error is returned.
//! - Read paths reject undecodable persisted state instead of masking it.
//! - `list_*` results are ordered by ascending primary key.

use crate::db::DbError;
use crate::model::ValidationError;
use assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use project_repo::{ProjectRepository, SqliteProjectRepository};
use task_repo::{SqliteTaskRepository, TaskRepository};
use chrono::NaiveDate;
use log::warn;
use rusqlite::{Connection, ErrorCode, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assignment_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod project_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository implementations bound to one borrowed connection.
///
/// Services are generic over this, so each operation builds its repositories
/// on the session it currently holds.
pub trait Store {
    type Departments<'c>: DepartmentRepository;
    type Employees<'c>: EmployeeRepository;
    type Projects<'c>: ProjectRepository;
    type Tasks<'c>: TaskRepository;
    type Assignments<'c>: AssignmentRepository;

    fn departments(conn: &Connection) -> Self::Departments<'_>;
    fn employees(conn: &Connection) -> Self::Employees<'_>;
    fn projects(conn: &Connection) -> Self::Projects<'_>;
    fn tasks(conn: &Connection) -> Self::Tasks<'_>;
    fn assignments(conn: &Connection) -> Self::Assignments<'_>;
}

/// SQLite repositories from this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteStore;

impl Store for SqliteStore {
    type Departments<'c> = SqliteDepartmentRepository<'c>;
    type Employees<'c> = SqliteEmployeeRepository<'c>;
    type Projects<'c> = SqliteProjectRepository<'c>;
    type Tasks<'c> = SqliteTaskRepository<'c>;
    type Assignments<'c> = SqliteAssignmentRepository<'c>;

    fn departments(conn: &Connection) -> Self::Departments<'_> {
        SqliteDepartmentRepository::new(conn)
    }

    fn employees(conn: &Connection) -> Self::Employees<'_> {
        SqliteEmployeeRepository::new(conn)
    }

    fn projects(conn: &Connection) -> Self::Projects<'_> {
        SqliteProjectRepository::new(conn)
    }

    fn tasks(conn: &Connection) -> Self::Tasks<'_> {
        SqliteTaskRepository::new(conn)
    }

    fn assignments(conn: &Connection) -> Self::Assignments<'_> {
        SqliteAssignmentRepository::new(conn)
    }
}

/// Persistent record types, used to label errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Department,
    Employee,
    Project,
    Task,
    Assignment,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Employee => "employee",
            Self::Project => "project",
            Self::Task => "task",
            Self::Assignment => "assignment",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Field values rejected before reaching the store.
    Validation(ValidationError),
    /// Store rejected the write (foreign key, CHECK, NOT NULL, UNIQUE).
    /// The transaction has been rolled back.
    ConstraintViolation(String),
    /// Target record is no longer present.
    NotFound { entity: EntityKind, key: String },
    Db(DbError),
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ConstraintViolation(_) | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == ErrorCode::ConstraintViolation {
                return Self::ConstraintViolation(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                );
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs `op` inside a transaction, committing on success and rolling back
/// on any error.
pub(crate) fn in_transaction<T>(
    conn: &Connection,
    op: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.unchecked_transaction()?;
    match op(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=tx_rollback module=repo status=error error={}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

/// Decodes an ISO `YYYY-MM-DD` column value.
pub(crate) fn parse_date(column: &str, value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in {column}"))
    })
}

pub(crate) fn parse_optional_date(column: &str, value: Option<String>) -> RepoResult<Option<NaiveDate>> {
    value.map(|text| parse_date(column, &text)).transpose()
}

pub(crate) fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get::<_, i64>(0)
    })?;
    u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count in {table}")))
}
