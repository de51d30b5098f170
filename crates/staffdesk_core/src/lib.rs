//! Core domain logic for the staffing desk: company entities, their
//! persistence, and search over loaded records.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod session;

pub use config::{AppConfig, ConfigError, DatabaseConfig, DatabaseTarget, LoggingConfig};
pub use db::DbError;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::{
    AssignmentListing, Department, DepartmentFields, DepartmentId, DepartmentListing,
    DepartmentRef, Employee, EmployeeFields, EmployeeId, EmployeeListing, EmployeeProject,
    EmployeeRef, Project, ProjectFields, ProjectId, ProjectRef, Task, TaskFields, TaskId,
    TaskListing, TaskStatus, ValidationError,
};
pub use repo::{EntityKind, RepoError, RepoResult, SqliteStore, Store};
pub use search::filter::{filter, Searchable};
pub use service::company_service::{CompanyService, Listable, ServiceError, ServiceResult};
pub use session::{Session, SessionGuard, SessionProvider};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
