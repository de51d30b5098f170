//! Company domain model: departments, employees, projects, tasks and
//! staffing assignments.
//!
//! # Responsibility
//! - Define persisted entity records and their editable field sets.
//! - Define listing shapes that carry eagerly resolved relations.
//! - Own field validation so it holds regardless of caller.
//!
//! # Invariants
//! - Entity ids are generated by the store and never reused.
//! - Every `*Fields` value passes `validate()` before it reaches SQL.
//! - Relations are plain ids on entities; names are only available on
//!   listings, never through implicit traversal.

pub mod assignment;
pub mod department;
pub mod employee;
pub mod project;
pub mod task;
pub mod validation;

pub use assignment::{AssignmentListing, EmployeeProject};
pub use department::{Department, DepartmentFields, DepartmentId, DepartmentListing, DepartmentRef};
pub use employee::{Employee, EmployeeFields, EmployeeId, EmployeeListing, EmployeeRef};
pub use project::{Project, ProjectFields, ProjectId, ProjectRef};
pub use task::{Task, TaskFields, TaskId, TaskListing, TaskStatus};
pub use validation::ValidationError;
