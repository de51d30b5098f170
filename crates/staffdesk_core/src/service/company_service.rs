//! Company use-case service: load, search, create and update.
//!
//! # Responsibility
//! - Provide the operations presentation code calls, for every entity type.
//! - Acquire the shared session per operation and release it on return.
//! - Classify failures into `ServiceError`.
//!
//! # Invariants
//! - `update_*` replace every editable field; `update_task_status` and
//!   `set_department_manager` are the only partial updates.
//! - An entity passed by `&mut` is modified only after its write committed;
//!   on error it keeps its pre-call value.
//! - Returned records are snapshots; later edits to them are not observed.

use crate::db::DbError;
use crate::model::{
    AssignmentListing, Department, DepartmentFields, DepartmentId, DepartmentListing, Employee,
    EmployeeFields, EmployeeId, EmployeeListing, EmployeeProject, Project, ProjectFields,
    ProjectId, Task, TaskFields, TaskId, TaskListing, TaskStatus, ValidationError,
};
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::{EntityKind, RepoError, RepoResult, SqliteStore, Store};
use crate::search::filter::{filter, Searchable};
use crate::session::SessionProvider;
use log::{debug, error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced to presentation code.
#[derive(Debug)]
pub enum ServiceError {
    /// The store could not be reached; the caller cannot proceed.
    Connectivity(DbError),
    /// The store rejected a write; it has been rolled back.
    ConstraintViolation(String),
    /// The record targeted by an update is gone.
    NotFound { entity: EntityKind, key: String },
    /// Field values were rejected before reaching the store.
    Validation(ValidationError),
    /// Any other store failure, including undecodable rows.
    Store(RepoError),
}

impl ServiceError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connectivity(err) => write!(f, "{err}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connectivity(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::ConstraintViolation(_) | Self::NotFound { .. } => None,
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        if value.is_connectivity() {
            Self::Connectivity(value)
        } else {
            Self::Store(RepoError::Db(value))
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::ConstraintViolation(message) => Self::ConstraintViolation(message),
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            RepoError::Db(err) if err.is_connectivity() => Self::Connectivity(err),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// A record type that can be loaded in full and searched.
pub trait Listable: Searchable + Clone {
    const KIND: EntityKind;

    /// Every row of this type, ordered by primary key.
    fn load_all<S: Store>(conn: &Connection) -> RepoResult<Vec<Self>>;

    fn count<S: Store>(conn: &Connection) -> RepoResult<u64>;
}

impl Listable for EmployeeListing {
    const KIND: EntityKind = EntityKind::Employee;

    fn load_all<S: Store>(conn: &Connection) -> RepoResult<Vec<Self>> {
        S::employees(conn).list_employees()
    }

    fn count<S: Store>(conn: &Connection) -> RepoResult<u64> {
        S::employees(conn).count_employees()
    }
}

impl Listable for DepartmentListing {
    const KIND: EntityKind = EntityKind::Department;

    fn load_all<S: Store>(conn: &Connection) -> RepoResult<Vec<Self>> {
        S::departments(conn).list_departments()
    }

    fn count<S: Store>(conn: &Connection) -> RepoResult<u64> {
        S::departments(conn).count_departments()
    }
}

impl Listable for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn load_all<S: Store>(conn: &Connection) -> RepoResult<Vec<Self>> {
        S::projects(conn).list_projects()
    }

    fn count<S: Store>(conn: &Connection) -> RepoResult<u64> {
        S::projects(conn).count_projects()
    }
}

impl Listable for TaskListing {
    const KIND: EntityKind = EntityKind::Task;

    fn load_all<S: Store>(conn: &Connection) -> RepoResult<Vec<Self>> {
        S::tasks(conn).list_tasks()
    }

    fn count<S: Store>(conn: &Connection) -> RepoResult<u64> {
        S::tasks(conn).count_tasks()
    }
}

impl Listable for AssignmentListing {
    const KIND: EntityKind = EntityKind::Assignment;

    fn load_all<S: Store>(conn: &Connection) -> RepoResult<Vec<Self>> {
        S::assignments(conn).list_assignments()
    }

    fn count<S: Store>(conn: &Connection) -> RepoResult<u64> {
        S::assignments(conn).count_assignments()
    }
}

/// Use-case service over one injected session provider.
pub struct CompanyService<'p, S: Store = SqliteStore> {
    sessions: &'p SessionProvider,
    store: PhantomData<S>,
}

impl<'p> CompanyService<'p, SqliteStore> {
    pub fn new(sessions: &'p SessionProvider) -> Self {
        Self::with_store(sessions)
    }
}

impl<'p, S: Store> CompanyService<'p, S> {
    /// Service whose repositories come from `S`.
    pub fn with_store(sessions: &'p SessionProvider) -> Self {
        Self {
            sessions,
            store: PhantomData,
        }
    }

    /// Loads every record of type `T`.
    pub fn load_all<T: Listable>(&self) -> ServiceResult<Vec<T>> {
        let started_at = Instant::now();
        let result = self.with_conn(|conn| T::load_all::<S>(conn));
        match &result {
            Ok(records) => debug!(
                "event=entity_load module=service status=ok entity={} count={} duration_ms={}",
                T::KIND,
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=entity_load module=service status=error entity={} error={}",
                T::KIND,
                err
            ),
        }
        result
    }

    /// Loads every record of type `T` and keeps those matching
    /// `predicate_text`; see [`filter`].
    pub fn search<T: Listable>(&self, predicate_text: &str) -> ServiceResult<Vec<T>> {
        let records = self.load_all::<T>()?;
        let hits = filter(&records, predicate_text);
        debug!(
            "event=entity_filter module=service status=ok entity={} total={} hits={}",
            T::KIND,
            records.len(),
            hits.len()
        );
        Ok(hits)
    }

    pub fn count<T: Listable>(&self) -> ServiceResult<u64> {
        self.with_conn(|conn| T::count::<S>(conn))
    }

    pub fn employee(&self, id: EmployeeId) -> ServiceResult<EmployeeListing> {
        self.with_conn(|conn| {
            S::employees(conn)
                .get_employee(id)?
                .ok_or_else(|| RepoError::not_found(EntityKind::Employee, id))
        })
    }

    pub fn department(&self, id: DepartmentId) -> ServiceResult<DepartmentListing> {
        self.with_conn(|conn| {
            S::departments(conn)
                .get_department(id)?
                .ok_or_else(|| RepoError::not_found(EntityKind::Department, id))
        })
    }

    pub fn project(&self, id: ProjectId) -> ServiceResult<Project> {
        self.with_conn(|conn| {
            S::projects(conn)
                .get_project(id)?
                .ok_or_else(|| RepoError::not_found(EntityKind::Project, id))
        })
    }

    pub fn task(&self, id: TaskId) -> ServiceResult<TaskListing> {
        self.with_conn(|conn| {
            S::tasks(conn)
                .get_task(id)?
                .ok_or_else(|| RepoError::not_found(EntityKind::Task, id))
        })
    }

    pub fn create_department(&self, fields: &DepartmentFields) -> ServiceResult<Department> {
        let started_at = Instant::now();
        let result = self.with_conn(|conn| S::departments(conn).create_department(fields));
        log_create(EntityKind::Department, started_at, result.as_ref().map(|d| id_key(d.id)));
        result
    }

    pub fn update_department(
        &self,
        department: &mut Department,
        fields: DepartmentFields,
    ) -> ServiceResult<()> {
        let started_at = Instant::now();
        let id = department.id;
        let result = self.with_conn(|conn| S::departments(conn).update_department(id, &fields));
        log_update(EntityKind::Department, &id_key(id), started_at, result.as_ref().map(|_| ()));
        *department = result?;
        Ok(())
    }

    /// Sets or clears a department's manager, leaving its name untouched.
    pub fn set_department_manager(
        &self,
        department: &mut Department,
        manager_id: Option<EmployeeId>,
    ) -> ServiceResult<()> {
        let started_at = Instant::now();
        let id = department.id;
        let result = self.with_conn(|conn| S::departments(conn).set_manager(id, manager_id));
        log_update(EntityKind::Department, &id_key(id), started_at, result.as_ref().map(|_| ()));
        result?;
        department.manager_id = manager_id;
        Ok(())
    }

    pub fn create_employee(&self, fields: &EmployeeFields) -> ServiceResult<Employee> {
        let started_at = Instant::now();
        let result = self.with_conn(|conn| S::employees(conn).create_employee(fields));
        log_create(EntityKind::Employee, started_at, result.as_ref().map(|e| id_key(e.id)));
        result
    }

    pub fn update_employee(
        &self,
        employee: &mut Employee,
        fields: EmployeeFields,
    ) -> ServiceResult<()> {
        let started_at = Instant::now();
        let id = employee.id;
        let result = self.with_conn(|conn| S::employees(conn).update_employee(id, &fields));
        log_update(EntityKind::Employee, &id_key(id), started_at, result.as_ref().map(|_| ()));
        *employee = result?;
        Ok(())
    }

    pub fn create_project(&self, fields: &ProjectFields) -> ServiceResult<Project> {
        let started_at = Instant::now();
        let result = self.with_conn(|conn| S::projects(conn).create_project(fields));
        log_create(EntityKind::Project, started_at, result.as_ref().map(|p| id_key(p.id)));
        result
    }

    pub fn update_project(&self, project: &mut Project, fields: ProjectFields) -> ServiceResult<()> {
        let started_at = Instant::now();
        let id = project.id;
        let result = self.with_conn(|conn| S::projects(conn).update_project(id, &fields));
        log_update(EntityKind::Project, &id_key(id), started_at, result.as_ref().map(|_| ()));
        *project = result?;
        Ok(())
    }

    pub fn create_task(&self, fields: &TaskFields) -> ServiceResult<Task> {
        let started_at = Instant::now();
        let result = self.with_conn(|conn| S::tasks(conn).create_task(fields));
        log_create(EntityKind::Task, started_at, result.as_ref().map(|t| id_key(t.id)));
        result
    }

    pub fn update_task(&self, task: &mut Task, fields: TaskFields) -> ServiceResult<()> {
        let started_at = Instant::now();
        let id = task.id;
        let result = self.with_conn(|conn| S::tasks(conn).update_task(id, &fields));
        log_update(EntityKind::Task, &id_key(id), started_at, result.as_ref().map(|_| ()));
        *task = result?;
        Ok(())
    }

    /// Changes only the status; name, description, project and assignee
    /// are left as stored.
    pub fn update_task_status(&self, task: &mut Task, status: TaskStatus) -> ServiceResult<()> {
        let started_at = Instant::now();
        let id = task.id;
        let result = self.with_conn(|conn| S::tasks(conn).update_task_status(id, status));
        log_update(EntityKind::Task, &id_key(id), started_at, result.as_ref().map(|_| ()));
        result?;
        task.status = status;
        Ok(())
    }

    pub fn assign_employee(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        role: impl Into<String>,
    ) -> ServiceResult<EmployeeProject> {
        let started_at = Instant::now();
        let assignment = EmployeeProject::new(employee_id, project_id, role);
        let result = self.with_conn(|conn| S::assignments(conn).create_assignment(&assignment));
        log_create(
            EntityKind::Assignment,
            started_at,
            result
                .as_ref()
                .map(|_| assignment_key(employee_id, project_id)),
        );
        result?;
        Ok(assignment)
    }

    pub fn update_assignment_role(
        &self,
        assignment: &mut EmployeeProject,
        role: &str,
    ) -> ServiceResult<()> {
        let started_at = Instant::now();
        let (employee_id, project_id) = (assignment.employee_id, assignment.project_id);
        let result = self.with_conn(|conn| {
            S::assignments(conn).update_assignment_role(employee_id, project_id, role)
        });
        log_update(
            EntityKind::Assignment,
            &assignment_key(employee_id, project_id),
            started_at,
            result.as_ref().map(|_| ()),
        );
        *assignment = result?;
        Ok(())
    }

    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> ServiceResult<T> {
        let session = self.sessions.get_session()?;
        Ok(op(session.connection())?)
    }
}

fn id_key(id: i64) -> String {
    format!("id={id}")
}

/// Assignments have no id of their own; they are keyed by both sides.
fn assignment_key(employee_id: EmployeeId, project_id: ProjectId) -> String {
    format!("employee_id={employee_id} project_id={project_id}")
}

fn log_create(entity: EntityKind, started_at: Instant, outcome: Result<String, &ServiceError>) {
    match outcome {
        Ok(key) => info!(
            "event=entity_create module=service status=ok entity={} {} duration_ms={}",
            entity,
            key,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=entity_create module=service status=error entity={} duration_ms={} error_kind={}",
            entity,
            started_at.elapsed().as_millis(),
            error_kind(err)
        ),
    }
}

fn log_update(
    entity: EntityKind,
    key: &str,
    started_at: Instant,
    outcome: Result<(), &ServiceError>,
) {
    match outcome {
        Ok(()) => info!(
            "event=entity_update module=service status=ok entity={} {} duration_ms={}",
            entity,
            key,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=entity_update module=service status=error entity={} {} duration_ms={} error_kind={}",
            entity,
            key,
            started_at.elapsed().as_millis(),
            error_kind(err)
        ),
    }
}

fn error_kind(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Connectivity(_) => "connectivity",
        ServiceError::ConstraintViolation(_) => "constraint_violation",
        ServiceError::NotFound { .. } => "not_found",
        ServiceError::Validation(_) => "validation",
        ServiceError::Store(_) => "store",
    }
}
