//! Staffing assignment repository (`employee_projects`).
//!
//! # Invariants
//! - `(employee_id, project_id)` is unique; assigning twice is a
//!   `RepoError::ConstraintViolation`.
//! - Both referenced rows must exist.

use super::{count_rows, in_transaction, EntityKind, RepoError, RepoResult};
use crate::model::{
    AssignmentListing, EmployeeId, EmployeeProject, EmployeeRef, ProjectId, ProjectRef,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    employee_projects.employee_id AS employee_id,
    employee_projects.project_id AS project_id,
    employee_projects.role AS role,
    employees.first_name AS first_name,
    employees.last_name AS last_name,
    projects.name AS project_name
FROM employee_projects
JOIN employees ON employees.id = employee_projects.employee_id
JOIN projects ON projects.id = employee_projects.project_id";

pub trait AssignmentRepository {
    fn create_assignment(&self, assignment: &EmployeeProject) -> RepoResult<()>;
    fn update_assignment_role(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        role: &str,
    ) -> RepoResult<EmployeeProject>;
    fn get_assignment(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
    ) -> RepoResult<Option<AssignmentListing>>;
    fn list_assignments(&self) -> RepoResult<Vec<AssignmentListing>>;
    fn count_assignments(&self) -> RepoResult<u64>;
}

pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn create_assignment(&self, assignment: &EmployeeProject) -> RepoResult<()> {
        assignment.validate()?;

        in_transaction(self.conn, |tx| {
            tx.execute(
                "INSERT INTO employee_projects (employee_id, project_id, role)
                 VALUES (?1, ?2, ?3);",
                params![
                    assignment.employee_id,
                    assignment.project_id,
                    assignment.role.as_str(),
                ],
            )?;
            Ok(())
        })
    }

    fn update_assignment_role(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        role: &str,
    ) -> RepoResult<EmployeeProject> {
        let assignment = EmployeeProject::new(employee_id, project_id, role);
        assignment.validate()?;

        in_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE employee_projects SET role = ?1
                 WHERE employee_id = ?2 AND project_id = ?3;",
                params![role, employee_id, project_id],
            )?;
            if changed == 0 {
                return Err(RepoError::not_found(
                    EntityKind::Assignment,
                    format!("employee {employee_id} on project {project_id}"),
                ));
            }
            Ok(())
        })?;

        Ok(assignment)
    }

    fn get_assignment(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
    ) -> RepoResult<Option<AssignmentListing>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE employee_projects.employee_id = ?1
               AND employee_projects.project_id = ?2;"
        ))?;
        let listing = stmt
            .query_row(params![employee_id, project_id], |row| {
                Ok(parse_assignment_row(row))
            })
            .optional()?;
        listing.transpose()
    }

    fn list_assignments(&self) -> RepoResult<Vec<AssignmentListing>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             ORDER BY employee_projects.project_id ASC, employee_projects.employee_id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut listings = Vec::new();

        while let Some(row) = rows.next()? {
            listings.push(parse_assignment_row(row)?);
        }

        Ok(listings)
    }

    fn count_assignments(&self) -> RepoResult<u64> {
        count_rows(self.conn, "employee_projects")
    }
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<AssignmentListing> {
    let employee_id: i64 = row.get("employee_id")?;
    let project_id: i64 = row.get("project_id")?;

    Ok(AssignmentListing {
        assignment: EmployeeProject {
            employee_id,
            project_id,
            role: row.get("role")?,
        },
        employee: EmployeeRef {
            id: employee_id,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
        },
        project: ProjectRef {
            id: project_id,
            name: row.get("project_name")?,
        },
    })
}
