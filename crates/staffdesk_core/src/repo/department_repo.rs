//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - A manager reference is checked by the store's foreign key; a missing
//!   employee surfaces as `RepoError::ConstraintViolation`.

use super::{count_rows, in_transaction, EntityKind, RepoError, RepoResult};
use crate::model::{
    Department, DepartmentFields, DepartmentId, DepartmentListing, EmployeeId, EmployeeRef,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    departments.id AS id,
    departments.name AS name,
    departments.manager_id AS manager_id,
    managers.first_name AS manager_first_name,
    managers.last_name AS manager_last_name
FROM departments
LEFT JOIN employees AS managers ON managers.id = departments.manager_id";

pub trait DepartmentRepository {
    fn create_department(&self, fields: &DepartmentFields) -> RepoResult<Department>;
    fn update_department(
        &self,
        id: DepartmentId,
        fields: &DepartmentFields,
    ) -> RepoResult<Department>;
    /// Changes only the manager reference.
    fn set_manager(&self, id: DepartmentId, manager_id: Option<EmployeeId>) -> RepoResult<()>;
    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<DepartmentListing>>;
    fn list_departments(&self) -> RepoResult<Vec<DepartmentListing>>;
    fn count_departments(&self) -> RepoResult<u64>;
}

pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_department(&self, fields: &DepartmentFields) -> RepoResult<Department> {
        fields.validate()?;

        let id = in_transaction(self.conn, |tx| {
            tx.execute(
                "INSERT INTO departments (name, manager_id) VALUES (?1, ?2);",
                params![fields.name.as_str(), fields.manager_id],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        Ok(Department::from_fields(id, fields.clone()))
    }

    fn update_department(
        &self,
        id: DepartmentId,
        fields: &DepartmentFields,
    ) -> RepoResult<Department> {
        fields.validate()?;

        in_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE departments SET name = ?1, manager_id = ?2 WHERE id = ?3;",
                params![fields.name.as_str(), fields.manager_id, id],
            )?;
            if changed == 0 {
                return Err(RepoError::not_found(EntityKind::Department, id));
            }
            Ok(())
        })?;

        Ok(Department::from_fields(id, fields.clone()))
    }

    fn set_manager(&self, id: DepartmentId, manager_id: Option<EmployeeId>) -> RepoResult<()> {
        in_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE departments SET manager_id = ?1 WHERE id = ?2;",
                params![manager_id, id],
            )?;
            if changed == 0 {
                return Err(RepoError::not_found(EntityKind::Department, id));
            }
            Ok(())
        })
    }

    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<DepartmentListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE departments.id = ?1;"))?;
        let listing = stmt
            .query_row([id], |row| Ok(parse_department_row(row)))
            .optional()?;
        listing.transpose()
    }

    fn list_departments(&self) -> RepoResult<Vec<DepartmentListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY departments.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut listings = Vec::new();

        while let Some(row) = rows.next()? {
            listings.push(parse_department_row(row)?);
        }

        Ok(listings)
    }

    fn count_departments(&self) -> RepoResult<u64> {
        count_rows(self.conn, "departments")
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<DepartmentListing> {
    let manager_id: Option<i64> = row.get("manager_id")?;
    let manager = match manager_id {
        Some(id) => {
            let first_name: Option<String> = row.get("manager_first_name")?;
            let last_name: Option<String> = row.get("manager_last_name")?;
            match (first_name, last_name) {
                (Some(first_name), Some(last_name)) => Some(EmployeeRef {
                    id,
                    first_name,
                    last_name,
                }),
                _ => {
                    return Err(RepoError::InvalidData(format!(
                        "departments.manager_id {id} has no matching employee"
                    )));
                }
            }
        }
        None => None,
    };

    Ok(DepartmentListing {
        department: Department {
            id: row.get("id")?,
            name: row.get("name")?,
            manager_id,
        },
        manager,
    })
}
