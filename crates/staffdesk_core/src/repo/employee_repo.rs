//! Employee repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listings resolve the department with one LEFT JOIN; an employee
//!   without a department yields `department = None`.
//! - `update_employee` replaces every editable field, department included.

use super::{count_rows, in_transaction, parse_date, EntityKind, RepoError, RepoResult};
use crate::model::{DepartmentRef, Employee, EmployeeFields, EmployeeId, EmployeeListing};
use rusqlite::{params, Connection, OptionalExtension, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    employees.id AS id,
    employees.first_name AS first_name,
    employees.last_name AS last_name,
    employees.position AS position,
    employees.salary AS salary,
    employees.hire_date AS hire_date,
    employees.department_id AS department_id,
    departments.name AS department_name
FROM employees
LEFT JOIN departments ON departments.id = employees.department_id";

pub trait EmployeeRepository {
    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<Employee>;
    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<Employee>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<EmployeeListing>>;
    fn list_employees(&self) -> RepoResult<Vec<EmployeeListing>>;
    fn count_employees(&self) -> RepoResult<u64>;
}

pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<Employee> {
        fields.validate()?;

        let id = in_transaction(self.conn, |tx| {
            tx.execute(
                "INSERT INTO employees (
                    first_name,
                    last_name,
                    position,
                    salary,
                    hire_date,
                    department_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    fields.first_name.as_str(),
                    fields.last_name.as_str(),
                    fields.position.as_str(),
                    fields.salary,
                    fields.hire_date,
                    fields.department_id,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        Ok(Employee::from_fields(id, fields.clone()))
    }

    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<Employee> {
        fields.validate()?;

        in_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE employees
                 SET
                    first_name = ?1,
                    last_name = ?2,
                    position = ?3,
                    salary = ?4,
                    hire_date = ?5,
                    department_id = ?6
                 WHERE id = ?7;",
                params![
                    fields.first_name.as_str(),
                    fields.last_name.as_str(),
                    fields.position.as_str(),
                    fields.salary,
                    fields.hire_date,
                    fields.department_id,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::not_found(EntityKind::Employee, id));
            }
            Ok(())
        })?;

        Ok(Employee::from_fields(id, fields.clone()))
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<EmployeeListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE employees.id = ?1;"))?;
        let listing = stmt
            .query_row([id], |row| Ok(parse_employee_row(row)))
            .optional()?;
        listing.transpose()
    }

    fn list_employees(&self) -> RepoResult<Vec<EmployeeListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY employees.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut listings = Vec::new();

        while let Some(row) = rows.next()? {
            listings.push(parse_employee_row(row)?);
        }

        Ok(listings)
    }

    fn count_employees(&self) -> RepoResult<u64> {
        count_rows(self.conn, "employees")
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<EmployeeListing> {
    let hire_date_text: String = row.get("hire_date")?;
    let department_id: Option<i64> = row.get("department_id")?;
    let department_name: Option<String> = row.get("department_name")?;

    let department = match (department_id, department_name) {
        (Some(id), Some(name)) => Some(DepartmentRef { id, name }),
        (Some(id), None) => {
            return Err(RepoError::InvalidData(format!(
                "employees.department_id {id} has no matching department"
            )));
        }
        (None, _) => None,
    };

    let employee = Employee {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        position: row.get("position")?,
        salary: row.get("salary")?,
        hire_date: parse_date("employees.hire_date", &hire_date_text)?,
        department_id,
    };

    Ok(EmployeeListing {
        employee,
        department,
    })
}
