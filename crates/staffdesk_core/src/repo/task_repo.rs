//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - `update_task` replaces every editable field.
//! - `update_task_status` touches the `status` column only.
//! - Unknown stored statuses are reported as `RepoError::InvalidData`.

use super::{count_rows, in_transaction, EntityKind, RepoError, RepoResult};
use crate::model::{EmployeeRef, ProjectRef, Task, TaskFields, TaskId, TaskListing, TaskStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    tasks.id AS id,
    tasks.name AS name,
    tasks.description AS description,
    tasks.status AS status,
    tasks.project_id AS project_id,
    tasks.assignee_id AS assignee_id,
    projects.name AS project_name,
    assignees.first_name AS assignee_first_name,
    assignees.last_name AS assignee_last_name
FROM tasks
LEFT JOIN projects ON projects.id = tasks.project_id
LEFT JOIN employees AS assignees ON assignees.id = tasks.assignee_id";

pub trait TaskRepository {
    fn create_task(&self, fields: &TaskFields) -> RepoResult<Task>;
    fn update_task(&self, id: TaskId, fields: &TaskFields) -> RepoResult<Task>;
    fn update_task_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskListing>>;
    fn list_tasks(&self) -> RepoResult<Vec<TaskListing>>;
    fn count_tasks(&self) -> RepoResult<u64>;
}

pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, fields: &TaskFields) -> RepoResult<Task> {
        fields.validate()?;

        let id = in_transaction(self.conn, |tx| {
            tx.execute(
                "INSERT INTO tasks (
                    name,
                    description,
                    status,
                    project_id,
                    assignee_id
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    fields.name.as_str(),
                    fields.description.as_str(),
                    fields.status.as_db_str(),
                    fields.project_id,
                    fields.assignee_id,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        Ok(Task::from_fields(id, fields.clone()))
    }

    fn update_task(&self, id: TaskId, fields: &TaskFields) -> RepoResult<Task> {
        fields.validate()?;

        in_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE tasks
                 SET
                    name = ?1,
                    description = ?2,
                    status = ?3,
                    project_id = ?4,
                    assignee_id = ?5
                 WHERE id = ?6;",
                params![
                    fields.name.as_str(),
                    fields.description.as_str(),
                    fields.status.as_db_str(),
                    fields.project_id,
                    fields.assignee_id,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::not_found(EntityKind::Task, id));
            }
            Ok(())
        })?;

        Ok(Task::from_fields(id, fields.clone()))
    }

    fn update_task_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()> {
        in_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE tasks SET status = ?1 WHERE id = ?2;",
                params![status.as_db_str(), id],
            )?;
            if changed == 0 {
                return Err(RepoError::not_found(EntityKind::Task, id));
            }
            Ok(())
        })
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE tasks.id = ?1;"))?;
        let listing = stmt
            .query_row([id], |row| Ok(parse_task_row(row)))
            .optional()?;
        listing.transpose()
    }

    fn list_tasks(&self) -> RepoResult<Vec<TaskListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY tasks.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut listings = Vec::new();

        while let Some(row) = rows.next()? {
            listings.push(parse_task_row(row)?);
        }

        Ok(listings)
    }

    fn count_tasks(&self) -> RepoResult<u64> {
        count_rows(self.conn, "tasks")
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskListing> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::from_db_str(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let project_id: Option<i64> = row.get("project_id")?;
    let project = match (project_id, row.get::<_, Option<String>>("project_name")?) {
        (Some(id), Some(name)) => Some(ProjectRef { id, name }),
        (Some(id), None) => {
            return Err(RepoError::InvalidData(format!(
                "tasks.project_id {id} has no matching project"
            )));
        }
        (None, _) => None,
    };

    let assignee_id: Option<i64> = row.get("assignee_id")?;
    let assignee = match assignee_id {
        Some(id) => {
            let first_name: Option<String> = row.get("assignee_first_name")?;
            let last_name: Option<String> = row.get("assignee_last_name")?;
            match (first_name, last_name) {
                (Some(first_name), Some(last_name)) => Some(EmployeeRef {
                    id,
                    first_name,
                    last_name,
                }),
                _ => {
                    return Err(RepoError::InvalidData(format!(
                        "tasks.assignee_id {id} has no matching employee"
                    )));
                }
            }
        }
        None => None,
    };

    let task = Task {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        status,
        project_id,
        assignee_id,
    };

    Ok(TaskListing {
        task,
        project,
        assignee,
    })
}
