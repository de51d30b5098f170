//! Project repository contract and SQLite implementation.

use super::{count_rows, in_transaction, parse_optional_date, EntityKind, RepoError, RepoResult};
use crate::model::{Project, ProjectFields, ProjectId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    start_date,
    end_date,
    budget
FROM projects";

pub trait ProjectRepository {
    fn create_project(&self, fields: &ProjectFields) -> RepoResult<Project>;
    fn update_project(&self, id: ProjectId, fields: &ProjectFields) -> RepoResult<Project>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn count_projects(&self) -> RepoResult<u64>;
}

pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, fields: &ProjectFields) -> RepoResult<Project> {
        fields.validate()?;

        let id = in_transaction(self.conn, |tx| {
            tx.execute(
                "INSERT INTO projects (name, start_date, end_date, budget)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    fields.name.as_str(),
                    fields.start_date,
                    fields.end_date,
                    fields.budget,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        Ok(Project::from_fields(id, fields.clone()))
    }

    fn update_project(&self, id: ProjectId, fields: &ProjectFields) -> RepoResult<Project> {
        fields.validate()?;

        in_transaction(self.conn, |tx| {
            let changed = tx.execute(
                "UPDATE projects
                 SET
                    name = ?1,
                    start_date = ?2,
                    end_date = ?3,
                    budget = ?4
                 WHERE id = ?5;",
                params![
                    fields.name.as_str(),
                    fields.start_date,
                    fields.end_date,
                    fields.budget,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::not_found(EntityKind::Project, id));
            }
            Ok(())
        })?;

        Ok(Project::from_fields(id, fields.clone()))
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let project = stmt
            .query_row([id], |row| Ok(parse_project_row(row)))
            .optional()?;
        project.transpose()
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();

        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }

        Ok(projects)
    }

    fn count_projects(&self) -> RepoResult<u64> {
        count_rows(self.conn, "projects")
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        start_date: parse_optional_date("projects.start_date", row.get("start_date")?)?,
        end_date: parse_optional_date("projects.end_date", row.get("end_date")?)?,
        budget: row.get("budget")?,
    })
}
