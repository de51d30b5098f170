//! In-memory substring filter over loaded records.
//!
//! # Responsibility
//! - Define, per record type, which fields a search looks at.
//! - Retain records whose searched fields contain the predicate text.
//!
//! # Invariants
//! - Matching is case-insensitive (Unicode lower-casing) substring search,
//!   OR-ed across fields.
//! - Empty predicate text returns the input unchanged.
//! - Relative order of retained records matches the input order.
//! - An absent relation never matches and never errors.

use crate::model::{
    AssignmentListing, DepartmentListing, EmployeeListing, Project, TaskListing,
};

/// A record that exposes a fixed list of searchable fields.
///
/// `None` marks a field backed by an absent relation.
pub trait Searchable {
    fn search_fields(&self) -> Vec<Option<String>>;

    /// Returns whether any searched field contains `needle`, which must
    /// already be lower-cased.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Filters `records` by case-insensitive substring match on their searched
/// fields.
pub fn filter<T>(records: &[T], predicate_text: &str) -> Vec<T>
where
    T: Searchable + Clone,
{
    if predicate_text.is_empty() {
        return records.to_vec();
    }

    let needle = predicate_text.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches_lowercase(&needle))
        .cloned()
        .collect()
}

impl Searchable for EmployeeListing {
    fn search_fields(&self) -> Vec<Option<String>> {
        let employee = &self.employee;
        vec![
            Some(employee.first_name.clone()),
            Some(employee.last_name.clone()),
            Some(employee.position.clone()),
            Some(employee.salary.to_string()),
            Some(employee.hire_date.to_string()),
            self.department.as_ref().map(|department| department.name.clone()),
        ]
    }
}

impl Searchable for TaskListing {
    fn search_fields(&self) -> Vec<Option<String>> {
        let task = &self.task;
        vec![
            Some(task.name.clone()),
            Some(task.description.clone()),
            Some(task.status.label().to_string()),
            self.assignee.as_ref().map(|assignee| assignee.full_name()),
        ]
    }
}

impl Searchable for DepartmentListing {
    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            Some(self.department.name.clone()),
            self.manager.as_ref().map(|manager| manager.full_name()),
        ]
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            Some(self.name.clone()),
            self.start_date.map(|date| date.to_string()),
            self.end_date.map(|date| date.to_string()),
            Some(self.budget.to_string()),
        ]
    }
}

impl Searchable for AssignmentListing {
    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            Some(self.employee.full_name()),
            Some(self.project.name.clone()),
            Some(self.assignment.role.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{filter, Searchable};
    use crate::model::{
        DepartmentRef, Employee, EmployeeListing, EmployeeRef, Task, TaskListing, TaskStatus,
    };
    use chrono::NaiveDate;

    fn ivan() -> EmployeeListing {
        EmployeeListing {
            employee: Employee {
                id: 1,
                first_name: "Ivan".to_string(),
                last_name: "Petrov".to_string(),
                position: "Engineer".to_string(),
                salary: 50_000,
                hire_date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
                department_id: Some(7),
            },
            department: Some(DepartmentRef {
                id: 7,
                name: "Sales".to_string(),
            }),
        }
    }

    fn anna_without_department() -> EmployeeListing {
        EmployeeListing {
            employee: Employee {
                id: 2,
                first_name: "Анна".to_string(),
                last_name: "Смирнова".to_string(),
                position: "Аналитик".to_string(),
                salary: 72_500,
                hire_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                department_id: None,
            },
            department: None,
        }
    }

    fn task(id: i64, status: TaskStatus, assignee: Option<EmployeeRef>) -> TaskListing {
        TaskListing {
            task: Task {
                id,
                name: format!("task {id}"),
                description: "quarterly report".to_string(),
                status,
                project_id: None,
                assignee_id: assignee.as_ref().map(|employee| employee.id),
            },
            project: None,
            assignee,
        }
    }

    #[test]
    fn empty_predicate_returns_everything_in_order() {
        let records = vec![ivan(), anna_without_department()];
        assert_eq!(filter(&records, ""), records);
    }

    #[test]
    fn matches_position_case_insensitively() {
        let records = vec![ivan()];
        assert_eq!(filter(&records, "engineer"), records);
        assert_eq!(filter(&records, "ENGINEER"), records);
    }

    #[test]
    fn matches_numeric_and_date_fields_by_text() {
        let records = vec![ivan(), anna_without_department()];
        let by_year = filter(&records, "2024");
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year[0].employee.id, 2);

        let by_salary = filter(&records, "50000");
        assert_eq!(by_salary.len(), 1);
        assert_eq!(by_salary[0].employee.id, 1);

        assert!(filter(&[ivan()], "2024").is_empty());
    }

    #[test]
    fn matches_department_name_and_skips_missing_department() {
        let records = vec![ivan(), anna_without_department()];
        let hits = filter(&records, "sal");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].employee.id, 1);
    }

    #[test]
    fn lowercases_cyrillic_text() {
        let records = vec![ivan(), anna_without_department()];
        let hits = filter(&records, "СМИР");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].employee.last_name, "Смирнова");
    }

    #[test]
    fn task_matches_status_label_and_assignee_full_name() {
        let assignee = EmployeeRef {
            id: 1,
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
        };
        let records = vec![
            task(1, TaskStatus::InProgress, Some(assignee)),
            task(2, TaskStatus::Cancelled, None),
        ];

        let in_progress = filter(&records, "in progress");
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].task.id, 1);

        let by_name = filter(&records, "ivan petrov");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].task.id, 1);

        assert_eq!(filter(&records, "quarterly").len(), 2);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let records = vec![ivan(), anna_without_department()];
        for predicate in ["", "a", "2023", "sales", "zzz"] {
            let once = filter(&records, predicate);
            assert_eq!(filter(&once, predicate), once, "predicate `{predicate}`");
        }
    }

    #[test]
    fn any_field_substring_is_retained() {
        let records = vec![ivan(), anna_without_department()];
        for record in &records {
            for field in record.search_fields().into_iter().flatten() {
                let probe: String = field.chars().skip(1).take(3).collect();
                assert!(
                    filter(&records, &probe).contains(record),
                    "probe `{probe}` from `{field}`"
                );
            }
        }
    }
}
