use chrono::NaiveDate;
use rusqlite::Connection;
use staffdesk_core::db::open_db_in_memory;
use staffdesk_core::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use staffdesk_core::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use staffdesk_core::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use staffdesk_core::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use staffdesk_core::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use staffdesk_core::{
    DepartmentFields, EmployeeFields, EmployeeProject, EntityKind, ProjectFields, RepoError,
    TaskFields, TaskStatus, ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn employee_fields(first: &str, last: &str, department_id: Option<i64>) -> EmployeeFields {
    EmployeeFields {
        first_name: first.to_string(),
        last_name: last.to_string(),
        position: "Engineer".to_string(),
        salary: 50_000,
        hire_date: date(2023, 5, 1),
        department_id,
    }
}

fn project_fields(name: &str) -> ProjectFields {
    ProjectFields {
        name: name.to_string(),
        start_date: Some(date(2024, 1, 1)),
        end_date: Some(date(2024, 12, 31)),
        budget: 120_000,
    }
}

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn employee_create_and_get_roundtrip_with_department() {
    let conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn);

    let sales = departments
        .create_department(&DepartmentFields::new("Sales"))
        .unwrap();
    let created = employees
        .create_employee(&employee_fields("Ivan", "Petrov", Some(sales.id)))
        .unwrap();
    assert!(created.id > 0);

    let loaded = employees.get_employee(created.id).unwrap().unwrap();
    assert_eq!(loaded.employee, created);
    assert_eq!(loaded.department.map(|d| d.name).as_deref(), Some("Sales"));
}

#[test]
fn employee_without_department_lists_with_no_department() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);
    employees
        .create_employee(&employee_fields("Anna", "Smirnova", None))
        .unwrap();

    let listed = employees.list_employees().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].department.is_none());
}

#[test]
fn employee_with_missing_department_is_constraint_violation_and_not_inserted() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);

    let before = employees.count_employees().unwrap();
    let err = employees
        .create_employee(&employee_fields("Ivan", "Petrov", Some(404)))
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)), "{err}");
    assert_eq!(employees.count_employees().unwrap(), before);
}

#[test]
fn employee_update_replaces_all_fields_and_can_clear_department() {
    let conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn);

    let sales = departments
        .create_department(&DepartmentFields::new("Sales"))
        .unwrap();
    let created = employees
        .create_employee(&employee_fields("Ivan", "Petrov", Some(sales.id)))
        .unwrap();

    let mut fields = created.fields();
    fields.position = "Lead Engineer".to_string();
    fields.salary = 65_000;
    fields.department_id = None;
    employees.update_employee(created.id, &fields).unwrap();

    let loaded = employees.get_employee(created.id).unwrap().unwrap();
    assert_eq!(loaded.employee.position, "Lead Engineer");
    assert_eq!(loaded.employee.salary, 65_000);
    assert_eq!(loaded.employee.department_id, None);
    assert!(loaded.department.is_none());
}

#[test]
fn update_of_missing_rows_is_not_found() {
    let conn = setup();

    let err = SqliteEmployeeRepository::new(&conn)
        .update_employee(99, &employee_fields("Ivan", "Petrov", None))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { entity: EntityKind::Employee, ref key } if key == "99"
    ));

    let err = SqliteTaskRepository::new(&conn)
        .update_task_status(7, TaskStatus::Completed)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: EntityKind::Task, .. }));

    let err = SqliteAssignmentRepository::new(&conn)
        .update_assignment_role(1, 1, "Reviewer")
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: EntityKind::Assignment, .. }));
}

#[test]
fn salary_out_of_range_is_rejected_before_sql() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);

    let mut fields = employee_fields("Ivan", "Petrov", None);
    fields.salary = 1_000_001;
    let err = employees.create_employee(&fields).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::OutOfRange { field: "salary", .. })
    ));

    fields.salary = -1;
    assert!(matches!(
        employees.create_employee(&fields).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert_eq!(employees.count_employees().unwrap(), 0);
}

#[test]
fn department_manager_must_reference_existing_employee() {
    let conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn);

    let err = departments
        .create_department(&DepartmentFields {
            name: "Sales".to_string(),
            manager_id: Some(12),
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));

    let sales = departments
        .create_department(&DepartmentFields::new("Sales"))
        .unwrap();
    let boss = employees
        .create_employee(&employee_fields("Olga", "Ivanova", Some(sales.id)))
        .unwrap();
    departments.set_manager(sales.id, Some(boss.id)).unwrap();

    let listing = departments.get_department(sales.id).unwrap().unwrap();
    assert_eq!(listing.department.manager_id, Some(boss.id));
    assert_eq!(
        listing.manager.map(|m| m.full_name()).as_deref(),
        Some("Olga Ivanova")
    );
}

#[test]
fn project_roundtrip_keeps_optional_dates() {
    let conn = setup();
    let projects = SqliteProjectRepository::new(&conn);

    let mut fields = project_fields("Website");
    fields.end_date = None;
    let created = projects.create_project(&fields).unwrap();

    let loaded = projects.get_project(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.start_date, Some(date(2024, 1, 1)));
    assert_eq!(loaded.end_date, None);

    let mut reversed = project_fields("Website");
    reversed.end_date = Some(date(2023, 1, 1));
    assert!(matches!(
        projects.update_project(created.id, &reversed).unwrap_err(),
        RepoError::Validation(ValidationError::DateOrder { .. })
    ));
}

#[test]
fn task_listing_resolves_project_and_assignee() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);
    let projects = SqliteProjectRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);

    let ivan = employees
        .create_employee(&employee_fields("Ivan", "Petrov", None))
        .unwrap();
    let website = projects.create_project(&project_fields("Website")).unwrap();

    let mut fields = TaskFields::new("Fix bug", "login form crashes");
    fields.project_id = Some(website.id);
    fields.assignee_id = Some(ivan.id);
    let created = tasks.create_task(&fields).unwrap();

    let listing = tasks.get_task(created.id).unwrap().unwrap();
    assert_eq!(listing.task, created);
    assert_eq!(listing.project.map(|p| p.name).as_deref(), Some("Website"));
    assert_eq!(
        listing.assignee.map(|a| a.full_name()).as_deref(),
        Some("Ivan Petrov")
    );
}

#[test]
fn task_status_update_leaves_other_fields_untouched() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);

    let ivan = employees
        .create_employee(&employee_fields("Ivan", "Petrov", None))
        .unwrap();
    let mut fields = TaskFields::new("Fix bug", "login form crashes");
    fields.assignee_id = Some(ivan.id);
    let created = tasks.create_task(&fields).unwrap();

    tasks
        .update_task_status(created.id, TaskStatus::Completed)
        .unwrap();

    let loaded = tasks.get_task(created.id).unwrap().unwrap().task;
    assert_eq!(loaded.status, TaskStatus::Completed);
    assert_eq!(loaded.name, created.name);
    assert_eq!(loaded.description, created.description);
    assert_eq!(loaded.assignee_id, created.assignee_id);
}

#[test]
fn unknown_persisted_status_is_invalid_data() {
    let conn = setup();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO tasks (name, description, status) VALUES ('x', '', 'paused');
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();

    let err = SqliteTaskRepository::new(&conn).list_tasks().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("paused")));
}

#[test]
fn assignments_are_unique_per_employee_and_project() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);
    let projects = SqliteProjectRepository::new(&conn);
    let assignments = SqliteAssignmentRepository::new(&conn);

    let ivan = employees
        .create_employee(&employee_fields("Ivan", "Petrov", None))
        .unwrap();
    let website = projects.create_project(&project_fields("Website")).unwrap();

    let assignment = EmployeeProject::new(ivan.id, website.id, "Developer");
    assignments.create_assignment(&assignment).unwrap();

    let err = assignments.create_assignment(&assignment).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(assignments.count_assignments().unwrap(), 1);

    let updated = assignments
        .update_assignment_role(ivan.id, website.id, "Tech Lead")
        .unwrap();
    assert_eq!(updated.role, "Tech Lead");

    let listing = assignments
        .get_assignment(ivan.id, website.id)
        .unwrap()
        .unwrap();
    assert_eq!(listing.assignment.role, "Tech Lead");
    assert_eq!(listing.project.name, "Website");
    assert_eq!(listing.employee.full_name(), "Ivan Petrov");
}

#[test]
fn assignment_to_missing_project_is_constraint_violation() {
    let conn = setup();
    let ivan = SqliteEmployeeRepository::new(&conn)
        .create_employee(&employee_fields("Ivan", "Petrov", None))
        .unwrap();

    let err = SqliteAssignmentRepository::new(&conn)
        .create_assignment(&EmployeeProject::new(ivan.id, 55, "Developer"))
        .unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
}

#[test]
fn lists_are_ordered_by_id() {
    let conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    for name in ["Sales", "Accounting", "IT"] {
        departments
            .create_department(&DepartmentFields::new(name))
            .unwrap();
    }

    let ids = departments
        .list_departments()
        .unwrap()
        .into_iter()
        .map(|listing| listing.department.id)
        .collect::<Vec<_>>();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(ids.len(), 3);
}
