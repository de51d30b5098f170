use chrono::NaiveDate;
use staffdesk_core::{
    filter, AssignmentListing, CompanyService, DatabaseConfig, DepartmentFields,
    DepartmentListing, EmployeeFields, EmployeeListing, Listable, Project, ProjectFields,
    SessionProvider, TaskFields, TaskListing, TaskStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two departments, three employees (one without a department), a project,
/// three tasks (one unassigned) and one staffing assignment.
fn seeded() -> SessionProvider {
    let sessions = SessionProvider::new(DatabaseConfig::in_memory());
    let service = CompanyService::new(&sessions);

    let sales = service
        .create_department(&DepartmentFields::new("Sales"))
        .unwrap();
    let it = service
        .create_department(&DepartmentFields::new("ИТ-отдел"))
        .unwrap();

    let people = [
        ("Ivan", "Petrov", "Engineer", 50_000, date(2023, 5, 1), Some(sales.id)),
        ("Мария", "Кузнецова", "Бухгалтер", 61_000, date(2024, 2, 12), Some(it.id)),
        ("John", "Smith", "Intern", 20_240, date(2022, 9, 1), None),
    ];
    let mut ids = Vec::new();
    for (first, last, position, salary, hire_date, department_id) in people {
        let employee = service
            .create_employee(&EmployeeFields {
                first_name: first.to_string(),
                last_name: last.to_string(),
                position: position.to_string(),
                salary,
                hire_date,
                department_id,
            })
            .unwrap();
        ids.push(employee.id);
    }

    let website = service
        .create_project(&ProjectFields {
            name: "Website".to_string(),
            start_date: Some(date(2024, 1, 10)),
            end_date: Some(date(2024, 6, 30)),
            budget: 90_000,
        })
        .unwrap();
    service
        .assign_employee(ids[0], website.id, "Developer")
        .unwrap();

    let tasks = [
        ("Fix bug", "login page", TaskStatus::InProgress, Some(ids[0])),
        ("Годовой отчёт", "квартальные данные", TaskStatus::Completed, Some(ids[1])),
        ("Order chairs", "for the new office", TaskStatus::Cancelled, None),
    ];
    for (name, description, status, assignee_id) in tasks {
        let mut fields = TaskFields::new(name, description);
        fields.status = status;
        fields.assignee_id = assignee_id;
        fields.project_id = Some(website.id);
        service.create_task(&fields).unwrap();
    }

    sessions
}

fn assert_empty_predicate_is_identity<T>(service: &CompanyService<'_>)
where
    T: Listable + PartialEq + std::fmt::Debug,
{
    let records = service.load_all::<T>().unwrap();
    assert!(!records.is_empty());
    assert_eq!(filter(&records, ""), records);
    assert_eq!(service.search::<T>("").unwrap(), records);
}

#[test]
fn empty_predicate_returns_all_records_for_every_entity_type() {
    let sessions = seeded();
    let service = CompanyService::new(&sessions);

    assert_empty_predicate_is_identity::<EmployeeListing>(&service);
    assert_empty_predicate_is_identity::<DepartmentListing>(&service);
    assert_empty_predicate_is_identity::<Project>(&service);
    assert_empty_predicate_is_identity::<TaskListing>(&service);
    assert_empty_predicate_is_identity::<AssignmentListing>(&service);
}

#[test]
fn engineer_matches_and_2024_does_not_for_ivan() {
    let sessions = seeded();
    let service = CompanyService::new(&sessions);

    let ivan_only = service
        .load_all::<EmployeeListing>()
        .unwrap()
        .into_iter()
        .filter(|listing| listing.employee.first_name == "Ivan")
        .collect::<Vec<_>>();

    assert_eq!(filter(&ivan_only, "engineer"), ivan_only);
    assert!(filter(&ivan_only, "2024").is_empty());
}

#[test]
fn year_matches_hire_date_or_salary_text() {
    let sessions = seeded();
    let service = CompanyService::new(&sessions);

    let hits = service.search::<EmployeeListing>("2024").unwrap();
    let names = hits
        .iter()
        .map(|listing| listing.employee.last_name.as_str())
        .collect::<Vec<_>>();
    // Kuznetsova by hire date, Smith by salary 20240.
    assert_eq!(names, vec!["Кузнецова", "Smith"]);
}

#[test]
fn department_name_matches_only_employees_in_it() {
    let sessions = seeded();
    let service = CompanyService::new(&sessions);

    let hits = service.search::<EmployeeListing>("ит-ОТДЕЛ").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].employee.first_name, "Мария");

    let sales = service.search::<EmployeeListing>("SALES").unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].employee.first_name, "Ivan");
}

#[test]
fn task_search_covers_status_and_assignee() {
    let sessions = seeded();
    let service = CompanyService::new(&sessions);

    let cancelled = service.search::<TaskListing>("cancelled").unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].task.name, "Order chairs");
    assert!(cancelled[0].assignee.is_none());

    let by_assignee = service.search::<TaskListing>("мария кузнецова").unwrap();
    assert_eq!(by_assignee.len(), 1);
    assert_eq!(by_assignee[0].task.status, TaskStatus::Completed);

    // Project name is not a searched task field.
    assert!(service.search::<TaskListing>("website").unwrap().is_empty());
}

#[test]
fn search_results_keep_load_order_and_are_idempotent() {
    let sessions = seeded();
    let service = CompanyService::new(&sessions);
    let all = service.load_all::<TaskListing>().unwrap();

    for predicate in ["o", "in", "ОТЧ", "zzz", " "] {
        let once = filter(&all, predicate);
        assert_eq!(filter(&once, predicate), once, "predicate `{predicate}`");

        let positions = once
            .iter()
            .map(|hit| all.iter().position(|record| record == hit).unwrap())
            .collect::<Vec<_>>();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "predicate `{predicate}`");
    }
}

#[test]
fn returned_records_are_snapshots() {
    let sessions = seeded();
    let service = CompanyService::new(&sessions);

    let mut loaded = service.load_all::<EmployeeListing>().unwrap();
    loaded[0].employee.first_name = "Changed".to_string();

    let reloaded = service.load_all::<EmployeeListing>().unwrap();
    assert_eq!(reloaded[0].employee.first_name, "Ivan");
}
