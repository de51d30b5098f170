//! Subcommands: list/search, create, and edit.
//!
//! Every command prints tab-separated rows, one per record, so output can be
//! piped into standard text tools.

use crate::CliError;
use chrono::NaiveDate;
use clap::Subcommand;
use staffdesk_core::{
    AssignmentListing, CompanyService, DepartmentFields, DepartmentListing, EmployeeFields,
    EmployeeListing, Listable, Project, ProjectFields, TaskFields, TaskListing, TaskStatus,
};
use std::io::Write;

#[derive(Subcommand)]
pub enum Command {
    /// List employees, optionally filtered
    Employees {
        /// Case-insensitive text matched against any listed column
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List tasks, optionally filtered
    Tasks {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List departments, optionally filtered
    Departments {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List projects, optionally filtered
    Projects {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List staffing assignments, optionally filtered
    Assignments {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Add a department
    AddDepartment {
        #[arg(long)]
        name: String,
        /// Managing employee id
        #[arg(long)]
        manager: Option<i64>,
    },
    /// Add an employee
    AddEmployee {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        position: String,
        #[arg(long)]
        salary: i64,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        hire_date: Option<NaiveDate>,
        #[arg(long)]
        department: Option<i64>,
    },
    /// Edit an employee; omitted options keep their stored value
    EditEmployee {
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        salary: Option<i64>,
        #[arg(long)]
        hire_date: Option<NaiveDate>,
        #[arg(long, conflicts_with = "no_department")]
        department: Option<i64>,
        /// Remove the employee from their department
        #[arg(long)]
        no_department: bool,
    },
    /// Add a project
    AddProject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long, default_value_t = 0)]
        budget: i64,
    },
    /// Add a task
    AddTask {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// in progress | completed | cancelled
        #[arg(long, default_value = "in progress")]
        status: TaskStatus,
        #[arg(long)]
        project: Option<i64>,
        #[arg(long)]
        assignee: Option<i64>,
    },
    /// Change only the status of a task
    SetTaskStatus { id: i64, status: TaskStatus },
    /// Assign an employee to a project
    Assign {
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        project: i64,
        #[arg(long)]
        role: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Employees { .. } => "employees",
            Self::Tasks { .. } => "tasks",
            Self::Departments { .. } => "departments",
            Self::Projects { .. } => "projects",
            Self::Assignments { .. } => "assignments",
            Self::AddDepartment { .. } => "add-department",
            Self::AddEmployee { .. } => "add-employee",
            Self::EditEmployee { .. } => "edit-employee",
            Self::AddProject { .. } => "add-project",
            Self::AddTask { .. } => "add-task",
            Self::SetTaskStatus { .. } => "set-task-status",
            Self::Assign { .. } => "assign",
        }
    }

    pub fn execute(self, service: &CompanyService<'_>, out: &mut impl Write) -> Result<(), CliError> {
        match self {
            Self::Employees { search } => list::<EmployeeListing>(service, search, out),
            Self::Tasks { search } => list::<TaskListing>(service, search, out),
            Self::Departments { search } => list::<DepartmentListing>(service, search, out),
            Self::Projects { search } => list::<Project>(service, search, out),
            Self::Assignments { search } => list::<AssignmentListing>(service, search, out),
            Self::AddDepartment { name, manager } => {
                let department = service.create_department(&DepartmentFields {
                    name,
                    manager_id: manager,
                })?;
                writeln!(out, "created department {}", department.id)?;
                Ok(())
            }
            Self::AddEmployee {
                first_name,
                last_name,
                position,
                salary,
                hire_date,
                department,
            } => {
                let employee = service.create_employee(&EmployeeFields {
                    first_name,
                    last_name,
                    position,
                    salary,
                    hire_date: hire_date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                    department_id: department,
                })?;
                writeln!(out, "created employee {}", employee.id)?;
                Ok(())
            }
            Self::EditEmployee {
                id,
                first_name,
                last_name,
                position,
                salary,
                hire_date,
                department,
                no_department,
            } => {
                let mut employee = service.employee(id)?.employee;
                let mut fields = employee.fields();
                if let Some(value) = first_name {
                    fields.first_name = value;
                }
                if let Some(value) = last_name {
                    fields.last_name = value;
                }
                if let Some(value) = position {
                    fields.position = value;
                }
                if let Some(value) = salary {
                    fields.salary = value;
                }
                if let Some(value) = hire_date {
                    fields.hire_date = value;
                }
                if no_department {
                    fields.department_id = None;
                } else if department.is_some() {
                    fields.department_id = department;
                }
                service.update_employee(&mut employee, fields)?;
                writeln!(out, "updated employee {}", employee.id)?;
                Ok(())
            }
            Self::AddProject {
                name,
                start_date,
                end_date,
                budget,
            } => {
                let project = service.create_project(&ProjectFields {
                    name,
                    start_date,
                    end_date,
                    budget,
                })?;
                writeln!(out, "created project {}", project.id)?;
                Ok(())
            }
            Self::AddTask {
                name,
                description,
                status,
                project,
                assignee,
            } => {
                let task = service.create_task(&TaskFields {
                    name,
                    description,
                    status,
                    project_id: project,
                    assignee_id: assignee,
                })?;
                writeln!(out, "created task {}", task.id)?;
                Ok(())
            }
            Self::SetTaskStatus { id, status } => {
                let mut task = service.task(id)?.task;
                service.update_task_status(&mut task, status)?;
                writeln!(out, "task {} is now {}", task.id, task.status)?;
                Ok(())
            }
            Self::Assign {
                employee,
                project,
                role,
            } => {
                let assignment = service.assign_employee(employee, project, role)?;
                writeln!(
                    out,
                    "assigned employee {} to project {} as {}",
                    assignment.employee_id, assignment.project_id, assignment.role
                )?;
                Ok(())
            }
        }
    }
}

/// A record that renders as one output row.
trait Row {
    fn columns(&self) -> Vec<String>;
}

impl Row for EmployeeListing {
    fn columns(&self) -> Vec<String> {
        let employee = &self.employee;
        vec![
            employee.id.to_string(),
            employee.first_name.clone(),
            employee.last_name.clone(),
            employee.position.clone(),
            employee.salary.to_string(),
            employee.hire_date.to_string(),
            self.department
                .as_ref()
                .map(|department| department.name.clone())
                .unwrap_or_default(),
        ]
    }
}

impl Row for TaskListing {
    fn columns(&self) -> Vec<String> {
        let task = &self.task;
        vec![
            task.id.to_string(),
            task.name.clone(),
            task.description.clone(),
            task.status.to_string(),
            self.assignee
                .as_ref()
                .map(|assignee| assignee.full_name())
                .unwrap_or_default(),
        ]
    }
}

impl Row for DepartmentListing {
    fn columns(&self) -> Vec<String> {
        vec![
            self.department.id.to_string(),
            self.department.name.clone(),
            self.manager
                .as_ref()
                .map(|manager| manager.full_name())
                .unwrap_or_default(),
        ]
    }
}

impl Row for Project {
    fn columns(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.start_date.map(|date| date.to_string()).unwrap_or_default(),
            self.end_date.map(|date| date.to_string()).unwrap_or_default(),
            self.budget.to_string(),
        ]
    }
}

impl Row for AssignmentListing {
    fn columns(&self) -> Vec<String> {
        vec![
            self.employee.full_name(),
            self.project.name.clone(),
            self.assignment.role.clone(),
        ]
    }
}

fn list<T: Listable + Row>(
    service: &CompanyService<'_>,
    search: Option<String>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let records = service.search::<T>(search.as_deref().unwrap_or_default())?;
    write_rows(&records, out)?;
    Ok(())
}

fn write_rows<T: Row>(records: &[T], out: &mut impl Write) -> std::io::Result<()> {
    for record in records {
        writeln!(out, "{}", record.columns().join("\t"))?;
    }
    Ok(())
}
