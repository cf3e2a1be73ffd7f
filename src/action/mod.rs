//! Query Dispatcher
//!
//! Maps each menu [`Action`] to the statement(s) it runs. Actions that need
//! follow-up input collect it through a [`Prompter`] in a fixed order before
//! touching the database; selection prompts are populated from a query issued
//! just for that prompt.
//!
//! Every handler returns an [`Outcome`] for the menu loop to render. Database
//! errors propagate unchanged and are never retried here.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::engine::{Database, Param, QueryResult};
use crate::error::{Result, TrackerError};
use crate::prompt::Prompter;
use crate::sql;

/// One entry of the top menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    ViewEmployeesByManager,
    ViewEmployeesByDepartment,
    ViewDepartmentBudget,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
    DeleteDepartment,
    DeleteRole,
    DeleteEmployee,
    Exit,
}

impl Action {
    /// All actions in menu order
    pub const ALL: [Self; 15] = [
        Self::ViewDepartments,
        Self::ViewRoles,
        Self::ViewEmployees,
        Self::ViewEmployeesByManager,
        Self::ViewEmployeesByDepartment,
        Self::ViewDepartmentBudget,
        Self::AddDepartment,
        Self::AddRole,
        Self::AddEmployee,
        Self::UpdateEmployeeRole,
        Self::UpdateEmployeeManager,
        Self::DeleteDepartment,
        Self::DeleteRole,
        Self::DeleteEmployee,
        Self::Exit,
    ];

    /// Menu label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ViewDepartments => "View All Departments",
            Self::ViewRoles => "View All Roles",
            Self::ViewEmployees => "View All Employees",
            Self::ViewEmployeesByManager => "View Employees by Manager",
            Self::ViewEmployeesByDepartment => "View Employees by Department",
            Self::ViewDepartmentBudget => "View Department Budget",
            Self::AddDepartment => "Add Department",
            Self::AddRole => "Add Role",
            Self::AddEmployee => "Add Employee",
            Self::UpdateEmployeeRole => "Update Employee Role",
            Self::UpdateEmployeeManager => "Update Employee Manager",
            Self::DeleteDepartment => "Delete Department",
            Self::DeleteRole => "Delete Role",
            Self::DeleteEmployee => "Delete Employee",
            Self::Exit => "Exit",
        }
    }

    /// Menu labels in menu order
    #[must_use]
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|a| a.label().to_string()).collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a completed action
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rows to render as a table (possibly empty)
    Table(QueryResult),

    /// A mutation succeeded; one-line confirmation
    Done(String),

    /// Nothing was run or nothing matched
    Skipped(String),
}

/// One selectable row: primary key plus display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

impl Choice {
    fn param(&self) -> Param {
        Some(self.id.to_string())
    }
}

/// Run one action against the database
///
/// `Exit` is handled by the menu loop and is rejected here.
pub async fn dispatch<D, P>(action: Action, db: &D, prompter: &mut P) -> Result<Outcome>
where
    D: Database,
    P: Prompter,
{
    tracing::debug!(%action, "dispatching action");

    match action {
        Action::ViewDepartments => view(db, sql::VIEW_DEPARTMENTS).await,
        Action::ViewRoles => view(db, sql::VIEW_ROLES).await,
        Action::ViewEmployees => view(db, sql::VIEW_EMPLOYEES).await,
        Action::ViewEmployeesByManager => view(db, sql::VIEW_EMPLOYEES_BY_MANAGER).await,
        Action::ViewEmployeesByDepartment => view(db, sql::VIEW_EMPLOYEES_BY_DEPARTMENT).await,
        Action::ViewDepartmentBudget => view_department_budget(db, prompter).await,
        Action::AddDepartment => add_department(db, prompter).await,
        Action::AddRole => add_role(db, prompter).await,
        Action::AddEmployee => add_employee(db, prompter).await,
        Action::UpdateEmployeeRole => update_employee_role(db, prompter).await,
        Action::UpdateEmployeeManager => update_employee_manager(db, prompter).await,
        Action::DeleteDepartment => {
            delete(db, prompter, Entity::Department, "Select the department to delete:").await
        }
        Action::DeleteRole => delete(db, prompter, Entity::Role, "Select the role to delete:").await,
        Action::DeleteEmployee => {
            delete(db, prompter, Entity::Employee, "Select the employee to delete:").await
        }
        Action::Exit => Err(TrackerError::invalid_input("Exit is not a database action")),
    }
}

async fn view<D: Database>(db: &D, statement: &str) -> Result<Outcome> {
    Ok(Outcome::Table(db.query(statement, &[]).await?))
}

async fn view_department_budget<D: Database, P: Prompter>(
    db: &D,
    prompter: &mut P,
) -> Result<Outcome> {
    let Some(department) = pick(
        db,
        prompter,
        Entity::Department,
        "Select a department to view its total budget:",
    )
    .await?
    else {
        return Ok(Outcome::Skipped(Entity::Department.none_found()));
    };

    // Zero rows when nobody holds a role in the department
    let result = db.query(sql::DEPARTMENT_BUDGET, &[department.param()]).await?;
    Ok(Outcome::Table(result))
}

async fn add_department<D: Database, P: Prompter>(db: &D, prompter: &mut P) -> Result<Outcome> {
    let name = prompter.input("Enter the name of the department:")?;

    db.execute(sql::INSERT_DEPARTMENT, &[Some(name.clone())]).await?;
    Ok(Outcome::Done(format!("Added department: {name}")))
}

async fn add_role<D: Database, P: Prompter>(db: &D, prompter: &mut P) -> Result<Outcome> {
    let title = prompter.input("Enter the role title:")?;
    let salary = prompter.input("Enter the role salary:")?;
    let department_id = prompter.input("Enter the department ID:")?;

    db.execute(sql::INSERT_ROLE, &[Some(title.clone()), Some(salary), Some(department_id)])
        .await?;
    Ok(Outcome::Done(format!("Added role: {title}")))
}

async fn add_employee<D: Database, P: Prompter>(db: &D, prompter: &mut P) -> Result<Outcome> {
    let first_name = prompter.input("Enter the employee first name:")?;
    let last_name = prompter.input("Enter the employee last name:")?;
    let role_id = prompter.input("Enter the role ID:")?;
    let manager_id = optional(prompter.input("Enter the manager ID (or leave blank):")?);

    db.execute(
        sql::INSERT_EMPLOYEE,
        &[Some(first_name.clone()), Some(last_name.clone()), Some(role_id), manager_id],
    )
    .await?;
    Ok(Outcome::Done(format!("Added employee: {first_name} {last_name}")))
}

async fn update_employee_role<D: Database, P: Prompter>(
    db: &D,
    prompter: &mut P,
) -> Result<Outcome> {
    let employee_id = prompter.input("Enter the employee ID to update:")?;
    let role_id = prompter.input("Enter the new role ID:")?;

    let affected = db
        .execute(sql::UPDATE_EMPLOYEE_ROLE, &[Some(role_id.clone()), Some(employee_id.clone())])
        .await?;

    if affected == 0 {
        return Ok(Outcome::Skipped(format!("No employee with ID {employee_id}; nothing updated.")));
    }
    Ok(Outcome::Done(format!("Updated employee ID {employee_id} to role ID {role_id}")))
}

async fn update_employee_manager<D: Database, P: Prompter>(
    db: &D,
    prompter: &mut P,
) -> Result<Outcome> {
    let Some(employee) =
        pick(db, prompter, Entity::Employee, "Select an employee to update their manager:").await?
    else {
        return Ok(Outcome::Skipped(Entity::Employee.none_found()));
    };
    let Some(manager) = pick(db, prompter, Entity::Employee, "Select the new manager:").await? else {
        return Ok(Outcome::Skipped(Entity::Employee.none_found()));
    };

    let links = manager_links(&db.query(sql::MANAGER_LINKS, &[]).await?);
    if creates_cycle(&links, employee.id, manager.id) {
        return Err(TrackerError::invalid_input(format!(
            "{} cannot report to {}: the management chain would loop back",
            employee.label, manager.label
        )));
    }

    db.execute(sql::UPDATE_EMPLOYEE_MANAGER, &[manager.param(), employee.param()]).await?;
    Ok(Outcome::Done(format!("Updated manager of {} to {}", employee.label, manager.label)))
}

async fn delete<D: Database, P: Prompter>(
    db: &D,
    prompter: &mut P,
    entity: Entity,
    prompt: &str,
) -> Result<Outcome> {
    let Some(target) = pick(db, prompter, entity, prompt).await? else {
        return Ok(Outcome::Skipped(entity.none_found()));
    };

    // A referencing row makes the database reject this; the error propagates
    db.execute(entity.delete_sql(), &[target.param()]).await?;
    Ok(Outcome::Done(format!("Deleted {}: {}", entity.noun(), target.label)))
}

/// Tables that back a selection list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entity {
    Department,
    Role,
    Employee,
}

impl Entity {
    const fn noun(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Role => "role",
            Self::Employee => "employee",
        }
    }

    const fn list_sql(self) -> &'static str {
        match self {
            Self::Department => sql::LIST_DEPARTMENTS,
            Self::Role => sql::LIST_ROLES,
            Self::Employee => sql::LIST_EMPLOYEES,
        }
    }

    const fn delete_sql(self) -> &'static str {
        match self {
            Self::Department => sql::DELETE_DEPARTMENT,
            Self::Role => sql::DELETE_ROLE,
            Self::Employee => sql::DELETE_EMPLOYEE,
        }
    }

    fn none_found(self) -> String {
        format!("No {}s found.", self.noun())
    }

    fn label(self, result: &QueryResult, row: usize) -> String {
        match self {
            Self::Department => text(result.cell(row, "name")),
            Self::Role => text(result.cell(row, "title")),
            Self::Employee => format!(
                "{} {}",
                text(result.cell(row, "first_name")),
                text(result.cell(row, "last_name"))
            ),
        }
    }
}

/// Fetch the candidate rows for `entity`
async fn list<D: Database>(db: &D, entity: Entity) -> Result<Vec<Choice>> {
    let result = db.query(entity.list_sql(), &[]).await?;

    (0..result.rows.len())
        .map(|row| {
            let id = result.cell(row, "id").and_then(serde_json::Value::as_i64).ok_or_else(|| {
                TrackerError::query_failed(format!("{} row {row} has no integer id", entity.noun()))
            })?;
            Ok(Choice { id, label: entity.label(&result, row) })
        })
        .collect()
}

/// Fetch candidates and let the user pick one; `None` when there are none
async fn pick<D: Database, P: Prompter>(
    db: &D,
    prompter: &mut P,
    entity: Entity,
    prompt: &str,
) -> Result<Option<Choice>> {
    let choices = list(db, entity).await?;
    if choices.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
    let index = prompter.select(prompt, &labels)?;
    chosen(&choices, index).cloned().map(Some)
}

fn chosen(choices: &[Choice], index: usize) -> Result<&Choice> {
    choices
        .get(index)
        .ok_or_else(|| TrackerError::invalid_input(format!("Selection {index} is out of range")))
}

/// Blank manager input means "no manager", never an empty string
fn optional(raw: String) -> Param {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn text(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// `employee id -> manager id` from a `MANAGER_LINKS` result
fn manager_links(result: &QueryResult) -> HashMap<i64, Option<i64>> {
    (0..result.rows.len())
        .filter_map(|row| {
            let id = result.cell(row, "id")?.as_i64()?;
            let manager = result.cell(row, "manager_id").and_then(serde_json::Value::as_i64);
            Some((id, manager))
        })
        .collect()
}

/// Whether making `manager` the manager of `employee` closes a loop
///
/// Walks up from `manager`; reaching `employee` means the new edge would make
/// `employee` its own (indirect) manager. A loop already present in the data
/// ends the walk instead of spinning.
pub fn creates_cycle(links: &HashMap<i64, Option<i64>>, employee: i64, manager: i64) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(manager);

    while let Some(id) = current {
        if id == employee {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        current = links.get(&id).copied().flatten();
    }

    false
}
