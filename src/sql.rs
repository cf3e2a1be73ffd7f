//! SQL statements issued by the menu actions
//!
//! Parameters arrive as text and are cast server-side (`$1::text::int`), so a
//! non-numeric id or salary is rejected by the database.
//!
//! Salaries are selected as text: the column is unconstrained `DECIMAL`, which
//! also stores `NaN` and values wider than any fixed-precision decimal type.
//!
//! The schema (`schema.sql`) is owned by the database; nothing here creates or
//! alters tables.

// Views

pub const VIEW_DEPARTMENTS: &str = "
    SELECT department.id, department.name
    FROM department
    ORDER BY department.id";

pub const VIEW_ROLES: &str = "
    SELECT role.id, role.title, role.salary::text AS salary, department.name AS department
    FROM role
    JOIN department ON role.department_id = department.id
    ORDER BY role.id";

pub const VIEW_EMPLOYEES: &str = "
    SELECT e.id, e.first_name, e.last_name, r.title, d.name AS department, r.salary::text AS salary,
           m.first_name || ' ' || m.last_name AS manager
    FROM employee e
    JOIN role r ON e.role_id = r.id
    JOIN department d ON r.department_id = d.id
    LEFT JOIN employee m ON e.manager_id = m.id
    ORDER BY e.id";

pub const VIEW_EMPLOYEES_BY_MANAGER: &str = "
    SELECT e.id, e.first_name, e.last_name,
           m.first_name AS manager_first_name,
           m.last_name AS manager_last_name
    FROM employee e
    LEFT JOIN employee m ON e.manager_id = m.id
    ORDER BY manager_first_name, manager_last_name, e.id";

pub const VIEW_EMPLOYEES_BY_DEPARTMENT: &str = "
    SELECT e.id, e.first_name, e.last_name, d.name AS department_name
    FROM employee e
    JOIN role r ON e.role_id = r.id
    JOIN department d ON r.department_id = d.id
    ORDER BY d.name, e.id";

pub const DEPARTMENT_BUDGET: &str = "
    SELECT d.name AS department_name, SUM(r.salary)::text AS total_budget
    FROM employee e
    JOIN role r ON e.role_id = r.id
    JOIN department d ON r.department_id = d.id
    WHERE d.id = $1::text::int
    GROUP BY d.name";

// Selection lists

pub const LIST_DEPARTMENTS: &str = "SELECT id, name FROM department ORDER BY id";

pub const LIST_ROLES: &str = "SELECT id, title FROM role ORDER BY id";

pub const LIST_EMPLOYEES: &str = "SELECT id, first_name, last_name FROM employee ORDER BY id";

pub const MANAGER_LINKS: &str = "SELECT id, manager_id FROM employee";

// Mutations

pub const INSERT_DEPARTMENT: &str = "INSERT INTO department (name) VALUES ($1)";

pub const INSERT_ROLE: &str =
    "INSERT INTO role (title, salary, department_id) VALUES ($1, $2::text::numeric, $3::text::int)";

pub const INSERT_EMPLOYEE: &str = "INSERT INTO employee (first_name, last_name, role_id, manager_id) \
     VALUES ($1, $2, $3::text::int, $4::text::int)";

pub const UPDATE_EMPLOYEE_ROLE: &str =
    "UPDATE employee SET role_id = $1::text::int WHERE id = $2::text::int";

pub const UPDATE_EMPLOYEE_MANAGER: &str =
    "UPDATE employee SET manager_id = $1::text::int WHERE id = $2::text::int";

pub const DELETE_DEPARTMENT: &str = "DELETE FROM department WHERE id = $1::text::int";

pub const DELETE_ROLE: &str = "DELETE FROM role WHERE id = $1::text::int";

pub const DELETE_EMPLOYEE: &str = "DELETE FROM employee WHERE id = $1::text::int";
