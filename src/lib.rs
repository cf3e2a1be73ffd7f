//! Employee Tracker - Interactive Department, Role and Employee Management
//!
//! A menu-driven terminal tool over a small `PostgreSQL` schema:
//! `department`, `role` and `employee` (with an optional self-referencing
//! manager). Every menu action maps to one parameterized statement, or a short
//! sequence when the user first picks a row from a live list.
//!
//! # Core Principles
//! - One connection, opened at startup and closed on exit
//! - Strictly sequential: one prompt or one database round trip at a time
//! - The database enforces integrity; rejected statements are reported, not retried
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`config`] - Environment configuration
//! - [`engine`] - Database handle trait and the `PostgreSQL` session
//! - [`sql`] - Statements issued by each action
//! - [`prompt`] - Interactive input (free text, pick from list)
//! - [`action`] - Query dispatcher
//! - [`output`] - Table rendering and banner
//! - [`menu`] - Interaction loop

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod menu;
pub mod output;
pub mod prompt;
pub mod sql;

// Re-export commonly used types for convenience
pub use action::{dispatch, Action, Outcome};
pub use config::ConnectionConfig;
pub use engine::postgres::PgSession;
pub use engine::{Database, Param, QueryResult};
pub use error::{Result, TrackerError};
pub use prompt::{Prompter, TerminalPrompter};
