//! Interaction Loop
//!
//! Top Menu → action → render → Top Menu, until Exit. Each action runs to
//! completion before the next prompt is shown.
//!
//! # Error Policy
//! - Recoverable errors (database rejections, refused input) are written to the
//!   diagnostic stream and the loop returns to the Top Menu. Nothing is retried.
//! - Fatal errors (terminal gone, connection lost) end the loop and are
//!   returned to the caller, which still closes the connection.

use std::io::Write;

use crate::action::{dispatch, Action, Outcome};
use crate::engine::Database;
use crate::error::{Result, TrackerError};
use crate::output::{error_line, notice_line, render_table, success_line};
use crate::prompt::Prompter;

pub const TOP_MENU_PROMPT: &str = "What would you like to do?";

/// Run the menu until the user picks Exit
///
/// Results and confirmations go to `out`; recoverable errors go to `diag`.
pub async fn run<D, P, O, E>(db: &D, prompter: &mut P, out: &mut O, diag: &mut E) -> Result<()>
where
    D: Database,
    P: Prompter,
    O: Write,
    E: Write,
{
    let labels = Action::labels();

    loop {
        let index = prompter.select(TOP_MENU_PROMPT, &labels)?;
        let Some(action) = Action::ALL.get(index).copied() else {
            writeln!(diag, "{}", error_line(&format!("Unknown menu entry {index}")))
                .map_err(terminal)?;
            continue;
        };

        if action == Action::Exit {
            writeln!(out, "Goodbye!").map_err(terminal)?;
            tracing::debug!("exit selected");
            return Ok(());
        }

        match dispatch(action, db, prompter).await {
            Ok(outcome) => render(out, &outcome)?,
            Err(err) if err.is_recoverable() => {
                tracing::warn!(%action, code = err.error_code(), error = %err, "action failed");
                writeln!(diag, "{}", error_line(&err.message())).map_err(terminal)?;
            }
            Err(err) => {
                tracing::error!(%action, code = err.error_code(), error = %err, "fatal error");
                return Err(err);
            }
        }
    }
}

/// Write one outcome to `out`
pub fn render<O: Write>(out: &mut O, outcome: &Outcome) -> Result<()> {
    let written = match outcome {
        Outcome::Table(result) => write!(out, "\n{}\n", render_table(result)),
        Outcome::Done(message) => writeln!(out, "{}", success_line(message)),
        Outcome::Skipped(message) => writeln!(out, "{}", notice_line(message)),
    };
    written.map_err(terminal)
}

fn terminal(e: std::io::Error) -> TrackerError {
    TrackerError::prompt_failed(format!("Could not write to terminal: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Param, QueryResult};
    use serde_json::json;
    use std::collections::VecDeque;

    /// Every statement fails the same way
    struct BrokenDb;

    impl Database for BrokenDb {
        async fn query(&self, _sql: &str, _params: &[Param]) -> Result<QueryResult> {
            Err(TrackerError::query_failed("relation \"department\" does not exist"))
        }

        async fn execute(&self, _sql: &str, _params: &[Param]) -> Result<u64> {
            Err(TrackerError::query_failed("relation \"department\" does not exist"))
        }
    }

    /// Picks menu entries by label; fails like a closed stdin when exhausted
    struct MenuPicks(VecDeque<&'static str>);

    impl Prompter for MenuPicks {
        fn input(&mut self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        fn select(&mut self, _prompt: &str, items: &[String]) -> Result<usize> {
            let label = self.0.pop_front().ok_or_else(|| TrackerError::prompt_failed("stdin closed"))?;
            Ok(items.iter().position(|i| i == label).unwrap_or(usize::MAX))
        }
    }

    #[tokio::test]
    async fn test_exit_immediately() {
        let mut prompter = MenuPicks(VecDeque::from(["Exit"]));
        let (mut out, mut diag) = (Vec::new(), Vec::new());

        run(&BrokenDb, &mut prompter, &mut out, &mut diag).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Goodbye!\n");
        assert!(diag.is_empty());
    }

    #[tokio::test]
    async fn test_recoverable_error_returns_to_menu() {
        let mut prompter =
            MenuPicks(VecDeque::from(["View All Departments", "Add Department", "Exit"]));
        let (mut out, mut diag) = (Vec::new(), Vec::new());

        run(&BrokenDb, &mut prompter, &mut out, &mut diag).await.unwrap();

        let diag = String::from_utf8(diag).unwrap();
        assert_eq!(diag.matches("does not exist").count(), 2);
        assert!(String::from_utf8(out).unwrap().ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_fatal_prompt_error_ends_loop() {
        let mut prompter = MenuPicks(VecDeque::from(["View All Roles"]));
        let (mut out, mut diag) = (Vec::new(), Vec::new());

        let err = run(&BrokenDb, &mut prompter, &mut out, &mut diag).await.unwrap_err();
        assert_eq!(err.error_code(), "PROMPT_FAILED");
    }

    #[tokio::test]
    async fn test_unknown_entry_is_reported() {
        let mut prompter = MenuPicks(VecDeque::from(["Fire Everyone", "Exit"]));
        let (mut out, mut diag) = (Vec::new(), Vec::new());

        run(&BrokenDb, &mut prompter, &mut out, &mut diag).await.unwrap();
        assert!(String::from_utf8(diag).unwrap().contains("Unknown menu entry"));
    }

    #[test]
    fn test_render_outcomes() {
        let mut out = Vec::new();
        let table = QueryResult::new(vec!["id".to_string()], vec![vec![json!(1)]]);

        render(&mut out, &Outcome::Table(table)).unwrap();
        render(&mut out, &Outcome::Done("Added department: Sales".to_string())).unwrap();
        render(&mut out, &Outcome::Skipped("No roles found.".to_string())).unwrap();

        let text = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();
        assert!(text.starts_with("\nid\n--\n1\n\n"));
        assert!(text.contains("Added department: Sales\n"));
        assert!(text.ends_with("No roles found.\n"));
    }
}
