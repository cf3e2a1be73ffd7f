//! Terminal Output
//!
//! Plain-text rendering for everything the menu prints to stdout.
//!
//! # Output Contract
//! - Query results are a padded grid: header, dash rule, one line per row
//! - NULL cells print as `NULL`
//! - Rendering is deterministic: identical results give identical bytes
//! - Colors come from `console` and switch off when stdout is not a terminal

use console::{measure_text_width, pad_str, style, Alignment};

use crate::engine::QueryResult;

const COLUMN_GAP: &str = "  ";
const NULL_CELL: &str = "NULL";

const TITLE_ART: &str = r"    ______                __
   / ____/___ ___  ____  / /___  __  _____  ___
  / __/ / __ `__ \/ __ \/ / __ \/ / / / _ \/ _ \
 / /___/ / / / / / /_/ / / /_/ / /_/ /  __/  __/
/_____/_/ /_/ /_/ .___/_/\____/\__, /\___/\___/
               /_/            /____/
    __  ___
   /  |/  /___ _____  ____ _____ ____  _____
  / /|_/ / __ `/ __ \/ __ `/ __ `/ _ \/ ___/
 / /  / / /_/ / / / / /_/ / /_/ /  __/ /
/_/  /_/\__,_/_/ /_/\__,_/\__, /\___/_/
                         /____/";

/// Render a query result as a text grid, one trailing newline per line
#[must_use]
pub fn render_table(result: &QueryResult) -> String {
    let cells: Vec<Vec<String>> =
        result.rows.iter().map(|row| row.iter().map(cell_text).collect()).collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|c| measure_text_width(c))
                .fold(measure_text_width(name), usize::max)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, result.columns.iter().map(String::as_str), &widths);

    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rules.iter().map(String::as_str), &widths);

    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }

    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => NULL_CELL.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Draw `text` inside a rounded box with one line of padding and margin
#[must_use]
pub fn boxed(text: &str) -> String {
    const PAD_X: usize = 3;
    const MARGIN: &str = "   ";

    let width = text.lines().map(measure_text_width).max().unwrap_or(0);
    let inner = width + PAD_X * 2;
    let blank = format!("{MARGIN}│{}│", " ".repeat(inner));

    let mut lines = vec![String::new(), format!("{MARGIN}╭{}╮", "─".repeat(inner)), blank.clone()];
    for line in text.lines() {
        lines.push(format!(
            "{MARGIN}│{pad}{}{pad}│",
            pad_str(line, width, Alignment::Left, None),
            pad = " ".repeat(PAD_X)
        ));
    }
    lines.push(blank);
    lines.push(format!("{MARGIN}╰{}╯", "─".repeat(inner)));
    lines.push(String::new());

    lines.join("\n")
}

/// Startup banner: the title art in a cyan rounded box
#[must_use]
pub fn banner() -> String {
    style(boxed(TITLE_ART)).cyan().to_string()
}

/// Confirmation line for a completed action
#[must_use]
pub fn success_line(message: &str) -> String {
    format!("{} {message}", style("✔").green().bold())
}

/// Notice for an action that had nothing to do
#[must_use]
pub fn notice_line(message: &str) -> String {
    format!("{} {message}", style("•").yellow().bold())
}

/// Diagnostic line for a failed action
#[must_use]
pub fn error_line(message: &str) -> String {
    format!("{} {message}", style("✖").red().bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_render_table_pads_columns() {
        let result = QueryResult::new(
            columns(&["id", "name"]),
            vec![vec![json!(1), json!("Engineering")], vec![json!(12), json!("HR")]],
        );

        let expected = "\
id  name
--  -----------
1   Engineering
12  HR
";
        assert_eq!(render_table(&result), expected);
    }

    #[test]
    fn test_render_table_nulls_and_numeric_strings() {
        let result = QueryResult::new(
            columns(&["first_name", "manager_first_name"]),
            vec![vec![json!("Ada"), json!(null)], vec![json!("Alan"), json!("Ada")]],
        );

        let expected = "\
first_name  manager_first_name
----------  ------------------
Ada         NULL
Alan        Ada
";
        assert_eq!(render_table(&result), expected);
    }

    #[test]
    fn test_render_empty_result_keeps_header() {
        let result = QueryResult::new(columns(&["department_name", "total_budget"]), Vec::new());

        let expected = "\
department_name  total_budget
---------------  ------------
";
        assert_eq!(render_table(&result), expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let result = QueryResult::new(
            columns(&["title", "salary"]),
            vec![vec![json!("Engineer"), json!("90000.00")]],
        );
        assert_eq!(render_table(&result), render_table(&result.clone()));
    }

    #[test]
    fn test_render_measures_display_width() {
        let result = QueryResult::new(columns(&["name"]), vec![vec![json!("Zoë")], vec![json!("Al")]]);

        let expected = "\
name
----
Zoë
Al
";
        assert_eq!(render_table(&result), expected);
    }

    #[test]
    fn test_boxed_lines_align() {
        let drawn = boxed("ab\nabcd");
        let lines: Vec<&str> = drawn.lines().collect();

        assert_eq!(lines.first(), Some(&""));
        assert_eq!(lines[1], "   ╭──────────╮");
        assert_eq!(lines[3], "   │   ab     │");
        assert_eq!(lines[4], "   │   abcd   │");
        assert_eq!(lines[6], "   ╰──────────╯");

        let widths: Vec<usize> = lines[1..=6].iter().map(|l| measure_text_width(l)).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_banner_contains_title() {
        let plain = console::strip_ansi_codes(&banner()).to_string();
        assert!(plain.contains("╭"));
        assert!(plain.contains("/_____/_/ /_/ /_/"));
    }

    #[test]
    fn test_status_lines_keep_message() {
        let line = console::strip_ansi_codes(&success_line("Added department: Sales")).to_string();
        assert!(line.ends_with("Added department: Sales"));

        let line = console::strip_ansi_codes(&error_line("Query execution failed: boom")).to_string();
        assert!(line.ends_with("Query execution failed: boom"));
    }
}
