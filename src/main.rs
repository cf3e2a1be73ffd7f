//! Employee Tracker CLI Entry Point
//!
//! Prints the banner, connects to `PostgreSQL`, then runs the interactive menu
//! until Exit. Connection settings come only from `DB_*` environment variables
//! (optionally via `.env`).
//!
//! Menus and tables go to stdout. Logs and diagnostics go to stderr.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use employee_tracker::config::{self, ConnectionConfig};
use employee_tracker::output::{banner, error_line};
use employee_tracker::{menu, PgSession, TerminalPrompter};

/// Employee Tracker - manage departments, roles and employees
#[derive(Parser)]
#[command(name = "employee-tracker")]
#[command(about = "Interactive menu for managing departments, roles and employees")]
#[command(version)]
struct Cli {
    /// Log level for stderr output (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = config::load_dotenv();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match dotenv {
        Ok(()) => run().await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_line(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ConnectionConfig::from_env()?;

    println!("{}", banner());

    let session =
        PgSession::connect(&config).await.context("Error connecting to the database")?;
    println!("Connected to the database.");

    let mut prompter = TerminalPrompter::new();
    let outcome = menu::run(&session, &mut prompter, &mut io::stdout(), &mut io::stderr()).await;

    // Released on every path out of the menu
    session.close().await;
    outcome?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("employee_tracker={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
