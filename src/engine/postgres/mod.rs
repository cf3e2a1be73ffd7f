//! `PostgreSQL` Session Implementation
//!
//! This module implements the [`Database`] trait for a single long-lived
//! `PostgreSQL` connection.
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - One connection is opened at startup and probed with `SELECT 1`
//! - The connection driver runs on a spawned task that ends when the client drops
//! - NUMERIC values are read through `rust_decimal` and rendered as strings;
//!   `NaN` or anything wider than 28 digits fails, so such columns are selected `::text`
//! - NULL of any type becomes `serde_json::Value::Null`

use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Config, NoTls, Row};

use crate::config::ConnectionConfig;
use crate::engine::{Database, Param, QueryResult};
use crate::error::{Result, TrackerError};

/// Open `PostgreSQL` session
///
/// Dropping the session closes the connection. [`PgSession::close`] also
/// waits for the driver task to finish.
pub struct PgSession {
    client: Client,
    driver: JoinHandle<()>,
}

impl PgSession {
    /// Connect and run the startup connectivity probe
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let pg_config = build_pg_config(config);

        tracing::debug!(target_db = %config.redacted(), "connecting to PostgreSQL");

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            TrackerError::connection_failed(format!(
                "Failed to connect to PostgreSQL at {}:{}: {}",
                config.host,
                config.port,
                describe(&e)
            ))
        })?;

        // Connection errors are logged without the config to avoid leaking credentials
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %describe(&e), "PostgreSQL connection closed with error");
            }
        });

        let session = Self { client, driver };
        session.probe().await?;

        tracing::info!(target_db = %config.redacted(), "connected to PostgreSQL");
        Ok(session)
    }

    async fn probe(&self) -> Result<()> {
        self.client.simple_query("SELECT 1").await.map_err(|e| {
            TrackerError::connection_failed(format!("Connectivity probe failed: {}", describe(&e)))
        })?;
        Ok(())
    }

    /// Release the connection and wait for the driver task to stop
    pub async fn close(self) {
        let Self { client, driver } = self;
        drop(client);
        if let Err(e) = driver.await {
            tracing::warn!(error = %e, "PostgreSQL driver task did not shut down cleanly");
        }
        tracing::debug!("PostgreSQL session closed");
    }
}

impl Database for PgSession {
    async fn query(&self, sql: &str, params: &[Param]) -> Result<QueryResult> {
        let stmt = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| TrackerError::query_failed(describe(&e)))?;

        let rows = self
            .client
            .query(&stmt, &bind(params))
            .await
            .map_err(|e| TrackerError::query_failed(describe(&e)))?;

        let columns: Vec<String> = stmt.columns().iter().map(|c| c.name().to_string()).collect();

        let mut rows_data = Vec::with_capacity(rows.len());
        for row in &rows {
            rows_data.push(row_to_json(columns.len(), row)?);
        }

        tracing::debug!(rows = rows_data.len(), "query returned");
        Ok(QueryResult::new(columns, rows_data))
    }

    async fn execute(&self, sql: &str, params: &[Param]) -> Result<u64> {
        let affected = self
            .client
            .execute(sql, &bind(params))
            .await
            .map_err(|e| TrackerError::query_failed(describe(&e)))?;

        tracing::debug!(affected, "statement executed");
        Ok(affected)
    }
}

/// Build `tokio-postgres` config from `ConnectionConfig`
fn build_pg_config(config: &ConnectionConfig) -> Config {
    let mut pg_config = Config::new();
    pg_config
        .host(&config.host)
        .port(config.port)
        .user(&config.user)
        .dbname(&config.database)
        .application_name("employee-tracker");

    if !config.password.is_empty() {
        pg_config.password(&config.password);
    }

    pg_config
}

fn bind(params: &[Param]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

/// Render a driver error, preferring the server's own message
///
/// `tokio_postgres::Error`'s `Display` hides the server message behind
/// "db error", which is useless at the menu.
fn describe(e: &tokio_postgres::Error) -> String {
    match e.as_db_error() {
        Some(db) => match db.detail() {
            Some(detail) => format!("{} ({detail})", db.message()),
            None => db.message().to_string(),
        },
        None => e.to_string(),
    }
}

/// Convert a `PostgreSQL` row to a JSON-safe `Vec`
fn row_to_json(width: usize, row: &Row) -> Result<Vec<serde_json::Value>> {
    (0..width).map(|idx| postgres_value_to_json(row, idx)).collect()
}

/// Convert `PostgreSQL` value to JSON value
fn postgres_value_to_json(row: &Row, idx: usize) -> Result<serde_json::Value> {
    use rust_decimal::Decimal;
    use serde_json::Value;
    use tokio_postgres::types::Type;

    let col_type = row.columns()[idx].type_();

    let fail = |what: &str, e: tokio_postgres::Error| {
        TrackerError::query_failed(format!("Failed to get {what} value: {e}"))
    };

    let value = match *col_type {
        Type::BOOL => row
            .try_get::<_, Option<bool>>(idx)
            .map_err(|e| fail("boolean", e))?
            .map_or(Value::Null, Value::Bool),

        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .map_err(|e| fail("i16", e))?
            .map_or(Value::Null, |v| Value::Number(v.into())),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)
            .map_err(|e| fail("i32", e))?
            .map_or(Value::Null, |v| Value::Number(v.into())),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(idx)
            .map_err(|e| fail("i64", e))?
            .map_or(Value::Null, |v| Value::Number(v.into())),

        // NaN/Infinity have no JSON form
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .map_err(|e| fail("f32", e))?
            .and_then(|v| serde_json::Number::from_f64(f64::from(v)))
            .map_or(Value::Null, Value::Number),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(idx)
            .map_err(|e| fail("f64", e))?
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),

        // Kept as a string so salaries print with their scale ("90000.00")
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(idx)
            .map_err(|e| fail("numeric", e))?
            .map_or(Value::Null, |v| Value::String(v.to_string())),

        Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME => row
            .try_get::<_, Option<String>>(idx)
            .map_err(|e| fail("string", e))?
            .map_or(Value::Null, Value::String),

        _ => {
            return Err(TrackerError::query_failed(format!(
                "Unsupported PostgreSQL type '{}' in column '{}'",
                col_type.name(),
                row.columns()[idx].name()
            )))
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql;

    // Note: The async tests below require a running PostgreSQL instance with
    // schema.sql applied. Run them with:
    // cargo test -- --ignored

    fn local_config() -> ConnectionConfig {
        ConnectionConfig {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "employees_db".to_string(),
        }
    }

    #[test]
    fn test_build_pg_config() {
        let pg_config = build_pg_config(&local_config());
        assert_eq!(pg_config.get_user(), Some("postgres"));
        assert_eq!(pg_config.get_dbname(), Some("employees_db"));
        assert_eq!(pg_config.get_ports(), &[5432]);
        assert_eq!(pg_config.get_password(), Some(&b"postgres"[..]));
    }

    #[test]
    fn test_build_pg_config_without_password() {
        let mut config = local_config();
        config.password = String::new();
        let pg_config = build_pg_config(&config);
        assert_eq!(pg_config.get_password(), None);
    }

    #[test]
    fn test_bind_preserves_order_and_nulls() {
        let params = vec![Some("Ada".to_string()), None];
        assert_eq!(bind(&params).len(), 2);
    }

    #[tokio::test]
    async fn test_connect_refused_is_connection_failure() {
        let mut config = local_config();
        // Port 1 is reserved and never has a PostgreSQL listener
        config.port = 1;

        let err = PgSession::connect(&config).await.err().expect("connect should fail");
        assert_eq!(err.error_code(), "CONNECTION_FAILED");
        assert!(!err.is_recoverable());
        assert!(!err.message().contains("postgres@"));
    }

    #[tokio::test]
    #[ignore = "Requires running PostgreSQL instance"]
    async fn test_view_departments() {
        let session = PgSession::connect(&local_config()).await.unwrap();

        let result = session.query(sql::VIEW_DEPARTMENTS, &[]).await.unwrap();
        assert_eq!(result.columns, vec!["id", "name"]);

        session.close().await;
    }

    #[tokio::test]
    #[ignore = "Requires running PostgreSQL instance"]
    async fn test_malformed_salary_rejected_by_database() {
        let session = PgSession::connect(&local_config()).await.unwrap();

        let params = vec![
            Some("Engineer".to_string()),
            Some("lots".to_string()),
            Some("1".to_string()),
        ];
        let err = session.execute(sql::INSERT_ROLE, &params).await.unwrap_err();
        assert_eq!(err.error_code(), "QUERY_FAILED");
        assert!(err.is_recoverable());

        session.close().await;
    }

    #[tokio::test]
    #[ignore = "Requires running PostgreSQL instance"]
    async fn test_budget_for_empty_department_has_no_rows() {
        let session = PgSession::connect(&local_config()).await.unwrap();

        session
            .execute(sql::INSERT_DEPARTMENT, &[Some("Empty Budget Dept".to_string())])
            .await
            .unwrap();
        let listed = session.query(sql::LIST_DEPARTMENTS, &[]).await.unwrap();
        let id = listed
            .rows
            .iter()
            .find(|r| r[1] == serde_json::json!("Empty Budget Dept"))
            .map(|r| r[0].to_string())
            .unwrap();

        let budget = session.query(sql::DEPARTMENT_BUDGET, &[Some(id.clone())]).await.unwrap();
        assert!(budget.is_empty());
        assert_eq!(budget.columns, vec!["department_name", "total_budget"]);

        session.execute(sql::DELETE_DEPARTMENT, &[Some(id)]).await.unwrap();
        session.close().await;
    }

    #[tokio::test]
    #[ignore = "Requires running PostgreSQL instance"]
    async fn test_numeric_keeps_scale() {
        let session = PgSession::connect(&local_config()).await.unwrap();

        let result = session
            .query("SELECT 90000.50::numeric AS salary, NULL::numeric AS missing", &[])
            .await
            .unwrap();
        assert_eq!(result.rows[0], vec![serde_json::json!("90000.50"), serde_json::Value::Null]);

        session.close().await;
    }
}
