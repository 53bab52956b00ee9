//! PostgreSQL connectivity diagnosis and administration commands.
//!
//! Each step reports ok or failed independently; a failed step carries
//! remediation hints for the operator.

use std::fmt;
use std::time::Duration;

use databridge_db::postgres::{self, AdminError, DbPool};

use crate::config::DbSettings;
use crate::probe;

/// Errors from the administration commands.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error("Invalid connection settings: {0}")]
    Settings(#[source] sqlx::Error),

    #[error("Could not connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Query(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl DiagnosticError {
    /// Operator hints for this failure.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            DiagnosticError::Connect { source, .. } => connection_hints(source),
            DiagnosticError::Admin(AdminError::InvalidName(_)) => {
                &["Use a database name made of letters, digits and underscores"]
            }
            _ => &[],
        }
    }
}

/// Hints for a failed connection, keyed on the kind of failure.
pub fn connection_hints(err: &sqlx::Error) -> &'static [&'static str] {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => &[
            "Check that the PostgreSQL server is running",
            "Check DB_HOST and DB_PORT",
            "For cloud instances, allow your IP in the security group or firewall",
            "Increase CONNECTION_TIMEOUT for slow networks",
        ],
        sqlx::Error::Database(db) if db.code().as_deref() == Some("28P01") => &[
            "Check DB_USER and DB_PASSWORD",
        ],
        sqlx::Error::Database(db) if db.code().as_deref() == Some("3D000") => &[
            "The target database does not exist; run `databridge-ops db create`",
        ],
        sqlx::Error::Tls(_) => &["Check the server's SSL configuration (sslmode in DATABASE_URL)"],
        _ => &["Check the connection settings and the server log"],
    }
}

/// Outcome of one diagnostic step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Ok(String),
    Failed {
        detail: String,
        hints: Vec<&'static str>,
    },
    /// Not run because an earlier step failed.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub name: &'static str,
    pub outcome: StepOutcome,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            StepOutcome::Ok(detail) => write!(f, "[ ok ] {}: {detail}", self.name),
            StepOutcome::Failed { detail, hints } => {
                write!(f, "[FAIL] {}: {detail}", self.name)?;
                for hint in hints {
                    write!(f, "\n       - {hint}")?;
                }
                Ok(())
            }
            StepOutcome::Skipped => write!(f, "[skip] {}", self.name),
        }
    }
}

/// Results of [`diagnose`], in execution order.
#[derive(Debug, Clone, Default)]
pub struct Diagnosis {
    pub steps: Vec<Step>,
}

impl Diagnosis {
    pub fn passed(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s.outcome, StepOutcome::Ok(_)))
    }

    fn ok(&mut self, name: &'static str, detail: impl Into<String>) {
        self.steps.push(Step {
            name,
            outcome: StepOutcome::Ok(detail.into()),
        });
    }

    fn failed(&mut self, name: &'static str, detail: impl fmt::Display, hints: &[&'static str]) {
        tracing::warn!(step = name, error = %detail, "Diagnostic step failed");
        self.steps.push(Step {
            name,
            outcome: StepOutcome::Failed {
                detail: detail.to_string(),
                hints: hints.to_vec(),
            },
        });
    }

    fn skipped(&mut self, names: &[&'static str]) {
        for &name in names {
            self.steps.push(Step {
                name,
                outcome: StepOutcome::Skipped,
            });
        }
    }
}

const STEP_TCP: &str = "TCP reachability";
const STEP_CONNECT: &str = "Server connection";
const STEP_VERSION: &str = "Server version";
const STEP_LIST: &str = "Database listing";
const STEP_TARGET: &str = "Target database";

/// Run every diagnostic step against the server described by `settings`.
///
/// Steps that need a connection are skipped once connecting fails.
pub async fn diagnose(settings: &DbSettings) -> Diagnosis {
    let mut report = Diagnosis::default();
    let (host, port) = settings.server_address();
    let timeout = settings.connect_timeout();

    if probe::is_port_open(&host, port, timeout).await {
        report.ok(STEP_TCP, format!("{host}:{port} accepts connections"));
    } else {
        report.failed(
            STEP_TCP,
            format!("{host}:{port} is unreachable"),
            &[
                "Check that the PostgreSQL server is running",
                "Check DB_HOST and DB_PORT",
                "For cloud instances, allow your IP in the security group or firewall",
            ],
        );
    }

    let pool = match connect_maintenance(settings).await {
        Ok(pool) => {
            report.ok(STEP_CONNECT, format!("connected as {}", connected_user(settings)));
            pool
        }
        Err(err) => {
            let hints = err.hints();
            report.failed(STEP_CONNECT, &err, hints);
            report.skipped(&[STEP_VERSION, STEP_LIST, STEP_TARGET]);
            return report;
        }
    };

    match postgres::server_version(&pool).await {
        Ok(version) => report.ok(STEP_VERSION, version),
        Err(e) => report.failed(STEP_VERSION, e, &[]),
    }

    let target = settings.target_database();
    match postgres::list_databases(&pool).await {
        Ok(names) => {
            report.ok(STEP_LIST, names.join(", "));
            if names.iter().any(|n| *n == target) {
                report.ok(STEP_TARGET, format!("'{target}' exists"));
            } else {
                report.failed(
                    STEP_TARGET,
                    format!("'{target}' does not exist"),
                    &["Run `databridge-ops db create` to create it"],
                );
            }
        }
        Err(e) => {
            report.failed(STEP_LIST, e, &["The user may lack permission to read pg_database"]);
            report.skipped(&[STEP_TARGET]);
        }
    }

    pool.close().await;
    report
}

fn connected_user(settings: &DbSettings) -> String {
    settings
        .maintenance_options()
        .map(|o| o.get_username().to_string())
        .unwrap_or_else(|_| settings.user.clone())
}

/// Databases on the server.
pub async fn list_databases(settings: &DbSettings) -> Result<Vec<String>, DiagnosticError> {
    let pool = connect_maintenance(settings).await?;
    let names = postgres::list_databases(&pool).await?;
    pool.close().await;
    Ok(names)
}

/// Create the target database if missing, then verify by connecting to it.
///
/// Returns `true` if the database was created.
pub async fn create_database(settings: &DbSettings) -> Result<bool, DiagnosticError> {
    let target = settings.target_database();
    let pool = connect_maintenance(settings).await?;
    let created = postgres::ensure_database(&pool, &target).await?;
    pool.close().await;

    let pool = connect_target(settings).await?;
    postgres::health_check(&pool).await?;
    pool.close().await;
    tracing::info!(database = %target, created, "Target database verified");
    Ok(created)
}

/// Apply the embedded migrations to the target database and return the
/// resulting row counts per base table.
pub async fn create_tables(settings: &DbSettings) -> Result<Vec<(&'static str, i64)>, DiagnosticError> {
    let pool = connect_target(settings).await?;
    postgres::run_migrations(&pool).await?;
    let counts = postgres::base_table_counts(&pool).await?;
    pool.close().await;
    Ok(counts)
}

async fn connect_maintenance(settings: &DbSettings) -> Result<DbPool, DiagnosticError> {
    let options = settings.maintenance_options().map_err(DiagnosticError::Settings)?;
    connect(options, settings.connect_timeout()).await
}

async fn connect_target(settings: &DbSettings) -> Result<DbPool, DiagnosticError> {
    let options = settings.target_options().map_err(DiagnosticError::Settings)?;
    connect(options, settings.connect_timeout()).await
}

async fn connect(
    options: sqlx::postgres::PgConnectOptions,
    timeout: Duration,
) -> Result<DbPool, DiagnosticError> {
    let target = format!(
        "{}:{}/{}",
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or_default()
    );
    tracing::debug!(%target, timeout_secs = timeout.as_secs(), "Connecting");
    postgres::connect(options, timeout)
        .await
        .map_err(|source| DiagnosticError::Connect { target, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_hints_mention_firewall() {
        let hints = connection_hints(&sqlx::Error::PoolTimedOut);
        assert!(hints.iter().any(|h| h.contains("firewall")));
    }

    #[test]
    fn failed_step_renders_hints() {
        let step = Step {
            name: STEP_CONNECT,
            outcome: StepOutcome::Failed {
                detail: "timed out".into(),
                hints: vec!["Check DB_HOST and DB_PORT"],
            },
        };
        assert_eq!(
            step.to_string(),
            "[FAIL] Server connection: timed out\n       - Check DB_HOST and DB_PORT"
        );
    }

    #[test]
    fn diagnosis_passes_only_when_every_step_is_ok() {
        let mut report = Diagnosis::default();
        report.ok(STEP_TCP, "ok");
        assert!(report.passed());
        report.skipped(&[STEP_VERSION]);
        assert!(!report.passed());
    }
}
