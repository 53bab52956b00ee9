//! Database connection settings shared by the diagnostic commands.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use sqlx::postgres::PgConnectOptions;

/// PostgreSQL connection settings.
///
/// Every flag falls back to an environment variable. When `DATABASE_URL`
/// is set it takes precedence over the individual fields.
#[derive(Clone, Args)]
pub struct DbSettings {
    /// Full connection URL; overrides the individual settings.
    #[arg(long = "database-url", env = "DATABASE_URL")]
    pub url: Option<String>,

    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long = "db-port", env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "db-user", env = "DB_USER", default_value = "postgres")]
    pub user: String,

    #[arg(long = "db-password", env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Target database.
    #[arg(long = "db-name", env = "DB_NAME", default_value = "databridge")]
    pub database: String,

    /// Seconds to wait for a connection before giving up.
    #[arg(long = "connect-timeout", env = "CONNECTION_TIMEOUT", default_value_t = 30)]
    pub connect_timeout_secs: u64,
}

/// Name of the maintenance database used for server-level operations.
pub const MAINTENANCE_DB: &str = "postgres";

impl DbSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Options for connecting to the target database.
    pub fn target_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        self.options_for(None)
    }

    /// Options for connecting to the maintenance database on the same server.
    pub fn maintenance_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        self.options_for(Some(MAINTENANCE_DB))
    }

    /// Name of the target database, honouring the URL's path when present.
    pub fn target_database(&self) -> String {
        self.target_options()
            .ok()
            .and_then(|o| o.get_database().map(str::to_string))
            .unwrap_or_else(|| self.database.clone())
    }

    /// Host and port of the server, honouring the URL when present.
    pub fn server_address(&self) -> (String, u16) {
        match self.target_options() {
            Ok(o) => (o.get_host().to_string(), o.get_port()),
            Err(_) => (self.host.clone(), self.port),
        }
    }

    fn options_for(&self, database: Option<&str>) -> Result<PgConnectOptions, sqlx::Error> {
        let base = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database),
        };
        Ok(match database {
            Some(db) => base.database(db),
            None => base,
        })
    }
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DbSettings {
        DbSettings {
            url: None,
            host: "db.internal".into(),
            port: 5433,
            user: "bridge".into(),
            password: "hunter2".into(),
            database: "databridge".into(),
            connect_timeout_secs: 2,
        }
    }

    #[test]
    fn fields_build_target_options() {
        let s = settings();
        assert_eq!(s.target_database(), "databridge");
        assert_eq!(s.server_address(), ("db.internal".to_string(), 5433));
        assert_eq!(s.connect_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn url_overrides_fields() {
        let mut s = settings();
        s.url = Some("postgres://u:p@cloud.example:6543/bank".into());
        assert_eq!(s.target_database(), "bank");
        assert_eq!(s.server_address(), ("cloud.example".to_string(), 6543));
        assert_eq!(
            s.maintenance_options().unwrap().get_database(),
            Some(MAINTENANCE_DB)
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", settings());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
