//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DbSettings;

#[derive(Debug, Parser)]
#[command(name = "databridge-ops", author, version, about = "DataBridge operations tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the API and frontend servers and supervise them.
    Start(StartArgs),

    /// Serve the static frontend directory.
    ServeFrontend(FrontendArgs),

    /// Run the PostgreSQL connectivity diagnosis.
    Diagnose(DbSettings),

    /// Database administration.
    Db {
        #[command(subcommand)]
        action: DbCommand,
    },

    /// Cloud deployment descriptors.
    Deploy {
        #[command(subcommand)]
        action: DeployCommand,
    },

    /// Report which services are up.
    Status(StatusArgs),
}

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Command that runs the API server. Split on whitespace; no shell.
    #[arg(long, env = "DATABRIDGE_API_CMD", default_value = "databridge-api")]
    pub api_cmd: String,

    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub api_port: u16,

    /// Port tried once if the API does not come up on `--api-port`.
    #[arg(long, default_value_t = 8080)]
    pub fallback_port: u16,

    #[arg(long, env = "FRONTEND_PORT", default_value_t = 3000)]
    pub frontend_port: u16,

    #[arg(long, env = "FRONTEND_DIR", default_value = "frontend")]
    pub frontend_dir: PathBuf,

    /// Start the API only.
    #[arg(long)]
    pub no_frontend: bool,

    /// Run the API with debug logging and external subsystems disabled.
    #[arg(long)]
    pub simulate: bool,

    /// Seconds to wait for each server to open its port.
    #[arg(long, default_value_t = 30)]
    pub ready_timeout: u64,
}

#[derive(Debug, Args)]
pub struct FrontendArgs {
    #[arg(long, env = "FRONTEND_DIR", default_value = "frontend")]
    pub dir: PathBuf,

    #[arg(long, env = "FRONTEND_PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// List databases on the server.
    List(DbSettings),

    /// Create the target database if it is missing.
    Create(DbSettings),

    /// Create the base tables and sample rows in the target database.
    CreateTables(DbSettings),
}

#[derive(Debug, Subcommand)]
pub enum DeployCommand {
    /// Write every descriptor into a directory.
    Generate {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the platform environment table.
    Env {
        /// Database endpoint to embed.
        #[arg(long, env = "DB_HOST", default_value = "<rds-endpoint>")]
        db_host: String,

        #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
        db_password: String,

        /// Print secret values instead of masking them.
        #[arg(long)]
        show_secrets: bool,
    },

    /// Print the deployment checklist.
    Instructions,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub api_port: u16,

    #[arg(long, env = "FRONTEND_PORT", default_value_t = 3000)]
    pub frontend_port: u16,
}
