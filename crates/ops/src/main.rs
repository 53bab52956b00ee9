//! `databridge-ops` -- operations tooling for DataBridge.
//!
//! # Environment variables
//!
//! | Variable             | Default           | Used by                      |
//! |----------------------|-------------------|------------------------------|
//! | `DATABRIDGE_API_CMD` | `databridge-api`  | `start`                      |
//! | `API_PORT`           | `8000`            | `start`, `status`            |
//! | `FRONTEND_PORT`      | `3000`            | `start`, `serve-frontend`    |
//! | `FRONTEND_DIR`       | `frontend`        | `start`, `serve-frontend`    |
//! | `DATABASE_URL`       | --                | `diagnose`, `db`             |
//! | `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` | see `--help` | `diagnose`, `db`, `deploy env` |
//! | `CONNECTION_TIMEOUT` | `30`              | `diagnose`, `db`             |

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use databridge_core::deploy::{self, DeploymentConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use databridge_ops::cli::{Cli, Command, DbCommand, DeployCommand, StartArgs};
use databridge_ops::launcher::{self, ApiLaunch, CommandLine, StopReason, Supervisor};
use databridge_ops::{diagnostics, frontend, status};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "databridge_ops=info".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let cli = Cli::parse();

    if let Err(err) = run(cli.command).await {
        tracing::error!(error = %format!("{err:#}"), "Command failed");
        eprintln!("Error: {err:#}");
        if let Some(diag) = err.downcast_ref::<diagnostics::DiagnosticError>() {
            for hint in diag.hints() {
                eprintln!("  - {hint}");
            }
        }
        std::process::exit(1);
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Start(args) => start(args).await,
        Command::ServeFrontend(args) => {
            frontend::serve(&args.dir, &args.host, args.port)
                .await
                .context("Frontend server failed")
        }
        Command::Diagnose(settings) => {
            tracing::debug!(?settings, "Running diagnosis");
            let report = diagnostics::diagnose(&settings).await;
            for step in &report.steps {
                println!("{step}");
            }
            anyhow::ensure!(report.passed(), "Diagnosis found problems");
            println!("All checks passed");
            Ok(())
        }
        Command::Db { action } => db(action).await,
        Command::Deploy { action } => deploy_command(action),
        Command::Status(args) => {
            let report = status::check(&args.host, args.api_port, args.frontend_port).await;
            print!("{report}");
            Ok(())
        }
    }
}

async fn start(args: StartArgs) -> anyhow::Result<()> {
    let ready_timeout = Duration::from_secs(args.ready_timeout);
    let launch = ApiLaunch {
        command: CommandLine::parse("API", &args.api_cmd)?,
        port: args.api_port,
        fallback_port: Some(args.fallback_port),
        simulate: args.simulate,
        ready_timeout,
    };

    let mut ports = vec![args.api_port];
    if !args.no_frontend {
        frontend::check_dir(&args.frontend_dir)?;
        ports.push(args.frontend_port);
    }
    launcher::ensure_ports_free(&ports).await?;

    let mut supervisor = Supervisor::new();

    let api = launcher::start_api(&launch).await?;
    let api_port = api.port;
    supervisor.add(api);

    if !args.no_frontend {
        match launcher::start_frontend(&args.frontend_dir, args.frontend_port, ready_timeout).await {
            Ok(process) => supervisor.add(process),
            Err(e) => {
                supervisor.stop_all().await;
                return Err(e).context("Frontend failed to start");
            }
        }
    }

    println!("DataBridge is running:");
    println!("  API:          http://127.0.0.1:{api_port}");
    println!("  Health check: http://127.0.0.1:{api_port}/api/v1/health");
    if !args.no_frontend {
        println!("  Frontend:     http://127.0.0.1:{}", args.frontend_port);
    }
    if args.simulate {
        println!("  (simulation mode: external subsystems disabled)");
    }
    println!("Press Ctrl-C to stop.");

    match supervisor.run().await {
        StopReason::Signal => Ok(()),
        StopReason::ChildExited { name, status } => {
            let status = status.map_or_else(|| "unknown status".to_string(), |s| s.to_string());
            anyhow::bail!("{name} exited unexpectedly ({status}); all processes stopped")
        }
    }
}

async fn db(action: DbCommand) -> anyhow::Result<()> {
    match action {
        DbCommand::List(settings) => {
            for name in diagnostics::list_databases(&settings).await? {
                println!("{name}");
            }
        }
        DbCommand::Create(settings) => {
            let name = settings.target_database();
            if diagnostics::create_database(&settings).await? {
                println!("Database '{name}' created and verified");
            } else {
                println!("Database '{name}' already exists; connection verified");
            }
        }
        DbCommand::CreateTables(settings) => {
            for (table, count) in diagnostics::create_tables(&settings).await? {
                println!("{table:<14} {count} rows");
            }
        }
    }
    Ok(())
}

fn deploy_command(action: DeployCommand) -> anyhow::Result<()> {
    let config = DeploymentConfig::default();
    match action {
        DeployCommand::Generate { out_dir } => {
            let written = databridge_ops::deploy::write_descriptors(&config, &out_dir)
                .with_context(|| format!("Failed to write descriptors to {}", out_dir.display()))?;
            for path in written {
                println!("{}", path.display());
            }
        }
        DeployCommand::Env {
            db_host,
            db_password,
            show_secrets,
        } => {
            let vars = deploy::platform_env_vars(&config, &db_host, &db_password);
            let vars = if show_secrets {
                vars
            } else {
                deploy::mask_sensitive(&vars)
            };
            print!("{}", databridge_ops::deploy::format_env_table(&vars));
        }
        DeployCommand::Instructions => print!("{}", deploy::instructions(&config)),
    }
    Ok(())
}
