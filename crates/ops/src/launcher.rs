//! Process launcher for the API and frontend servers.
//!
//! Children are spawned with `kill_on_drop(true)` so dropping a
//! [`ManagedProcess`] (or the whole [`Supervisor`]) terminates it.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::probe::{self, WaitOutcome, DEFAULT_POLL_INTERVAL};

/// Host used to poll locally spawned servers.
pub const LOCAL_HOST: &str = "127.0.0.1";

/// Errors raised while starting or supervising child processes.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Port {0} is already in use")]
    PortInUse(u16),

    #[error("Empty command line for {0}")]
    EmptyCommand(&'static str),

    #[error("Failed to start {name} ({program}): {source}")]
    Spawn {
        name: &'static str,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} exited before opening port {port} ({status})")]
    ExitedEarly {
        name: &'static str,
        port: u16,
        status: ExitStatus,
    },

    #[error("{name} did not open port {port} within {timeout_secs}s")]
    NotReady {
        name: &'static str,
        port: u16,
        timeout_secs: u64,
    },
}

/// Environment applied to the API child in simulation mode.
///
/// Only variables `databridge-api` reads belong here.
pub const SIMULATION_ENV: [(&str, &str); 3] = [
    ("DEBUG_MODE", "true"),
    ("MONGODB_ENABLED", "false"),
    ("KAFKA_ENABLED", "false"),
];

/// A command line split into program and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split `raw` on whitespace. No shell is involved, so quoting and
    /// expansion are not supported.
    pub fn parse(name: &'static str, raw: &str) -> Result<Self, LaunchError> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(LaunchError::EmptyCommand(name))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// A running child owned by the launcher.
#[derive(Debug)]
pub struct ManagedProcess {
    pub name: &'static str,
    pub port: u16,
    pub child: Child,
}

impl ManagedProcess {
    /// Spawn `command` with `env` added to the inherited environment.
    pub fn spawn(
        name: &'static str,
        port: u16,
        command: &CommandLine,
        env: &[(String, String)],
    ) -> Result<Self, LaunchError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            name,
            program: command.program.clone(),
            source,
        })?;

        tracing::info!(name, port, pid = child.id(), program = %command.program, "Process started");
        Ok(Self { name, port, child })
    }

    /// Wait until the process opens its port, exits, or `timeout` elapses.
    ///
    /// On failure the child is killed before the error is returned.
    pub async fn wait_ready(&mut self, timeout: Duration) -> Result<(), LaunchError> {
        let outcome = probe::wait_for_port(
            LOCAL_HOST,
            self.port,
            timeout,
            DEFAULT_POLL_INTERVAL,
            Some(&mut self.child),
        )
        .await;

        match outcome {
            WaitOutcome::Ready => {
                tracing::info!(name = self.name, port = self.port, "Process ready");
                Ok(())
            }
            WaitOutcome::ChildExited(status) => Err(LaunchError::ExitedEarly {
                name: self.name,
                port: self.port,
                status,
            }),
            WaitOutcome::TimedOut => {
                self.stop().await;
                Err(LaunchError::NotReady {
                    name: self.name,
                    port: self.port,
                    timeout_secs: timeout.as_secs(),
                })
            }
        }
    }

    /// Kill the process and reap it.
    pub async fn stop(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(e) => tracing::warn!(name = self.name, error = %e, "Failed to poll process"),
        }
        if let Err(e) = self.child.kill().await {
            tracing::warn!(name = self.name, error = %e, "Failed to kill process");
        } else {
            tracing::info!(name = self.name, "Process stopped");
        }
    }
}

/// What to run for the API server.
#[derive(Debug, Clone)]
pub struct ApiLaunch {
    pub command: CommandLine,
    pub port: u16,
    /// Tried once when the API fails to come up on `port`.
    pub fallback_port: Option<u16>,
    pub simulate: bool,
    pub ready_timeout: Duration,
}

impl ApiLaunch {
    /// Environment for an API child bound to `port`.
    pub fn env_for(&self, port: u16) -> Vec<(String, String)> {
        let mut env = vec![("PORT".to_string(), port.to_string())];
        if self.simulate {
            env.extend(
                SIMULATION_ENV
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string())),
            );
        }
        env
    }
}

/// Start the API and wait for it, retrying once on the fallback port.
pub async fn start_api(launch: &ApiLaunch) -> Result<ManagedProcess, LaunchError> {
    match spawn_and_wait("API", launch, launch.port).await {
        Ok(process) => Ok(process),
        Err(first) => {
            let Some(fallback) = launch.fallback_port.filter(|p| *p != launch.port) else {
                return Err(first);
            };
            tracing::warn!(error = %first, fallback, "API failed to start, retrying on fallback port");
            spawn_and_wait("API", launch, fallback).await
        }
    }
}

async fn spawn_and_wait(
    name: &'static str,
    launch: &ApiLaunch,
    port: u16,
) -> Result<ManagedProcess, LaunchError> {
    if !probe::is_port_free(port).await {
        return Err(LaunchError::PortInUse(port));
    }
    let mut process = ManagedProcess::spawn(name, port, &launch.command, &launch.env_for(port))?;
    process.wait_ready(launch.ready_timeout).await?;
    Ok(process)
}

/// Start the frontend server by re-invoking this executable's
/// `serve-frontend` subcommand.
pub async fn start_frontend(
    dir: &Path,
    port: u16,
    ready_timeout: Duration,
) -> Result<ManagedProcess, LaunchError> {
    if !probe::is_port_free(port).await {
        return Err(LaunchError::PortInUse(port));
    }
    let exe = std::env::current_exe().map_err(|source| LaunchError::Spawn {
        name: "frontend",
        program: "databridge-ops".to_string(),
        source,
    })?;
    let command = CommandLine {
        program: exe.to_string_lossy().into_owned(),
        args: vec![
            "serve-frontend".to_string(),
            "--dir".to_string(),
            dir.to_string_lossy().into_owned(),
            "--port".to_string(),
            port.to_string(),
        ],
    };

    let mut process = ManagedProcess::spawn("frontend", port, &command, &[])?;
    process.wait_ready(ready_timeout).await?;
    Ok(process)
}

/// Fail fast if any of `ports` is already taken.
pub async fn ensure_ports_free(ports: &[u16]) -> Result<(), LaunchError> {
    for &port in ports {
        if !probe::is_port_free(port).await {
            return Err(LaunchError::PortInUse(port));
        }
    }
    Ok(())
}

/// Why supervision ended.
#[derive(Debug)]
pub enum StopReason {
    Signal,
    ChildExited {
        name: &'static str,
        status: Option<ExitStatus>,
    },
}

/// Owns every started process and stops them together.
#[derive(Debug, Default)]
pub struct Supervisor {
    processes: Vec<ManagedProcess>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, process: ManagedProcess) {
        self.processes.push(process);
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Block until a shutdown signal arrives or any child exits, then stop
    /// every process.
    pub async fn run(mut self) -> StopReason {
        let reason = tokio::select! {
            () = shutdown_signal() => StopReason::Signal,
            reason = self.first_exit() => reason,
        };
        self.stop_all().await;
        reason
    }

    /// Resolve when any managed process exits.
    async fn first_exit(&mut self) -> StopReason {
        if self.processes.is_empty() {
            return std::future::pending().await;
        }
        loop {
            for process in &mut self.processes {
                match process.child.try_wait() {
                    Ok(Some(status)) => {
                        return StopReason::ChildExited {
                            name: process.name,
                            status: Some(status),
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(name = process.name, error = %e, "Failed to poll process");
                        return StopReason::ChildExited {
                            name: process.name,
                            status: None,
                        };
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    pub async fn stop_all(&mut self) {
        for process in self.processes.iter_mut().rev() {
            process.stop().await;
        }
    }
}

/// Resolve on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), stopping processes"),
        () = terminate => tracing::info!("Received SIGTERM, stopping processes"),
    }
}
