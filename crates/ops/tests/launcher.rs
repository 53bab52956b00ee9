//! Integration tests for the process launcher.
//!
//! Child processes are plain `sh` commands, so these run on Unix only.

#![cfg(unix)]

use std::time::Duration;

use assert_matches::assert_matches;
use databridge_ops::launcher::{
    self, ApiLaunch, CommandLine, LaunchError, ManagedProcess, StopReason, Supervisor,
};
use tokio::net::TcpListener;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sh(script: &str) -> CommandLine {
    CommandLine {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
    }
}

/// A port that was free a moment ago.
async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

// ---------------------------------------------------------------------------
// Test: early exit is detected while waiting for the port
// ---------------------------------------------------------------------------

#[tokio::test]
async fn child_exiting_before_ready_is_reported() {
    let port = free_port().await;
    let mut process = ManagedProcess::spawn("API", port, &sh("exit 4"), &[]).unwrap();

    let err = process.wait_ready(Duration::from_secs(10)).await.unwrap_err();
    assert_matches!(err, LaunchError::ExitedEarly { name: "API", status, .. } if status.code() == Some(4));
}

// ---------------------------------------------------------------------------
// Test: a child that never opens its port times out and is killed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn silent_child_times_out() {
    let port = free_port().await;
    let mut process = ManagedProcess::spawn("API", port, &sh("sleep 30"), &[]).unwrap();

    let err = process.wait_ready(Duration::from_secs(1)).await.unwrap_err();
    assert_matches!(err, LaunchError::NotReady { timeout_secs: 1, .. });
    assert!(process.child.try_wait().unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: spawn failures name the program
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_program_fails_to_spawn() {
    let command = CommandLine::parse("API", "/nonexistent/databridge-api --flag").unwrap();
    let err = ManagedProcess::spawn("API", 1, &command, &[]).unwrap_err();
    assert_matches!(err, LaunchError::Spawn { ref program, .. } if program == "/nonexistent/databridge-api");
}

// ---------------------------------------------------------------------------
// Test: occupied ports are detected up front
// ---------------------------------------------------------------------------

#[tokio::test]
async fn occupied_port_fails_fast() {
    let listener = TcpListener::bind("0.0.0.0:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let err = launcher::ensure_ports_free(&[port]).await.unwrap_err();
    assert_matches!(err, LaunchError::PortInUse(p) if p == port);
}

// ---------------------------------------------------------------------------
// Test: start_api retries once on the fallback port
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_api_gives_up_after_fallback() {
    // Hold the first port while allocating the second so they differ.
    let primary = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = primary.local_addr().unwrap().port();
    let fallback = free_port().await;
    drop(primary);
    assert_ne!(port, fallback);

    let launch = ApiLaunch {
        command: sh("exit 1"),
        port,
        fallback_port: Some(fallback),
        simulate: false,
        ready_timeout: Duration::from_secs(5),
    };

    let err = launcher::start_api(&launch).await.unwrap_err();
    assert_matches!(err, LaunchError::ExitedEarly { port, .. } if Some(port) == launch.fallback_port);
}

// ---------------------------------------------------------------------------
// Test: supervisor stops when any child exits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn supervisor_returns_when_a_child_exits() {
    let mut supervisor = Supervisor::new();
    supervisor.add(ManagedProcess::spawn("API", 1, &sh("sleep 30"), &[]).unwrap());
    supervisor.add(ManagedProcess::spawn("frontend", 2, &sh("exit 0"), &[]).unwrap());
    assert_eq!(supervisor.len(), 2);

    let reason = tokio::time::timeout(Duration::from_secs(10), supervisor.run())
        .await
        .expect("supervisor should stop once a child exits");
    assert_matches!(reason, StopReason::ChildExited { name: "frontend", .. });
}
