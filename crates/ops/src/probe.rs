//! Port and health probes.

use std::process::ExitStatus;
use std::time::{Duration, Instant};

use tokio::net::{TcpListener, TcpStream};
use tokio::process::Child;

/// Default time allowed for a server to open its port.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between port checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Waiting progress is logged this often.
const PROGRESS_EVERY: Duration = Duration::from_secs(5);

/// Timeout for a single connection attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// How a [`wait_for_port`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
    /// The watched child exited before the port opened.
    ChildExited(ExitStatus),
}

/// Whether something accepts TCP connections on `host:port`.
pub async fn is_port_open(host: &str, port: u16, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

/// Whether `port` can be bound on all interfaces.
pub async fn is_port_free(port: u16) -> bool {
    TcpListener::bind(("0.0.0.0", port)).await.is_ok()
}

/// Poll `host:port` every `interval` until it accepts connections or
/// `timeout` elapses.
///
/// When `child` is given, its exit ends the wait early.
pub async fn wait_for_port(
    host: &str,
    port: u16,
    timeout: Duration,
    interval: Duration,
    mut child: Option<&mut Child>,
) -> WaitOutcome {
    let start = Instant::now();
    let mut last_progress = start;

    loop {
        if is_port_open(host, port, CONNECT_TIMEOUT).await {
            tracing::debug!(port, elapsed_ms = start.elapsed().as_millis() as u64, "Port open");
            return WaitOutcome::Ready;
        }

        if let Some(child) = child.as_deref_mut() {
            match child.try_wait() {
                Ok(Some(status)) => return WaitOutcome::ChildExited(status),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Failed to poll child status"),
            }
        }

        if start.elapsed() >= timeout {
            return WaitOutcome::TimedOut;
        }

        if last_progress.elapsed() >= PROGRESS_EVERY {
            tracing::info!(
                port,
                waited_secs = start.elapsed().as_secs(),
                timeout_secs = timeout.as_secs(),
                "Still waiting for port"
            );
            last_progress = Instant::now();
        }

        tokio::time::sleep(interval).await;
    }
}

/// GET `url` and return its JSON body.
pub async fn probe_health(url: &str, timeout: Duration) -> Result<serde_json::Value, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_port_is_detected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(is_port_open("127.0.0.1", port, Duration::from_secs(1)).await);
        assert!(!is_port_free(port).await);
    }

    #[tokio::test]
    async fn closed_port_times_out() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let outcome = wait_for_port(
            "127.0.0.1",
            port,
            Duration::from_millis(300),
            Duration::from_millis(100),
            None,
        )
        .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test]
    async fn port_opened_later_is_ready() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let server = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
            let _ = listener.accept().await;
        });

        let outcome = wait_for_port(
            "127.0.0.1",
            port,
            Duration::from_secs(5),
            Duration::from_millis(50),
            None,
        )
        .await;
        assert_eq!(outcome, WaitOutcome::Ready);
        server.abort();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exited_child_ends_wait_early() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut child = tokio::process::Command::new("sh")
            .args(["-c", "exit 3"])
            .spawn()
            .unwrap();

        let outcome = wait_for_port(
            "127.0.0.1",
            port,
            Duration::from_secs(10),
            Duration::from_millis(50),
            Some(&mut child),
        )
        .await;
        assert!(matches!(outcome, WaitOutcome::ChildExited(status) if status.code() == Some(3)));
    }
}
