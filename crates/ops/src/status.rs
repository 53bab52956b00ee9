//! Service status report.

use std::fmt;
use std::time::Duration;

use crate::probe;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Snapshot of the local services.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub api_url: String,
    pub api_open: bool,
    pub frontend_url: String,
    pub frontend_open: bool,
    /// `/api/v1/health` body, when the API answered.
    pub health: Option<serde_json::Value>,
}

/// Probe the API and frontend ports, and the API health endpoint when its
/// port is open.
pub async fn check(host: &str, api_port: u16, frontend_port: u16) -> StatusReport {
    let api_open = probe::is_port_open(host, api_port, PROBE_TIMEOUT).await;
    let frontend_open = probe::is_port_open(host, frontend_port, PROBE_TIMEOUT).await;
    let api_url = format!("http://{host}:{api_port}");

    let health = if api_open {
        let url = format!("{api_url}/api/v1/health");
        match probe::probe_health(&url, PROBE_TIMEOUT).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(%url, error = %e, "Health probe failed");
                None
            }
        }
    } else {
        None
    };

    StatusReport {
        api_url,
        api_open,
        frontend_url: format!("http://{host}:{frontend_port}"),
        frontend_open,
        health,
    }
}

fn up_down(open: bool) -> &'static str {
    if open {
        "up"
    } else {
        "down"
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "API       {:<4} {}", up_down(self.api_open), self.api_url)?;
        writeln!(
            f,
            "Frontend  {:<4} {}",
            up_down(self.frontend_open),
            self.frontend_url
        )?;
        if let Some(health) = &self.health {
            let pretty = serde_json::to_string_pretty(health).map_err(|_| fmt::Error)?;
            writeln!(f, "Health:\n{pretty}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_up_and_down() {
        let report = StatusReport {
            api_url: "http://127.0.0.1:8000".into(),
            api_open: true,
            frontend_url: "http://127.0.0.1:3000".into(),
            frontend_open: false,
            health: None,
        };
        let text = report.to_string();
        assert!(text.contains("API       up   http://127.0.0.1:8000"));
        assert!(text.contains("Frontend  down http://127.0.0.1:3000"));
    }
}
