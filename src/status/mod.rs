//! Robot status and connectivity tracking
//!
//! Every response from the server carries the robot state; whichever lands
//! last wins. Responses are not correlated with the commands that caused
//! them, so a stale state can briefly overwrite a newer one.

pub mod poller;

pub use poller::spawn_status_poller;

use crate::remote::{RemoteError, RobotState};
use chrono::{DateTime, Utc};
use parking_lot::Mutex as ParkingMutex;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Unknown,
    Connected,
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Unknown => write!(f, "unknown"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub connection: ConnectionStatus,
    pub robot: Option<RobotState>,
    pub last_update: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::Unknown,
            robot: None,
            last_update: None,
            consecutive_failures: 0,
            last_error: None,
        }
    }
}

/// Shared sink for robot state and connectivity; cheap to clone
#[derive(Debug, Clone, Default)]
pub struct StatusMonitor {
    inner: Arc<ParkingMutex<StatusSnapshot>>,
}

impl StatusMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, state: RobotState) {
        let mut snapshot = self.inner.lock();
        if snapshot.connection != ConnectionStatus::Connected {
            tracing::info!("Robot server connected");
        }
        snapshot.connection = ConnectionStatus::Connected;
        snapshot.robot = Some(state);
        snapshot.last_update = Some(Utc::now());
        snapshot.consecutive_failures = 0;
        snapshot.last_error = None;
    }

    pub fn record_failure(&self, error: &RemoteError) {
        let mut snapshot = self.inner.lock();
        if snapshot.connection != ConnectionStatus::Disconnected {
            tracing::warn!("Connection error - check server status: {}", error);
        }
        snapshot.connection = ConnectionStatus::Disconnected;
        snapshot.consecutive_failures = snapshot.consecutive_failures.saturating_add(1);
        snapshot.last_error = Some(error.to_string());
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.inner.lock().connection
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown() {
        let monitor = StatusMonitor::new();
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.connection, ConnectionStatus::Unknown);
        assert!(snapshot.robot.is_none());
        assert!(snapshot.last_update.is_none());
    }

    #[test]
    fn test_failures_degrade_and_success_recovers() {
        let monitor = StatusMonitor::new();
        let error = RemoteError::Unreachable("down".to_string());

        monitor.record_failure(&error);
        monitor.record_failure(&error);
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.connection, ConnectionStatus::Disconnected);
        assert_eq!(snapshot.consecutive_failures, 2);
        assert_eq!(snapshot.last_error.as_deref(), Some("Robot unreachable: down"));

        let state = RobotState {
            heading: 90.0,
            ..RobotState::default()
        };
        monitor.record_success(state);
        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.connection, ConnectionStatus::Connected);
        assert_eq!(snapshot.consecutive_failures, 0);
        assert!(snapshot.last_error.is_none());
        assert_eq!(snapshot.robot.map(|r| r.heading), Some(90.0));
        assert!(snapshot.last_update.is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let monitor = StatusMonitor::new();
        let other = monitor.clone();
        other.record_success(RobotState::default());
        assert_eq!(monitor.connection(), ConnectionStatus::Connected);
    }
}
