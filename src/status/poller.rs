use crate::remote::RobotControl;
use crate::status::StatusMonitor;
use crate::task::RepeatingTask;
use std::sync::Arc;
use std::time::Duration;

/// Poll `/api/status` every `interval`, feeding the monitor.
///
/// Failures are recorded and the next tick simply tries again.
pub fn spawn_status_poller(
    control: Arc<dyn RobotControl>,
    monitor: StatusMonitor,
    interval: Duration,
) -> RepeatingTask {
    RepeatingTask::spawn("status-poller", interval, move |_| {
        let control = control.clone();
        let monitor = monitor.clone();
        async move {
            match control.fetch_status().await {
                Ok(state) => monitor.record_success(state),
                Err(e) => {
                    tracing::debug!("Status poll failed: {}", e);
                    monitor.record_failure(&e);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRobot;
    use crate::status::ConnectionStatus;

    #[tokio::test(start_paused = true)]
    async fn test_poller_tracks_outage_and_recovery() {
        let robot = Arc::new(MemoryRobot::new());
        let monitor = StatusMonitor::new();
        let poller = spawn_status_poller(robot.clone(), monitor.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(monitor.connection(), ConnectionStatus::Connected);

        robot.set_offline(true);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(monitor.connection(), ConnectionStatus::Disconnected);
        assert!(monitor.snapshot().consecutive_failures >= 1);

        robot.set_offline(false);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(monitor.connection(), ConnectionStatus::Connected);

        poller.cancel();
    }
}
