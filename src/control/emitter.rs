use crate::control::types::MovementCommand;
use crate::remote::{MoveRequest, MovementSender};
use crate::status::StatusMonitor;
use crate::task::RepeatingTask;
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// What the emission loop sends on its next tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingCommand {
    current: Option<MovementCommand>,
    /// Command from a throttled sample; replaces `current` once `due` passes
    deferred: Option<(MovementCommand, Instant)>,
}

impl PendingCommand {
    /// Replace the command outright, discarding anything deferred
    pub fn set(&mut self, command: Option<MovementCommand>) {
        self.current = command;
        self.deferred = None;
    }

    /// Queue `command` to take over at `due`; a later deferral replaces it
    pub fn defer(&mut self, command: MovementCommand, due: Instant) {
        self.deferred = Some((command, due));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Command to send at `now`, promoting a deferred one that has come due
    pub fn due_at(&mut self, now: Instant) -> Option<MovementCommand> {
        if let Some((command, due)) = self.deferred {
            if now >= due {
                self.current = Some(command);
                self.deferred = None;
            }
        }
        self.current
    }
}

pub type CommandSlot = Arc<ParkingMutex<PendingCommand>>;

/// Sends started by the loop and not yet finished. `None` once the loop is
/// stopped, so a tick racing the stop cannot start another.
type InFlight = Arc<ParkingMutex<Option<JoinSet<()>>>>;

/// Handle to a running emission loop.
///
/// Dropping it stops the ticks and aborts every send still in flight.
pub struct EmissionLoop {
    ticker: RepeatingTask,
    in_flight: InFlight,
}

impl EmissionLoop {
    /// Stop the loop; equivalent to dropping the handle
    pub fn cancel(self) {}
}

impl Drop for EmissionLoop {
    fn drop(&mut self) {
        if let Some(mut sends) = self.in_flight.lock().take() {
            if !sends.is_empty() {
                tracing::debug!(
                    "{}: aborting {} in-flight sends",
                    self.ticker.name(),
                    sends.len()
                );
            }
            sends.abort_all();
        }
    }
}

/// Start re-sending the slot's command every `period`.
///
/// Ticks never wait on the network: each send runs as its own task, so a
/// slow server does not thin out the cadence. A failed send is logged and
/// recorded on the monitor, and the next tick is the retry. The slot and the
/// cancel flag are read under the same lock, so no tick starts a send once
/// the controller has cancelled the handle and cleared the slot.
pub fn spawn_emission_loop(
    sender: Arc<dyn MovementSender>,
    slot: CommandSlot,
    monitor: StatusMonitor,
    period: Duration,
) -> EmissionLoop {
    let in_flight: InFlight = Arc::new(ParkingMutex::new(Some(JoinSet::new())));
    let sends = in_flight.clone();

    let ticker = RepeatingTask::spawn("movement-emitter", period, move |cancelled| {
        let sender = sender.clone();
        let slot = slot.clone();
        let monitor = monitor.clone();
        let sends = sends.clone();
        async move {
            let command = {
                let mut pending = slot.lock();
                if cancelled.is_cancelled() {
                    return;
                }
                pending.due_at(Instant::now())
            };

            let Some(command) = command.filter(|c| c.intensity > 0) else {
                return;
            };

            tracing::debug!(
                "Movement command: {} at {}% ({:.1} deg)",
                command.direction,
                command.intensity,
                command.angle_degrees
            );

            let mut guard = sends.lock();
            let Some(sends) = guard.as_mut() else {
                return;
            };
            // reap finished sends
            while sends.try_join_next().is_some() {}

            sends.spawn(async move {
                match sender.send_move(&MoveRequest::from(command)).await {
                    Ok(state) => monitor.record_success(state),
                    Err(e) => {
                        tracing::warn!("Movement command error: {}", e);
                        monitor.record_failure(&e);
                    }
                }
            });
        }
    });

    EmissionLoop { ticker, in_flight }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::types::Direction;
    use crate::remote::{MemoryRobot, RemoteResult, RobotState, SentCommand};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn command(intensity: u8) -> MovementCommand {
        MovementCommand {
            direction: Direction::Left,
            intensity,
            angle_degrees: 180.0,
        }
    }

    fn slot_with(command: Option<MovementCommand>) -> CommandSlot {
        let mut pending = PendingCommand::default();
        pending.set(command);
        Arc::new(ParkingMutex::new(pending))
    }

    /// Answers every move after `latency`
    struct LaggingRobot {
        latency: Duration,
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    impl LaggingRobot {
        fn new(latency: Duration) -> Self {
            Self {
                latency,
                started: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MovementSender for LaggingRobot {
        async fn send_move(&self, _request: &MoveRequest) -> RemoteResult<RobotState> {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(RobotState::default())
        }

        async fn send_stop(&self) -> RemoteResult<RobotState> {
            Ok(RobotState::default())
        }
    }

    #[test]
    fn test_deferred_command_waits_for_its_due_time() {
        let start = Instant::now();
        let mut pending = PendingCommand::default();
        pending.set(Some(command(30)));
        pending.defer(command(80), start + Duration::from_millis(16));

        assert_eq!(pending.due_at(start), Some(command(30)));
        assert_eq!(pending.due_at(start + Duration::from_millis(16)), Some(command(80)));

        pending.defer(command(90), start + Duration::from_millis(40));
        pending.set(Some(command(10)));
        assert_eq!(pending.due_at(start + Duration::from_secs(1)), Some(command(10)));

        pending.clear();
        assert_eq!(pending.due_at(start + Duration::from_secs(1)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_slot_sends_nothing() {
        let robot = Arc::new(MemoryRobot::new());
        let slot = slot_with(None);
        let emission = spawn_emission_loop(robot.clone(), slot.clone(), StatusMonitor::new(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(robot.sent().is_empty());

        slot.lock().set(Some(command(0)));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(robot.sent().is_empty());

        emission.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_command_is_sent() {
        let robot = Arc::new(MemoryRobot::new());
        let slot = slot_with(Some(command(30)));
        let emission = spawn_emission_loop(robot.clone(), slot.clone(), StatusMonitor::new(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(10)).await;
        slot.lock().set(Some(command(80)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        emission.cancel();

        let sent = robot.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], SentCommand::Move(MoveRequest::from(command(30))));
        assert_eq!(sent[1], SentCommand::Move(MoveRequest::from(command(80))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_loop() {
        let robot = Arc::new(MemoryRobot::new());
        let monitor = StatusMonitor::new();
        let slot = slot_with(Some(command(50)));
        robot.set_offline(true);
        let emission = spawn_emission_loop(robot.clone(), slot, monitor.clone(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(monitor.snapshot().consecutive_failures, 3);

        robot.set_offline(false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        emission.cancel();

        assert_eq!(robot.move_count(), 1);
        assert_eq!(monitor.snapshot().consecutive_failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sends_keep_the_cadence() {
        let robot = Arc::new(LaggingRobot::new(Duration::from_millis(250)));
        let slot = slot_with(Some(command(60)));
        let emission = spawn_emission_loop(robot.clone(), slot, StatusMonitor::new(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let started = robot.started.load(Ordering::SeqCst);
        assert!((9..=11).contains(&started), "started {} sends", started);

        emission.cancel();
        let finished = robot.finished.load(Ordering::SeqCst);
        assert!(finished < started);

        // in-flight sends were aborted with the loop
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(robot.finished.load(Ordering::SeqCst), finished);
        assert_eq!(robot.started.load(Ordering::SeqCst), started);
    }
}
