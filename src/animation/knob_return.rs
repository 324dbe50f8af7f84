use crate::animation::spring::{KnobSpring, SpringConfig};
use crate::control::types::PointerOffset;
use std::time::Duration;
use tokio::time::Instant;

/// Simulation rate for the return spring
const FRAME_RATE: f64 = 60.0;

/// Below this the knob is drawn at center
const SETTLE_THRESHOLD_PX: f64 = 0.5;

/// Cosmetic ease of the knob back to center after release.
///
/// Hard-capped at `duration`: from then on the knob is exactly at center,
/// whatever the spring is doing.
#[derive(Debug, Clone, Copy)]
pub struct KnobReturn {
    from: PointerOffset,
    started_at: Instant,
    duration: Duration,
    spring: SpringConfig,
}

impl KnobReturn {
    pub fn start(from: PointerOffset, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            started_at,
            duration,
            spring: SpringConfig::default(),
        }
    }

    /// Knob position `now`, replaying the spring from the release point
    pub fn position_at(&self, now: Instant) -> PointerOffset {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            return PointerOffset::ZERO;
        }

        let frames = (elapsed.as_secs_f64() * FRAME_RATE).floor() as u32;
        let mut spring = KnobSpring::new(self.from);
        for _ in 0..frames {
            spring.step(PointerOffset::ZERO, &self.spring, 1.0 / FRAME_RATE);
            if spring.is_settled(PointerOffset::ZERO, SETTLE_THRESHOLD_PX) {
                return PointerOffset::ZERO;
            }
        }
        spring.position()
    }
}
