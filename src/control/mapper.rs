//! Joystick geometry: offset clamping, direction sectors and intensity scaling
//!
//! Everything here is pure math on host coordinates. Screen y grows downward,
//! so angles are measured on `-dy` to make "up" read as 90 degrees.

use crate::control::types::{
    Direction, DirectionResult, PointerOffset, PointerSample, SectorScheme, ZoneRect,
};

/// Half-open `[min, max)` sectors for the 8-way scheme, centered on the axes
static EIGHT_WAY_SECTORS: [(f64, f64, Direction); 9] = [
    (0.0, 22.5, Direction::Right),
    (22.5, 67.5, Direction::ForwardRight),
    (67.5, 112.5, Direction::Forward),
    (112.5, 157.5, Direction::ForwardLeft),
    (157.5, 202.5, Direction::Left),
    (202.5, 247.5, Direction::BackwardLeft),
    (247.5, 292.5, Direction::Backward),
    (292.5, 337.5, Direction::BackwardRight),
    (337.5, 360.0, Direction::Right),
];

/// Half-open `[min, max)` sectors for the 4-way scheme, centered on the axes
static FOUR_WAY_SECTORS: [(f64, f64, Direction); 5] = [
    (0.0, 45.0, Direction::Right),
    (45.0, 135.0, Direction::Forward),
    (135.0, 225.0, Direction::Left),
    (225.0, 315.0, Direction::Backward),
    (315.0, 360.0, Direction::Right),
];

impl SectorScheme {
    pub fn sectors(&self) -> &'static [(f64, f64, Direction)] {
        match self {
            SectorScheme::EightWay => &EIGHT_WAY_SECTORS,
            SectorScheme::FourWay => &FOUR_WAY_SECTORS,
        }
    }
}

/// Live joystick geometry, derived from the base's layout rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub base_radius: f64,
    pub knob_radius: f64,
}

impl JoystickGeometry {
    pub fn from_rect(rect: &ZoneRect, knob_radius: f64) -> Self {
        Self {
            center_x: rect.left + rect.width / 2.0,
            center_y: rect.top + rect.height / 2.0,
            base_radius: rect.width / 2.0,
            knob_radius,
        }
    }

    /// Clamp radius R: how far the knob center may travel
    pub fn max_distance(&self) -> f64 {
        self.base_radius - self.knob_radius
    }

    /// Zero-sized or too-small zones cannot produce a direction
    pub fn is_degenerate(&self) -> bool {
        let r = self.max_distance();
        !(r.is_finite() && r > 0.0)
    }

    /// Unclamped offset of a sample from the zone center
    pub fn offset_of(&self, sample: &PointerSample) -> PointerOffset {
        PointerOffset::new(sample.x - self.center_x, sample.y - self.center_y)
    }

    /// Host coordinates of a knob offset
    pub fn sample_at(&self, offset: &PointerOffset) -> PointerSample {
        PointerSample::new(self.center_x + offset.dx, self.center_y + offset.dy)
    }
}

/// Cap an offset's magnitude at `max_distance` by rescaling along its angle.
///
/// Scaling both axes by the same factor keeps `atan2` unchanged, which a
/// per-axis clip would not.
pub fn clamp_offset(offset: PointerOffset, max_distance: f64) -> PointerOffset {
    if !(max_distance > 0.0) {
        return PointerOffset::ZERO;
    }

    let magnitude = offset.magnitude();
    if magnitude <= max_distance {
        return offset;
    }

    let scale = max_distance / magnitude;
    PointerOffset::new(offset.dx * scale, offset.dy * scale)
}

/// Angle of an offset in degrees, normalized to [0, 360)
pub fn offset_angle(dx: f64, dy: f64) -> f64 {
    let angle = (-dy).atan2(dx).to_degrees().rem_euclid(360.0);
    // rem_euclid can round tiny negative angles up to exactly 360
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}

/// Classify an offset into a direction sector
pub fn classify_direction(dx: f64, dy: f64, scheme: SectorScheme) -> DirectionResult {
    let angle = offset_angle(dx, dy);
    let direction = scheme
        .sectors()
        .iter()
        .find(|(min, max, _)| angle >= *min && angle < *max)
        .map(|(_, _, direction)| *direction)
        // unreachable: sectors cover [0, 360)
        .unwrap_or(Direction::Right);

    DirectionResult {
        direction,
        angle_degrees: angle,
    }
}

/// Map a deflection magnitude to an integer percent.
///
/// Returns 0 inside the dead zone and rescales the remainder so the output is
/// exactly 0 at the dead-zone edge and exactly 100 at full deflection.
pub fn compute_intensity(magnitude: f64, max_distance: f64, dead_zone: f64) -> u8 {
    if !(max_distance > 0.0) || !magnitude.is_finite() {
        return 0;
    }

    let normalized = magnitude / max_distance;
    if normalized < dead_zone {
        return 0;
    }

    let span = (1.0 - dead_zone).max(f64::EPSILON);
    let scaled = 100.0 * (normalized - dead_zone) / span;
    scaled.round().clamp(0.0, 100.0) as u8
}

/// Inverse of [`compute_intensity`]: the offset that produces `intensity`
/// toward `direction`'s sector center.
pub fn deflection_for(
    direction: Direction,
    intensity: u8,
    max_distance: f64,
    dead_zone: f64,
) -> PointerOffset {
    if intensity == 0 || !(max_distance > 0.0) {
        return PointerOffset::ZERO;
    }

    let fraction = f64::from(intensity.min(100)) / 100.0;
    let normalized = dead_zone + (1.0 - dead_zone) * fraction;
    let magnitude = normalized * max_distance;
    let radians = direction.center_angle().to_radians();

    PointerOffset::new(magnitude * radians.cos(), -magnitude * radians.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_clamp_preserves_angle_and_caps_magnitude() {
        let raws = [
            PointerOffset::new(300.0, 0.0),
            PointerOffset::new(-120.0, 95.0),
            PointerOffset::new(61.0, -61.0),
            PointerOffset::new(-0.5, -400.0),
        ];

        for raw in raws {
            let clamped = clamp_offset(raw, 60.0);
            assert!(
                (clamped.magnitude() - 60.0).abs() < EPS,
                "magnitude {} should be 60",
                clamped.magnitude()
            );
            let raw_angle = raw.dy.atan2(raw.dx);
            let clamped_angle = clamped.dy.atan2(clamped.dx);
            assert!(
                (raw_angle - clamped_angle).abs() < EPS,
                "angle {} should equal {}",
                clamped_angle,
                raw_angle
            );
        }
    }

    #[test]
    fn test_clamp_leaves_inner_offsets_alone() {
        let inner = PointerOffset::new(10.0, -20.0);
        assert_eq!(clamp_offset(inner, 60.0), inner);
    }

    #[test]
    fn test_clamp_with_degenerate_radius() {
        assert_eq!(
            clamp_offset(PointerOffset::new(5.0, 5.0), 0.0),
            PointerOffset::ZERO
        );
        assert_eq!(
            clamp_offset(PointerOffset::new(5.0, 5.0), -10.0),
            PointerOffset::ZERO
        );
    }

    #[test]
    fn test_intensity_edges() {
        assert_eq!(compute_intensity(0.15 * 60.0, 60.0, 0.15), 0);
        assert_eq!(compute_intensity(60.0, 60.0, 0.15), 100);
        assert_eq!(compute_intensity(0.0, 60.0, 0.15), 0);
        assert_eq!(compute_intensity(5.0, 60.0, 0.15), 0);
    }

    #[test]
    fn test_intensity_midpoint_is_rescaled() {
        // halfway between the dead-zone edge and full deflection
        let magnitude = (0.15 + 0.85 / 2.0) * 60.0;
        assert_eq!(compute_intensity(magnitude, 60.0, 0.15), 50);
    }

    #[test]
    fn test_intensity_without_dead_zone() {
        assert_eq!(compute_intensity(30.0, 60.0, 0.0), 50);
        assert_eq!(compute_intensity(90.0, 60.0, 0.0), 100);
    }

    #[test]
    fn test_intensity_degenerate_radius() {
        assert_eq!(compute_intensity(10.0, 0.0, 0.15), 0);
        assert_eq!(compute_intensity(10.0, -5.0, 0.15), 0);
    }

    #[test]
    fn test_four_way_axes() {
        let scheme = SectorScheme::FourWay;
        assert_eq!(classify_direction(10.0, 0.0, scheme).direction, Direction::Right);
        assert_eq!(classify_direction(0.0, -10.0, scheme).direction, Direction::Forward);
        assert_eq!(classify_direction(-10.0, 0.0, scheme).direction, Direction::Left);
        assert_eq!(classify_direction(0.0, 10.0, scheme).direction, Direction::Backward);
    }

    #[test]
    fn test_eight_way_axes_and_diagonals() {
        let scheme = SectorScheme::EightWay;
        for direction in Direction::ALL {
            let radians = direction.center_angle().to_radians();
            let result = classify_direction(radians.cos() * 50.0, -radians.sin() * 50.0, scheme);
            assert_eq!(result.direction, direction, "at {}", direction.center_angle());
        }
    }

    #[test]
    fn test_angle_is_normalized() {
        let result = classify_direction(10.0, 0.0, SectorScheme::EightWay);
        assert_eq!(result.angle_degrees, 0.0);

        let below = classify_direction(10.0, 1e-12, SectorScheme::EightWay);
        assert!(below.angle_degrees >= 0.0 && below.angle_degrees < 360.0);
        assert_eq!(below.direction, Direction::Right);
    }

    #[test]
    fn test_sectors_partition_full_circle() {
        for scheme in [SectorScheme::EightWay, SectorScheme::FourWay] {
            let sectors = scheme.sectors();
            assert_eq!(sectors.first().map(|s| s.0), Some(0.0));
            assert_eq!(sectors.last().map(|s| s.1), Some(360.0));
            for pair in sectors.windows(2) {
                assert_eq!(pair[0].1, pair[1].0, "gap or overlap in {:?}", scheme);
            }

            // every tenth of a degree lands in exactly one sector
            for tenth in 0..3600 {
                let angle = f64::from(tenth) / 10.0;
                let hits = sectors
                    .iter()
                    .filter(|(min, max, _)| angle >= *min && angle < *max)
                    .count();
                assert_eq!(hits, 1, "angle {} in {:?}", angle, scheme);
            }
        }
    }

    #[test]
    fn test_boundary_belongs_to_upper_sector() {
        let radians = 22.5f64.to_radians();
        let result = classify_direction(radians.cos(), -radians.sin(), SectorScheme::EightWay);
        // floating error may land a hair either side of 22.5
        assert!(matches!(
            result.direction,
            Direction::Right | Direction::ForwardRight
        ));

        let result = classify_direction(0.0, -1.0, SectorScheme::FourWay);
        assert_eq!(result.direction, Direction::Forward);
    }

    #[test]
    fn test_geometry_from_rect() {
        let geometry = JoystickGeometry::from_rect(&ZoneRect::new(10.0, 20.0, 200.0, 200.0), 40.0);
        assert_eq!(geometry.center_x, 110.0);
        assert_eq!(geometry.center_y, 120.0);
        assert_eq!(geometry.max_distance(), 60.0);
        assert!(!geometry.is_degenerate());

        let tiny = JoystickGeometry::from_rect(&ZoneRect::new(0.0, 0.0, 0.0, 0.0), 40.0);
        assert!(tiny.is_degenerate());
    }

    #[test]
    fn test_deflection_round_trips_through_intensity() {
        let offset = deflection_for(Direction::ForwardLeft, 70, 60.0, 0.15);
        assert_eq!(compute_intensity(offset.magnitude(), 60.0, 0.15), 70);
        assert_eq!(
            classify_direction(offset.dx, offset.dy, SectorScheme::EightWay).direction,
            Direction::ForwardLeft
        );
    }
}
