//! Gyro heading integration.
//!
//! Raw gyro counts are rates, not angles: each sample is scaled to degrees
//! per second, multiplied by the time since the previous sample, and
//! accumulated per axis in radians with a centered wraparound.

use std::f32::consts::PI;

/// Full scale of the device gyro, in degrees per second.
pub const DEFAULT_FULL_SCALE_DPS: f32 = 245.0;

/// Raw i16 counts corresponding to one full-scale deflection.
const COUNTS_PER_FULL_SCALE: f32 = 32_768.0;

/// Converts a raw gyro count to degrees per second at the given full scale.
pub fn degrees_per_second(raw: i16, full_scale_dps: f32) -> f32 {
    full_scale_dps * f32::from(raw) / COUNTS_PER_FULL_SCALE
}

/// Accumulated heading per gyro axis, in radians, each kept within (-π, π].
///
/// The integrator is stateless with respect to time; callers supply the
/// delta between consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    heading: [f32; 3],
}

impl Orientation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrates one gyro sample over `dt_seconds`.
    ///
    /// Each axis advances by its rate times `dt_seconds`, converted to
    /// radians, then re-normalizes with a signed remainder against π. The
    /// wrap is centered: positive and negative overflow fold symmetrically,
    /// never into [0, 2π).
    pub fn update(&mut self, gyro: [i16; 3], full_scale_dps: f32, dt_seconds: f32) {
        for (heading, raw) in self.heading.iter_mut().zip(gyro) {
            let increment = (degrees_per_second(raw, full_scale_dps) * dt_seconds).to_radians();
            *heading = wrap_signed(*heading + increment, PI);
        }
    }

    /// Heading per axis, radians.
    pub fn heading(&self) -> [f32; 3] {
        self.heading
    }

    /// Zeroes every axis.
    pub fn reset(&mut self) {
        self.heading = [0.0; 3];
    }
}

/// Signed remainder: the result differs from `value` by an integer multiple
/// of `modulus` and has magnitude at most `modulus / 2`.
fn wrap_signed(value: f32, modulus: f32) -> f32 {
    value - modulus * (value / modulus).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_conversion() {
        assert_relative_eq!(degrees_per_second(16_384, 245.0), 122.5);
        assert_relative_eq!(degrees_per_second(i16::MIN, 245.0), -245.0);
        assert_relative_eq!(degrees_per_second(0, 245.0), 0.0);
        assert_relative_eq!(degrees_per_second(16_384, 500.0), 250.0);
    }

    #[test]
    fn test_wrap_signed_folds_symmetrically() {
        assert_relative_eq!(wrap_signed(0.75 * PI, PI), -0.25 * PI, epsilon = 1e-6);
        assert_relative_eq!(wrap_signed(-0.75 * PI, PI), 0.25 * PI, epsilon = 1e-6);
        assert_relative_eq!(wrap_signed(0.25 * PI, PI), 0.25 * PI, epsilon = 1e-6);
        assert_relative_eq!(wrap_signed(-2.6 * PI, PI), 0.4 * PI, epsilon = 1e-6);
        assert_relative_eq!(wrap_signed(0.0, PI), 0.0);
    }

    #[test]
    fn test_single_update_integrates_rate() {
        let mut orientation = Orientation::new();
        orientation.update([16_384, 0, -16_384], 245.0, 0.1);
        let heading = orientation.heading();
        // 122.5 deg/s over 0.1 s, in radians
        assert_relative_eq!(heading[0], 0.213_802_8, epsilon = 1e-5);
        assert_relative_eq!(heading[1], 0.0);
        assert_relative_eq!(heading[2], -0.213_802_8, epsilon = 1e-5);
    }

    #[test]
    fn test_heading_stays_bounded_over_long_runs() {
        let mut orientation = Orientation::new();
        for _ in 0..10_000 {
            orientation.update([12_000, 32_767, -9_000], 245.0, 0.016_892);
            for axis in orientation.heading() {
                assert!(axis.is_finite());
                assert!(axis > -PI && axis <= PI, "heading {} out of range", axis);
            }
        }
    }

    #[test]
    fn test_zero_rate_keeps_heading() {
        let mut orientation = Orientation::new();
        orientation.update([5_000, -5_000, 1], 245.0, 0.05);
        let before = orientation.heading();
        orientation.update([0, 0, 0], 245.0, 10.0);
        assert_eq!(orientation.heading(), before);
    }

    #[test]
    fn test_reset_zeroes_axes() {
        let mut orientation = Orientation::new();
        orientation.update([1_000, 2_000, 3_000], 245.0, 1.0);
        orientation.reset();
        assert_eq!(orientation.heading(), [0.0; 3]);
    }
}
