//! Geodetic conversions: signed decimal degrees and the spherical Mercator
//! plane the track is drawn on.

use std::f32::consts::FRAC_PI_4;

/// Spherical earth radius used by the Mercator projection, in meters.
pub const EARTH_RADIUS: f32 = 6_378_137.0;

/// A position in signed decimal degrees. North and east are positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DegPosition {
    pub lat: f32,
    pub lon: f32,
}

impl DegPosition {
    /// Projects onto the spherical Mercator plane:
    /// `x = lon_rad * R`, `y = R * ln(tan(π/4 + lat_rad/2))`.
    ///
    /// Undefined at the poles; callers keep latitudes inside (-90°, 90°).
    /// There is no inverse projection.
    pub fn to_mercator(self) -> MercatorPos {
        MercatorPos {
            x: self.lon.to_radians() * EARTH_RADIUS,
            y: EARTH_RADIUS * (FRAC_PI_4 + self.lat.to_radians() / 2.0).tan().ln(),
        }
    }
}

/// A projected position on the Mercator plane, in meters-like units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MercatorPos {
    pub x: f32,
    pub y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_projects_near_zero() {
        let merc = DegPosition { lat: 0.0, lon: 0.0 }.to_mercator();
        assert_relative_eq!(merc.x, 0.0);
        // f32 rounding through tan/ln leaves y within a meter of zero
        assert_relative_eq!(merc.y, 0.0, epsilon = 2.0);
    }

    #[test]
    fn test_known_fix_projects_to_expected_meters() {
        let merc = DegPosition {
            lat: 41.913_818,
            lon: 12.501_615,
        }
        .to_mercator();
        assert_relative_eq!(merc.x, 1_391_673.4, max_relative = 1e-4);
        assert_relative_eq!(merc.y, 5_148_078.5, max_relative = 1e-4);
    }

    #[test]
    fn test_x_is_linear_in_longitude() {
        let x = |lon: f32| DegPosition { lat: 10.0, lon }.to_mercator().x;
        assert_relative_eq!(x(10.0) + x(20.0), x(30.0), max_relative = 1e-5);
        assert_relative_eq!(x(-45.0), -x(45.0), max_relative = 1e-5);
    }

    #[test]
    fn test_y_strictly_increases_with_latitude() {
        let y = |lat: f32| DegPosition { lat, lon: 0.0 }.to_mercator().y;
        let mut prev = y(-89.0);
        let mut lat = -88.0;
        while lat <= 89.0 {
            let next = y(lat);
            assert!(next > prev, "y not increasing at {} deg", lat);
            prev = next;
            lat += 1.0;
        }
    }

    #[test]
    fn test_southern_western_fix_projects_negative() {
        let merc = DegPosition { lat: -33.9, lon: -70.8 }.to_mercator();
        assert!(merc.x < 0.0);
        assert!(merc.y < 0.0);
    }
}
