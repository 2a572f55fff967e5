//! The `gpsrmc` sentence: a hybrid RMC-like fix in DMM encoding.

use super::{is_int_field, next_int};
use crate::geo::DegPosition;

/// Separator count of a well-formed GPS hybrid sentence.
const GPS_SEPARATORS: usize = 23;

/// An angle in the wire's DMM encoding: whole degrees, whole minutes, and
/// decimal minutes scaled by 1e6. Always non-negative; the hemisphere
/// carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmmAngle {
    pub deg: u16,
    pub min: u16,
    /// Decimal part of the minutes, in millionths of a minute.
    pub micro_min: u32,
}

impl DmmAngle {
    /// Converts to decimal degrees: `deg + (min + micro_min/1e6) / 60`.
    pub fn to_degrees(self) -> f32 {
        f32::from(self.deg) + (f32::from(self.min) + self.micro_min as f32 / 1e6) / 60.0
    }
}

/// Latitude hemisphere. North is the positive sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatHemisphere {
    North,
    South,
}

impl LatHemisphere {
    fn parse(field: &str) -> Option<Self> {
        match field.trim() {
            "N" => Some(Self::North),
            "S" => Some(Self::South),
            _ => None,
        }
    }

    /// Sign multiplier applied to the decoded angle.
    pub fn sign(self) -> f32 {
        match self {
            Self::North => 1.0,
            Self::South => -1.0,
        }
    }

    /// Wire letter.
    pub fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }
}

/// Longitude hemisphere. East is the positive sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonHemisphere {
    East,
    West,
}

impl LonHemisphere {
    fn parse(field: &str) -> Option<Self> {
        match field.trim() {
            "E" => Some(Self::East),
            "W" => Some(Self::West),
            _ => None,
        }
    }

    /// Sign multiplier applied to the decoded angle.
    pub fn sign(self) -> f32 {
        match self {
            Self::East => 1.0,
            Self::West => -1.0,
        }
    }

    /// Wire letter.
    pub fn letter(self) -> char {
        match self {
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}

/// A full DMM fix: latitude and longitude with their hemispheres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmmPosition {
    pub lat: DmmAngle,
    pub lat_dir: LatHemisphere,
    pub lon: DmmAngle,
    pub lon_dir: LonHemisphere,
}

impl DmmPosition {
    /// Converts to signed decimal degrees.
    pub fn to_degrees(self) -> DegPosition {
        DegPosition {
            lat: self.lat_dir.sign() * self.lat.to_degrees(),
            lon: self.lon_dir.sign() * self.lon.to_degrees(),
        }
    }
}

/// One GPS fix as decoded off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsSample {
    /// Device timestamp, milliseconds.
    pub ts: u32,
    pub pos: DmmPosition,
}

/// Returns true when `line` is a well-formed GPS hybrid sentence.
///
/// Checks the separator count, the `gpsrmc` tag, the integer grammar on the
/// timestamp, both DMM angle triples, and the four trailer fields (ground
/// speed, heading, altitude, hdop), and the two hemisphere letters. Fields
/// past the trailer are unconstrained.
pub fn is_gps_hybrid(line: &str) -> bool {
    if line.matches(';').count() != GPS_SEPARATORS {
        return false;
    }
    let mut fields = line.split(';');
    if fields.next() != Some("gpsrmc") {
        return false;
    }
    // ts + latitude deg/min/micro_min
    for _ in 0..4 {
        if !fields.next().is_some_and(is_int_field) {
            return false;
        }
    }
    if !fields.next().is_some_and(|f| LatHemisphere::parse(f).is_some()) {
        return false;
    }
    // longitude deg/min/micro_min
    for _ in 0..3 {
        if !fields.next().is_some_and(is_int_field) {
            return false;
        }
    }
    if !fields.next().is_some_and(|f| LonHemisphere::parse(f).is_some()) {
        return false;
    }
    // trailer: format-checked, values dropped on decode
    for _ in 0..4 {
        if !fields.next().is_some_and(is_int_field) {
            return false;
        }
    }
    true
}

/// Decodes a GPS hybrid sentence. The line must have passed
/// [`is_gps_hybrid`].
///
/// Numeric fields narrow with truncating casts. Everything after the
/// longitude hemisphere is dropped.
pub fn to_gps_hybrid(line: &str) -> GpsSample {
    let mut fields = line.split(';').skip(1);
    let ts = next_int(&mut fields) as u32;
    let lat = DmmAngle {
        deg: next_int(&mut fields) as u16,
        min: next_int(&mut fields) as u16,
        micro_min: next_int(&mut fields) as u32,
    };
    let lat_dir = fields
        .next()
        .and_then(LatHemisphere::parse)
        .unwrap_or(LatHemisphere::North);
    let lon = DmmAngle {
        deg: next_int(&mut fields) as u16,
        min: next_int(&mut fields) as u16,
        micro_min: next_int(&mut fields) as u32,
    };
    let lon_dir = fields
        .next()
        .and_then(LonHemisphere::parse)
        .unwrap_or(LonHemisphere::East);
    GpsSample {
        ts,
        pos: DmmPosition {
            lat,
            lat_dir,
            lon,
            lon_dir,
        },
    }
}
