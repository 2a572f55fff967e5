//! Device sentence grammars, validation, and decoding.
//!
//! The device emits one ASCII sentence per line, fields separated by `;`.
//! Two sentence kinds exist:
//!
//! # IMU sentence
//!
//! Exactly 7 separators (8 fields):
//!
//! ```text
//! imu;<ts>;<ax>;<ay>;<az>;<g0>;<g1>;<g2>
//! ```
//!
//! `ts` is the device timestamp in milliseconds, the rest are raw i16 sensor
//! counts. The first two gyro fields arrive swapped relative to the device
//! axes; decoding restores device order (`[g1, g0, g2]`).
//!
//! # GPS hybrid sentence
//!
//! Exactly 23 separators (24 fields). The first 14 carry the payload:
//!
//! ```text
//! gpsrmc;<ts>;<lat deg>;<lat min>;<lat umin>;<N|S>;<lon deg>;<lon min>;<lon umin>;<E|W>;<speed>;<heading>;<alt>;<hdop>;...
//! ```
//!
//! Angles use DMM encoding: whole degrees, whole minutes, and decimal minutes
//! scaled by 1e6. Speed through hdop are format-checked and dropped; the ten
//! fields after them are unconstrained and ignored.
//!
//! # Field grammar
//!
//! Numeric fields are an optional `-` followed by one or more ASCII digits,
//! with leading/trailing ASCII whitespace tolerated. Hemisphere fields are a
//! single letter from the allowed set. Anything else fails validation and
//! the whole line is left to the caller to drop.

mod gps;
mod imu;

pub use gps::{
    is_gps_hybrid, to_gps_hybrid, DmmAngle, DmmPosition, GpsSample, LatHemisphere, LonHemisphere,
};
pub use imu::{is_imu, to_imu, ImuSample};

/// One decoded device sentence.
///
/// A closed set by construction: the protocol has exactly two sentence kinds
/// and downstream code matches on them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodedSample {
    Imu(ImuSample),
    Gps(GpsSample),
}

/// Classifies one framed line, decoding it if it matches a known grammar.
///
/// Returns `None` for anything else; the two grammars are disjoint on
/// separator count and tag, so try order does not matter.
pub fn classify(line: &str) -> Option<DecodedSample> {
    if is_imu(line) {
        Some(DecodedSample::Imu(to_imu(line)))
    } else if is_gps_hybrid(line) {
        Some(DecodedSample::Gps(to_gps_hybrid(line)))
    } else {
        None
    }
}

/// Integer field grammar check: optional `-`, then one or more ASCII digits,
/// surrounding whitespace tolerated. A bare `-` or an empty field fails.
fn is_int_field(field: &str) -> bool {
    let trimmed = field.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a validated integer field through i64.
///
/// Callers narrow to the destination width with `as`, truncating out-of-range
/// values; magnitudes beyond i64 itself parse as 0. Lossy by contract.
fn parse_int(field: &str) -> i64 {
    field.trim().parse().unwrap_or_default()
}

/// Pulls the next field off a split and parses it as an integer.
fn next_int<'a>(fields: &mut impl Iterator<Item = &'a str>) -> i64 {
    parse_int(fields.next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_field_grammar() {
        for valid in ["0", "42", "-17", " 5", "5 ", "  -900  ", "007"] {
            assert!(is_int_field(valid), "{:?} should validate", valid);
        }
        for invalid in ["", " ", "-", "+5", "1.5", "1 2", "12x", "--3", "5-"] {
            assert!(!is_int_field(invalid), "{:?} should not validate", invalid);
        }
    }

    #[test]
    fn test_parse_int_truncates_past_i64() {
        assert_eq!(parse_int("99999999999999999999999999"), 0);
        assert_eq!(parse_int(" -42 "), -42);
    }

    #[test]
    fn test_classify_routes_by_grammar() {
        assert!(matches!(
            classify("imu;1;2;3;4;5;6;7"),
            Some(DecodedSample::Imu(_))
        ));
        let mut gps =
            String::from("gpsrmc;193035;41;54;829100;N;12;30;96900;E;410;212830;210400;1460");
        gps.push_str(&";0".repeat(10));
        assert!(matches!(classify(&gps), Some(DecodedSample::Gps(_))));
        assert_eq!(classify(""), None);
        assert_eq!(classify("bogus;1;2;3;4;5;6;7"), None);
    }
}
