//! The `imu` sentence: timestamped raw accelerometer and gyro counts.

use super::{is_int_field, next_int};

/// Separator count of a well-formed IMU sentence.
const IMU_SEPARATORS: usize = 7;

/// One inertial sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImuSample {
    /// Device timestamp, milliseconds.
    pub ts: u32,
    /// Raw accelerometer counts.
    pub accel: [i16; 3],
    /// Raw gyro counts in device axis order, `[g1, g0, g2]` of the wire.
    pub gyro: [i16; 3],
}

/// Returns true when `line` is a well-formed IMU sentence: 7 separators, the
/// literal `imu` tag, and seven integer fields.
pub fn is_imu(line: &str) -> bool {
    if line.matches(';').count() != IMU_SEPARATORS {
        return false;
    }
    let mut fields = line.split(';');
    if fields.next() != Some("imu") {
        return false;
    }
    fields.all(is_int_field)
}

/// Decodes an IMU sentence. The line must have passed [`is_imu`].
///
/// Numeric fields narrow with truncating casts; the first two wire gyro
/// fields are swapped into device axis order.
pub fn to_imu(line: &str) -> ImuSample {
    let mut fields = line.split(';').skip(1);
    let ts = next_int(&mut fields) as u32;
    let accel = [
        next_int(&mut fields) as i16,
        next_int(&mut fields) as i16,
        next_int(&mut fields) as i16,
    ];
    let g0 = next_int(&mut fields) as i16;
    let g1 = next_int(&mut fields) as i16;
    let g2 = next_int(&mut fields) as i16;
    ImuSample {
        ts,
        accel,
        gyro: [g1, g0, g2],
    }
}
