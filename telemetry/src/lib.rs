//! Serial IMU/GPS telemetry decoding.
//!
//! The device streams newline-terminated ASCII sentences over a serial link:
//! inertial samples (`imu;...`) and hybrid GPS fixes (`gpsrmc;...`). This
//! crate frames those bytes into lines, classifies and decodes the
//! sentences, integrates gyro headings, converts fixes from DMM to decimal
//! degrees and the Mercator plane, and tracks the geographic extent of a
//! session.
//!
//! Everything is single threaded and poll driven: a [`DeviceSession`] pulls
//! whatever a [`ByteSource`] has buffered and hands decoded samples back to
//! the caller. The transport itself stays outside the crate; anything that
//! can report "bytes available" and read them non-blockingly can feed a
//! session. A seeded [`MockDevice`] generates the same streams without
//! hardware.

mod framer;
mod geo;
mod mock;
mod orientation;
mod sentence;
mod session;
mod track;

pub use framer::{LineFramer, Lines};
pub use geo::{DegPosition, MercatorPos, EARTH_RADIUS};
pub use mock::{render_sentence, MockDevice, MockGps, MockImu, OFFICE};
pub use orientation::{degrees_per_second, Orientation, DEFAULT_FULL_SCALE_DPS};
pub use sentence::{
    classify, is_gps_hybrid, is_imu, to_gps_hybrid, to_imu, DecodedSample, DmmAngle, DmmPosition,
    GpsSample, ImuSample, LatHemisphere, LonHemisphere,
};
pub use session::{ByteSource, DeviceSession, SessionError};
pub use track::BoundingBox;
