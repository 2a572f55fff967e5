//! Per-device decoding sessions over a polled byte source.
//!
//! A session owns everything with connection lifetime: the line framer, the
//! integrated orientation, and the track bounds. Decoded samples themselves
//! are transient; each poll returns them to the caller and the session keeps
//! none.

use std::io;

use thiserror::Error;
use tracing::{debug, trace};

use crate::framer::LineFramer;
use crate::geo::DegPosition;
use crate::orientation::{Orientation, DEFAULT_FULL_SCALE_DPS};
use crate::sentence::{classify, DecodedSample};
use crate::track::BoundingBox;

/// A non-blocking source of telemetry bytes.
///
/// The contract is poll-shaped: `bytes_available` reports what can be read
/// right now, and reading `n <= bytes_available()` bytes must return exactly
/// `n`. A short read under that condition is a protocol violation and fatal
/// for the session.
pub trait ByteSource {
    /// Number of bytes readable right now without blocking.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Reads up to `buf.len()` bytes, returning how many were read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Errors that end a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Transport failure reported by the source.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The source returned fewer bytes than it advertised.
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },
}

/// Decoding state bound to one device connection.
#[derive(Debug)]
pub struct DeviceSession {
    label: String,
    framer: LineFramer,
    orientation: Orientation,
    bounds: Option<BoundingBox>,
    last_imu_ts: Option<u32>,
    full_scale_dps: f32,
    unhandled: u64,
}

impl DeviceSession {
    /// Session with the stock gyro full scale.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_full_scale(label, DEFAULT_FULL_SCALE_DPS)
    }

    /// Session for a device whose gyro runs at a non-default full scale.
    pub fn with_full_scale(label: impl Into<String>, full_scale_dps: f32) -> Self {
        Self {
            label: label.into(),
            framer: LineFramer::new(),
            orientation: Orientation::new(),
            bounds: None,
            last_imu_ts: None,
            full_scale_dps,
            unhandled: 0,
        }
    }

    /// Pulls everything the source has buffered and decodes it.
    ///
    /// Zero available bytes is a normal empty poll. Returned samples are in
    /// wire order.
    pub fn poll(
        &mut self,
        source: &mut dyn ByteSource,
    ) -> Result<Vec<DecodedSample>, SessionError> {
        let available = source.bytes_available()?;
        if available == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; available];
        let got = source.read(&mut buf)?;
        if got < available {
            return Err(SessionError::ShortRead {
                expected: available,
                got,
            });
        }
        trace!("{}: polled {} bytes", self.label, got);
        Ok(self.ingest(&buf))
    }

    /// Frames and classifies a chunk of bytes, updating orientation and
    /// bounds along the way. Lines matching neither grammar are dropped,
    /// logged, and counted; they never fail the session.
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<DecodedSample> {
        let lines: Vec<String> = self.framer.feed(chunk).collect();
        let mut samples = Vec::with_capacity(lines.len());
        for line in lines {
            match classify(&line) {
                Some(sample) => {
                    self.apply(&sample);
                    samples.push(sample);
                }
                None => {
                    self.unhandled += 1;
                    debug!("{}: unhandled: {:?}", self.label, line);
                }
            }
        }
        samples
    }

    /// Routes one decoded sample into the session state.
    ///
    /// IMU samples integrate orientation using the delta between consecutive
    /// device timestamps (milliseconds, wrapping at u32); the first sample
    /// only records its timestamp. GPS fixes seed or widen the bounds.
    fn apply(&mut self, sample: &DecodedSample) {
        match sample {
            DecodedSample::Imu(imu) => {
                if let Some(last) = self.last_imu_ts {
                    let dt_seconds = imu.ts.wrapping_sub(last) as f32 / 1000.0;
                    self.orientation
                        .update(imu.gyro, self.full_scale_dps, dt_seconds);
                }
                self.last_imu_ts = Some(imu.ts);
            }
            DecodedSample::Gps(gps) => {
                let pos = gps.pos.to_degrees();
                match &mut self.bounds {
                    Some(bounds) => bounds.update(pos),
                    None => self.bounds = Some(BoundingBox::new(pos)),
                }
            }
        }
    }

    /// Seeds (or widens) the bounds before the first fix arrives.
    pub fn seed_bounds(&mut self, pos: DegPosition) {
        match &mut self.bounds {
            Some(bounds) => bounds.update(pos),
            None => self.bounds = Some(BoundingBox::new(pos)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Integrated heading per gyro axis, radians.
    pub fn heading(&self) -> [f32; 3] {
        self.orientation.heading()
    }

    /// Track bounds, present once a fix has arrived or a seed was supplied.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn full_scale_dps(&self) -> f32 {
        self.full_scale_dps
    }

    /// Count of lines that matched neither sentence grammar.
    pub fn unhandled_lines(&self) -> u64 {
        self.unhandled
    }
}
