//! Mock device: IMU and GPS streams with realistic shape, no hardware.
//!
//! Time is explicit. Callers pass total elapsed time since the run started
//! and each generator emits whatever became due since the previous call, so
//! the same seed and the same elapsed schedule reproduce the same stream.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::geo::DegPosition;
use crate::sentence::{
    DecodedSample, DmmAngle, DmmPosition, GpsSample, ImuSample, LatHemisphere, LonHemisphere,
};

/// Fixed start position for the GPS walk.
pub const OFFICE: DegPosition = DegPosition {
    lat: 41.9134432,
    lon: 12.5010377,
};

/// IMU sample period, seconds (about 59 Hz, matching the device firmware).
const IMU_PERIOD_S: f32 = 0.016_891_892;

/// Seconds between redraws of the channel attractor targets.
const ATTRACTOR_PERIOD_S: f32 = 3.0;

/// GPS walk step bound, degrees per axis per sample.
const GPS_STEP_DEG: f32 = 1.0 / 10_000.0;

/// Generates IMU samples whose channels wander toward periodically redrawn
/// attractor targets.
#[derive(Debug)]
pub struct MockImu {
    rng: ChaCha8Rng,
    last: ImuSample,
    generated: u64,
    accel_target: [i16; 3],
    gyro_target: [i16; 3],
    next_redraw_s: f32,
}

impl MockImu {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            last: ImuSample {
                ts: 0,
                accel: [0; 3],
                gyro: [0; 3],
            },
            generated: 0,
            accel_target: [0; 3],
            gyro_target: [0; 3],
            next_redraw_s: ATTRACTOR_PERIOD_S,
        }
    }

    /// Emits every sample due by `elapsed`. Timestamps advance 16 or 17 ms
    /// per sample.
    pub fn update(&mut self, elapsed: Duration) -> Vec<ImuSample> {
        let elapsed_s = elapsed.as_secs_f32();
        if elapsed_s >= self.next_redraw_s {
            for target in self.accel_target.iter_mut().chain(self.gyro_target.iter_mut()) {
                *target = self.rng.random_range(-5000..=5000);
            }
            self.next_redraw_s = elapsed_s + ATTRACTOR_PERIOD_S;
        }

        let due = (elapsed_s / IMU_PERIOD_S).floor() as u64;
        let mut out = Vec::new();
        while self.generated < due {
            self.generated += 1;
            let ts = self.last.ts.wrapping_add(16 + self.rng.random_range(0..=1));
            let mut sample = ImuSample {
                ts,
                accel: [0; 3],
                gyro: [0; 3],
            };
            for axis in 0..3 {
                sample.accel[axis] = self.walk(self.last.accel[axis], self.accel_target[axis]);
                sample.gyro[axis] = self.walk(self.last.gyro[axis], self.gyro_target[axis]);
            }
            self.last = sample;
            out.push(sample);
        }
        out
    }

    /// One step toward `target`: a randomly scaled jump plus jitter, clamped
    /// to the i16 range.
    fn walk(&mut self, value: i16, target: i16) -> i16 {
        let gap = i32::from(target) - i32::from(value);
        let stepped = i32::from(value)
            + gap * self.rng.random_range(-2..=2)
            + self.rng.random_range(-2..=2);
        stepped.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }
}

/// Random-walks a fix at 1 Hz starting from [`OFFICE`].
#[derive(Debug)]
pub struct MockGps {
    rng: ChaCha8Rng,
    position: DegPosition,
    generated: u64,
}

impl MockGps {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            position: OFFICE,
            generated: 0,
        }
    }

    /// The walked position in decimal degrees.
    pub fn position(&self) -> DegPosition {
        self.position
    }

    /// Emits every fix due by `elapsed`, one per whole second.
    pub fn update(&mut self, elapsed: Duration) -> Vec<GpsSample> {
        let due = elapsed.as_secs();
        let mut out = Vec::new();
        while self.generated < due {
            self.generated += 1;
            self.position.lat += self.rng.random_range(-GPS_STEP_DEG..GPS_STEP_DEG);
            self.position.lon += self.rng.random_range(-GPS_STEP_DEG..GPS_STEP_DEG);
            out.push(GpsSample {
                ts: (self.generated * 1000) as u32,
                pos: encode_dmm(self.position),
            });
        }
        out
    }
}

/// Composes both generators behind one update call, the way a real device
/// interleaves its streams.
#[derive(Debug)]
pub struct MockDevice {
    pub imu: MockImu,
    pub gps: MockGps,
}

impl MockDevice {
    pub fn new(seed: u64) -> Self {
        Self {
            imu: MockImu::new(seed),
            gps: MockGps::new(seed.wrapping_add(1)),
        }
    }

    /// Every sample due by `elapsed`: GPS fixes first, then IMU samples,
    /// each stream in timestamp order.
    pub fn update(&mut self, elapsed: Duration) -> Vec<DecodedSample> {
        let mut out: Vec<DecodedSample> = self
            .gps
            .update(elapsed)
            .into_iter()
            .map(DecodedSample::Gps)
            .collect();
        out.extend(self.imu.update(elapsed).into_iter().map(DecodedSample::Imu));
        out
    }
}

/// Renders a sample as its wire sentence, without the trailing newline.
///
/// The IMU gyro pair goes back out in wire order; GPS fields past the
/// longitude hemisphere are emitted as zeros out to the full 24-field
/// sentence.
pub fn render_sentence(sample: &DecodedSample) -> String {
    match sample {
        DecodedSample::Imu(imu) => format!(
            "imu;{};{};{};{};{};{};{}",
            imu.ts,
            imu.accel[0],
            imu.accel[1],
            imu.accel[2],
            imu.gyro[1],
            imu.gyro[0],
            imu.gyro[2],
        ),
        DecodedSample::Gps(gps) => {
            let mut line = format!(
                "gpsrmc;{};{};{};{};{};{};{};{};{}",
                gps.ts,
                gps.pos.lat.deg,
                gps.pos.lat.min,
                gps.pos.lat.micro_min,
                gps.pos.lat_dir.letter(),
                gps.pos.lon.deg,
                gps.pos.lon.min,
                gps.pos.lon.micro_min,
                gps.pos.lon_dir.letter(),
            );
            // trailer plus reserved fields, all zero
            line.push_str(&";0".repeat(14));
            line
        }
    }
}

/// Re-encodes a decimal-degree position into the wire's DMM form.
fn encode_dmm(pos: DegPosition) -> DmmPosition {
    let (lat, lat_dir) = if pos.lat < 0.0 {
        (-pos.lat, LatHemisphere::South)
    } else {
        (pos.lat, LatHemisphere::North)
    };
    let (lon, lon_dir) = if pos.lon < 0.0 {
        (-pos.lon, LonHemisphere::West)
    } else {
        (pos.lon, LonHemisphere::East)
    };
    DmmPosition {
        lat: encode_angle(lat),
        lat_dir,
        lon: encode_angle(lon),
        lon_dir,
    }
}

/// Splits non-negative decimal degrees into DMM fields.
fn encode_angle(degrees: f32) -> DmmAngle {
    let whole = degrees.floor();
    let minutes = (degrees - whole) * 60.0;
    let whole_min = minutes.floor();
    DmmAngle {
        deg: whole as u16,
        min: whole_min as u16,
        micro_min: ((minutes - whole_min) * 1e6).round() as u32,
    }
}
