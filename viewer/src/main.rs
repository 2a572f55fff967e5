//! Console viewer for serial IMU/GPS telemetry.
//!
//! Decodes the device's sentence stream and logs samples, heading, and track
//! bounds. Subcommands:
//! - `ports`: List available serial ports
//! - `listen`: Poll a live device over a serial port
//! - `mock`: Run the built-in mock device, optionally through the wire path

use std::io::{self, Read};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use telemetry::{
    render_sentence, BoundingBox, ByteSource, DecodedSample, DeviceSession, MercatorPos,
    MockDevice, Orientation, DEFAULT_FULL_SCALE_DPS, OFFICE,
};

/// Baud rate of the device link.
const DEFAULT_BAUD: u32 = 230_800;

/// Sleep between polls while listening.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Simulated clock step for the mock subcommand.
const MOCK_TICK: Duration = Duration::from_millis(50);

/// Headings are logged every this many IMU samples.
const HEADING_LOG_STRIDE: u64 = 64;

/// Serial IMU/GPS telemetry viewer
#[derive(Parser, Debug)]
#[command(name = "viewer")]
#[command(about = "Decode and log serial IMU/GPS telemetry")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available serial ports
    Ports,

    /// Listen to a live device and log decoded samples
    Listen {
        /// Serial port path, e.g. /dev/ttyUSB0
        #[arg(short, long)]
        port: String,

        /// Baud rate
        #[arg(short, long, default_value_t = DEFAULT_BAUD)]
        baud: u32,

        /// Gyro full scale in degrees per second
        #[arg(long, default_value_t = DEFAULT_FULL_SCALE_DPS)]
        full_scale: f32,
    },

    /// Run the built-in mock device
    Mock {
        /// RNG seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Simulated seconds to run
        #[arg(short, long, default_value_t = 30)]
        duration: u64,

        /// Render wire sentences and decode them through a real session
        #[arg(long)]
        wire: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    match args.command {
        Command::Ports => cmd_ports(),
        Command::Listen {
            port,
            baud,
            full_scale,
        } => cmd_listen(&port, baud, full_scale),
        Command::Mock {
            seed,
            duration,
            wire,
        } => cmd_mock(seed, Duration::from_secs(duration), wire),
    }
}

fn cmd_ports() -> Result<()> {
    let ports = serialport::available_ports().context("enumerating serial ports")?;
    if ports.is_empty() {
        info!("no serial ports found");
        return Ok(());
    }
    for port in ports {
        println!("{}  {:?}", port.port_name, port.port_type);
    }
    Ok(())
}

/// Adapts a serial port to the session's polling contract.
struct SerialSource {
    port: Box<dyn serialport::SerialPort>,
}

impl ByteSource for SerialSource {
    fn bytes_available(&mut self) -> io::Result<usize> {
        let n = self.port.bytes_to_read().map_err(io::Error::from)?;
        Ok(n as usize)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

fn cmd_listen(path: &str, baud: u32, full_scale: f32) -> Result<()> {
    // 8 data bits, no parity, one stop bit, no flow control
    let port = serialport::new(path, baud)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(Duration::from_millis(100))
        .open()
        .with_context(|| format!("opening {}", path))?;

    info!("listening on {} at {} baud", path, baud);
    let mut source = SerialSource { port };
    let mut session = DeviceSession::with_full_scale(path, full_scale);
    let mut consumer = Consumer::default();

    loop {
        let samples = session
            .poll(&mut source)
            .with_context(|| format!("polling {}", path))?;
        for sample in &samples {
            consumer.consume(&session, sample);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn cmd_mock(seed: u64, duration: Duration, wire: bool) -> Result<()> {
    info!(
        "mock device: seed {}, {} simulated seconds, {} path",
        seed,
        duration.as_secs(),
        if wire { "wire" } else { "struct" }
    );
    if wire {
        mock_wire(seed, duration)
    } else {
        mock_struct(seed, duration)
    }
}

/// Renders mock samples as wire bytes and decodes them through a session,
/// exercising the same path a live device takes.
fn mock_wire(seed: u64, duration: Duration) -> Result<()> {
    let mut device = MockDevice::new(seed);
    let mut session = DeviceSession::new("mock");
    let mut consumer = Consumer::default();

    let mut clock = Duration::ZERO;
    while clock < duration {
        clock += MOCK_TICK;
        let mut bytes = Vec::new();
        for sample in device.update(clock) {
            bytes.extend_from_slice(render_sentence(&sample).as_bytes());
            bytes.push(b'\n');
        }
        for sample in session.ingest(&bytes) {
            consumer.consume(&session, &sample);
        }
    }

    info!(
        "decoded {} imu / {} gps samples, {} unhandled lines",
        consumer.imu_count,
        consumer.gps_count,
        session.unhandled_lines()
    );
    log_summary(session.heading(), session.bounds(), &consumer.track);
    Ok(())
}

/// Consumes mock samples directly through the library building blocks,
/// skipping the wire.
fn mock_struct(seed: u64, duration: Duration) -> Result<()> {
    let mut device = MockDevice::new(seed);
    let mut orientation = Orientation::new();
    let mut bounds = BoundingBox::new(OFFICE);
    let mut track = Vec::new();
    let mut last_imu_ts = None;
    let mut imu_count = 0u64;

    let mut clock = Duration::ZERO;
    while clock < duration {
        clock += MOCK_TICK;
        for sample in device.update(clock) {
            match sample {
                DecodedSample::Imu(imu) => {
                    imu_count += 1;
                    if let Some(last) = last_imu_ts {
                        let dt = imu.ts.wrapping_sub(last) as f32 / 1000.0;
                        orientation.update(imu.gyro, DEFAULT_FULL_SCALE_DPS, dt);
                    }
                    last_imu_ts = Some(imu.ts);
                }
                DecodedSample::Gps(gps) => {
                    let pos = gps.pos.to_degrees();
                    bounds.update(pos);
                    track.push(pos.to_mercator());
                }
            }
        }
    }

    info!("generated {} imu / {} gps samples", imu_count, track.len());
    log_summary(orientation.heading(), Some(bounds), &track);
    Ok(())
}

/// Accumulates what the core hands back: sample counts and the projected
/// track. Retention lives here, never in the session.
#[derive(Default)]
struct Consumer {
    imu_count: u64,
    gps_count: u64,
    track: Vec<MercatorPos>,
}

impl Consumer {
    fn consume(&mut self, session: &DeviceSession, sample: &DecodedSample) {
        match sample {
            DecodedSample::Imu(imu) => {
                self.imu_count += 1;
                debug!("imu ts={} accel={:?} gyro={:?}", imu.ts, imu.accel, imu.gyro);
                if self.imu_count % HEADING_LOG_STRIDE == 0 {
                    let [x, y, z] = session.heading();
                    info!("heading: [{:.3}, {:.3}, {:.3}] rad", x, y, z);
                }
            }
            DecodedSample::Gps(gps) => {
                self.gps_count += 1;
                let pos = gps.pos.to_degrees();
                let merc = pos.to_mercator();
                self.track.push(merc);
                info!(
                    "fix ts={} at {:.6} deg, {:.6} deg -> ({:.1}, {:.1}) m",
                    gps.ts, pos.lat, pos.lon, merc.x, merc.y
                );
            }
        }
    }
}

fn log_summary(heading: [f32; 3], bounds: Option<BoundingBox>, track: &[MercatorPos]) {
    info!(
        "final heading: [{:.3}, {:.3}, {:.3}] rad",
        heading[0], heading[1], heading[2]
    );
    if let Some(bounds) = bounds {
        let ul = bounds.upper_left();
        let lr = bounds.lower_right();
        info!(
            "bounds: lat [{:.6}, {:.6}] lon [{:.6}, {:.6}]",
            lr.lat, ul.lat, ul.lon, lr.lon
        );
    }
    if let Some(last) = track.last() {
        info!("last projected fix: ({:.1}, {:.1}) m", last.x, last.y);
    }
}
