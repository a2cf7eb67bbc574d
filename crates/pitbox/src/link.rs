//! Sensor tap link: wire codec and polling monitor.
//!
//! The ESP32 tap harness speaks a fixed line protocol: the host sends
//! `READ\n` and the firmware answers with one line of the form
//! `RPM:5500,TEMP:85.5`. This module owns the pure parts (frame parsing,
//! fault sentinel classification, sample assembly) and the polling loop;
//! the actual transport lives behind the [`TapLink`] trait.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, warn};

/// Temperatures below this are firmware fault sentinels, not readings
/// (-999 supply short, -888 open circuit, -777 out of plausible range).
pub const TEMP_FAULT_THRESHOLD: f32 = -500.0;

/// RPM readings below this mean the engine is stopped or the pickup is
/// not seeing pulses.
pub const RPM_IDLE_THRESHOLD: u32 = 500;

/// Errors that can occur on the tap link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The transport failed.
    #[error("link I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The firmware answered with a line we cannot parse.
    #[error("unparseable sensor frame: {line:?}")]
    BadFrame {
        /// The offending response line.
        line: String,
    },

    /// The monitor was started while already running.
    #[error("tap monitor already running")]
    AlreadyRunning,
}

/// Result type for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// A transport that can exchange one request/response round with the tap.
///
/// Implementations do blocking I/O; the serial implementation lives in the
/// `pitbox-esp32` crate, and tests use an in-memory mock.
pub trait TapLink: Send {
    /// Name of this link (for logging).
    fn name(&self) -> &str;

    /// Send `READ` and return the response line, without the trailing
    /// newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    fn exchange(&mut self) -> Result<String>;
}

/// Health of a single signal within a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    /// Reading is plausible.
    Ok,
    /// RPM below the idle threshold: engine stopped or pickup fault.
    IdleOrFault,
    /// Temperature sentinel value: the sensor circuit reported a fault.
    SensorFault,
}

impl std::fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::IdleOrFault => write!(f, "idle_or_fault"),
            Self::SensorFault => write!(f, "sensor_fault"),
        }
    }
}

/// One parsed response line from the tap firmware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFrame {
    /// Engine speed in revolutions per minute.
    pub rpm: u32,

    /// Coolant temperature in degrees Celsius (may be a fault sentinel).
    pub temp_c: f32,
}

impl SensorFrame {
    /// Status of the RPM signal in this frame.
    #[must_use]
    pub fn rpm_status(&self) -> SignalStatus {
        if self.rpm < RPM_IDLE_THRESHOLD {
            SignalStatus::IdleOrFault
        } else {
            SignalStatus::Ok
        }
    }

    /// Status of the temperature signal in this frame.
    #[must_use]
    pub fn temp_status(&self) -> SignalStatus {
        if self.temp_c < TEMP_FAULT_THRESHOLD {
            SignalStatus::SensorFault
        } else {
            SignalStatus::Ok
        }
    }
}

impl std::str::FromStr for SensorFrame {
    type Err = LinkError;

    /// Parse a `RPM:5500,TEMP:85.5` line. Field order does not matter;
    /// both fields must be present.
    fn from_str(line: &str) -> Result<Self> {
        let bad = || LinkError::BadFrame {
            line: line.to_string(),
        };

        let mut rpm = None;
        let mut temp = None;
        for part in line.trim().split(',') {
            if let Some(value) = part.strip_prefix("RPM:") {
                rpm = Some(value.trim().parse::<u32>().map_err(|_| bad())?);
            } else if let Some(value) = part.strip_prefix("TEMP:") {
                temp = Some(value.trim().parse::<f32>().map_err(|_| bad())?);
            }
        }

        match (rpm, temp) {
            (Some(rpm), Some(temp_c)) => Ok(Self { rpm, temp_c }),
            _ => Err(bad()),
        }
    }
}

/// A timestamped sample as it goes into the session log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// When the sample was taken.
    pub timestamp: DateTime<Utc>,

    /// Engine speed in revolutions per minute.
    pub rpm: u32,

    /// Coolant temperature in degrees Celsius. On a sensor fault this
    /// holds the last good reading.
    pub temp_c: f32,

    /// RPM signal health.
    pub rpm_status: SignalStatus,

    /// Temperature signal health.
    pub temp_status: SignalStatus,
}

/// Configuration for the tap monitor.
#[derive(Debug, Clone)]
pub struct TapMonitorConfig {
    /// Interval between polls.
    pub poll_interval: Duration,
}

impl Default for TapMonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Polls a [`TapLink`] at a fixed interval and emits [`Sample`]s.
///
/// A temperature fault keeps the last good value in the sample (flagged via
/// `temp_status`), matching what the dash gauge would show.
#[derive(Debug)]
pub struct TapMonitor<L> {
    link: L,
    config: TapMonitorConfig,
    running: Arc<AtomicBool>,
    sample_count: Arc<AtomicU64>,
    last_good_temp: f32,
}

impl<L: TapLink> TapMonitor<L> {
    /// Create a monitor over the given link with default configuration.
    #[must_use]
    pub fn new(link: L) -> Self {
        Self::with_config(link, TapMonitorConfig::default())
    }

    /// Create a monitor with custom configuration.
    #[must_use]
    pub fn with_config(link: L, config: TapMonitorConfig) -> Self {
        Self {
            link,
            config,
            running: Arc::new(AtomicBool::new(false)),
            sample_count: Arc::new(AtomicU64::new(0)),
            last_good_temp: 0.0,
        }
    }

    /// Check if the monitor loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of samples emitted since creation.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.sample_count.load(Ordering::SeqCst)
    }

    /// Get a handle that can stop the monitor loop from another task.
    #[must_use]
    pub fn stop_handle(&self) -> TapHandle {
        TapHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Perform a single request/response round and build a sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails or the response line does
    /// not parse.
    pub fn poll_once(&mut self) -> Result<Sample> {
        let line = self.link.exchange()?;
        let frame: SensorFrame = line.parse()?;

        let temp_status = frame.temp_status();
        let temp_c = if temp_status == SignalStatus::SensorFault {
            self.last_good_temp
        } else {
            self.last_good_temp = frame.temp_c;
            frame.temp_c
        };

        Ok(Sample {
            timestamp: Utc::now(),
            rpm: frame.rpm,
            temp_c,
            rpm_status: frame.rpm_status(),
            temp_status,
        })
    }

    /// Poll the link at the configured interval and send samples through
    /// the channel until the stop handle fires or the receiver is dropped.
    ///
    /// A failed poll is logged and skipped; the loop keeps going.
    ///
    /// # Errors
    ///
    /// Returns an error if the monitor is already running.
    pub async fn start(&mut self, tx: mpsc::Sender<Sample>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(LinkError::AlreadyRunning);
        }

        debug!(
            link = self.link.name(),
            interval_ms = self.config.poll_interval.as_millis(),
            "starting tap monitor"
        );

        let mut ticker = interval(self.config.poll_interval);
        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            match self.poll_once() {
                Ok(sample) => {
                    self.sample_count.fetch_add(1, Ordering::SeqCst);
                    if tx.send(sample).await.is_err() {
                        debug!("sample channel closed, stopping");
                        break;
                    }
                }
                Err(e) => {
                    warn!(link = self.link.name(), error = %e, "poll failed, skipping tick");
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }
}

impl TapLink for pitbox_esp32::SerialLink {
    fn name(&self) -> &str {
        self.device()
    }

    fn exchange(&mut self) -> Result<String> {
        Ok(self.request()?)
    }
}

/// Open the serial tap device at the given path.
///
/// # Errors
///
/// Returns [`crate::error::Error::LinkOpen`] if the device cannot be
/// opened.
pub fn open_serial(path: &std::path::Path) -> crate::error::Result<pitbox_esp32::SerialLink> {
    pitbox_esp32::SerialLink::open(path).map_err(|source| crate::error::Error::LinkOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// A cloneable handle that stops a running [`TapMonitor`].
#[derive(Debug, Clone)]
pub struct TapHandle {
    running: Arc<AtomicBool>,
}

impl TapHandle {
    /// Signal the monitor loop to stop after the current tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the monitor loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A scripted link that replays canned response lines.
    #[derive(Debug)]
    struct MockLink {
        lines: Vec<String>,
        cursor: usize,
    }

    impl MockLink {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(ToString::to_string).collect(),
                cursor: 0,
            }
        }
    }

    impl TapLink for MockLink {
        fn name(&self) -> &str {
            "mock"
        }

        fn exchange(&mut self) -> Result<String> {
            let line = self
                .lines
                .get(self.cursor)
                .cloned()
                .ok_or_else(|| LinkError::Io(std::io::Error::other("script exhausted")))?;
            self.cursor += 1;
            Ok(line)
        }
    }

    #[test]
    fn test_frame_parses_normal_line() {
        let frame: SensorFrame = "RPM:5500,TEMP:85.5".parse().unwrap();
        assert_eq!(frame.rpm, 5500);
        assert!((frame.temp_c - 85.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_frame_parses_reversed_fields() {
        let frame: SensorFrame = "TEMP:42.0,RPM:9000".parse().unwrap();
        assert_eq!(frame.rpm, 9000);
    }

    #[test]
    fn test_frame_tolerates_whitespace() {
        let frame: SensorFrame = " RPM:1200,TEMP: 80.0 \r".parse().unwrap();
        assert_eq!(frame.rpm, 1200);
    }

    #[test]
    fn test_frame_rejects_garbage() {
        assert!("hello".parse::<SensorFrame>().is_err());
        assert!("RPM:5500".parse::<SensorFrame>().is_err());
        assert!("TEMP:85.5".parse::<SensorFrame>().is_err());
        assert!("RPM:abc,TEMP:85.5".parse::<SensorFrame>().is_err());
        assert!("".parse::<SensorFrame>().is_err());
    }

    #[test]
    fn test_bad_frame_error_carries_line() {
        let err = "bogus".parse::<SensorFrame>().unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_rpm_status_thresholds() {
        let idle = SensorFrame { rpm: 0, temp_c: 80.0 };
        assert_eq!(idle.rpm_status(), SignalStatus::IdleOrFault);

        let low = SensorFrame { rpm: 499, temp_c: 80.0 };
        assert_eq!(low.rpm_status(), SignalStatus::IdleOrFault);

        let running = SensorFrame { rpm: 500, temp_c: 80.0 };
        assert_eq!(running.rpm_status(), SignalStatus::Ok);
    }

    #[test]
    fn test_temp_fault_sentinels() {
        for sentinel in [-999.0, -888.0, -777.0] {
            let frame = SensorFrame { rpm: 5000, temp_c: sentinel };
            assert_eq!(frame.temp_status(), SignalStatus::SensorFault);
        }

        let cold = SensorFrame { rpm: 5000, temp_c: -15.0 };
        assert_eq!(cold.temp_status(), SignalStatus::Ok);
    }

    #[test]
    fn test_signal_status_display() {
        assert_eq!(SignalStatus::Ok.to_string(), "ok");
        assert_eq!(SignalStatus::IdleOrFault.to_string(), "idle_or_fault");
        assert_eq!(SignalStatus::SensorFault.to_string(), "sensor_fault");
    }

    #[test]
    fn test_poll_once_builds_sample() {
        let mut monitor = TapMonitor::new(MockLink::new(&["RPM:5500,TEMP:85.5"]));
        let sample = monitor.poll_once().unwrap();
        assert_eq!(sample.rpm, 5500);
        assert_eq!(sample.rpm_status, SignalStatus::Ok);
        assert_eq!(sample.temp_status, SignalStatus::Ok);
    }

    #[test]
    fn test_poll_once_keeps_last_good_temp_on_fault() {
        let mut monitor = TapMonitor::new(MockLink::new(&[
            "RPM:5500,TEMP:85.5",
            "RPM:5600,TEMP:-999.0",
        ]));

        let good = monitor.poll_once().unwrap();
        assert!((good.temp_c - 85.5).abs() < f32::EPSILON);

        let faulted = monitor.poll_once().unwrap();
        assert_eq!(faulted.temp_status, SignalStatus::SensorFault);
        assert!((faulted.temp_c - 85.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_poll_once_propagates_parse_error() {
        let mut monitor = TapMonitor::new(MockLink::new(&["???"]));
        assert!(matches!(
            monitor.poll_once(),
            Err(LinkError::BadFrame { .. })
        ));
    }

    #[test]
    fn test_stop_handle_shares_state() {
        let monitor = TapMonitor::new(MockLink::new(&[]));
        let h1 = monitor.stop_handle();
        let h2 = h1.clone();

        monitor.running.store(true, Ordering::SeqCst);
        assert!(h2.is_running());

        h1.stop();
        assert!(!monitor.is_running());
        assert!(!h2.is_running());
    }

    #[tokio::test]
    async fn test_start_emits_samples_until_stopped() {
        let link = MockLink::new(&[
            "RPM:1000,TEMP:60.0",
            "RPM:2000,TEMP:61.0",
            "RPM:3000,TEMP:62.0",
        ]);
        let mut monitor = TapMonitor::with_config(
            link,
            TapMonitorConfig {
                poll_interval: Duration::from_millis(1),
            },
        );
        let handle = monitor.stop_handle();
        let (tx, mut rx) = mpsc::channel(8);

        let task = tokio::spawn(async move {
            let _ = monitor.start(tx).await;
            monitor
        });

        let first = rx.recv().await.unwrap();
        assert_eq!(first.rpm, 1000);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.rpm, 2000);

        handle.stop();
        // Drain whatever was in flight; the channel must close.
        while rx.recv().await.is_some() {}

        let monitor = task.await.unwrap();
        assert!(!monitor.is_running());
        assert!(monitor.sample_count() >= 2);
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let mut monitor = TapMonitor::new(MockLink::new(&[]));
        monitor.running.store(true, Ordering::SeqCst);

        let (tx, _rx) = mpsc::channel(1);
        assert!(matches!(
            monitor.start(tx).await,
            Err(LinkError::AlreadyRunning)
        ));
    }

    #[tokio::test]
    async fn test_start_skips_bad_frames() {
        let link = MockLink::new(&["garbage", "RPM:4000,TEMP:70.0"]);
        let mut monitor = TapMonitor::with_config(
            link,
            TapMonitorConfig {
                poll_interval: Duration::from_millis(1),
            },
        );
        let handle = monitor.stop_handle();
        let (tx, mut rx) = mpsc::channel(8);

        tokio::spawn(async move {
            let _ = monitor.start(tx).await;
        });

        // The garbage line is skipped; the next good frame still arrives.
        let sample = rx.recv().await.unwrap();
        assert_eq!(sample.rpm, 4000);
        handle.stop();
    }
}
