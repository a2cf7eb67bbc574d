//! `pitbox` - garage toolkit for motorcycle maintenance and tuning reference
//!
//! This library bundles three small, independent utilities: an NGK
//! spark-plug designation decoder, a serial sensor logger for an ESP32 tap
//! harness, and the stock vs. tuned dyno sheets for a ZX6R 600G.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dyno;
pub mod error;
pub mod link;
pub mod logging;
pub mod plug;
pub mod session;

pub use config::Config;
pub use dyno::DynoSheet;
pub use error::{Error, Result};
pub use link::{Sample, SensorFrame, TapLink, TapMonitor};
pub use logging::init_logging;
pub use plug::{decode, Designation};
pub use session::SessionLog;
