//! Dyno sheets: stock vs. tuned reference data for the ZX6R 600G.
//!
//! The stock curves and the speed-per-gear table are const data taken from
//! the factory sheet plus road measurements. The tuned curve starts as a
//! copy of stock and is editable per rpm point; edits persist as a small
//! JSON document in the data directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// The rev limiter kicks in here.
pub const REV_LIMIT: u32 = 12_500;

/// Number of gears in the speed table.
pub const GEARS: usize = 6;

/// One row of the setup comparison sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupItem {
    /// Component name.
    pub component: &'static str,

    /// Stock value.
    pub stock: &'static str,

    /// Current tuned value.
    pub tuned: &'static str,
}

/// Stock vs. tuned carburetor and ignition setup.
pub const SETUP_SHEET: &[SetupItem] = &[
    SetupItem {
        component: "Main jets",
        stock: "140/130/130/140",
        tuned: "135/132.5/132.5/135",
    },
    SetupItem {
        component: "Pilot jets",
        stock: "12.5",
        tuned: "12.5 (unchanged)",
    },
    SetupItem {
        component: "Spark plugs",
        stock: "CR9E",
        tuned: "CR10EIX (0.75 mm gap)",
    },
    SetupItem {
        component: "Air filter",
        stock: "Stock",
        tuned: "K&N",
    },
    SetupItem {
        component: "Fuel",
        stock: "Super Plus (98 octane)",
        tuned: "Super Plus (98 octane)",
    },
];

/// One point of a performance curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Engine speed in rpm.
    pub rpm: u32,

    /// Power in hp.
    pub power_hp: f64,

    /// Torque in Nm.
    pub torque_nm: f64,
}

/// Stock performance curve (approximated factory figures).
pub const STOCK_CURVE: &[CurvePoint] = &[
    CurvePoint { rpm: 2_000, power_hp: 25.0, torque_nm: 45.0 },
    CurvePoint { rpm: 3_000, power_hp: 45.0, torque_nm: 55.0 },
    CurvePoint { rpm: 4_000, power_hp: 65.0, torque_nm: 62.0 },
    CurvePoint { rpm: 5_000, power_hp: 80.0, torque_nm: 65.0 },
    CurvePoint { rpm: 6_000, power_hp: 92.0, torque_nm: 67.0 },
    CurvePoint { rpm: 7_000, power_hp: 102.0, torque_nm: 68.0 },
    CurvePoint { rpm: 8_000, power_hp: 106.0, torque_nm: 67.0 },
    CurvePoint { rpm: 9_000, power_hp: 109.0, torque_nm: 65.0 },
    CurvePoint { rpm: 10_000, power_hp: 111.0, torque_nm: 63.0 },
    CurvePoint { rpm: 11_000, power_hp: 112.0, torque_nm: 60.0 },
    CurvePoint { rpm: 12_000, power_hp: 110.0, torque_nm: 56.0 },
    CurvePoint { rpm: 12_500, power_hp: 107.0, torque_nm: 53.0 },
];

/// One row of the speed-per-gear table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedRow {
    /// Engine speed in rpm.
    pub rpm: u32,

    /// Road speed in km/h for gears 1 through 6.
    pub kmh: [u16; GEARS],
}

/// Speed per gear at selected engine speeds.
pub const SPEED_TABLE: &[SpeedRow] = &[
    SpeedRow { rpm: 4_000, kmh: [28, 42, 58, 72, 88, 102] },
    SpeedRow { rpm: 6_000, kmh: [42, 63, 87, 108, 132, 153] },
    SpeedRow { rpm: 8_000, kmh: [56, 84, 116, 144, 176, 204] },
    SpeedRow { rpm: 10_000, kmh: [70, 105, 145, 180, 220, 255] },
    SpeedRow { rpm: 12_000, kmh: [84, 120, 174, 216, 264, 306] },
    SpeedRow { rpm: 12_500, kmh: [87, 125, 181, 225, 275, 319] },
];

/// (rpm, gear index) cells of [`SPEED_TABLE`] backed by road measurement
/// rather than calculation.
pub const MEASURED_SPEEDS: &[(u32, usize)] = &[(10_000, 3), (12_000, 1)];

/// The persisted part of the dyno sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DynoData {
    tuned: Vec<CurvePoint>,
    last_updated: DateTime<Utc>,
}

impl Default for DynoData {
    fn default() -> Self {
        Self {
            tuned: STOCK_CURVE.to_vec(),
            last_updated: Utc::now(),
        }
    }
}

/// The editable dyno sheet: the tuned curve plus its backing file.
#[derive(Debug)]
pub struct DynoSheet {
    path: PathBuf,
    data: DynoData,
}

impl DynoSheet {
    /// Load the sheet from the given path.
    ///
    /// A missing or unreadable file falls back to a fresh copy of the
    /// stock curve (the original behavior: never refuse to start over a
    /// bad data file).
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    debug!(error = %e, "dyno data unreadable, starting from stock");
                    DynoData::default()
                }
            },
            Err(_) => DynoData::default(),
        };
        Self { path, data }
    }

    /// Path of the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tuned curve.
    #[must_use]
    pub fn tuned(&self) -> &[CurvePoint] {
        &self.data.tuned
    }

    /// The tuned point at the given rpm, if the rpm is on the sheet.
    #[must_use]
    pub fn tuned_at(&self, rpm: u32) -> Option<&CurvePoint> {
        self.data.tuned.iter().find(|p| p.rpm == rpm)
    }

    /// Power difference (tuned minus stock) at the given rpm.
    #[must_use]
    pub fn power_delta(&self, rpm: u32) -> Option<f64> {
        let stock = STOCK_CURVE.iter().find(|p| p.rpm == rpm)?;
        let tuned = self.tuned_at(rpm)?;
        Some(tuned.power_hp - stock.power_hp)
    }

    /// The highest power value across both curves (for graph scaling).
    #[must_use]
    pub fn max_power(&self) -> f64 {
        STOCK_CURVE
            .iter()
            .chain(self.data.tuned.iter())
            .map(|p| p.power_hp)
            .fold(0.0, f64::max)
    }

    /// Update the tuned point at the given rpm.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRpm`] if the rpm is not a row of the sheet.
    pub fn set_point(&mut self, rpm: u32, power_hp: f64, torque_nm: f64) -> Result<()> {
        let point = self
            .data
            .tuned
            .iter_mut()
            .find(|p| p.rpm == rpm)
            .ok_or(Error::UnknownRpm { rpm })?;
        point.power_hp = power_hp;
        point.torque_nm = torque_nm;
        self.data.last_updated = Utc::now();
        Ok(())
    }

    /// Reset the tuned curve back to stock.
    pub fn reset(&mut self) {
        self.data = DynoData::default();
        info!("tuned curve reset to stock");
    }

    /// Write the sheet to its backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the write
    /// fails.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, raw)?;
        debug!("dyno data saved to {}", self.path.display());
        Ok(())
    }
}

/// Width of a scaled bar for ASCII graph rendering.
#[must_use]
pub fn scaled_width(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = ((value / max) * width as f64) as usize;
    scaled.min(width)
}
