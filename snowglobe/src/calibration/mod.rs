//! Physical calibration of the projector, lens and globe.
//!
//! A [`CalibrationModel`] is persisted as a small record with three fields:
//!
//! ```yaml
//! radius: 378
//! offset: 370.0
//! center: [431, 210]
//! ```
//!
//! The format follows the file extension (`.yaml`/`.yml`, `.json`, `.toml`).


use std::fs;
use std::io::Write;
use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use common::SerdeFormat;

use crate::error::{Error, Result};

pub const DEFAULT_RADIUS: u32 = 378;
pub const DEFAULT_OFFSET: f64 = 370.0;
pub const DEFAULT_CENTER: IVec2 = IVec2::new(431, 210);

/// Sphere radius, lens offset and on-screen center, all in display pixels.
///
/// `radius` is half the side of the square the globe occupies on screen.
/// `offset` models the standoff between the lens and the sphere apex and is
/// kept within `0..=radius` by the calibration session. `center` is where
/// the sphere center lands on the display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationModel {
    pub radius: u32,
    pub offset: f64,
    pub center: IVec2,
}

/// On-disk shape of a calibration, with every field optional so a missing
/// one can be reported by name.
#[derive(Debug, Default, Deserialize)]
struct CalibrationRecord {
    radius: Option<u32>,
    offset: Option<f64>,
    center: Option<IVec2>,
}

impl Default for CalibrationModel {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            offset: DEFAULT_OFFSET,
            center: DEFAULT_CENTER,
        }
    }
}

impl CalibrationModel {
    pub fn new(radius: u32, offset: f64, center: IVec2) -> Self {
        Self {
            radius,
            offset,
            center,
        }
    }

    /// Side length of the square output frame.
    pub fn diameter(&self) -> usize {
        2 * self.radius as usize
    }

    /// Display position of the output frame's top-left corner.
    pub fn top_left(&self) -> IVec2 {
        self.center - IVec2::splat(self.radius as i32)
    }

    /// Reads a calibration record, starting from defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut model = Self::default();
        model.load(path)?;
        Ok(model)
    }

    /// Loads `path`, falling back to defaults with a warning on any
    /// recoverable configuration error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut model = Self::default();
        match model.load(path.as_ref()) {
            Ok(()) => Ok(model),
            Err(err) if err.is_recoverable_config() => {
                warn!("{}; using default calibration", err);
                Ok(model)
            }
            Err(err) => Err(err),
        }
    }

    /// Replaces this model with the record at `path`.
    ///
    /// On any error the current values are left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = SerdeFormat::from_path(path)?;

        let text = fs::read_to_string(path).map_err(|source| Error::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let record: CalibrationRecord =
            common::deserialize(&text, format).map_err(|source| Error::ConfigMalformed {
                path: path.to_path_buf(),
                source,
            })?;

        let missing = |field: &'static str| Error::ConfigIncomplete {
            path: path.to_path_buf(),
            field,
        };
        let loaded = Self {
            radius: record.radius.ok_or_else(|| missing("radius"))?,
            offset: record.offset.ok_or_else(|| missing("offset"))?,
            center: record.center.ok_or_else(|| missing("center"))?,
        };

        loaded.validate().map_err(|reason| Error::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        })?;

        if loaded.offset > loaded.radius as f64 {
            warn!(
                path = %path.display(),
                offset = loaded.offset,
                radius = loaded.radius,
                "lens offset exceeds radius"
            );
        }

        debug!(
            path = %path.display(),
            radius = loaded.radius,
            offset = loaded.offset,
            center = ?loaded.center,
            "loaded calibration"
        );

        *self = loaded;
        Ok(())
    }

    /// Writes all three fields to `path`.
    ///
    /// The record is written to a temporary file next to `path` and renamed
    /// over it, so readers see either the old record or the new one.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = SerdeFormat::from_path(path)?;
        let text = common::serialize(self, format).map_err(Error::ConfigSerialize)?;

        let write_err = |source: std::io::Error| Error::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!(path = %path.display(), ?format, "saved calibration");
        Ok(())
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.radius == 0 {
            return Err("radius must be positive".to_string());
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(format!(
                "offset must be a non-negative number, got {}",
                self.offset
            ));
        }
        Ok(())
    }
}
