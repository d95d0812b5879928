use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::ScanError;
use crate::sampler::ScanRate;

/// Viewport width used when the render surface reports zero.
pub const DEFAULT_WIDTH: u32 = 300;
/// Viewport height used when the render surface reports zero.
pub const DEFAULT_HEIGHT: u32 = 300;
pub const SCAN_DEFAULT_FPS: f64 = 2.0;
/// Smallest accepted focus box side.
pub const MIN_QR_BOX_SIZE: f64 = 50.0;

/// Per-call scanning options.
///
/// Camera scanning reads `fps` and `box_size`; still-image scanning reads
/// `show_image`. Unknown JSON fields are ignored so host apps can keep
/// their own keys next to ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    /// Sampling rate in frames per second.
    pub fps: f64,
    /// Side length of the centred focus box; `None` scans the whole viewport.
    #[serde(alias = "qrbox")]
    pub box_size: Option<f64>,
    /// Render the still image on the surface before decoding it.
    pub show_image: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fps: SCAN_DEFAULT_FPS,
            box_size: None,
            show_image: true,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_box_size(mut self, box_size: f64) -> Self {
        self.box_size = Some(box_size);
        self
    }

    pub fn with_show_image(mut self, show_image: bool) -> Self {
        self.show_image = show_image;
        self
    }

    /// Checks the fields that do not depend on the viewport.
    ///
    /// Box size bounds are viewport-relative and are checked by
    /// [`compute_focus_region`](crate::geometry::compute_focus_region).
    pub fn validate(&self) -> Result<(), ScanError> {
        ScanRate::new(self.fps)?;
        if let Some(size) = self.box_size {
            if !size.is_finite() {
                return Err(ScanError::InvalidArgument(format!(
                    "'boxSize' must be a finite number, got {size}"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: ScanConfig =
            serde_json::from_str(contents).context("Failed to parse scan configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scan configuration from {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid scan configuration in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = ScanConfig::default();
        assert_eq!(config.fps, 2.0);
        assert_eq!(config.box_size, None);
        assert!(config.show_image);
    }

    #[test]
    fn json_accepts_qrbox_alias_and_fills_defaults() {
        let config = ScanConfig::from_json_str(r#"{ "qrbox": 250 }"#).unwrap();
        assert_eq!(config.box_size, Some(250.0));
        assert_eq!(config.fps, SCAN_DEFAULT_FPS);
        assert!(config.show_image);

        let config = ScanConfig::from_json_str(r#"{ "fps": 10, "boxSize": 120, "showImage": false }"#)
            .unwrap();
        assert_eq!(config.fps, 10.0);
        assert_eq!(config.box_size, Some(120.0));
        assert!(!config.show_image);
    }

    #[test]
    fn validate_rejects_unusable_fps() {
        for fps in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-300] {
            let err = ScanConfig::new().with_fps(fps).validate().unwrap_err();
            assert!(matches!(err, ScanError::InvalidArgument(_)), "fps {fps}");
        }
    }

    #[test]
    fn from_json_file_reports_path_on_bad_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"fps\": 0 }}").unwrap();

        let err = ScanConfig::from_json_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains(&file.path().display().to_string()));
    }
}
