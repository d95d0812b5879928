use serde::Serialize;
use std::time::Duration;

use crate::config::SCAN_DEFAULT_FPS;
use crate::error::{Result, ScanError};

/// Sampling rate in frames per second. Always positive and finite, with an
/// interval that fits in a [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanRate {
    fps: f64,
    interval: Duration,
}

impl ScanRate {
    pub fn new(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ScanError::InvalidArgument(format!(
                "scan rate must be a positive number of frames per second, got {fps}"
            )));
        }

        let interval = Duration::try_from_secs_f64(1.0 / fps).map_err(|err| {
            ScanError::InvalidArgument(format!("scan rate {fps} fps is too slow: {err}"))
        })?;

        Ok(Self { fps, interval })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Delay between the end of one tick and the start of the next: `1000 / fps` ms.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for ScanRate {
    fn default() -> Self {
        Self {
            fps: SCAN_DEFAULT_FPS,
            interval: Duration::from_millis(500),
        }
    }
}
