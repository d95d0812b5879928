use crate::config::MIN_QR_BOX_SIZE;
use crate::error::{Result, ScanError};

use super::{Region, ViewportSize};

/// Centres a square focus box of side `box_size` inside the viewport.
pub fn compute_focus_region(viewport: ViewportSize, box_size: f64) -> Result<Region> {
    if !box_size.is_finite() || box_size < MIN_QR_BOX_SIZE {
        return Err(ScanError::Configuration(format!(
            "minimum size of 'boxSize' is {MIN_QR_BOX_SIZE}px."
        )));
    }

    if box_size > viewport.width || box_size > viewport.height {
        return Err(ScanError::Configuration(
            "'boxSize' should not be greater than the width and height of the render surface."
                .into(),
        ));
    }

    Ok(Region {
        x: (viewport.width - box_size) / 2.0,
        y: (viewport.height - box_size) / 2.0,
        width: box_size,
        height: box_size,
    })
}

/// Region sampled on every tick: the focus box if one is configured,
/// otherwise the whole viewport.
pub fn compute_scan_region(viewport: ViewportSize, box_size: Option<f64>) -> Result<Region> {
    match box_size {
        Some(size) => compute_focus_region(viewport, size),
        None => Ok(viewport.full_region()),
    }
}
