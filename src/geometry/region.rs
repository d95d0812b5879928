use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Size of the render surface the pipeline draws into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Builds a viewport from the surface's reported client size.
    ///
    /// Each axis falls back to its default independently when reported as zero.
    pub fn resolve(client_width: u32, client_height: u32) -> Self {
        let width = if client_width == 0 {
            DEFAULT_WIDTH
        } else {
            client_width
        };
        let height = if client_height == 0 {
            DEFAULT_HEIGHT
        } else {
            client_height
        };
        Self::new(f64::from(width), f64::from(height))
    }

    /// The whole viewport as a region anchored at the origin.
    pub fn full_region(&self) -> Region {
        Region {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }

    /// Viewport dimensions rounded to whole pixels, never below 1×1.
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixel_extent(self.width), to_pixel_extent(self.height))
    }
}

/// Rectangle of a source frame, in source coordinates.
///
/// Coordinates stay fractional: a focus box centred in an odd-sized
/// viewport starts on a half pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_at_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Snaps the region onto the pixel grid for copying.
    ///
    /// The origin is floored and the extent rounded, so a half-pixel
    /// offset never shrinks the copied area.
    pub fn to_pixels(&self) -> PixelRect {
        PixelRect {
            x: to_pixel_offset(self.x),
            y: to_pixel_offset(self.y),
            width: to_pixel_extent(self.width),
            height: to_pixel_extent(self.height),
        }
    }
}

/// Integer rectangle used for the actual pixel copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

fn to_pixel_offset(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

fn to_pixel_extent(value: f64) -> u32 {
    if value.is_finite() && value >= 1.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}
