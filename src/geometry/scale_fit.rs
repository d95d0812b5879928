use super::{Region, ViewportSize};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Outcome of fitting a source image into a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFit {
    /// Where the image lands in the viewport, and at what size.
    pub region: Region,
    /// Number of fit passes evaluated, including the final one that fit.
    pub passes: u32,
}

/// Fits a `source_width × source_height` image into `viewport`, keeping
/// the aspect ratio and centring the result.
///
/// Non-finite or negative source dimensions are treated as zero.
pub fn compute_scale_fit(viewport: ViewportSize, source_width: f64, source_height: f64) -> Region {
    scale_fit(viewport, source_width, source_height).region
}

/// Same as [`compute_scale_fit`], also reporting how many passes it took.
pub fn scale_fit(viewport: ViewportSize, source_width: f64, source_height: f64) -> ScaleFit {
    fit_pass(
        viewport,
        sanitize(source_width),
        sanitize(source_height),
        1,
    )
}

// Each pass starts over from the current dimensions. Ratios are taken
// before multiplying (`limit / width * height`) so fractional results
// land on the same values every time.
fn fit_pass(viewport: ViewportSize, width: f64, height: f64, pass: u32) -> ScaleFit {
    if width <= viewport.width && height <= viewport.height {
        return ScaleFit {
            region: Region {
                x: (viewport.width - width) / 2.0,
                y: (viewport.height - height) / 2.0,
                width,
                height,
            },
            passes: pass,
        };
    }

    let (mut scaled_width, mut scaled_height) = (width, height);

    if scaled_width > viewport.width {
        scaled_height = viewport.width / scaled_width * scaled_height;
        scaled_width = viewport.width;
    }

    if scaled_height > viewport.height {
        scaled_width = viewport.height / scaled_height * scaled_width;
        scaled_height = viewport.height;
    }

    log_info!(
        "Image downsampled from {}X{} to {}X{}.",
        width,
        height,
        scaled_width,
        scaled_height
    );

    fit_pass(viewport, scaled_width, scaled_height, pass + 1)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
