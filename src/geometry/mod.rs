//! Pure geometry for the capture pipeline: which part of a frame gets
//! sampled, how a still image is fitted to the viewport, and where the
//! shading overlays go.

pub mod focus;
pub mod region;
pub mod scale_fit;
pub mod shading;

pub use focus::{compute_focus_region, compute_scan_region};
pub use region::{PixelRect, Region, ViewportSize};
pub use scale_fit::{compute_scale_fit, scale_fit, ScaleFit};
pub use shading::{shaded_regions, ShadePosition, ShadeRect, SHADED_REGION_CLASSNAME, SHADE_COLOR};
