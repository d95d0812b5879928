//! Capture pipeline for scanning QR codes from a camera or a still image.
//!
//! A [`CaptureSession`] acquires a live stream, works out which part of each
//! frame to look at, samples that region into a decode buffer at a bounded
//! rate and hands the buffer to a [`QrDecoder`]. Still images are fitted to
//! the viewport and decoded once. Platform pieces (camera APIs, the host
//! element, the symbol decoder) are injected through traits.

pub mod config;
pub mod decode;
pub mod error;
pub mod geometry;
pub mod image_loader;
pub mod media;
pub mod sampler;
pub mod session;
pub mod surface;
mod utils;

pub use config::{ScanConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH, MIN_QR_BOX_SIZE, SCAN_DEFAULT_FPS};
#[cfg(feature = "rqrr")]
pub use decode::RqrrDecoder;
pub use decode::QrDecoder;
pub use error::{DecodeFailure, MediaError, Result, ScanError};
pub use geometry::{compute_focus_region, compute_scale_fit, Region, ViewportSize};
pub use image_loader::{FsImageLoader, ImageLoader, ImageSource};
pub use media::{CameraDevice, MediaProvider};
pub use sampler::{FrameSampler, ScanRate};
pub use session::{CaptureSession, SessionSnapshot, SessionStatus};
pub use surface::{HeadlessSurface, RenderSurface};

/// Installs `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
