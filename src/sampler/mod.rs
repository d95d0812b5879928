pub mod controller;
pub mod loop_worker;
pub mod rate;

use image::RgbaImage;

pub use controller::FrameSampler;
pub use rate::ScanRate;

/// Called after every copy with the freshly filled decode buffer.
pub type FrameCallback = Box<dyn FnMut(&RgbaImage) + Send + 'static>;
