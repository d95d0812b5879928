use async_trait::async_trait;
use image::RgbaImage;
use std::path::PathBuf;

use crate::error::{Result, ScanError};

/// A still image to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG, ...), format sniffed from content.
    Bytes(Vec<u8>),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Turns an [`ImageSource`] into pixels.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &ImageSource) -> Result<RgbaImage>;
}

/// Loads images with the `image` crate on a blocking worker thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

#[async_trait]
impl ImageLoader for FsImageLoader {
    async fn load(&self, source: &ImageSource) -> Result<RgbaImage> {
        let source = source.clone();
        let decoded = tokio::task::spawn_blocking(move || match source {
            ImageSource::Path(path) => image::open(&path)
                .map_err(|err| format!("{}: {err}", path.display())),
            ImageSource::Bytes(bytes) => {
                image::load_from_memory(&bytes).map_err(|err| err.to_string())
            }
        })
        .await
        .map_err(|err| ScanError::ResourceLoad(format!("image decode worker failed: {err}")))?
        .map_err(ScanError::ResourceLoad)?;

        Ok(decoded.to_rgba8())
    }
}
