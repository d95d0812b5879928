//! Decode collaborator. The capture pipeline never looks inside a QR
//! symbol; it hands the sampled buffer to whatever implements [`QrDecoder`].

use image::RgbaImage;

use crate::error::DecodeFailure;

/// Reads a QR symbol out of a decode buffer.
///
/// Called synchronously on every sampled frame, so implementations should
/// fail fast when no symbol is present.
pub trait QrDecoder: Send + Sync {
    fn decode(&self, buffer: &RgbaImage) -> Result<String, DecodeFailure>;
}

impl<F> QrDecoder for F
where
    F: Fn(&RgbaImage) -> Result<String, DecodeFailure> + Send + Sync,
{
    fn decode(&self, buffer: &RgbaImage) -> Result<String, DecodeFailure> {
        self(buffer)
    }
}

/// Decoder backed by the `rqrr` crate. Returns the first symbol that decodes.
#[cfg(feature = "rqrr")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

#[cfg(feature = "rqrr")]
impl QrDecoder for RqrrDecoder {
    fn decode(&self, buffer: &RgbaImage) -> Result<String, DecodeFailure> {
        let gray = image::imageops::grayscale(buffer);
        let (width, height) = gray.dimensions();

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| gray.get_pixel(x as u32, y as u32)[0],
        );

        let grids = prepared.detect_grids();
        if grids.is_empty() {
            return Err(DecodeFailure::new("No QR code found"));
        }

        let mut last_error = None;
        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => return Ok(content),
                Err(err) => last_error = Some(format!("{err:?}")),
            }
        }

        Err(DecodeFailure::new(format!(
            "QR code found but could not be decoded: {}",
            last_error.unwrap_or_default()
        )))
    }
}
