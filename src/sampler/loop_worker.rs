use image::{imageops, Rgba, RgbaImage};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::geometry::PixelRect;
use crate::media::FrameSource;

use super::FrameCallback;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Runs until `cancel_token` fires.
///
/// A tick copies `region` out of the current frame and hands the buffer to
/// `on_frame`; the next tick is only scheduled once that returns, so ticks
/// never overlap no matter how slow the callback is. Ticks that find no
/// frame are skipped silently.
pub(crate) async fn sampling_loop<S>(
    source: Arc<S>,
    region: PixelRect,
    interval: Duration,
    mut on_frame: FrameCallback,
    frames_sampled: Arc<AtomicU64>,
    cancel_token: CancellationToken,
) where
    S: FrameSource + ?Sized,
{
    let mut buffer = RgbaImage::new(region.width, region.height);

    loop {
        if cancel_token.is_cancelled() {
            break;
        }

        match source.current_frame() {
            Some(frame) => {
                copy_region(&frame, region, &mut buffer);
                on_frame(&buffer);
                frames_sampled.fetch_add(1, Ordering::SeqCst);
            }
            None => log_debug!("no frame available yet, skipping tick"),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel_token.cancelled() => break,
        }
    }

    log_info!(
        "frame sampler shutting down after {} frames",
        frames_sampled.load(Ordering::SeqCst)
    );
}

/// Copies `region` of `frame` into `buffer` at the origin, one pixel to one
/// pixel. Parts of the region outside the frame are left transparent.
pub(crate) fn copy_region(frame: &RgbaImage, region: PixelRect, buffer: &mut RgbaImage) {
    let cropped =
        imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image();

    if cropped.dimensions() != buffer.dimensions() {
        for pixel in buffer.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    imageops::replace(buffer, &cropped, 0, 0);
}
