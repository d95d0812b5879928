use chrono::Utc;
use image::{imageops, imageops::FilterType, RgbaImage};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ScanConfig;
use crate::decode::QrDecoder;
use crate::error::{Result, ScanError};
use crate::geometry::{compute_scale_fit, compute_scan_region, shaded_regions, Region, ViewportSize};
use crate::image_loader::{FsImageLoader, ImageLoader, ImageSource};
use crate::media::{stop_all_tracks, CameraDevice, MediaProvider, MediaStream};
use crate::sampler::{FrameCallback, FrameSampler, ScanRate};
use crate::surface::{
    ElementId, RenderSurface, SurfaceElement, DECODE_CANVAS_ID, VISIBLE_CANVAS_ID,
};

use super::{SessionSnapshot, SessionState, SessionStatus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Receives the text of every successfully decoded frame.
pub type ResultCallback = Box<dyn FnMut(String) + Send + 'static>;
/// Receives a message for every frame that did not decode.
pub type ErrorCallback = Box<dyn FnMut(String) + Send + 'static>;

/// Scans QR codes from a camera or a still image into one render surface.
///
/// Operations take `&mut self`, so start, stop and image scans on one
/// session are serialised by the borrow checker. Camera scanning and image
/// scanning exclude each other.
///
/// Dropping a session that still holds the camera cancels sampling,
/// detaches its elements and frees the surface at once; track stops are
/// spawned onto the current tokio runtime.
pub struct CaptureSession {
    surface: Arc<dyn RenderSurface>,
    media: MediaProvider,
    decoder: Arc<dyn QrDecoder>,
    image_loader: Arc<dyn ImageLoader>,
    state: SessionState,
    sampler: FrameSampler,
    stream: Option<Arc<dyn MediaStream>>,
    attached: Vec<ElementId>,
    holds_surface: bool,
}

impl CaptureSession {
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        media: MediaProvider,
        decoder: Arc<dyn QrDecoder>,
    ) -> Self {
        Self {
            surface,
            media,
            decoder,
            image_loader: Arc::new(FsImageLoader),
            state: SessionState::new(),
            sampler: FrameSampler::new(),
            stream: None,
            attached: Vec::new(),
            holds_surface: false,
        }
    }

    pub fn with_image_loader(mut self, image_loader: Arc<dyn ImageLoader>) -> Self {
        self.image_loader = image_loader;
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            frames_sampled: self.sampler.frames_sampled(),
        }
    }

    /// Current surface size, with defaults for unreported axes.
    pub fn viewport(&self) -> ViewportSize {
        let (width, height) = self.surface.client_size();
        ViewportSize::resolve(width, height)
    }

    /// Starts scanning the camera `device_id`.
    ///
    /// Resolves once the stream is attached and the first sampling tick is
    /// scheduled. Decode misses go to `on_error` (or the debug log when
    /// `None`) and never stop the scan. Argument and geometry errors are
    /// returned before anything is acquired.
    pub async fn start(
        &mut self,
        device_id: &str,
        config: &ScanConfig,
        on_result: ResultCallback,
        on_error: Option<ErrorCallback>,
    ) -> Result<()> {
        if device_id.trim().is_empty() {
            return Err(ScanError::InvalidArgument("device id is required".into()));
        }
        config.validate()?;
        let rate = ScanRate::new(config.fps)?;

        self.state.ensure_can_start()?;

        let viewport = self.viewport();
        let region = compute_scan_region(viewport, config.box_size)?;

        self.acquire_surface()?;
        self.surface.clear();
        self.attached.clear();

        let run_id = Uuid::new_v4().to_string();
        self.state
            .begin_start(run_id.clone(), device_id.to_string(), region, Utc::now());

        let stream = match self.media.request_stream(device_id).await {
            Ok(stream) => stream,
            Err(err) => {
                log_warn!("scan {run_id}: could not acquire camera {device_id}: {err}");
                self.release_surface();
                self.state.reset();
                return Err(err);
            }
        };

        self.attach_camera_elements(viewport, region, &stream);
        self.stream = Some(stream.clone());

        let on_frame = decode_each_frame(self.decoder.clone(), on_result, on_error);
        if let Err(err) = self.sampler.start_sampling(stream, region, rate, on_frame) {
            log_error!("scan {run_id}: sampler failed to start: {err}");
            self.teardown().await;
            return Err(err);
        }

        self.state.mark_scanning();
        log_info!(
            "scan {run_id} started on camera {device_id}: region {}x{} at ({}, {}), {} fps",
            region.width,
            region.height,
            region.x,
            region.y,
            rate.fps()
        );
        Ok(())
    }

    /// Stops camera scanning and releases everything `start` acquired.
    ///
    /// Sampling is fully halted before the stream is touched; resolves once
    /// every video track has stopped.
    pub async fn stop(&mut self) -> Result<()> {
        self.state.ensure_can_stop()?;
        self.state.begin_stop();
        self.teardown().await;
        Ok(())
    }

    /// Decodes a single still image.
    ///
    /// The image is fitted into the viewport, optionally shown on the
    /// surface, and the fitted pixels are decoded once.
    pub async fn scan_static(&mut self, source: &ImageSource, config: &ScanConfig) -> Result<String> {
        self.state.ensure_idle_for("scan an image")?;

        self.acquire_surface()?;

        let outcome = self.scan_image(source, config.show_image).await;
        self.release_surface();
        outcome
    }

    /// Empties the render surface. Not allowed while camera scanning.
    pub fn clear(&mut self) -> Result<()> {
        self.state.ensure_idle_for("clear the surface")?;
        self.surface.clear();
        self.attached.clear();
        Ok(())
    }

    /// Cameras available to [`start`](Self::start), in platform order.
    pub async fn list_sources(&self) -> Result<Vec<CameraDevice>> {
        self.media.list_cameras().await
    }

    fn attach_camera_elements(
        &mut self,
        viewport: ViewportSize,
        region: Region,
        stream: &Arc<dyn MediaStream>,
    ) {
        let (width, height) = viewport.pixel_size();
        let decode = region.to_pixels();

        self.attached.push(self.surface.append(SurfaceElement::Video {
            width,
            height,
            stream: stream.clone(),
        }));
        self.attached.push(self.surface.append(SurfaceElement::Canvas {
            id: DECODE_CANVAS_ID,
            width: decode.width,
            height: decode.height,
            visible: false,
            content: None,
        }));

        if let Some(shades) = shaded_regions(viewport, region) {
            for shade in shades {
                self.attached
                    .push(self.surface.append(SurfaceElement::Shade(shade)));
            }
        }
    }

    async fn teardown(&mut self) {
        let run_id = self.state.run_id.clone().unwrap_or_default();

        if let Err(err) = self.sampler.stop_sampling().await {
            log_error!("scan {run_id}: {err:?}");
        }

        if let Some(stream) = self.stream.take() {
            let stopped = stop_all_tracks(stream.as_ref()).await;
            log_info!("scan {run_id}: stopped {stopped} video tracks");
        }

        for id in self.attached.drain(..) {
            self.surface.remove(id);
        }

        self.release_surface();
        self.state.reset();
    }

    // Re-entrant: a scan future dropped half-way leaves the claim with
    // this session, and the next call picks it up again.
    fn acquire_surface(&mut self) -> Result<()> {
        if !self.holds_surface {
            if !self.surface.try_acquire() {
                return Err(ScanError::InvalidState(
                    "render surface is already in use by another session".into(),
                ));
            }
            self.holds_surface = true;
        }
        Ok(())
    }

    fn release_surface(&mut self) {
        if self.holds_surface {
            self.surface.release();
            self.holds_surface = false;
        }
    }

    async fn scan_image(&mut self, source: &ImageSource, show_image: bool) -> Result<String> {
        self.surface.clear();
        self.attached.clear();

        let image = self.image_loader.load(source).await?;
        let viewport = self.viewport();
        let (image_width, image_height) = image.dimensions();
        let fit = compute_scale_fit(viewport, f64::from(image_width), f64::from(image_height));
        let placement = fit.to_pixels();

        let fitted = imageops::resize(&image, placement.width, placement.height, FilterType::Triangle);

        if show_image {
            let (width, height) = viewport.pixel_size();
            let mut visible = RgbaImage::new(width, height);
            imageops::overlay(
                &mut visible,
                &fitted,
                i64::from(placement.x),
                i64::from(placement.y),
            );
            self.attached.push(self.surface.append(SurfaceElement::Canvas {
                id: VISIBLE_CANVAS_ID,
                width,
                height,
                visible: true,
                content: Some(visible),
            }));
        }

        let decoded = self.decoder.decode(&fitted);

        self.attached.push(self.surface.append(SurfaceElement::Canvas {
            id: DECODE_CANVAS_ID,
            width: placement.width,
            height: placement.height,
            visible: false,
            content: Some(fitted),
        }));

        decoded.map_err(|err| ScanError::Decode(format!("QR code parse error, error = {err}")))
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.sampler.cancel();

        if let Some(stream) = self.stream.take() {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        let stopped = stop_all_tracks(stream.as_ref()).await;
                        log_info!("dropped session: stopped {stopped} video tracks");
                    });
                }
                Err(_) => log_warn!(
                    "session dropped outside a tokio runtime, stream {} left running",
                    stream.id()
                ),
            }
        }

        for id in self.attached.drain(..) {
            self.surface.remove(id);
        }
        self.release_surface();
    }
}

fn decode_each_frame(
    decoder: Arc<dyn QrDecoder>,
    mut on_result: ResultCallback,
    mut on_error: Option<ErrorCallback>,
) -> FrameCallback {
    Box::new(move |buffer: &RgbaImage| match decoder.decode(buffer) {
        Ok(text) => on_result(text),
        Err(err) => {
            let message = format!("QR code parse error, error = {err}");
            match on_error.as_mut() {
                Some(report) => report(message),
                None => log_debug!("{message}"),
            }
        }
    })
}
