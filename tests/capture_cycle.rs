use async_trait::async_trait;
use image::{ImageFormat, Luma, Rgba, RgbaImage};
use qrcapture::media::{
    DeviceInfo, DeviceKind, FrameSource, MediaDevices, MediaStream, MediaTrack, StreamConstraints,
};
use qrcapture::surface::ElementKind;
use qrcapture::{
    CaptureSession, DecodeFailure, HeadlessSurface, ImageSource, MediaError, MediaProvider,
    ScanConfig, ScanError, SessionStatus,
};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

/// Counts how many tracks were handed out and how many were stopped.
#[derive(Default)]
struct TrackHooks {
    created: AtomicUsize,
    stopped: AtomicUsize,
}

struct HookedTrack {
    hooks: Arc<TrackHooks>,
}

#[async_trait]
impl MediaTrack for HookedTrack {
    fn id(&self) -> String {
        "hooked".into()
    }

    async fn stop(&self) {
        sleep(Duration::from_millis(20)).await;
        self.hooks.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

struct HookedStream {
    frame: RgbaImage,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl FrameSource for HookedStream {
    fn current_frame(&self) -> Option<RgbaImage> {
        Some(self.frame.clone())
    }
}

impl MediaStream for HookedStream {
    fn id(&self) -> String {
        "hooked-stream".into()
    }

    fn video_tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        self.tracks.clone()
    }
}

struct HookedCamera {
    hooks: Arc<TrackHooks>,
    tracks_per_stream: usize,
}

#[async_trait]
impl MediaDevices for HookedCamera {
    async fn get_user_media(
        &self,
        _constraints: StreamConstraints,
    ) -> Result<Arc<dyn MediaStream>, MediaError> {
        let tracks = (0..self.tracks_per_stream)
            .map(|_| {
                self.hooks.created.fetch_add(1, Ordering::SeqCst);
                Arc::new(HookedTrack {
                    hooks: self.hooks.clone(),
                }) as Arc<dyn MediaTrack>
            })
            .collect();

        Ok(Arc::new(HookedStream {
            frame: RgbaImage::from_pixel(640, 480, Rgba([40, 40, 40, 255])),
            tracks,
        }))
    }

    async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, MediaError> {
        Ok(vec![
            DeviceInfo::new("cam-1", "Integrated Camera", DeviceKind::VideoInput),
            DeviceInfo::new("mic-1", "Integrated Microphone", DeviceKind::AudioInput),
        ])
    }
}

fn never_decodes() -> Arc<dyn qrcapture::QrDecoder> {
    Arc::new(|_: &RgbaImage| Err::<String, _>(DecodeFailure::new("No QR code found")))
}

#[tokio::test(start_paused = true)]
async fn start_sample_stop_releases_everything() {
    let hooks = Arc::new(TrackHooks::default());
    let camera = Arc::new(HookedCamera {
        hooks: hooks.clone(),
        tracks_per_stream: 2,
    });
    let surface = Arc::new(HeadlessSurface::new(640, 480));
    let mut session = CaptureSession::new(
        surface.clone(),
        MediaProvider::new().with_media_devices(camera),
        never_decodes(),
    );

    let misses = Arc::new(Mutex::new(0usize));
    let counter = misses.clone();
    let config = ScanConfig::new().with_fps(10.0).with_box_size(250.0);

    session
        .start(
            "cam-1",
            &config,
            Box::new(|text: String| panic!("unexpected decode: {text}")),
            Some(Box::new(move |_: String| *counter.lock().unwrap() += 1)),
        )
        .await
        .unwrap();

    assert_eq!(surface.count_of(ElementKind::Shade), 4);

    while session.snapshot().frames_sampled < 10 {
        sleep(Duration::from_millis(100)).await;
    }
    session.stop().await.unwrap();

    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(surface.element_count(), 0);
    assert_eq!(hooks.created.load(Ordering::SeqCst), 2);
    assert_eq!(hooks.stopped.load(Ordering::SeqCst), 2);
    assert!(*misses.lock().unwrap() >= 10);

    // Sampling stays halted after stop.
    let sampled = session.snapshot().frames_sampled;
    sleep(Duration::from_secs(2)).await;
    assert_eq!(session.snapshot().frames_sampled, sampled);

    // A stopped session can be started again.
    session
        .start("cam-1", &config, Box::new(|_: String| {}), None)
        .await
        .unwrap();
    session.stop().await.unwrap();
    assert_eq!(hooks.stopped.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn lists_only_cameras() {
    let camera = Arc::new(HookedCamera {
        hooks: Arc::new(TrackHooks::default()),
        tracks_per_stream: 1,
    });
    let session = CaptureSession::new(
        Arc::new(HeadlessSurface::new(300, 300)),
        MediaProvider::new().with_media_devices(camera),
        never_decodes(),
    );

    let cameras = session.list_sources().await.unwrap();
    assert_eq!(cameras.len(), 1);
    assert_eq!(cameras[0].label, "Integrated Camera");
}

fn qr_png(payload: &str) -> Vec<u8> {
    let code = qrcode::QrCode::new(payload.as_bytes()).unwrap();
    let image = code.render::<Luma<u8>>().quiet_zone(true).build();
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[cfg(feature = "rqrr")]
#[tokio::test]
async fn still_image_is_decoded_with_rqrr() {
    let surface = Arc::new(HeadlessSurface::new(400, 400));
    let mut session = CaptureSession::new(
        surface.clone(),
        MediaProvider::new(),
        Arc::new(qrcapture::RqrrDecoder),
    );

    let text = session
        .scan_static(
            &ImageSource::Bytes(qr_png("hello from a still image")),
            &ScanConfig::new(),
        )
        .await
        .unwrap();

    assert_eq!(text, "hello from a still image");
    assert_eq!(surface.count_of(ElementKind::Canvas), 2);
}

#[cfg(feature = "rqrr")]
#[tokio::test]
async fn still_image_file_is_decoded_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("code.png");
    std::fs::write(&path, qr_png("https://example.com/from-disk")).unwrap();

    let surface = Arc::new(HeadlessSurface::new(0, 0));
    let mut session = CaptureSession::new(
        surface,
        MediaProvider::new(),
        Arc::new(qrcapture::RqrrDecoder),
    );

    let text = session
        .scan_static(&ImageSource::Path(path), &ScanConfig::new().with_show_image(false))
        .await
        .unwrap();
    assert_eq!(text, "https://example.com/from-disk");
}

#[tokio::test]
async fn camera_start_without_platform_support() {
    let mut session = CaptureSession::new(
        Arc::new(HeadlessSurface::new(300, 300)),
        MediaProvider::new(),
        never_decodes(),
    );

    let err = session
        .start("cam-1", &ScanConfig::new(), Box::new(|_: String| {}), None)
        .await
        .unwrap_err();
    assert_eq!(err, ScanError::UnsupportedPlatform);
    assert_eq!(session.status(), SessionStatus::Idle);
}
