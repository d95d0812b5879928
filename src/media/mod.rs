//! Platform media collaborators: live streams, their tracks, and the
//! device APIs that hand them out.

pub mod provider;

pub use provider::{CameraDevice, MediaProvider};

use async_trait::async_trait;
use image::RgbaImage;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::MediaError;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_error;

/// Anything the frame sampler can pull pixels from.
pub trait FrameSource: Send + Sync {
    /// The frame currently on display, or `None` while the source is not ready.
    fn current_frame(&self) -> Option<RgbaImage>;
}

/// One track of a live stream.
#[async_trait]
pub trait MediaTrack: Send + Sync {
    fn id(&self) -> String;

    /// Stops the track, resolving once the platform reports it stopped.
    async fn stop(&self);
}

/// A live camera stream.
pub trait MediaStream: FrameSource {
    fn id(&self) -> String;
    fn video_tracks(&self) -> Vec<Arc<dyn MediaTrack>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoConstraint {
    /// Any camera; used to trigger the permission prompt.
    Any,
    ExactDevice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConstraints {
    pub audio: bool,
    pub video: VideoConstraint,
}

impl StreamConstraints {
    pub fn any_camera() -> Self {
        Self {
            audio: false,
            video: VideoConstraint::Any,
        }
    }

    pub fn exact_device(device_id: impl Into<String>) -> Self {
        Self {
            audio: false,
            video: VideoConstraint::ExactDevice(device_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
    /// Any other platform kind string, e.g. the legacy source list's `"video"`.
    Other(String),
}

/// A device as reported by the platform, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub label: String,
    pub kind: DeviceKind,
}

impl DeviceInfo {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Enumeration plus constraint-based stream requests.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn get_user_media(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Arc<dyn MediaStream>, MediaError>;

    async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, MediaError>;
}

/// Older single-call API: streams are requested by a source id hint and
/// sources are listed through a callback that cannot fail.
#[async_trait]
pub trait LegacyUserMedia: Send + Sync {
    async fn get_user_media(&self, source_id: &str) -> Result<Arc<dyn MediaStream>, MediaError>;

    async fn get_sources(&self) -> Vec<DeviceInfo>;
}

/// Stops every video track of `stream` concurrently and waits for all of
/// them. Returns how many tracks were stopped.
pub async fn stop_all_tracks(stream: &dyn MediaStream) -> usize {
    let tracks = stream.video_tracks();
    let total = tracks.len();

    let mut pending = JoinSet::new();
    for track in tracks {
        pending.spawn(async move { track.stop().await });
    }

    while let Some(joined) = pending.join_next().await {
        if let Err(err) = joined {
            log_error!("track stop task failed for stream {}: {err:?}", stream.id());
        }
    }

    total
}
