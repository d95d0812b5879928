use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Result, ScanError};

use super::{
    stop_all_tracks, DeviceKind, LegacyUserMedia, MediaDevices, MediaStream, StreamConstraints,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// A camera the session can stream from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
}

/// Capability-probed access to the platform's media APIs.
///
/// The enumeration + constraint API is preferred; the legacy single-call
/// API is only used when the former is absent.
#[derive(Clone, Default)]
pub struct MediaProvider {
    devices: Option<Arc<dyn MediaDevices>>,
    legacy: Option<Arc<dyn LegacyUserMedia>>,
}

impl MediaProvider {
    /// A provider with no platform support at all.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media_devices(mut self, devices: Arc<dyn MediaDevices>) -> Self {
        self.devices = Some(devices);
        self
    }

    pub fn with_legacy(mut self, legacy: Arc<dyn LegacyUserMedia>) -> Self {
        self.legacy = Some(legacy);
        self
    }

    pub fn is_supported(&self) -> bool {
        self.devices.is_some() || self.legacy.is_some()
    }

    /// Opens a live video stream for `device_id`, without audio.
    pub async fn request_stream(&self, device_id: &str) -> Result<Arc<dyn MediaStream>> {
        let requested = if let Some(devices) = &self.devices {
            devices
                .get_user_media(StreamConstraints::exact_device(device_id))
                .await
        } else if let Some(legacy) = &self.legacy {
            legacy.get_user_media(device_id).await
        } else {
            return Err(ScanError::UnsupportedPlatform);
        };

        requested.map_err(|err| {
            log_warn!("stream request for device {device_id} failed: {err}");
            ScanError::MediaAcquisition(format!("Error getting userMedia, error = {err}"))
        })
    }

    /// Lists the available cameras in platform order.
    ///
    /// The modern path opens a throwaway stream first so the platform asks
    /// for permission and fills in device labels.
    pub async fn list_cameras(&self) -> Result<Vec<CameraDevice>> {
        if let Some(devices) = &self.devices {
            log_info!("enumerating cameras via media devices");
            let probe = devices
                .get_user_media(StreamConstraints::any_camera())
                .await
                .map_err(|err| ScanError::Enumeration(err.to_string()))?;

            let enumerated = devices.enumerate_devices().await;
            stop_all_tracks(probe.as_ref()).await;

            let cameras: Vec<CameraDevice> = enumerated
                .map_err(|err| ScanError::Enumeration(err.to_string()))?
                .into_iter()
                .filter(|device| device.kind == DeviceKind::VideoInput)
                .map(|device| CameraDevice {
                    id: device.id,
                    label: device.label,
                })
                .collect();

            log_info!("{} results found", cameras.len());
            return Ok(cameras);
        }

        if let Some(legacy) = &self.legacy {
            log_info!("enumerating cameras via legacy sources");
            let cameras: Vec<CameraDevice> = legacy
                .get_sources()
                .await
                .into_iter()
                .filter(|device| is_legacy_camera(&device.kind))
                .map(|device| CameraDevice {
                    id: device.id,
                    label: device.label,
                })
                .collect();

            log_info!("{} results found", cameras.len());
            return Ok(cameras);
        }

        log_warn!("unable to query supported devices.");
        Err(ScanError::Enumeration(
            "unable to query supported devices.".into(),
        ))
    }
}

/// The legacy source list reports cameras as `"video"` rather than
/// `videoinput`; accept either.
fn is_legacy_camera(kind: &DeviceKind) -> bool {
    match kind {
        DeviceKind::VideoInput => true,
        DeviceKind::Other(raw) => raw == "video",
        _ => false,
    }
}
