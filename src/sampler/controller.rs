use anyhow::{Context, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ScanError;
use crate::geometry::Region;
use crate::media::FrameSource;

use super::loop_worker::sampling_loop;
use super::{FrameCallback, ScanRate};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Owns the background sampling task.
pub struct FrameSampler {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    frames_sampled: Arc<AtomicU64>,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            frames_sampled: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.handle.is_some()
    }

    /// Frames copied into the decode buffer since the last start.
    pub fn frames_sampled(&self) -> u64 {
        self.frames_sampled.load(Ordering::SeqCst)
    }

    /// Spawns the sampling loop on the current tokio runtime. The first tick
    /// runs immediately.
    pub fn start_sampling<S>(
        &mut self,
        source: Arc<S>,
        region: Region,
        rate: ScanRate,
        on_frame: FrameCallback,
    ) -> Result<(), ScanError>
    where
        S: FrameSource + ?Sized + 'static,
    {
        if self.handle.is_some() {
            return Err(ScanError::InvalidState("sampling already active".into()));
        }

        let pixels = region.to_pixels();
        log_info!(
            "sampling {}x{} at ({}, {}) every {:?}",
            pixels.width,
            pixels.height,
            pixels.x,
            pixels.y,
            rate.interval()
        );

        self.frames_sampled.store(0, Ordering::SeqCst);
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(sampling_loop(
            source,
            pixels,
            rate.interval(),
            on_frame,
            self.frames_sampled.clone(),
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancels the loop and waits for it to exit. A no-op when not sampling.
    pub async fn stop_sampling(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("frame sampling task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }

    /// Cancels the loop without waiting for it to exit, for teardown paths
    /// that cannot await.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.handle = None;
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FrameSampler {
    fn drop(&mut self) {
        self.cancel();
    }
}
