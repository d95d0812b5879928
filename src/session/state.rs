use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::geometry::Region;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Starting,
    Scanning,
    Stopping,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: SessionStatus,
    /// Fresh for every camera start; ties log lines of one run together.
    pub run_id: Option<String>,
    pub device_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub region: Option<Region>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera start is only allowed from `Idle`; a running session is never
    /// silently replaced.
    pub fn ensure_can_start(&self) -> Result<()> {
        match self.status {
            SessionStatus::Idle => Ok(()),
            other => Err(ScanError::InvalidState(format!(
                "cannot start scanning while {other:?}, stop the current scan first"
            ))),
        }
    }

    /// `Starting` is accepted so a start that was abandoned half-way can be
    /// torn down; `Stopping` so an interrupted stop can be finished.
    pub fn ensure_can_stop(&self) -> Result<()> {
        match self.status {
            SessionStatus::Idle => Err(ScanError::InvalidState(
                "cannot stop, scanner is not running".into(),
            )),
            SessionStatus::Starting | SessionStatus::Scanning | SessionStatus::Stopping => Ok(()),
        }
    }

    /// Guard for operations that must not run alongside camera scanning.
    pub fn ensure_idle_for(&self, operation: &str) -> Result<()> {
        if self.status == SessionStatus::Idle {
            Ok(())
        } else {
            Err(ScanError::InvalidState(format!(
                "cannot {operation} while camera scanning is {:?}, stop it first",
                self.status
            )))
        }
    }

    pub fn begin_start(
        &mut self,
        run_id: String,
        device_id: String,
        region: Region,
        started_at: DateTime<Utc>,
    ) {
        *self = Self {
            status: SessionStatus::Starting,
            run_id: Some(run_id),
            device_id: Some(device_id),
            started_at: Some(started_at),
            region: Some(region),
        };
    }

    pub fn mark_scanning(&mut self) {
        self.status = SessionStatus::Scanning;
    }

    pub fn begin_stop(&mut self) {
        self.status = SessionStatus::Stopping;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Point-in-time view of a session for hosts and logs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub frames_sampled: u64,
}
