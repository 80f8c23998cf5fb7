//! Per-attempt telemetry
//!
//! The recorder accumulates sample rows and interaction events in arrival
//! order. Finalizing an attempt derives its metrics and appends it to a single
//! growing CSV store (`summary`, then `event` rows, then `sample` rows).

pub mod csv;
pub mod metrics;

pub use csv::{AttemptRecord, HEADER, RecordStore};
pub use metrics::AttemptMetrics;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::geometry::ShapeKind;
use crate::trace::{SessionEvent, SessionRow};

/// Participant id written when none is given
pub const ANONYMOUS_PARTICIPANT: &str = "anon";

/// Attempt-level context written on every record row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptMeta {
    pub shape: ShapeKind,
    pub eyes_free: bool,
    pub tolerance_band: f32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub participant_id: Option<String>,
}

/// Device/platform strings for the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub model: String,
    pub os: String,
}

impl DeviceInfo {
    pub fn new(model: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            os: os.into(),
        }
    }

    /// Description of the machine this process runs on
    pub fn host() -> Self {
        Self::new(std::env::consts::ARCH, std::env::consts::OS)
    }
}

/// Append-only log of one attempt's rows and events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecorder {
    rows: Vec<SessionRow>,
    events: Vec<SessionEvent>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: SessionRow) {
        self.rows.push(row);
    }

    pub fn add_event(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn rows(&self) -> &[SessionRow] {
        &self.rows
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Drop the time series (a reset starts a fresh trace); events are kept
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// Discard everything
    pub fn clear(&mut self) {
        self.rows.clear();
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.events.is_empty()
    }

    pub fn metrics(&self) -> AttemptMetrics {
        AttemptMetrics::from_log(&self.rows, &self.events)
    }

    /// Build the finished record, stamped with `now`
    pub fn finalize(
        &self,
        meta: &AttemptMeta,
        device: &DeviceInfo,
        now: DateTime<Utc>,
    ) -> Result<AttemptRecord, RecordError> {
        if self.rows.is_empty() {
            return Err(RecordError::EmptyAttempt);
        }
        Ok(AttemptRecord {
            attempt_id: now.timestamp(),
            timestamp: now,
            meta: meta.clone(),
            device: device.clone(),
            metrics: self.metrics(),
            events: self.events.clone(),
            rows: self.rows.clone(),
        })
    }

    /// Finalize and append to `store`
    ///
    /// Failures are logged and reported as `None`; the session carries on.
    pub fn append_attempt(
        &self,
        store: &RecordStore,
        meta: &AttemptMeta,
        device: &DeviceInfo,
    ) -> Option<PathBuf> {
        let result = self
            .finalize(meta, device, Utc::now())
            .and_then(|record| store.append(&record));
        match result {
            Ok(()) => {
                log::info!(
                    "Attempt appended to {} ({} samples, {} events)",
                    store.path().display(),
                    self.rows.len(),
                    self.events.len()
                );
                Some(store.path().to_path_buf())
            }
            Err(RecordError::EmptyAttempt) => {
                log::warn!("Attempt has no samples, nothing recorded");
                None
            }
            Err(e) => {
                log::error!("Failed to append attempt: {}", e);
                None
            }
        }
    }
}
