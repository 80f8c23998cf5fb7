//! Attempt-level derived metrics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polyline_length;
use crate::trace::{EventKind, SessionEvent, SessionRow};

/// Summary of one attempt's rows and events
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttemptMetrics {
    /// Elapsed time of the last row
    pub duration_ms: u64,
    /// Coverage of the last row
    pub final_coverage: f32,
    pub samples: usize,
    pub onpath_ms: u64,
    pub offpath_ms: u64,
    /// Length of the recorded trace
    pub path_length: f32,
    pub vertices_hit: usize,
    pub resets: usize,
    pub back_actions: usize,
    pub success: bool,
}

impl AttemptMetrics {
    pub fn from_log(rows: &[SessionRow], events: &[SessionEvent]) -> Self {
        let (onpath_ms, offpath_ms) = on_off_path_durations(rows);
        let points: Vec<Vec2> = rows.iter().map(|r| Vec2::new(r.x, r.y)).collect();
        let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

        Self {
            duration_ms: rows.last().map_or(0, |r| r.elapsed_ms),
            final_coverage: rows.last().map_or(0.0, |r| r.coverage),
            samples: rows.len(),
            onpath_ms,
            offpath_ms,
            path_length: polyline_length(&points),
            vertices_hit: count(EventKind::Vertex),
            resets: count(EventKind::Reset),
            back_actions: count(EventKind::Back),
            success: events.iter().any(SessionEvent::is_success),
        }
    }
}

/// Each inter-sample interval is credited to the earlier row's on-path state
fn on_off_path_durations(rows: &[SessionRow]) -> (u64, u64) {
    rows.windows(2).fold((0, 0), |(on, off), w| {
        let dt = w[1].elapsed_ms.saturating_sub(w[0].elapsed_ms);
        if w[0].on_path {
            (on + dt, off)
        } else {
            (on, off + dt)
        }
    })
}
