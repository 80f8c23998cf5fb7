//! Shape Trace - eyes-free shape tracing engine
//!
//! Core modules:
//! - `geometry`: Shape outlines, arc-length perimeter sampling, vertices
//! - `trace`: Hit-testing, coverage estimation and the tracing state machine
//! - `feedback`: Audio/haptic/speech collaborator seam, tone mapping, speech rate limiting
//! - `record`: Per-attempt telemetry and the CSV attempt record store
//! - `settings`: Tunable thresholds (JSON)

pub mod error;
pub mod feedback;
pub mod geometry;
pub mod record;
pub mod settings;
pub mod trace;

pub use error::{ConfigError, RecordError};
pub use feedback::{FeedbackCommand, FeedbackSink, Priority, RecordingSink};
pub use geometry::{Rect, ShapeKind};
pub use record::{AttemptMeta, DeviceInfo, RecordStore, SessionRecorder};
pub use settings::{ToleranceLevel, TraceConfig};
pub use trace::{Phase, PointerKind, PointerSample, StepOutcome, TraceSession};

use glam::Vec2;

/// Tracing configuration constants (defaults for [`TraceConfig`])
pub mod consts {
    /// Outline resolution used for hit-testing
    pub const HIT_SAMPLES: usize = 360;
    /// Outline resolution used for coverage (coarser than hit-testing)
    pub const COVERAGE_SAMPLES: usize = 180;
    /// A coverage sample counts as visited when a trace point is closer than this
    pub const COVERAGE_VISIT_RADIUS: f32 = 18.0;

    /// Default on-path tolerance band
    pub const TOLERANCE_BAND: f32 = 16.0;
    /// Distance at which a corner/tip counts as touched
    pub const VERTEX_RADIUS: f32 = 24.0;

    /// Start lock accepts anything closer than max(floor, factor * band)
    pub const START_LOCK_FLOOR: f32 = 12.0;
    pub const START_LOCK_BAND_FACTOR: f32 = 0.8;
    /// Discovery tick fires within this multiple of the band before start lock
    pub const DISCOVERY_BAND_FACTOR: f32 = 2.0;

    /// Completion requires this much coverage...
    pub const COMPLETION_COVERAGE: f32 = 0.75;
    /// ...and a stroke at least this fraction of the fitted perimeter
    pub const MIN_STROKE_FRACTION: f32 = 0.40;

    /// Minimum gap between off-path coaching prompts (ms)
    pub const OFFPATH_PROMPT_INTERVAL_MS: u64 = 1200;
    /// Coverage announcement step (percent)
    pub const PROGRESS_STEP: u32 = 25;

    /// Continuous tone (Hz)
    pub const TONE_BASELINE_HZ: f32 = 440.0;
    pub const TONE_SPREAD_HZ: f32 = 140.0;
    pub const VERTEX_TONE_HZ: f32 = 660.0;
    pub const VERTEX_TONE_MS: u64 = 120;

    /// Speech debouncing (ms)
    pub const SPEECH_DUPLICATE_MS: u64 = 800;
    pub const SPEECH_LOW_COOLDOWN_MS: u64 = 1000;
    pub const SPEECH_MEDIUM_COOLDOWN_MS: u64 = 600;
}

/// Total length of an open polyline (sum of consecutive segment lengths)
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_length_empty_and_single() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[Vec2::new(3.0, 4.0)]), 0.0);
    }

    #[test]
    fn test_polyline_length() {
        let pts = [Vec2::ZERO, Vec2::new(3.0, 4.0), Vec2::new(3.0, 10.0)];
        assert!((polyline_length(&pts) - 11.0).abs() < 1e-5);
    }
}
