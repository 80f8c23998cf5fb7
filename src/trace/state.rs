//! Tracing session types
//!
//! Rows and events are immutable once created; the recorder only appends them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Interpretation mode for incoming pointer samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Searching for the outline; the first touch close enough locks the start
    #[default]
    WaitingForStart,
    /// Start locked, samples extend the trace
    Tracing,
}

/// Kind of pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    /// Finger down or moving
    Move,
    /// Finger lifted (gesture end)
    Lift,
}

/// A single pointer sample with its timestamp (ms, non-decreasing)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub pos: Vec2,
    pub t_ms: u64,
    pub kind: PointerKind,
}

impl PointerSample {
    pub fn moved(x: f32, y: f32, t_ms: u64) -> Self {
        Self {
            pos: Vec2::new(x, y),
            t_ms,
            kind: PointerKind::Move,
        }
    }

    pub fn lifted(x: f32, y: f32, t_ms: u64) -> Self {
        Self {
            pos: Vec2::new(x, y),
            t_ms,
            kind: PointerKind::Lift,
        }
    }
}

/// One time-series sample recorded while tracing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionRow {
    /// Milliseconds since the attempt started
    pub elapsed_ms: u64,
    pub x: f32,
    pub y: f32,
    pub on_path: bool,
    pub distance: f32,
    /// True once any vertex has been hit during the attempt
    pub vertex_hit: bool,
    pub coverage: f32,
}

/// Interaction event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Start,
    Progress,
    Vertex,
    OffpathPrompt,
    Reset,
    Back,
    Complete,
}

impl EventKind {
    /// Name written to the attempt record
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Progress => "progress",
            EventKind::Vertex => "vertex",
            EventKind::OffpathPrompt => "offpath_prompt",
            EventKind::Reset => "reset",
            EventKind::Back => "back",
            EventKind::Complete => "complete",
        }
    }
}

/// A discrete interaction event (e.g. vertex `v=3`, progress `50`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub elapsed_ms: u64,
    pub kind: EventKind,
    pub value: Option<String>,
}

impl SessionEvent {
    pub fn new(elapsed_ms: u64, kind: EventKind) -> Self {
        Self {
            elapsed_ms,
            kind,
            value: None,
        }
    }

    pub fn with_value(elapsed_ms: u64, kind: EventKind, value: impl Into<String>) -> Self {
        Self {
            elapsed_ms,
            kind,
            value: Some(value.into()),
        }
    }

    /// True for a `complete` event carrying "success"
    pub fn is_success(&self) -> bool {
        self.kind == EventKind::Complete && self.value.as_deref() == Some(COMPLETE_SUCCESS)
    }
}

/// `complete` event values
pub const COMPLETE_SUCCESS: &str = "success";
pub const COMPLETE_INCOMPLETE: &str = "incomplete";

/// What a processed sample meant to the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Still waiting for the start lock
    Waiting { distance: f32 },
    /// Start locked onto the outline at `anchor`
    Started { anchor: Vec2 },
    /// Tracing sample processed; coverage is pushed on every one
    Traced {
        coverage: f32,
        distance: f32,
        on_path: bool,
    },
    /// Gesture ended before a start lock
    LiftedBeforeStart,
    /// Gesture ended and both completion criteria held
    Completed { coverage: f32 },
    /// Gesture ended without meeting the completion criteria
    Incomplete { coverage: f32, stroke_length: f32 },
    /// Completion was already signalled for this attempt
    AlreadyCompleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_detection() {
        assert!(SessionEvent::with_value(5, EventKind::Complete, "success").is_success());
        assert!(!SessionEvent::with_value(5, EventKind::Complete, "incomplete").is_success());
        assert!(!SessionEvent::with_value(5, EventKind::Progress, "success").is_success());
        assert!(!SessionEvent::new(5, EventKind::Complete).is_success());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::OffpathPrompt.as_str(), "offpath_prompt");
        assert_eq!(EventKind::Complete.as_str(), "complete");
    }
}
