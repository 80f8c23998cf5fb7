//! Tracing interaction engine
//!
//! Pointer samples flow through [`TraceSession`], which consults the hit
//! tester and coverage tracker, drives feedback, and logs rows/events into
//! its [`SessionRecorder`](crate::record::SessionRecorder). The session never
//! reads a clock: every sample carries its own timestamp.

pub mod coverage;
pub mod hit;
pub mod session;
pub mod state;

pub use coverage::{CoverageTracker, estimate_coverage};
pub use hit::{HitResult, distance_and_hit};
pub use session::TraceSession;
pub use state::{EventKind, Phase, PointerKind, PointerSample, SessionEvent, SessionRow, StepOutcome};
