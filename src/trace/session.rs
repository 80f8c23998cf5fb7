//! Tracing phase state machine
//!
//! One session covers one canvas: it starts waiting for a start lock, traces
//! until the finger lifts, and evaluates completion at every lift. Samples are
//! processed strictly one at a time, each to completion.

use std::path::PathBuf;

use glam::Vec2;

use super::coverage::CoverageTracker;
use super::hit::{HitResult, distance_and_hit_with};
use super::state::{
    COMPLETE_INCOMPLETE, COMPLETE_SUCCESS, EventKind, Phase, PointerKind, PointerSample,
    SessionEvent, SessionRow, StepOutcome,
};
use crate::consts::PROGRESS_STEP;
use crate::feedback::{FeedbackSink, Priority, SpeechGate, ToneMapper};
use crate::geometry::{Rect, ShapeKind};
use crate::polyline_length;
use crate::record::{AttemptMeta, DeviceInfo, RecordStore, SessionRecorder};
use crate::settings::TraceConfig;

const SAY_INSTRUCTIONS: &str =
    "Tap three times anywhere to reset. Tap five times to go back. Tap on the outline to start.";
const SAY_FIND_START: &str = "Tap on the outline to start.";
const SAY_STARTED: &str = "Starting point. Begin tracing.";
const SAY_OFF_PATH: &str = "Try to find the outline.";
const SAY_COMPLETE: &str = "Complete";
const SAY_INCOMPLETE: &str = "Not quite. You can reset with three taps, or try again.";

/// Live tracing session for one shape on one canvas
pub struct TraceSession<F: FeedbackSink> {
    shape: ShapeKind,
    rect: Rect,
    config: TraceConfig,
    band: f32,
    /// Outline at hit-test resolution
    hit_samples: Vec<Vec2>,
    coverage: CoverageTracker,

    feedback: F,
    tone: ToneMapper,
    speech: SpeechGate,

    phase: Phase,
    /// Trace points in arrival order, starting with the snapped start point
    points: Vec<Vec2>,
    last_vertex: Option<usize>,
    /// Highest progress bucket announced (percent)
    last_announced: u32,
    last_prompt_ms: Option<u64>,
    attempt_start_ms: u64,
    completed: bool,
    /// Set once the attempt has been handed to the record store
    finalized: bool,

    recorder: SessionRecorder,
}

impl<F: FeedbackSink> TraceSession<F> {
    /// Mount a session; `rect` must have non-zero area
    pub fn new(shape: ShapeKind, rect: Rect, config: TraceConfig, feedback: F, now_ms: u64) -> Self {
        let band = config.tolerance_band();
        let mut session = Self {
            shape,
            rect,
            band,
            hit_samples: shape.perimeter_samples(rect, config.hit_samples),
            coverage: CoverageTracker::for_shape(
                shape,
                rect,
                config.coverage_samples,
                config.coverage_visit_radius,
            ),
            tone: config.tone_mapper(),
            speech: config.speech_gate(),
            config,
            feedback,
            phase: Phase::WaitingForStart,
            points: Vec::new(),
            last_vertex: None,
            last_announced: 0,
            last_prompt_ms: None,
            attempt_start_ms: now_ms,
            completed: false,
            finalized: false,
            recorder: SessionRecorder::new(),
        };
        log::info!(
            "Tracing session for {} (band {:.1}, eyes-free {})",
            shape.title(),
            band,
            session.config.eyes_free
        );
        if session.config.eyes_free {
            session.say(SAY_INSTRUCTIONS, Priority::Medium, now_ms);
        }
        session
    }

    /// Dispatch a pointer sample by kind
    pub fn handle(&mut self, sample: PointerSample) -> StepOutcome {
        match sample.kind {
            PointerKind::Move => self.pointer_moved(sample.pos, sample.t_ms),
            PointerKind::Lift => self.pointer_lifted(sample.t_ms),
        }
    }

    /// Process a finger-down/move sample
    pub fn pointer_moved(&mut self, pos: Vec2, t_ms: u64) -> StepOutcome {
        match self.phase {
            Phase::WaitingForStart => self.seek_start(pos, t_ms),
            Phase::Tracing => self.trace(pos, t_ms),
        }
    }

    /// Timer hook: revert an elapsed vertex tone while the finger holds still
    pub fn tick(&mut self, now_ms: u64) {
        if let Some(hz) = self.tone.expire(now_ms) {
            self.feedback.set_continuous_parameter(hz);
        }
    }

    /// Gesture end: evaluate completion (or coach when not started yet)
    pub fn pointer_lifted(&mut self, t_ms: u64) -> StepOutcome {
        if self.phase == Phase::WaitingForStart {
            if self.config.eyes_free {
                self.say(SAY_FIND_START, Priority::Medium, t_ms);
            }
            return StepOutcome::LiftedBeforeStart;
        }
        if self.completed {
            return StepOutcome::AlreadyCompleted;
        }

        let coverage = self.coverage.coverage();
        let stroke_length = self.stroke_length();
        let min_stroke = self.config.min_stroke_fraction * self.rect.perimeter();

        if coverage >= self.config.completion_coverage && stroke_length >= min_stroke {
            self.completed = true;
            self.feedback.trigger_success();
            if self.config.eyes_free {
                self.say(SAY_COMPLETE, Priority::High, t_ms);
            }
            self.event(t_ms, EventKind::Complete, Some(COMPLETE_SUCCESS.to_string()));
            log::info!(
                "{} complete: coverage {:.2}, stroke {:.0}",
                self.shape.title(),
                coverage,
                stroke_length
            );
            StepOutcome::Completed { coverage }
        } else {
            self.tone.stop();
            self.feedback.stop_all();
            if self.config.eyes_free {
                self.say(SAY_INCOMPLETE, Priority::High, t_ms);
            }
            self.event(t_ms, EventKind::Complete, Some(COMPLETE_INCOMPLETE.to_string()));
            log::info!(
                "{} incomplete: coverage {:.2}, stroke {:.0} of {:.0}",
                self.shape.title(),
                coverage,
                stroke_length,
                min_stroke
            );
            StepOutcome::Incomplete {
                coverage,
                stroke_length,
            }
        }
    }

    /// Reset request: clear the live trace and wait for a new start lock
    ///
    /// Returns the coverage to show (always 0).
    pub fn reset(&mut self, now_ms: u64) -> f32 {
        self.event(now_ms, EventKind::Reset, None);
        self.tone.stop();
        self.feedback.stop_all();
        self.points.clear();
        self.coverage.reset();
        self.last_vertex = None;
        self.last_announced = 0;
        self.completed = false;
        self.phase = Phase::WaitingForStart;
        self.attempt_start_ms = now_ms;
        self.recorder.clear_rows();
        log::info!("{} attempt reset", self.shape.title());
        self.coverage.coverage()
    }

    /// Navigate-away request; accumulated rows/events are left for the caller
    pub fn back(&mut self, now_ms: u64) {
        self.event(now_ms, EventKind::Back, None);
        self.tone.stop();
        self.feedback.stop_all();
        log::info!("{} session left", self.shape.title());
    }

    /// View teardown: silence all feedback
    pub fn teardown(&mut self) {
        self.tone.stop();
        self.feedback.stop_all();
    }

    /// Append this attempt to the record store, at most once
    ///
    /// Returns the store path, or `None` when nothing was written. Once an
    /// attempt with samples has been handed to the store, later calls return
    /// `None` without writing.
    pub fn finalize(
        &mut self,
        store: &RecordStore,
        screen: (u32, u32),
        participant_id: Option<String>,
        device: &DeviceInfo,
    ) -> Option<PathBuf> {
        if self.finalized {
            log::warn!("{} attempt already finalized", self.shape.title());
            return None;
        }
        let meta = AttemptMeta {
            shape: self.shape,
            eyes_free: self.config.eyes_free,
            tolerance_band: self.band,
            screen_width: screen.0,
            screen_height: screen.1,
            participant_id,
        };
        if !self.recorder.rows().is_empty() {
            self.finalized = true;
        }
        self.recorder.append_attempt(store, &meta, device)
    }

    // === Accessors ===

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn coverage(&self) -> f32 {
        self.coverage.coverage()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Sum of distances between consecutive trace points
    pub fn stroke_length(&self) -> f32 {
        polyline_length(&self.points)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    // === Transitions ===

    fn seek_start(&mut self, pos: Vec2, t_ms: u64) -> StepOutcome {
        let hit = self.hit(pos);

        // Discovery cue while the finger is near the outline
        if hit.distance < self.band * self.config.discovery_band_factor {
            self.feedback.trigger_tick();
        }

        if hit.on_path || hit.distance < self.config.start_lock_distance() {
            self.phase = Phase::Tracing;
            self.attempt_start_ms = t_ms;
            self.points.clear();
            self.points.push(hit.nearest);
            self.coverage.reset();
            self.coverage.visit(hit.nearest);
            self.event(t_ms, EventKind::Start, None);
            self.feedback.trigger_success();
            if self.config.eyes_free {
                self.say(SAY_STARTED, Priority::High, t_ms);
            }
            log::info!(
                "Start locked at ({:.1}, {:.1}), {:.1} from touch",
                hit.nearest.x,
                hit.nearest.y,
                hit.distance
            );
            return StepOutcome::Started {
                anchor: hit.nearest,
            };
        }

        if self.config.eyes_free && self.prompt_due(t_ms) {
            self.last_prompt_ms = Some(t_ms);
            self.say(SAY_FIND_START, Priority::Low, t_ms);
            self.event(t_ms, EventKind::OffpathPrompt, Some("prestart".to_string()));
        }
        StepOutcome::Waiting {
            distance: hit.distance,
        }
    }

    fn trace(&mut self, pos: Vec2, t_ms: u64) -> StepOutcome {
        self.points.push(pos);
        let hit = self.hit(pos);

        // Pitch follows distance; tick while on the outline
        if let Some(hz) = self.tone.update(hit.distance, t_ms) {
            self.feedback.set_continuous_parameter(hz);
        }
        if hit.on_path {
            self.feedback.trigger_tick();
        }

        // Corner earcons, once per corner until another corner is touched
        let new_vertex = self
            .shape
            .nearest_vertex_index(pos, self.rect, self.config.vertex_radius)
            .filter(|idx| Some(*idx) != self.last_vertex);
        if let Some(idx) = new_vertex {
            self.last_vertex = Some(idx);
            let hz = self.tone.vertex_pulse(t_ms);
            self.feedback.trigger_vertex_pulse();
            self.feedback.set_continuous_parameter(hz);
            self.event(t_ms, EventKind::Vertex, Some(format!("v={idx}")));
            log::debug!("Vertex {} hit", idx);
        }

        let coverage = self.coverage.visit(pos);

        if self.config.eyes_free {
            self.announce_progress(coverage, t_ms);
            if !hit.on_path && self.prompt_due(t_ms) {
                self.last_prompt_ms = Some(t_ms);
                self.say(SAY_OFF_PATH, Priority::Low, t_ms);
                self.event(t_ms, EventKind::OffpathPrompt, Some("trace".to_string()));
            }
        }

        self.recorder.add_row(SessionRow {
            elapsed_ms: self.elapsed(t_ms),
            x: pos.x,
            y: pos.y,
            on_path: hit.on_path,
            distance: hit.distance,
            vertex_hit: self.last_vertex.is_some(),
            coverage,
        });

        StepOutcome::Traced {
            coverage,
            distance: hit.distance,
            on_path: hit.on_path,
        }
    }

    /// Announce the highest newly reached 25% bucket
    fn announce_progress(&mut self, coverage: f32, t_ms: u64) {
        let percent = (coverage * 100.0) as u32;
        let bucket = percent / PROGRESS_STEP * PROGRESS_STEP;
        if bucket > self.last_announced && (PROGRESS_STEP..=100).contains(&bucket) {
            self.last_announced = bucket;
            self.say(&format!("{bucket} percent"), Priority::Low, t_ms);
            self.event(t_ms, EventKind::Progress, Some(bucket.to_string()));
            log::debug!("Coverage reached {}%", bucket);
        }
    }

    fn hit(&self, pos: Vec2) -> HitResult {
        distance_and_hit_with(pos, &self.hit_samples, self.band)
    }

    fn prompt_due(&self, t_ms: u64) -> bool {
        self.last_prompt_ms
            .is_none_or(|last| t_ms.saturating_sub(last) >= self.config.offpath_prompt_interval_ms)
    }

    fn say(&mut self, text: &str, priority: Priority, t_ms: u64) {
        if self
            .speech
            .admit(text, priority, t_ms, self.feedback.is_speaking())
        {
            self.feedback.speak(text, priority);
        }
    }

    fn event(&mut self, t_ms: u64, kind: EventKind, value: Option<String>) {
        self.recorder.add_event(SessionEvent {
            elapsed_ms: self.elapsed(t_ms),
            kind,
            value,
        });
    }

    fn elapsed(&self, t_ms: u64) -> u64 {
        t_ms.saturating_sub(self.attempt_start_ms)
    }
}
