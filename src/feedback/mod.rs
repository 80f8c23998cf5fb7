//! Audio/haptic/speech feedback
//!
//! The tracing engine never synthesizes sound itself. It drives a
//! [`FeedbackSink`] collaborator with fire-and-forget commands; platform code
//! implements the sink on top of its audio engine, haptics and speech
//! synthesizer.

pub mod speech;
pub mod tone;

pub use speech::{Priority, SpeechGate};
pub use tone::{SharedTone, ToneMapper};

/// The feedback collaborator
pub trait FeedbackSink {
    /// Continuous oscillator parameter (frequency in Hz)
    fn set_continuous_parameter(&mut self, value: f32);
    /// Light tactile tick (on-path / near outline)
    fn trigger_tick(&mut self);
    /// Distinctive vertex pulse (earcon + haptic)
    fn trigger_vertex_pulse(&mut self);
    /// Positive confirmation (start lock, completion)
    fn trigger_success(&mut self);
    /// Silence everything, including the continuous tone and speech
    fn stop_all(&mut self);
    /// Speak `text`; high priority interrupts current speech
    fn speak(&mut self, text: &str, priority: Priority);
    /// Whether an utterance is currently playing
    fn is_speaking(&self) -> bool {
        false
    }
}

/// A command sent to the feedback collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackCommand {
    /// Continuous tone frequency update
    Continuous(f32),
    /// Light tick
    Tick,
    /// Vertex earcon
    VertexPulse,
    /// Success notification
    Success,
    /// Stop all feedback
    StopAll,
    /// Spoken coaching
    Speak { text: String, priority: Priority },
}

/// Sink that records every command (tests and offline replay)
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub commands: Vec<FeedbackCommand>,
    /// Reported by `is_speaking`
    pub speaking: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utterances in delivery order
    pub fn spoken(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                FeedbackCommand::Speak { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of commands equal to `command`
    pub fn count(&self, command: &FeedbackCommand) -> usize {
        self.commands.iter().filter(|c| *c == command).count()
    }

    /// Most recent continuous tone value
    pub fn last_continuous(&self) -> Option<f32> {
        self.commands.iter().rev().find_map(|c| match c {
            FeedbackCommand::Continuous(hz) => Some(*hz),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl FeedbackSink for RecordingSink {
    fn set_continuous_parameter(&mut self, value: f32) {
        self.commands.push(FeedbackCommand::Continuous(value));
    }

    fn trigger_tick(&mut self) {
        self.commands.push(FeedbackCommand::Tick);
    }

    fn trigger_vertex_pulse(&mut self) {
        self.commands.push(FeedbackCommand::VertexPulse);
    }

    fn trigger_success(&mut self) {
        self.commands.push(FeedbackCommand::Success);
    }

    fn stop_all(&mut self) {
        self.commands.push(FeedbackCommand::StopAll);
    }

    fn speak(&mut self, text: &str, priority: Priority) {
        self.commands.push(FeedbackCommand::Speak {
            text: text.to_string(),
            priority,
        });
    }

    fn is_speaking(&self) -> bool {
        self.speaking
    }
}

/// Headless sink: publishes the tone to a [`SharedTone`] and logs the rest
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    tone: SharedTone,
    muted: bool,
}

impl LogSink {
    pub fn new(tone: SharedTone) -> Self {
        Self { tone, muted: false }
    }

    /// Handle the audio callback reads from
    pub fn tone(&self) -> &SharedTone {
        &self.tone
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl FeedbackSink for LogSink {
    fn set_continuous_parameter(&mut self, value: f32) {
        self.muted = false;
        self.tone.store(value);
    }

    fn trigger_tick(&mut self) {
        log::trace!("tick");
    }

    fn trigger_vertex_pulse(&mut self) {
        log::debug!("vertex pulse");
    }

    fn trigger_success(&mut self) {
        log::debug!("success");
    }

    fn stop_all(&mut self) {
        self.muted = true;
        log::debug!("stop all feedback");
    }

    fn speak(&mut self, text: &str, priority: Priority) {
        log::info!("say ({:?}): {}", priority, text);
    }
}
