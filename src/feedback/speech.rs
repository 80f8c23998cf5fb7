//! Spoken coaching rate limiter
//!
//! Coaching fires from per-sample code paths, so utterances are debounced
//! here before they reach the speech collaborator:
//! - repeating the last text within the duplicate window is dropped
//! - low priority is dropped while anything is speaking or inside its cooldown
//! - medium priority is dropped inside its (shorter) cooldown
//! - high priority always goes through and interrupts current speech

use serde::{Deserialize, Serialize};

use crate::consts::{SPEECH_DUPLICATE_MS, SPEECH_LOW_COOLDOWN_MS, SPEECH_MEDIUM_COOLDOWN_MS};

/// Utterance priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Priority-keyed speech debouncer
#[derive(Debug, Clone)]
pub struct SpeechGate {
    duplicate_ms: u64,
    low_cooldown_ms: u64,
    medium_cooldown_ms: u64,
    last_text: String,
    last_ms: Option<u64>,
}

impl Default for SpeechGate {
    fn default() -> Self {
        Self::new(
            SPEECH_DUPLICATE_MS,
            SPEECH_LOW_COOLDOWN_MS,
            SPEECH_MEDIUM_COOLDOWN_MS,
        )
    }
}

impl SpeechGate {
    pub fn new(duplicate_ms: u64, low_cooldown_ms: u64, medium_cooldown_ms: u64) -> Self {
        Self {
            duplicate_ms,
            low_cooldown_ms,
            medium_cooldown_ms,
            last_text: String::new(),
            last_ms: None,
        }
    }

    /// Decide whether `text` may be spoken now; admitted text becomes the
    /// reference for later duplicate and cooldown checks.
    pub fn admit(&mut self, text: &str, priority: Priority, now_ms: u64, speaking: bool) -> bool {
        let since_last = self.last_ms.map(|t| now_ms.saturating_sub(t));
        let within = |window: u64| since_last.is_some_and(|dt| dt < window);

        if text == self.last_text && within(self.duplicate_ms) {
            return false;
        }

        let allowed = match priority {
            Priority::Low => !speaking && !within(self.low_cooldown_ms),
            Priority::Medium => !within(self.medium_cooldown_ms),
            Priority::High => true,
        };
        if !allowed {
            return false;
        }

        self.last_text.clear();
        self.last_text.push_str(text);
        self.last_ms = Some(now_ms);
        true
    }
}
