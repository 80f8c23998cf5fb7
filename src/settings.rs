//! Tracing settings
//!
//! Persisted as JSON. Every field has a default, so a partial file only
//! overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::feedback::{SpeechGate, ToneMapper};

/// On-path tolerance presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ToleranceLevel {
    Tight,
    #[default]
    Medium,
    Relaxed,
}

impl ToleranceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToleranceLevel::Tight => "Tight",
            ToleranceLevel::Medium => "Medium",
            ToleranceLevel::Relaxed => "Relaxed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tight" => Some(ToleranceLevel::Tight),
            "medium" | "med" => Some(ToleranceLevel::Medium),
            "relaxed" => Some(ToleranceLevel::Relaxed),
            _ => None,
        }
    }

    /// Tolerance band in canvas units
    pub fn band(&self) -> f32 {
        match self {
            ToleranceLevel::Tight => 10.0,
            ToleranceLevel::Medium => TOLERANCE_BAND,
            ToleranceLevel::Relaxed => 24.0,
        }
    }
}

/// Tracing thresholds and feedback tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    // === Guidance ===
    /// Spoken coaching in addition to tones/haptics
    pub eyes_free: bool,
    /// Tolerance preset
    pub tolerance: ToleranceLevel,
    /// Explicit band, overrides the preset
    pub tolerance_band: Option<f32>,

    // === Geometry ===
    pub hit_samples: usize,
    pub coverage_samples: usize,
    /// Independent of the tolerance band
    pub coverage_visit_radius: f32,
    pub vertex_radius: f32,
    pub start_lock_floor: f32,
    pub start_lock_band_factor: f32,
    pub discovery_band_factor: f32,

    // === Completion ===
    pub completion_coverage: f32,
    pub min_stroke_fraction: f32,

    // === Coaching ===
    pub offpath_prompt_interval_ms: u64,
    pub speech_duplicate_ms: u64,
    pub speech_low_cooldown_ms: u64,
    pub speech_medium_cooldown_ms: u64,

    // === Tone ===
    pub tone_baseline_hz: f32,
    pub tone_spread_hz: f32,
    pub vertex_tone_hz: f32,
    pub vertex_tone_ms: u64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            eyes_free: true,
            tolerance: ToleranceLevel::Medium,
            tolerance_band: None,

            hit_samples: HIT_SAMPLES,
            coverage_samples: COVERAGE_SAMPLES,
            coverage_visit_radius: COVERAGE_VISIT_RADIUS,
            vertex_radius: VERTEX_RADIUS,
            start_lock_floor: START_LOCK_FLOOR,
            start_lock_band_factor: START_LOCK_BAND_FACTOR,
            discovery_band_factor: DISCOVERY_BAND_FACTOR,

            completion_coverage: COMPLETION_COVERAGE,
            min_stroke_fraction: MIN_STROKE_FRACTION,

            offpath_prompt_interval_ms: OFFPATH_PROMPT_INTERVAL_MS,
            speech_duplicate_ms: SPEECH_DUPLICATE_MS,
            speech_low_cooldown_ms: SPEECH_LOW_COOLDOWN_MS,
            speech_medium_cooldown_ms: SPEECH_MEDIUM_COOLDOWN_MS,

            tone_baseline_hz: TONE_BASELINE_HZ,
            tone_spread_hz: TONE_SPREAD_HZ,
            vertex_tone_hz: VERTEX_TONE_HZ,
            vertex_tone_ms: VERTEX_TONE_MS,
        }
    }
}

impl TraceConfig {
    /// Defaults with the given tolerance preset
    pub fn from_preset(preset: ToleranceLevel) -> Self {
        Self {
            tolerance: preset,
            ..Self::default()
        }
    }

    /// Effective on-path tolerance band
    pub fn tolerance_band(&self) -> f32 {
        self.tolerance_band.unwrap_or_else(|| self.tolerance.band())
    }

    /// Looser distance that still locks the start point
    pub fn start_lock_distance(&self) -> f32 {
        self.start_lock_floor
            .max(self.tolerance_band() * self.start_lock_band_factor)
    }

    pub fn tone_mapper(&self) -> ToneMapper {
        ToneMapper::with_params(
            self.tolerance_band(),
            self.tone_baseline_hz,
            self.tone_spread_hz,
            self.vertex_tone_hz,
            self.vertex_tone_ms,
        )
    }

    pub fn speech_gate(&self) -> SpeechGate {
        SpeechGate::new(
            self.speech_duplicate_ms,
            self.speech_low_cooldown_ms,
            self.speech_medium_cooldown_ms,
        )
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults when missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let config = TraceConfig::default();
        assert_eq!(config.tolerance_band(), 16.0);
        assert_eq!(config.start_lock_distance(), 12.8);
        assert_eq!(config.coverage_visit_radius, 18.0);
        assert_eq!(config.hit_samples, 360);
        assert_eq!(config.coverage_samples, 180);
    }

    #[test]
    fn test_start_lock_floor_wins_for_tight_band() {
        let config = TraceConfig::from_preset(ToleranceLevel::Tight);
        assert_eq!(config.start_lock_distance(), 12.0);
    }

    #[test]
    fn test_band_override() {
        let config = TraceConfig {
            tolerance_band: Some(30.0),
            ..TraceConfig::default()
        };
        assert_eq!(config.tolerance_band(), 30.0);
        // Visit radius does not follow the band
        assert_eq!(config.coverage_visit_radius, 18.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TraceConfig =
            serde_json::from_str(r#"{"eyes_free": false, "tolerance": "Relaxed"}"#).unwrap();
        assert!(!config.eyes_free);
        assert_eq!(config.tolerance_band(), 24.0);
        assert_eq!(config.completion_coverage, 0.75);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let config = TraceConfig {
            vertex_radius: 30.0,
            ..TraceConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(TraceConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(TraceConfig::load_from(&path), Err(ConfigError::Parse(_))));
        assert_eq!(TraceConfig::load_or_default(&path), TraceConfig::default());
        assert_eq!(
            TraceConfig::load_or_default(dir.path().join("missing.json")),
            TraceConfig::default()
        );
    }

    #[test]
    fn test_tolerance_from_str() {
        assert_eq!(ToleranceLevel::from_str("MED"), Some(ToleranceLevel::Medium));
        assert_eq!(ToleranceLevel::Relaxed.as_str(), "Relaxed");
        assert_eq!(ToleranceLevel::from_str("loose"), None);
    }
}
