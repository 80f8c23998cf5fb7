//! Continuous tone parameter mapping
//!
//! Distance to the outline maps linearly onto an oscillator frequency: on the
//! outline the tone sits half a spread above the baseline, at twice the
//! tolerance band or farther it sits half a spread below. A vertex pulse
//! holds the tone at a fixed pitch for a short window before it reverts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::consts::{TONE_BASELINE_HZ, TONE_SPREAD_HZ, VERTEX_TONE_HZ, VERTEX_TONE_MS};

/// Lock-free f32 cell shared with a real-time audio callback
///
/// The interaction thread stores, the audio callback loads. Neither side
/// ever blocks.
#[derive(Debug, Clone)]
pub struct SharedTone(Arc<AtomicU32>);

impl SharedTone {
    pub fn new(hz: f32) -> Self {
        Self(Arc::new(AtomicU32::new(hz.to_bits())))
    }

    #[inline]
    pub fn store(&self, hz: f32) {
        self.0.store(hz.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

impl Default for SharedTone {
    fn default() -> Self {
        Self::new(TONE_BASELINE_HZ)
    }
}

/// Distance → frequency mapper with a transient vertex override
#[derive(Debug, Clone)]
pub struct ToneMapper {
    baseline_hz: f32,
    spread_hz: f32,
    vertex_hz: f32,
    vertex_ms: u64,
    band: f32,
    /// Last continuous value written
    current_hz: f32,
    /// Vertex override end time
    override_until: Option<u64>,
}

impl ToneMapper {
    pub fn new(band: f32) -> Self {
        Self::with_params(band, TONE_BASELINE_HZ, TONE_SPREAD_HZ, VERTEX_TONE_HZ, VERTEX_TONE_MS)
    }

    pub fn with_params(
        band: f32,
        baseline_hz: f32,
        spread_hz: f32,
        vertex_hz: f32,
        vertex_ms: u64,
    ) -> Self {
        Self {
            baseline_hz,
            spread_hz,
            vertex_hz,
            vertex_ms,
            band,
            current_hz: baseline_hz,
            override_until: None,
        }
    }

    /// Pure distance → frequency mapping
    pub fn frequency_for(&self, distance: f32) -> f32 {
        let norm = if self.band > 0.0 {
            (distance / (self.band * 2.0)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.baseline_hz + (1.0 - norm) * self.spread_hz - self.spread_hz * 0.5
    }

    /// Map a live distance; returns the value to publish, or `None` while a
    /// vertex pulse is holding the tone
    pub fn update(&mut self, distance: f32, now_ms: u64) -> Option<f32> {
        let hz = self.frequency_for(distance);
        self.current_hz = hz;
        if let Some(until) = self.override_until {
            if now_ms < until {
                return None;
            }
            self.override_until = None;
        }
        Some(hz)
    }

    /// Start a vertex pulse; returns the override frequency to publish
    pub fn vertex_pulse(&mut self, now_ms: u64) -> f32 {
        self.override_until = Some(now_ms.saturating_add(self.vertex_ms));
        self.vertex_hz
    }

    /// End an elapsed vertex pulse; returns the frequency to revert to
    pub fn expire(&mut self, now_ms: u64) -> Option<f32> {
        match self.override_until {
            Some(until) if now_ms >= until => {
                self.override_until = None;
                Some(self.current_hz)
            }
            _ => None,
        }
    }

    /// Drop any pending override (stop-all)
    pub fn stop(&mut self) {
        self.override_until = None;
        self.current_hz = self.baseline_hz;
    }

    pub fn is_overridden(&self) -> bool {
        self.override_until.is_some()
    }
}
