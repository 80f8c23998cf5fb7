//! Pointer-to-outline hit testing

use glam::Vec2;

use crate::consts::HIT_SAMPLES;
use crate::geometry::{Rect, ShapeKind};

/// Result of testing a point against an outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Distance to the nearest outline sample
    pub distance: f32,
    /// The nearest outline sample itself
    pub nearest: Vec2,
    /// `distance <= tolerance`
    pub on_path: bool,
}

/// Test `point` against the shape's outline at the fixed hit-test resolution
pub fn distance_and_hit(point: Vec2, shape: ShapeKind, rect: Rect, tolerance: f32) -> HitResult {
    distance_and_hit_with(point, &shape.perimeter_samples(rect, HIT_SAMPLES), tolerance)
}

/// Brute-force nearest sample search over pre-computed outline samples
///
/// An empty sample set yields an infinite distance (never on-path).
pub fn distance_and_hit_with(point: Vec2, samples: &[Vec2], tolerance: f32) -> HitResult {
    let mut best = f32::INFINITY;
    let mut nearest = Vec2::ZERO;
    for &s in samples {
        let d = point.distance(s);
        if d < best {
            best = d;
            nearest = s;
        }
    }
    HitResult {
        distance: best,
        nearest,
        on_path: best <= tolerance,
    }
}
