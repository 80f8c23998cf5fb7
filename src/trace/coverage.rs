//! Outline coverage estimation
//!
//! Coverage is the fraction of outline samples that some trace point has come
//! within the visit radius of. "Visited" is an existential predicate over the
//! trace, so appending points can only keep or raise coverage. The completion
//! check relies on that.

use glam::Vec2;

use crate::consts::{COVERAGE_SAMPLES, COVERAGE_VISIT_RADIUS};
use crate::geometry::{Rect, ShapeKind};

/// Coverage of `points` over the shape's outline at the default resolution
pub fn estimate_coverage(points: &[Vec2], shape: ShapeKind, rect: Rect) -> f32 {
    estimate_coverage_with(
        points,
        &shape.perimeter_samples(rect, COVERAGE_SAMPLES),
        COVERAGE_VISIT_RADIUS,
    )
}

/// Batch coverage over pre-computed outline samples
pub fn estimate_coverage_with(points: &[Vec2], samples: &[Vec2], radius: f32) -> f32 {
    if points.is_empty() || samples.is_empty() {
        return 0.0;
    }
    let covered = samples
        .iter()
        .filter(|s| points.iter().any(|p| p.distance(**s) < radius))
        .count();
    covered as f32 / samples.len() as f32
}

/// Incremental coverage for a live trace
///
/// Produces exactly the batch result for the points visited so far, without
/// rescanning the whole trace on every sample.
#[derive(Debug, Clone)]
pub struct CoverageTracker {
    samples: Vec<Vec2>,
    visited: Vec<bool>,
    visited_count: usize,
    radius: f32,
}

impl CoverageTracker {
    pub fn new(samples: Vec<Vec2>, radius: f32) -> Self {
        Self {
            visited: vec![false; samples.len()],
            samples,
            visited_count: 0,
            radius,
        }
    }

    pub fn for_shape(shape: ShapeKind, rect: Rect, count: usize, radius: f32) -> Self {
        Self::new(shape.perimeter_samples(rect, count), radius)
    }

    /// Mark every sample near `point` and return the updated coverage
    pub fn visit(&mut self, point: Vec2) -> f32 {
        for (sample, seen) in self.samples.iter().zip(self.visited.iter_mut()) {
            if !*seen && point.distance(*sample) < self.radius {
                *seen = true;
                self.visited_count += 1;
            }
        }
        self.coverage()
    }

    pub fn coverage(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.visited_count as f32 / self.samples.len() as f32
    }

    /// Forget all visits
    pub fn reset(&mut self) {
        self.visited.iter_mut().for_each(|v| *v = false);
        self.visited_count = 0;
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect() -> Rect {
        Rect::new(40.0, 40.0, 300.0, 300.0)
    }

    #[test]
    fn test_empty_points_zero_coverage() {
        assert_eq!(estimate_coverage(&[], ShapeKind::Star, rect()), 0.0);
        let tracker = CoverageTracker::for_shape(ShapeKind::Star, rect(), 180, 18.0);
        assert_eq!(tracker.coverage(), 0.0);
    }

    #[test]
    fn test_full_trace_full_coverage() {
        for shape in ShapeKind::ALL {
            let trace = shape.perimeter_samples(rect(), 400);
            let cov = estimate_coverage(&trace, shape, rect());
            assert!((cov - 1.0).abs() < 1e-6, "{shape:?} coverage {cov}");
        }
    }

    #[test]
    fn test_half_square_about_half_covered() {
        // Top and right edges only
        let trace: Vec<Vec2> = ShapeKind::Rectangle
            .perimeter_samples(rect(), 400)
            .into_iter()
            .take(200)
            .collect();
        let cov = estimate_coverage(&trace, ShapeKind::Rectangle, rect());
        assert!(cov > 0.45 && cov < 0.6, "coverage {cov}");
    }

    #[test]
    fn test_far_points_cover_nothing() {
        let trace = vec![rect().center(), rect().center() + Vec2::new(10.0, 10.0)];
        assert_eq!(estimate_coverage(&trace, ShapeKind::Ellipse, rect()), 0.0);
    }

    #[test]
    fn test_tracker_reset() {
        let mut tracker = CoverageTracker::for_shape(ShapeKind::Rectangle, rect(), 180, 18.0);
        assert!(tracker.visit(rect().min()) > 0.0);
        tracker.reset();
        assert_eq!(tracker.coverage(), 0.0);
        assert_eq!(tracker.sample_count(), 180);
    }

    fn arb_trace() -> impl Strategy<Value = Vec<(f32, f32)>> {
        prop::collection::vec((0.0f32..400.0, 0.0f32..400.0), 0..60)
    }

    proptest! {
        #[test]
        fn coverage_is_monotone_under_append(raw in arb_trace(), shape_idx in 0usize..4) {
            let shape = ShapeKind::ALL[shape_idx];
            let points: Vec<Vec2> = raw.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            let mut prev = 0.0f32;
            for k in 0..=points.len() {
                let cov = estimate_coverage(&points[..k], shape, rect());
                prop_assert!((0.0..=1.0).contains(&cov));
                prop_assert!(cov >= prev);
                prev = cov;
            }
        }

        #[test]
        fn tracker_matches_batch(raw in arb_trace(), shape_idx in 0usize..4) {
            let shape = ShapeKind::ALL[shape_idx];
            let points: Vec<Vec2> = raw.into_iter().map(|(x, y)| Vec2::new(x, y)).collect();
            let mut tracker = CoverageTracker::for_shape(shape, rect(), COVERAGE_SAMPLES, COVERAGE_VISIT_RADIUS);
            for (k, p) in points.iter().enumerate() {
                let live = tracker.visit(*p);
                let batch = estimate_coverage(&points[..=k], shape, rect());
                prop_assert_eq!(live.to_bits(), batch.to_bits());
            }
        }
    }
}
