//! Closed boundary curves and arc-length sampling
//!
//! A polygon outline is sampled evenly by arc length, so a star and a square
//! of the same size get comparably spaced samples. The ellipse is sampled at
//! equal angular steps, which is close enough to equal arc length for the
//! near-circular outlines the canvas produces.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// A closed shape boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outline {
    /// Closed polygon; the last point connects back to the first
    Polygon(Vec<Vec2>),
    /// Axis-aligned ellipse
    Ellipse { center: Vec2, radii: Vec2 },
}

impl Outline {
    /// Total boundary length
    pub fn perimeter(&self) -> f32 {
        match self {
            Outline::Polygon(points) => closed_segments(points).map(|(a, b)| a.distance(b)).sum(),
            Outline::Ellipse { radii, .. } => {
                // Ramanujan's second approximation
                let (a, b) = (radii.x.abs(), radii.y.abs());
                if a + b == 0.0 {
                    return 0.0;
                }
                let h = ((a - b) / (a + b)).powi(2);
                PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
            }
        }
    }

    /// `count` points spaced evenly around the boundary
    ///
    /// Sample `i` sits at arc length `i / count * perimeter` from the first
    /// polygon point (or the top of the ellipse), so the last sample never
    /// duplicates the first.
    pub fn sample(&self, count: usize) -> Vec<Vec2> {
        if count == 0 {
            return Vec::new();
        }
        match self {
            Outline::Polygon(points) => sample_polygon(points, count),
            Outline::Ellipse { center, radii } => (0..count)
                .map(|i| {
                    let theta = -FRAC_PI_2 + i as f32 / count as f32 * TAU;
                    *center + Vec2::new(radii.x * theta.cos(), radii.y * theta.sin())
                })
                .collect(),
        }
    }
}

/// Consecutive segments of a closed polygon, including the closing edge
fn closed_segments(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = points.len();
    let edges = if n < 2 { 0 } else { n };
    (0..edges).map(move |i| (points[i], points[(i + 1) % n]))
}

fn sample_polygon(points: &[Vec2], count: usize) -> Vec<Vec2> {
    match points {
        [] => return Vec::new(),
        [only] => return vec![*only; count],
        _ => {}
    }

    // cumulative[i] = arc length at the end of segment i
    let segments: Vec<(Vec2, Vec2)> = closed_segments(points).collect();
    let mut cumulative = Vec::with_capacity(segments.len());
    let mut total = 0.0;
    for (a, b) in &segments {
        total += a.distance(*b);
        cumulative.push(total);
    }

    (0..count)
        .map(|i| {
            let target = i as f32 / count as f32 * total;
            // First segment whose end lies beyond the target
            let seg = cumulative
                .partition_point(|&end| end <= target)
                .min(segments.len() - 1);
            let seg_start = if seg == 0 { 0.0 } else { cumulative[seg - 1] };
            let (a, b) = segments[seg];
            let len = cumulative[seg] - seg_start;
            if len <= f32::EPSILON {
                a
            } else {
                a.lerp(b, (target - seg_start) / len)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline::Polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ])
    }

    #[test]
    fn test_polygon_perimeter_includes_closing_edge() {
        assert!((square().perimeter() - 400.0).abs() < 1e-4);
    }

    #[test]
    fn test_polygon_samples_evenly_spaced() {
        let samples = square().sample(40);
        assert_eq!(samples.len(), 40);
        assert_eq!(samples[0], Vec2::ZERO);
        for i in 0..samples.len() {
            let next = samples[(i + 1) % samples.len()];
            // Along an edge the spacing is exactly 10; across a corner it is shorter
            assert!(samples[i].distance(next) <= 10.0 + 1e-3);
        }
        // Sample 10 is exactly the second corner
        assert!(samples[10].distance(Vec2::new(100.0, 0.0)) < 1e-3);
        assert!(samples[25].distance(Vec2::new(50.0, 100.0)) < 1e-3);
    }

    #[test]
    fn test_polygon_samples_lie_on_boundary() {
        for p in square().sample(37) {
            let on_edge = p.x.abs() < 1e-3
                || (p.x - 100.0).abs() < 1e-3
                || p.y.abs() < 1e-3
                || (p.y - 100.0).abs() < 1e-3;
            assert!(on_edge, "{p:?} is off the boundary");
        }
    }

    #[test]
    fn test_ellipse_samples_start_at_top() {
        let outline = Outline::Ellipse {
            center: Vec2::new(50.0, 50.0),
            radii: Vec2::new(50.0, 50.0),
        };
        let samples = outline.sample(4);
        assert!(samples[0].distance(Vec2::new(50.0, 0.0)) < 1e-3);
        assert!(samples[1].distance(Vec2::new(100.0, 50.0)) < 1e-3);
        assert!((outline.perimeter() - TAU * 50.0).abs() < 1e-2);
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(square().sample(0).is_empty());
        assert!(Outline::Polygon(Vec::new()).sample(5).is_empty());
    }
}
