//! Traceable shape variants

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::outline::Outline;
use super::rect::Rect;

/// Star inner radius as a fraction of the outer radius
const STAR_INNER_RATIO: f32 = 0.38;
/// Number of star tips
const STAR_POINTS: usize = 5;

/// The shapes a user can trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Star,
}

impl ShapeKind {
    /// Selection order (top-left, top-right, bottom-left, bottom-right)
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::Triangle,
        ShapeKind::Star,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Star => "Star",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rectangle" | "square" | "rect" => Some(ShapeKind::Rectangle),
            "ellipse" | "circle" => Some(ShapeKind::Ellipse),
            "triangle" => Some(ShapeKind::Triangle),
            "star" => Some(ShapeKind::Star),
            _ => None,
        }
    }

    /// Boundary of the shape fitted into `rect`
    pub fn outline(&self, rect: Rect) -> Outline {
        match self {
            ShapeKind::Ellipse => Outline::Ellipse {
                center: rect.center(),
                radii: rect.size() * 0.5,
            },
            ShapeKind::Star => Outline::Polygon(star_points(rect)),
            ShapeKind::Rectangle | ShapeKind::Triangle => Outline::Polygon(self.vertices(rect)),
        }
    }

    /// `count` boundary points spaced evenly by arc length
    pub fn perimeter_samples(&self, rect: Rect, count: usize) -> Vec<Vec2> {
        self.outline(rect).sample(count)
    }

    /// Corner/tip points in construction order; empty for the ellipse
    ///
    /// - Rectangle: top-left, top-right, bottom-right, bottom-left
    /// - Triangle: apex, bottom-left, bottom-right
    /// - Star: outer tips clockwise from the top
    pub fn vertices(&self, rect: Rect) -> Vec<Vec2> {
        let (min, max, mid) = (rect.min(), rect.max(), rect.center());
        match self {
            ShapeKind::Rectangle => vec![
                min,
                Vec2::new(max.x, min.y),
                max,
                Vec2::new(min.x, max.y),
            ],
            ShapeKind::Ellipse => Vec::new(),
            ShapeKind::Triangle => vec![
                Vec2::new(mid.x, min.y),
                Vec2::new(min.x, max.y),
                max,
            ],
            ShapeKind::Star => star_points(rect).into_iter().step_by(2).collect(),
        }
    }

    /// Index of the first vertex within `threshold` of `point`
    pub fn nearest_vertex_index(&self, point: Vec2, rect: Rect, threshold: f32) -> Option<usize> {
        self.vertices(rect)
            .iter()
            .position(|v| v.distance(point) <= threshold)
    }

    /// Canonical place to begin tracing, with a spoken description
    pub fn start_anchor(&self, rect: Rect) -> (Vec2, &'static str) {
        match self {
            ShapeKind::Rectangle => (rect.min(), "Top left corner"),
            ShapeKind::Ellipse => (
                Vec2::new(rect.center().x, rect.y),
                "Top of the ellipse",
            ),
            ShapeKind::Triangle => (self.vertices(rect)[0], "Top point of the triangle"),
            ShapeKind::Star => (star_points(rect)[0], "Top point of the star"),
        }
    }
}

/// Alternating outer tips and inner notches, starting at the top tip
fn star_points(rect: Rect) -> Vec<Vec2> {
    let c = rect.center();
    let outer = rect.width.min(rect.height) * 0.5;
    let inner = outer * STAR_INNER_RATIO;
    (0..STAR_POINTS * 2)
        .map(|i| {
            let angle = (i as f32 * 36.0 - 90.0).to_radians();
            let radius = if i % 2 == 0 { outer } else { inner };
            c + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
