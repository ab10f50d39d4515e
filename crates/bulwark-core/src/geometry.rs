//! Collision geometry.
//!
//! Shapes are centred on their owner's `Position`. Every pair of variants
//! has its own overlap test; touching edges count as a collision.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Collision shape of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Shape {
    Circle { radius: f64 },
    /// Axis-aligned box, `width` x `height`, centred on the position.
    Aabb { width: f64, height: f64 },
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle { radius }
    }

    /// Overlap test between `self` at `at` and `other` at `other_at`.
    pub fn overlaps(&self, at: &Position, other: &Shape, other_at: &Position) -> bool {
        match (*self, *other) {
            (Shape::Circle { radius: r1 }, Shape::Circle { radius: r2 }) => {
                circles_overlap(at, r1, other_at, r2)
            }
            (
                Shape::Aabb {
                    width: w1,
                    height: h1,
                },
                Shape::Aabb {
                    width: w2,
                    height: h2,
                },
            ) => boxes_overlap(at, w1, h1, other_at, w2, h2),
            (Shape::Circle { radius }, Shape::Aabb { width, height }) => {
                circle_box_overlap(at, radius, other_at, width, height)
            }
            (Shape::Aabb { width, height }, Shape::Circle { radius }) => {
                circle_box_overlap(other_at, radius, at, width, height)
            }
        }
    }

    /// Bounding radius, used when something needs a single size figure.
    pub fn bounding_radius(&self) -> f64 {
        match *self {
            Shape::Circle { radius } => radius,
            Shape::Aabb { width, height } => (width * width + height * height).sqrt() / 2.0,
        }
    }
}

/// Two circles collide iff the distance between centres is `<=` the sum of radii.
pub fn circles_overlap(a: &Position, ra: f64, b: &Position, rb: f64) -> bool {
    a.distance_to(b) <= ra + rb
}

/// Separating-axis test for two centred boxes.
pub fn boxes_overlap(a: &Position, wa: f64, ha: f64, b: &Position, wb: f64, hb: f64) -> bool {
    (a.x - b.x).abs() <= (wa + wb) / 2.0 && (a.y - b.y).abs() <= (ha + hb) / 2.0
}

/// Circle against a centred box: clamp the circle centre onto the box and
/// compare the remaining distance with the radius.
pub fn circle_box_overlap(c: &Position, radius: f64, b: &Position, w: f64, h: f64) -> bool {
    let (hw, hh) = (w.abs() / 2.0, h.abs() / 2.0);
    let nearest = Position::new(
        c.x.max(b.x - hw).min(b.x + hw),
        c.y.max(b.y - hh).min(b.y + hh),
    );
    c.distance_to(&nearest) <= radius
}
