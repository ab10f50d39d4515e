//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in arena space (canvas units).
/// x grows to the right, y grows downward, origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Unit direction vector. Only constructed from a non-zero offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    x: f64,
    y: f64,
}

/// Rectangular arena bounds, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// Simulation clock as seen by the engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks the systems actually ran (Playing only).
    pub tick: u64,
    /// Latest timestamp handed to `tick`, in milliseconds.
    pub now_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    /// Unit direction toward `other`, or `None` when both points coincide.
    pub fn direction_to(&self, other: &Position) -> Option<Heading> {
        Heading::from_offset(other.as_dvec2() - self.as_dvec2())
    }

    /// Position moved `distance` units along `heading`.
    pub fn offset(&self, heading: Heading, distance: f64) -> Position {
        (self.as_dvec2() + heading.as_dvec2() * distance).into()
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Heading {
    /// Normalize an offset. Zero-length and non-finite offsets have no heading.
    pub fn from_offset(offset: DVec2) -> Option<Heading> {
        offset.try_normalize().map(|unit| Heading {
            x: unit.x,
            y: unit.y,
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Centre of the arena (where the tower stands).
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive containment: points on an edge are still inside.
    pub fn contains(&self, p: &Position) -> bool {
        !(p.x < 0.0 || p.y < 0.0 || p.x > self.width || p.y > self.height)
    }
}
