// Defines an Axis-Aligned Bounding Box

use crate::math::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB. Corners may be given in any order.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on `center` extending `half_extents` each way.
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        AABB {
            min: center - half,
            max: center + half,
        }
    }

    /// Checks if this AABB overlaps with another AABB.
    /// Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &AABB) -> bool {
        let x_overlap = self.max.x > other.min.x && self.min.x < other.max.x;
        let y_overlap = self.max.y > other.min.y && self.min.y < other.max.y;
        x_overlap && y_overlap
    }

    /// True when `other` lies entirely inside this box (edges inclusive).
    pub fn contains(&self, other: &AABB) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Merges another AABB into this one, expanding this AABB to contain both.
    pub fn merge(&mut self, other: &AABB) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Creates an AABB that encompasses a set of points.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min_pt = *first;
        let mut max_pt = *first;
        for point in rest {
            min_pt = min_pt.min(*point);
            max_pt = max_pt.max(*point);
        }
        Some(AABB::new(min_pt, max_pt))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        AABB {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Splits the box at its midpoint into four equal quadrants:
    /// `[bottom-left, bottom-right, top-left, top-right]`.
    pub fn quadrants(&self) -> [AABB; 4] {
        let c = self.center();
        [
            AABB::new(self.min, c),
            AABB::new(Vec2::new(c.x, self.min.y), Vec2::new(self.max.x, c.y)),
            AABB::new(Vec2::new(self.min.x, c.y), Vec2::new(c.x, self.max.y)),
            AABB::new(c, self.max),
        ]
    }
}

impl Default for AABB {
    fn default() -> Self {
        AABB::new(Vec2::ZERO, Vec2::ZERO)
    }
}
