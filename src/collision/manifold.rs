use crate::math::vec2::Vec2;

/// Contact data produced by the narrow phase for one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from B towards A
    pub normal: Vec2,
    /// Representative contact point in world coordinates
    pub point: Vec2,
    /// Overlap depth along the normal, always > 0
    pub penetration: f32,
}

/// Outcome of a narrow-phase test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    Separated,
    Contact(Contact),
    /// Bounding boxes overlap but the shape pair has no exact test (polygons).
    /// Drives trigger events, never physical resolution.
    BoundsOverlap,
}

impl Intersection {
    /// True for `Contact` and `BoundsOverlap`.
    pub fn is_touching(&self) -> bool {
        !matches!(self, Intersection::Separated)
    }

    pub fn contact(&self) -> Option<&Contact> {
        match self {
            Intersection::Contact(c) => Some(c),
            _ => None,
        }
    }
}

impl Contact {
    /// Same contact seen from the other body.
    pub fn flipped(&self) -> Self {
        Contact {
            normal: -self.normal,
            ..*self
        }
    }
}
