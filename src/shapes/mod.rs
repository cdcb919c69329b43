pub mod circle;
pub mod polygon;
pub mod rectangle;

pub use circle::Circle;
pub use polygon::Polygon;
pub use rectangle::Rectangle;

use crate::collision::AABB;
use crate::math::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Tag identifying which shape store a collider points into.
/// `None` marks an empty/invalid collider slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    None,
    Circle,
    Rectangle,
    Polygon,
}

/// Geometric shape of a collider, with its data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    None,
    Circle(Circle),
    Rectangle(Rectangle),
    Polygon(Polygon),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::None => ShapeKind::None,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Moves the shape from body-local offsets into world space.
    pub fn translated(&self, offset: Vec2) -> Shape {
        match self {
            Shape::None => Shape::None,
            Shape::Circle(c) => Shape::Circle(c.translated(offset)),
            Shape::Rectangle(r) => Shape::Rectangle(r.translated(offset)),
            Shape::Polygon(p) => Shape::Polygon(p.translated(offset)),
        }
    }

    /// Axis-aligned bounds, `None` for the empty shape.
    pub fn bounds(&self) -> Option<AABB> {
        match self {
            Shape::None => None,
            Shape::Circle(c) => Some(c.bounds()),
            Shape::Rectangle(r) => Some(r.bounds()),
            Shape::Polygon(p) => Some(p.bounds()),
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Shape::Rectangle(r)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}
