use crate::collision::AABB;
use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// A polygon defined by its vertices, as offsets from the owning body's position.
/// Vertices should be ordered counter-clockwise (or clockwise, consistently).
///
/// `Polygon::default()` has no vertices; that is the state of a freshly created
/// polygon collider before the caller fills it in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    /// Creates a new polygon from a vector of vertices.
    ///
    /// Fails if fewer than 3 vertices are provided.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Polygon { vertices })
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Polygon {
            vertices: self.vertices.iter().map(|&v| v + offset).collect(),
        }
    }

    /// Bounding box of the vertices. A polygon without vertices collapses
    /// to a zero-sized box at its local origin.
    pub fn bounds(&self) -> AABB {
        AABB::from_points(&self.vertices).unwrap_or_else(|| AABB::new(Vec2::ZERO, Vec2::ZERO))
    }

    /// Calculates the area of the polygon using the Shoelace formula.
    pub fn calculate_area(&self) -> f32 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let v1 = self.vertices[i];
            let v2 = self.vertices[(i + 1) % n];
            area += v1.cross(v2);
        }
        (area / 2.0).abs()
    }

    /// Calculates the centroid (center of mass for uniform density) of the polygon.
    /// Collinear vertex sets fall back to the vertex average.
    pub fn calculate_centroid(&self) -> Vec2 {
        let n = self.vertices.len();
        if n == 0 {
            return Vec2::ZERO;
        }

        let mut centroid = Vec2::ZERO;
        let mut signed_area_sum = 0.0;
        let origin = self.vertices[0];

        for i in 1..n.saturating_sub(1) {
            let v2 = self.vertices[i];
            let v3 = self.vertices[i + 1];

            let triangle_signed_area = (v2 - origin).cross(v3 - origin) / 2.0;
            signed_area_sum += triangle_signed_area;
            centroid += (origin + v2 + v3) / 3.0 * triangle_signed_area;
        }

        if signed_area_sum.abs() < 1e-8 {
            let mut avg = Vec2::ZERO;
            for v in &self.vertices {
                avg += *v;
            }
            avg / n as f32
        } else {
            centroid / signed_area_sum
        }
    }
}
