//! Narrow phase
//!
//! Every test takes two shapes already placed in world space and reports
//! the contact with its normal pointing from B towards A. Only three
//! unordered kind pairs have exact tests; the mirrored orders reuse them
//! with the normal negated.

use crate::math::vec2::{Vec2, NORMALIZE_EPSILON};
use crate::shapes::{Circle, Rectangle, Shape};

use super::manifold::{Contact, Intersection};

/// Fallback normal when the centers coincide.
pub const FALLBACK_NORMAL: Vec2 = Vec2::UP;

/// Dispatches on the kind pair of `a` and `b`.
pub fn intersect(a: &Shape, b: &Shape) -> Intersection {
    match (a, b) {
        (Shape::None, _) | (_, Shape::None) => Intersection::Separated,
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(ca, cb),
        (Shape::Circle(c), Shape::Rectangle(r)) => circle_rectangle(c, r),
        (Shape::Rectangle(r), Shape::Circle(c)) => flip(circle_rectangle(c, r)),
        (Shape::Rectangle(ra), Shape::Rectangle(rb)) => rectangle_rectangle(ra, rb),
        (Shape::Polygon(_), _) | (_, Shape::Polygon(_)) => bounds_overlap(a, b),
    }
}

fn flip(result: Intersection) -> Intersection {
    match result {
        Intersection::Contact(c) => Intersection::Contact(c.flipped()),
        other => other,
    }
}

/// Polygon pairs have no exact test: overlapping bounds count as touching.
fn bounds_overlap(a: &Shape, b: &Shape) -> Intersection {
    match (a.bounds(), b.bounds()) {
        (Some(ba), Some(bb)) if ba.overlaps(&bb) => Intersection::BoundsOverlap,
        _ => Intersection::Separated,
    }
}

pub fn circle_circle(a: &Circle, b: &Circle) -> Intersection {
    let delta = a.center - b.center;
    let dist_sq = delta.magnitude_squared();
    let radii_sum = a.radius + b.radius;

    if dist_sq >= radii_sum * radii_sum {
        return Intersection::Separated;
    }

    let distance = dist_sq.sqrt();
    let normal = if distance > NORMALIZE_EPSILON {
        delta / distance
    } else {
        // Circles are exactly on top of each other, choose a fixed axis
        FALLBACK_NORMAL
    };

    // Weighted by radius so the point sits in the overlap lens
    let point = b.center + delta * (b.radius / radii_sum);

    Intersection::Contact(Contact {
        normal,
        point,
        penetration: radii_sum - distance,
    })
}

pub fn circle_rectangle(circle: &Circle, rect: &Rectangle) -> Intersection {
    let offset = circle.center - rect.center;
    let half_size = rect.extents();
    let clamped = offset.clamp(-half_size, half_size);
    let closest = rect.center + clamped;

    let delta = circle.center - closest;
    let dist_sq = delta.magnitude_squared();
    if dist_sq >= circle.radius * circle.radius {
        return Intersection::Separated;
    }

    let distance = dist_sq.sqrt();
    let (normal, penetration) = if distance > NORMALIZE_EPSILON {
        (delta / distance, circle.radius - distance)
    } else {
        // Center inside the rectangle
        (FALLBACK_NORMAL, circle.radius)
    };

    Intersection::Contact(Contact {
        normal,
        point: closest,
        penetration,
    })
}

pub fn rectangle_rectangle(a: &Rectangle, b: &Rectangle) -> Intersection {
    let delta = a.center - b.center;
    let half_sum = a.extents() + b.extents();
    let overlap_x = half_sum.x - delta.x.abs();
    let overlap_y = half_sum.y - delta.y.abs();

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return Intersection::Separated;
    }

    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
    let (normal, penetration) = if overlap_x <= overlap_y {
        (Vec2::new(sign(delta.x), 0.0), overlap_x)
    } else {
        (Vec2::new(0.0, sign(delta.y)), overlap_y)
    };

    let overlap_min = a.min().max(b.min());
    let overlap_max = a.max().min(b.max());

    Intersection::Contact(Contact {
        normal,
        point: (overlap_min + overlap_max) * 0.5,
        penetration,
    })
}
