use bevy::prelude::*;

/// Relative width of the band in which three positions count as collinear.
const COLLINEAR_TOLERANCE: f64 = 1e-5;

/// Side of a directed line a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Collinear,
    Right,
}

/// Side of the directed line `start -> end` that `point` lies on.
///
/// Sign of the 2D cross product, evaluated in f64. Left is strict: only a cross product
/// below `-tolerance * |end - start| * |point - start|` counts, and the band around zero
/// is collinear.
pub fn turn(start: Vec2, end: Vec2, point: Vec2) -> Turn {
    let edge = end.as_dvec2() - start.as_dvec2();
    let offset = point.as_dvec2() - start.as_dvec2();
    let cross = edge.perp_dot(offset);
    let band = COLLINEAR_TOLERANCE * edge.length() * offset.length();
    if cross < -band {
        Turn::Left
    } else if cross > band {
        Turn::Right
    } else {
        Turn::Collinear
    }
}

/// Circle vs circle overlap (touching counts).
pub fn circles_intersect(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) <= reach * reach
}

/// Closest-point test between a circle and the segment `start..end`.
/// A zero-length segment degrades to a point-in-circle test.
pub fn circle_segment_intersect(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> bool {
    let segment = end - start;
    let len_sq = segment.length_squared();
    let closest = if len_sq <= f32::EPSILON {
        start
    } else {
        let t = ((center - start).dot(segment) / len_sq).clamp(0.0, 1.0);
        start + segment * t
    };
    closest.distance_squared(center) <= radius * radius
}

/// Axis-aligned rectangle vs circle overlap.
pub fn rect_intersects_circle(rect: Rect, center: Vec2, radius: f32) -> bool {
    let closest = center.clamp(rect.min, rect.max);
    closest.distance_squared(center) <= radius * radius
}
