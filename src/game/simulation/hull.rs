/// Barrier hull around the surviving tanks.
///
/// Gift wrapping (Jarvis march): start at the leftmost point and keep picking the next
/// vertex such that no point lies strictly left of the edge, until the walk returns to
/// the start. A collinear candidate is never "more left"; it only replaces the current
/// one when it lies ahead and farther away, so the walk steps along an edge to its far
/// corner.
///
/// Turns come from `math::turn`, so positions within its relative band of a line are
/// collinear even when f32 rounding puts them a hair to one side.

use bevy::math::DVec2;
use bevy::prelude::*;

use super::resources::*;
use crate::game::math::{turn, Turn};

/// True when `candidate` continues past `endpoint` in the same direction from `origin`.
fn ahead_and_farther(origin: Vec2, endpoint: Vec2, candidate: Vec2) -> bool {
    let origin = origin.as_dvec2();
    let reach: DVec2 = endpoint.as_dvec2() - origin;
    let step: DVec2 = candidate.as_dvec2() - origin;
    reach.dot(step) > 0.0 && step.length_squared() > reach.length_squared()
}

/// Convex hull of `points`.
///
/// Zero points give an empty hull, one point a single-vertex hull. The walk is capped
/// at `points.len()` vertices; a walk that hits the cap without closing is logged and
/// yields an empty hull rather than an open polyline.
pub fn build_hull(points: &[Vec2]) -> Vec<Vec2> {
    match points.len() {
        0 => return Vec::new(),
        1 => return vec![points[0]],
        _ => {}
    }

    // Leftmost point. Equal x goes to the larger y, so the start is a corner and never
    // the middle of a vertical edge the walk could step over.
    let mut on_hull = points[0];
    for &point in points {
        if point.x < on_hull.x || (point.x == on_hull.x && point.y >= on_hull.y) {
            on_hull = point;
        }
    }

    let mut hull = Vec::new();
    loop {
        hull.push(on_hull);

        let mut endpoint = on_hull;
        for &candidate in points {
            if candidate == on_hull {
                continue;
            }
            if endpoint == on_hull {
                endpoint = candidate;
                continue;
            }
            match turn(on_hull, endpoint, candidate) {
                Turn::Left => endpoint = candidate,
                Turn::Collinear if ahead_and_farther(on_hull, endpoint, candidate) => {
                    endpoint = candidate
                }
                _ => {}
            }
        }

        // Every point coincides with the start, or the walk is back where it began.
        if endpoint == on_hull || endpoint == hull[0] {
            return hull;
        }
        if hull.len() == points.len() {
            warn!("[HULL] Walk over {} points did not close, dropping hull", points.len());
            return Vec::new();
        }
        on_hull = endpoint;
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Rebuilds the hull from the post-damage snapshot, so tanks eliminated this tick are
/// already excluded.
pub fn rebuild_hull(mut hull: ResMut<Hull>, snapshot: Res<RosterSnapshot>) {
    hull.0 = build_hull(&snapshot.active_positions());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_points_ahead_replace_a_collinear_endpoint() {
        let origin = Vec2::new(10.0, 10.0);
        let endpoint = Vec2::new(20.0, 10.0);

        assert!(ahead_and_farther(origin, endpoint, Vec2::new(30.0, 10.0)));
        assert!(!ahead_and_farther(origin, endpoint, Vec2::new(15.0, 10.0)));
        assert!(!ahead_and_farther(origin, endpoint, Vec2::new(-10.0, 10.0)), "behind, though farther");
    }
}
