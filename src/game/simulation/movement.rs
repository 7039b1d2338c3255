/// Per-tank advance: route consumption, steering, separation and reload.
///
/// Each tank only touches its own components, so the whole pass is one parallel loop.

use bevy::prelude::*;
use std::collections::VecDeque;

use super::components::*;
use crate::game::config::BattleConfig;
use crate::game::terrain::GridMap;

/// Moves `position` one tick along `waypoints` and returns the new position.
///
/// The front waypoint is dropped once the tank is within `arrival_threshold` of it, then
/// the tank steers toward whatever is in front now, at most `speed` units. The
/// separation `nudge` is added on top, unscaled. An empty route only applies the nudge.
pub fn advance_tank(
    position: Vec2,
    waypoints: &mut VecDeque<Vec2>,
    nudge: Vec2,
    speed: f32,
    arrival_threshold: f32,
) -> Vec2 {
    if let Some(&front) = waypoints.front() {
        if front.distance_squared(position) <= arrival_threshold * arrival_threshold {
            waypoints.pop_front();
        }
    }

    let step = match waypoints.front() {
        Some(&target) => (target - position).clamp_length_max(speed),
        None => Vec2::ZERO,
    };

    position + step + nudge
}

// ============================================================================
// Systems
// ============================================================================

pub fn advance_tanks(
    mut query: Query<(&Tank, &mut SimPosition, &mut Route, &mut Weapon, &Nudge)>,
    grid: Res<GridMap>,
    config: Res<BattleConfig>,
) {
    let max_speed = config.tank_max_speed;
    let threshold = config.arrival_threshold;

    query.par_iter_mut().for_each(|(tank, mut position, mut route, mut weapon, nudge)| {
        if !tank.active {
            return;
        }
        let speed = max_speed * grid.speed_modifier_at(position.0);
        position.0 = advance_tank(position.0, &mut route.waypoints, nudge.0, speed, threshold);
        weapon.tick();
    });
}
