/// Targeting, firing and damage resolution.
///
/// Firing runs in parallel: each worker appends new projectiles to its own buffer and
/// the buffers are merged into [`Projectiles`] once, after the parallel loop. Damage is
/// resolved sequentially against the roster snapshot, in roster order.

use bevy::prelude::*;
use bevy::utils::Parallel;

use super::components::*;
use super::resources::*;
use crate::game::config::BattleConfig;
use crate::game::math::{circle_segment_intersect, circles_intersect, rect_intersects_circle};

/// Smoke offsets relative to the eliminated tank.
const PROJECTILE_SMOKE_OFFSET: Vec2 = Vec2::new(7.0, 24.0);
const AREA_SMOKE_OFFSET: Vec2 = Vec2::new(0.0, 48.0);

// ============================================================================
// Targeting
// ============================================================================

/// Nearest active tank of the opposing team, by squared distance.
///
/// Only strictly closer candidates replace the current best, so ties go to the lowest
/// roster index. Callers should first check that an opponent is alive; `None` is
/// returned when there is none.
pub fn find_closest_enemy(tanks: &[TankSnapshot], index: usize) -> Option<usize> {
    let me = &tanks[index];
    let mut closest_distance = f32::INFINITY;
    let mut closest = None;

    for (i, other) in tanks.iter().enumerate() {
        if other.team == me.team || !other.active {
            continue;
        }
        let distance = other.position.distance_squared(me.position);
        if distance < closest_distance {
            closest_distance = distance;
            closest = Some(i);
        }
    }

    closest
}

/// Projectile fired from `shooter` toward `target`.
pub fn aim(shooter: &TankSnapshot, owner: usize, target: Vec2, speed: f32, radius: f32) -> Projectile {
    Projectile {
        position: shooter.position,
        velocity: (target - shooter.position).normalize_or_zero() * speed,
        team: shooter.team,
        radius,
        active: true,
        owner,
    }
}

// ============================================================================
// Damage
// ============================================================================

/// Moves every active projectile one tick and resolves hits against `tanks`.
///
/// The first active enemy a projectile overlaps (in roster order) takes `damage` and the
/// projectile is spent; it never hits two tanks in the same tick.
pub fn resolve_projectiles(
    projectiles: &mut [Projectile],
    tanks: &mut [TankSnapshot],
    damage: i32,
    effects: &mut Effects,
) {
    for projectile in projectiles.iter_mut().filter(|p| p.active) {
        projectile.position += projectile.velocity;

        let hit = tanks.iter_mut().find(|tank| {
            tank.active
                && tank.team != projectile.team
                && circles_intersect(projectile.position, projectile.radius, tank.position, tank.radius)
        });

        if let Some(tank) = hit {
            effects.explode(tank.position);
            if tank.health.hit(damage) {
                tank.active = false;
                effects.smoke(tank.position - PROJECTILE_SMOKE_OFFSET);
            }
            projectile.active = false;
        }
    }
}

/// Every emitter damages every active tank it overlaps, every tick, with no cooldown.
pub fn apply_area_damage(emitters: &mut [AreaEmitter], tanks: &mut [TankSnapshot], effects: &mut Effects) {
    for emitter in emitters.iter_mut() {
        emitter.frame = emitter.frame.wrapping_add(1);
        for tank in tanks.iter_mut().filter(|t| t.active) {
            if rect_intersects_circle(emitter.rect, tank.position, tank.radius) && tank.health.hit(emitter.damage) {
                tank.active = false;
                effects.smoke(tank.position - AREA_SMOKE_OFFSET);
            }
        }
    }
}

/// Spends every active projectile touching a hull edge. Tanks are unaffected.
pub fn block_at_hull(projectiles: &mut [Projectile], hull: &Hull, effects: &mut Effects) {
    if hull.0.is_empty() {
        return;
    }
    for projectile in projectiles.iter_mut().filter(|p| p.active) {
        let blocked = hull
            .edges()
            .any(|(start, end)| circle_segment_intersect(start, end, projectile.position, projectile.radius));
        if blocked {
            projectile.active = false;
            effects.explode(projectile.position);
        }
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Loaded tanks with a living opponent fire at their nearest enemy.
pub fn fire_weapons(
    mut query: Query<(&RosterIndex, &Tank, &mut Weapon)>,
    snapshot: Res<RosterSnapshot>,
    config: Res<BattleConfig>,
    mut projectiles: ResMut<Projectiles>,
    mut fired: Local<Parallel<Vec<Projectile>>>,
) {
    let blue_alive = snapshot.has_active(Team::Blue);
    let red_alive = snapshot.has_active(Team::Red);
    let (speed, radius) = (config.projectile_speed, config.projectile_radius);

    query.par_iter_mut().for_each(|(index, tank, mut weapon)| {
        if !tank.active || !weapon.is_loaded() {
            return;
        }
        let opponent_alive = match tank.team.opponent() {
            Team::Blue => blue_alive,
            Team::Red => red_alive,
        };
        if !opponent_alive {
            return;
        }
        let Some(target) = find_closest_enemy(&snapshot.tanks, index.0) else {
            return;
        };

        let shooter = &snapshot.tanks[index.0];
        let projectile = aim(shooter, index.0, snapshot.tanks[target].position, speed, radius);
        fired.scope(|buffer| buffer.push(projectile));
        weapon.reload();
    });

    // Single merge point. Sorting by shooter keeps the list order reproducible.
    let mut volley: Vec<Projectile> = fired.drain().collect();
    volley.sort_by_key(|p| p.owner);
    projectiles.0.extend(volley);
}

/// Applies projectile hits and emitter damage to the snapshot.
pub fn resolve_damage(
    mut snapshot: ResMut<RosterSnapshot>,
    mut projectiles: ResMut<Projectiles>,
    mut emitters: ResMut<AreaEmitters>,
    mut effects: ResMut<Effects>,
    config: Res<BattleConfig>,
) {
    let snapshot = &mut *snapshot;
    let effects = &mut *effects;
    resolve_projectiles(&mut projectiles.0, &mut snapshot.tanks, config.projectile_damage, effects);
    apply_area_damage(&mut emitters.0, &mut snapshot.tanks, effects);
}

/// Copies health and elimination from the snapshot back onto the tanks.
pub fn apply_casualties(
    mut query: Query<(&RosterIndex, &mut Tank, &mut Health)>,
    snapshot: Res<RosterSnapshot>,
) {
    for (index, mut tank, mut health) in query.iter_mut() {
        let Some(seen) = snapshot.tanks.get(index.0) else { continue };
        if *health != seen.health {
            *health = seen.health;
        }
        if tank.active && !seen.active {
            tank.active = false;
            debug!("[COMBAT] Tank {} ({:?}) eliminated", index.0, tank.team);
        }
    }
}

/// Deactivates projectiles touching the hull when hull blocking is on.
pub fn block_projectiles(
    mut projectiles: ResMut<Projectiles>,
    mut effects: ResMut<Effects>,
    hull: Res<Hull>,
    config: Res<BattleConfig>,
) {
    if config.hull_blocking {
        block_at_hull(&mut projectiles.0, &hull, &mut effects);
    }
}

/// Drops spent projectiles and finished effects, keeping relative order.
pub fn purge_spent(mut projectiles: ResMut<Projectiles>, mut effects: ResMut<Effects>) {
    projectiles.0.retain(|p| p.active);
    effects.tick_and_purge();
}
