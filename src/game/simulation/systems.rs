/// Core simulation systems.
///
/// This module contains systems for:
/// - Tick and phase bookkeeping
/// - Battlefield setup (roster formation, emitters)
/// - Route planning
/// - Roster snapshots
/// - Status reporting

use bevy::prelude::*;
use bevy::utils::Parallel;

use super::collision::BroadPhase;
use super::components::*;
use super::resources::*;
use crate::game::config::BattleConfig;
use crate::game::pathfinding::{route_for, SearchScratch};
use crate::game::terrain::GridMap;

/// Ticks between periodic status lines.
const REPORT_INTERVAL: u64 = 100;

// ============================================================================
// Tick Management
// ============================================================================

/// Increment the global simulation tick counter.
///
/// Runs first in the `Prepare` phase so every later phase sees the current tick.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

/// Run condition for every tick phase.
pub fn simulation_running(phase: Res<SimPhase>) -> bool {
    *phase == SimPhase::Running
}

// ============================================================================
// Battlefield Setup
// ============================================================================

/// Applies config values that live on simulation resources.
pub fn apply_battle_config(
    config: Res<BattleConfig>,
    mut effects: ResMut<Effects>,
    mut emitters: ResMut<AreaEmitters>,
    mut broad_phase: ResMut<BroadPhase>,
) {
    effects.explosion_lifetime = config.explosion_lifetime;
    effects.smoke_lifetime = config.smoke_lifetime;
    emitters.0 = config.emitters.iter().map(AreaEmitter::from).collect();
    *broad_phase = BroadPhase::new(config.collision_cell_size);

    info!(
        "[SIM] Battlefield configured: {} emitters, hull blocking {}",
        emitters.0.len(),
        if config.hull_blocking { "on" } else { "off" }
    );
}

/// Position of the `i`-th tank in a formation anchored at `origin`.
pub fn formation_slot(origin: Vec2, i: usize, columns: usize, spacing: f32) -> Vec2 {
    let columns = columns.max(1);
    origin + Vec2::new((i % columns) as f32, (i / columns) as f32) * spacing
}

/// Spawns both teams in formation. Blue takes the first roster indices.
pub fn spawn_roster(world: &mut World) {
    let config = world.resource::<BattleConfig>().clone();

    for team in Team::ALL {
        let (origin, destination_x) = match team {
            Team::Blue => (Vec2::from(config.blue_origin), config.blue_destination_x),
            Team::Red => (Vec2::from(config.red_origin), config.red_destination_x),
        };

        for i in 0..config.tanks_per_team {
            let position = formation_slot(origin, i, config.formation_columns, config.formation_spacing);
            let destination = Vec2::new(destination_x, position.y + config.destination_y_offset);
            Roster::enlist(
                world,
                TankBundle::new(
                    team,
                    position,
                    config.tank_radius,
                    config.tank_max_health,
                    Weapon::new(config.initial_reload_ticks, config.reload_ticks),
                    Route::to(destination),
                ),
            );
        }
    }

    info!(
        "[SIM] Spawned {} tanks ({} per team)",
        world.resource::<Roster>().len(),
        config.tanks_per_team
    );
}

// ============================================================================
// Route Planning
// ============================================================================

/// Plans every route that has not been searched yet (tick 0, or after a retarget).
///
/// Searches run in parallel, each worker with its own scratch.
pub fn plan_routes(
    mut query: Query<(&SimPosition, &mut Route)>,
    grid: Res<GridMap>,
    config: Res<BattleConfig>,
    scratches: Local<Parallel<SearchScratch>>,
) {
    let policy = config.route_policy;

    query.par_iter_mut().for_each(|(position, mut route)| {
        if route.planned {
            return;
        }
        let destination = route.destination;
        let waypoints = scratches.scope(|scratch| route_for(&grid, scratch, policy, position.0, destination));
        if waypoints.is_empty() {
            debug!("[SIM] No route from {:?} to {:?}", position.0, destination);
        }
        route.set_waypoints(waypoints);
    });
}

// ============================================================================
// Snapshots
// ============================================================================

/// Copies every tank into the dense [`RosterSnapshot`].
///
/// Runs at the start of the tick and again after movement, so targeting sees the
/// positions tanks moved to this tick.
pub fn capture_snapshot(
    query: Query<(&RosterIndex, &Tank, &SimPosition, &Collider, &Health)>,
    roster: Res<Roster>,
    mut snapshot: ResMut<RosterSnapshot>,
) {
    snapshot.tanks.clear();
    snapshot.tanks.resize(roster.len(), TankSnapshot::default());

    for (index, tank, position, collider, health) in query.iter() {
        if let Some(slot) = snapshot.tanks.get_mut(index.0) {
            *slot = TankSnapshot {
                position: position.0,
                radius: collider.radius,
                team: tank.team,
                health: *health,
                active: tank.active,
            };
        }
    }
}

// ============================================================================
// Reporting
// ============================================================================

/// Per-tick counts handed to observers.
pub fn summarize(
    tick: u64,
    snapshot: &RosterSnapshot,
    projectiles: &Projectiles,
    hull: &Hull,
    effects: &Effects,
) -> BattleSummary {
    BattleSummary {
        tick,
        blue_alive: snapshot.active_count(Team::Blue),
        red_alive: snapshot.active_count(Team::Red),
        projectiles: projectiles.0.len(),
        hull_vertices: hull.0.len(),
        explosions: effects.explosions.len(),
        smokes: effects.smokes.len(),
    }
}

/// Publishes the tick summary and finishes the run once the tick budget is spent.
pub fn report_status(
    tick: Res<SimTick>,
    snapshot: Res<RosterSnapshot>,
    projectiles: Res<Projectiles>,
    hull: Res<Hull>,
    effects: Res<Effects>,
    config: Res<BattleConfig>,
    mut summary: ResMut<BattleSummary>,
    mut phase: ResMut<SimPhase>,
) {
    *summary = summarize(tick.0, &snapshot, &projectiles, &hull, &effects);

    if tick.0 % REPORT_INTERVAL == 0 {
        info!(
            "[SIM] Tick {}: blue {} / red {} alive, {} projectiles, hull {} vertices",
            summary.tick, summary.blue_alive, summary.red_alive, summary.projectiles, summary.hull_vertices
        );
    }

    if tick.0 >= config.tick_budget && phase.finish() {
        info!(
            "[SIM] Finished after {} ticks: blue {} / red {} alive",
            summary.tick, summary.blue_alive, summary.red_alive
        );
    }
}
