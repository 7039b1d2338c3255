/// Simulation layer - per-tick battle logic.
///
/// This module is organized into:
/// - **components**: Tank components (team, position, health, weapon, route, etc.)
/// - **resources**: Shared per-tick state (snapshot, projectiles, effects, hull, etc.)
/// - **collision**: Broad-phase bucketing and separation nudges
/// - **movement**: Route following, steering and reload
/// - **combat**: Targeting, firing, projectile/area damage and hull blocking
/// - **hull**: Barrier hull construction
/// - **ranking**: Health ranking for the overlay
/// - **systems**: Tick bookkeeping, setup, route planning, snapshots, reporting

use bevy::prelude::*;

pub mod collision;
pub mod combat;
pub mod components;
pub mod hull;
pub mod movement;
pub mod ranking;
pub mod resources;
pub mod systems;


pub use collision::BroadPhase;
pub use components::*;
pub use resources::*;
pub use systems::simulation_running;

use crate::game::config::BattleConfig;
use crate::game::terrain::GridMap;

/// Tick phases, in execution order. Each one is a barrier for the next.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Prepare,   // Tick counter, route planning, roster snapshot
    Collision, // Broad phase and separation nudges
    Movement,  // Advance, reload, post-move snapshot
    Targeting, // Nearest enemy and firing
    Damage,    // Projectile and area damage, casualty write-back
    Barrier,   // Hull rebuild, projectile blocking, purge
    Ranking,   // Health rankings per team
    Report,    // Summary and run-length check
}

/// Main simulation plugin.
///
/// Expects a [`BattleConfig`] and a [`GridMap`]; defaults are inserted when missing.
/// Tanks are spawned by whoever owns the battlefield (see `spawn_roster`).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        app.init_resource::<BattleConfig>();
        app.init_resource::<GridMap>();
        app.init_resource::<SimTick>();
        app.init_resource::<SimPhase>();
        app.init_resource::<Roster>();
        app.init_resource::<RosterSnapshot>();
        app.init_resource::<Projectiles>();
        app.init_resource::<AreaEmitters>();
        app.init_resource::<Effects>();
        app.init_resource::<Hull>();
        app.init_resource::<HealthRankings>();
        app.init_resource::<BattleSummary>();
        app.init_resource::<BroadPhase>();

        app.configure_sets(
            FixedUpdate,
            (
                SimSet::Prepare,
                SimSet::Collision,
                SimSet::Movement,
                SimSet::Targeting,
                SimSet::Damage,
                SimSet::Barrier,
                SimSet::Ranking,
                SimSet::Report,
            )
                .chain()
                .run_if(simulation_running),
        );

        app.add_systems(Startup, systems::apply_battle_config);

        app.add_systems(
            FixedUpdate,
            (
                (systems::increment_sim_tick, systems::plan_routes, systems::capture_snapshot)
                    .chain()
                    .in_set(SimSet::Prepare),
                (collision::rebuild_broad_phase, collision::resolve_collisions)
                    .chain()
                    .in_set(SimSet::Collision),
                (movement::advance_tanks, systems::capture_snapshot)
                    .chain()
                    .in_set(SimSet::Movement),
                combat::fire_weapons.in_set(SimSet::Targeting),
                (combat::resolve_damage, combat::apply_casualties)
                    .chain()
                    .in_set(SimSet::Damage),
                (hull::rebuild_hull, combat::block_projectiles, combat::purge_spent)
                    .chain()
                    .in_set(SimSet::Barrier),
                ranking::rank_survivors.in_set(SimSet::Ranking),
                systems::report_status.in_set(SimSet::Report),
            ),
        );
    }
}
