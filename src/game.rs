use bevy::prelude::*;

pub mod config;
pub mod math;
pub mod pathfinding;
pub mod simulation;
pub mod terrain;

use config::BattleConfigPlugin;
use simulation::SimulationPlugin;

/// Full battle: config from disk, terrain layout, both rosters, and the tick pipeline.
pub struct BattlePlugin;

impl Plugin for BattlePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((BattleConfigPlugin::default(), SimulationPlugin))
            .add_systems(Startup, (terrain::load_terrain, simulation::systems::spawn_roster).chain());

        info!("[GAME] Battle plugin registered");
    }
}
