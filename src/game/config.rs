use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "assets/battle_config.ron";

/// How routes are searched over the grid.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Breadth-first search, every step costs the same. Baseline behavior.
    #[default]
    Uniform,
    /// Dijkstra expansion weighted by the inverse terrain speed modifier.
    Weighted,
}

/// A static damage zone as written in the config file.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct EmitterConfig {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub damage: i32,
}

/// Static battle configuration, loaded once at startup.
///
/// Everything the simulation treats as a constant lives here so scenario tests can
/// build a small battlefield without touching the defaults.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct BattleConfig {
    // Run length
    pub tick_budget: u64,

    // Roster and formation
    pub tanks_per_team: usize,
    pub formation_columns: usize,
    pub formation_spacing: f32,
    pub blue_origin: [f32; 2],
    pub red_origin: [f32; 2],
    pub blue_destination_x: f32,
    pub red_destination_x: f32,
    pub destination_y_offset: f32,

    // Tanks
    pub tank_radius: f32,
    pub tank_max_health: i32,
    pub tank_max_speed: f32,
    pub initial_reload_ticks: u32,
    pub reload_ticks: u32,
    pub arrival_threshold: f32,

    // Collision
    pub nudge_strength: f32,
    pub collision_cell_size: f32,

    // Projectiles
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_damage: i32,
    pub hull_blocking: bool,

    // Area damage
    pub emitters: Vec<EmitterConfig>,

    // Effects
    pub explosion_lifetime: u32,
    pub smoke_lifetime: u32,

    // Ranking
    pub health_bar_rows: usize,
    pub rank_sequential_threshold: usize,

    // Terrain
    pub route_policy: RoutePolicy,
    pub grid_width: usize,
    pub grid_height: usize,
    pub tile_size: f32,
    pub terrain_path: String,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            tick_budget: 2000,
            tanks_per_team: 2048,
            formation_columns: 24,
            formation_spacing: 7.5,
            blue_origin: [47.0, 39.0],
            red_origin: [1088.0, 39.0],
            blue_destination_x: 1100.0,
            red_destination_x: 100.0,
            destination_y_offset: 16.0,
            tank_radius: 3.0,
            tank_max_health: 1000,
            tank_max_speed: 1.0,
            initial_reload_ticks: 1,
            reload_ticks: 200,
            arrival_threshold: 2.0,
            nudge_strength: 1.0,
            collision_cell_size: 16.0,
            projectile_speed: 3.0,
            projectile_radius: 5.0,
            projectile_damage: 60,
            hull_blocking: true,
            emitters: vec![
                EmitterConfig { position: [590.0, 327.0], size: [100.0, 50.0], damage: 50 },
                EmitterConfig { position: [64.0, 64.0], size: [100.0, 50.0], damage: 50 },
                EmitterConfig { position: [1200.0, 600.0], size: [100.0, 50.0], damage: 50 },
            ],
            explosion_lifetime: 18,
            smoke_lifetime: 120,
            health_bar_rows: 720,
            rank_sequential_threshold: 256,
            route_policy: RoutePolicy::Uniform,
            grid_width: 80,
            grid_height: 45,
            tile_size: 16.0,
            terrain_path: "assets/terrain.txt".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse battle config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to read battle config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid battle config: {field} {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

impl BattleConfig {
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config = ron::from_str::<BattleConfig>(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        let checks = [
            ("tank_max_health", self.tank_max_health > 0, "must be positive"),
            ("collision_cell_size", positive(self.collision_cell_size), "must be positive and finite"),
            ("tile_size", positive(self.tile_size), "must be positive and finite"),
            ("grid_width", self.grid_width > 0, "must be positive"),
            ("grid_height", self.grid_height > 0, "must be positive"),
        ];
        match checks.into_iter().find(|(_, ok, _)| !ok) {
            Some((field, _, reason)) => Err(ConfigError::Invalid { field, reason }),
            None => Ok(()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Loads the config, logging and substituting defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(config) => {
                info!("[CONFIG] Loaded battle config from {:?}", path.as_ref());
                config
            }
            Err(e) => {
                error!("[CONFIG] {}", e);
                error!("[CONFIG] Using default BattleConfig");
                Self::default()
            }
        }
    }
}

/// Loads [`BattleConfig`] while the app is being built.
///
/// A config already present in the world (tests, embedding apps) is left alone.
pub struct BattleConfigPlugin {
    pub path: PathBuf,
}

impl Default for BattleConfigPlugin {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_CONFIG_PATH) }
    }
}

impl Plugin for BattleConfigPlugin {
    fn build(&self, app: &mut App) {
        if app.world().contains_resource::<BattleConfig>() {
            info!("[CONFIG] BattleConfig already present, skipping {:?}", self.path);
            return;
        }
        app.insert_resource(BattleConfig::load_or_default(&self.path));
    }
}
