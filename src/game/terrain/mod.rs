//! Static tile grid the battle is fought on.
//!
//! Tiles live in a flat arena indexed by `row * width + col`. Neighbor relations
//! ("exits") are stored as arena indices and are computed once at load time.

use bevy::prelude::*;
use smallvec::SmallVec;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Terrain classification of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileKind {
    #[default]
    Open,
    Dense,
    Rough,
    /// Impassable high ground.
    Mountain,
    /// Impassable water.
    Water,
}

impl TileKind {
    /// Layout code to tile kind. Case-insensitive; unknown codes are open ground.
    pub fn from_code(code: char) -> Self {
        match code.to_ascii_uppercase() {
            'G' => TileKind::Open,
            'F' => TileKind::Dense,
            'R' => TileKind::Rough,
            'M' => TileKind::Mountain,
            'W' => TileKind::Water,
            _ => TileKind::Open,
        }
    }

    pub fn is_passable(self) -> bool {
        !matches!(self, TileKind::Mountain | TileKind::Water)
    }

    /// Movement multiplier for a tank standing on this tile.
    pub fn speed_modifier(self) -> f32 {
        match self {
            TileKind::Open => 1.0,
            TileKind::Dense => 0.5,
            TileKind::Rough => 0.75,
            TileKind::Mountain | TileKind::Water => 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub kind: TileKind,
    pub row: usize,
    pub col: usize,
    /// Traversable neighbors in expansion order: +col, -col, +row, -row.
    pub exits: SmallVec<[usize; 4]>,
}

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("failed to read terrain layout from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Resource, Clone, Debug)]
pub struct GridMap {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::open(80, 45, 16.0)
    }
}

impl GridMap {
    /// An all-open grid.
    pub fn open(width: usize, height: usize, tile_size: f32) -> Self {
        Self::from_kinds(width, height, tile_size, vec![TileKind::Open; width * height])
    }

    /// Builds a grid from a textual layout.
    ///
    /// The first line is the row count, followed by that many lines of tile codes.
    /// Missing rows, short lines and unknown codes all default to open ground.
    /// Rows and columns beyond the grid dimensions are ignored.
    pub fn from_layout(layout: &str, width: usize, height: usize, tile_size: f32) -> Self {
        let mut kinds = vec![TileKind::Open; width * height];
        let mut lines = layout.lines();

        let declared_rows = match lines.next().map(|line| line.trim().parse::<usize>()) {
            Some(Ok(rows)) => rows,
            Some(Err(e)) => {
                warn!("[TERRAIN] Bad row count in terrain layout ({}), defaulting to open ground", e);
                0
            }
            None => {
                warn!("[TERRAIN] Empty terrain layout, defaulting to open ground");
                0
            }
        };

        if declared_rows > height {
            warn!(
                "[TERRAIN] Layout declares {} rows but the grid has {}; extra rows ignored",
                declared_rows, height
            );
        }

        for (row, line) in lines.take(declared_rows.min(height)).enumerate() {
            for (col, code) in line.chars().take(width).enumerate() {
                kinds[row * width + col] = TileKind::from_code(code);
            }
        }

        Self::from_kinds(width, height, tile_size, kinds)
    }

    /// Loads a layout file. A missing or unreadable file yields an all-open grid.
    pub fn load(path: impl AsRef<Path>, width: usize, height: usize, tile_size: f32) -> Self {
        match read_layout(path.as_ref()) {
            Ok(layout) => {
                info!("[TERRAIN] Loaded terrain layout from {:?}", path.as_ref());
                Self::from_layout(&layout, width, height, tile_size)
            }
            Err(e) => {
                warn!("[TERRAIN] {}. Defaulting to open ground", e);
                Self::open(width, height, tile_size)
            }
        }
    }

    fn from_kinds(width: usize, height: usize, tile_size: f32, kinds: Vec<TileKind>) -> Self {
        debug_assert_eq!(kinds.len(), width * height);

        let mut tiles: Vec<Tile> = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| Tile {
                kind,
                row: i / width,
                col: i % width,
                exits: SmallVec::new(),
            })
            .collect();

        let passable = |row: isize, col: isize| -> bool {
            row >= 0
                && col >= 0
                && (row as usize) < height
                && (col as usize) < width
                && kinds[row as usize * width + col as usize].is_passable()
        };

        for tile in tiles.iter_mut() {
            let (row, col) = (tile.row as isize, tile.col as isize);
            for (dr, dc) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
                if passable(row + dr, col + dc) {
                    tile.exits.push((row + dr) as usize * width + (col + dc) as usize);
                }
            }
        }

        Self { width, height, tile_size, tiles }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Arena index of `(row, col)`. Out-of-grid coordinates are a logic error upstream.
    pub fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "tile ({}, {}) outside {}x{} grid",
            row,
            col,
            self.width,
            self.height
        );
        row * self.width + col
    }

    pub fn tile(&self, row: usize, col: usize) -> &Tile {
        &self.tiles[self.index(row, col)]
    }

    pub fn tile_by_index(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }

    /// False when out of bounds or impassable.
    pub fn is_traversable(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            return false;
        }
        self.tiles[row as usize * self.width + col as usize].kind.is_passable()
    }

    /// Traversable neighbors of a tile, at most four.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.tiles[index].exits
    }

    /// Tile index containing a world position, if it is on the grid.
    pub fn tile_at(&self, position: Vec2) -> Option<usize> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let col = (position.x / self.tile_size) as usize;
        let row = (position.y / self.tile_size) as usize;
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    pub fn tile_center(&self, index: usize) -> Vec2 {
        let tile = &self.tiles[index];
        Vec2::new(
            (tile.col as f32 + 0.5) * self.tile_size,
            (tile.row as f32 + 0.5) * self.tile_size,
        )
    }

    /// Speed multiplier at a world position. Off-grid positions move at full speed.
    pub fn speed_modifier_at(&self, position: Vec2) -> f32 {
        self.tile_at(position)
            .map(|index| self.tiles[index].kind.speed_modifier())
            .unwrap_or(1.0)
    }
}

fn read_layout(path: &Path) -> Result<String, TerrainError> {
    std::fs::read_to_string(path).map_err(|source| TerrainError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces the grid with the configured terrain layout.
pub fn load_terrain(mut commands: Commands, config: Res<crate::game::config::BattleConfig>) {
    commands.insert_resource(GridMap::load(
        &config.terrain_path,
        config.grid_width,
        config.grid_height,
        config.tile_size,
    ));
}
