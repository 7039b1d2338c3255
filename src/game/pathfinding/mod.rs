//! Tile-to-tile route search over the [`GridMap`].
//!
//! The baseline search is an unweighted breadth-first search where each queue entry
//! carries its whole partial route, so no back-tracking pass is needed. Neighbors are
//! expanded in the grid's exit order (+col, -col, +row, -row), which fixes the winner
//! among equal-length routes.

mod weighted;


use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

use crate::game::config::RoutePolicy;
use crate::game::terrain::GridMap;

pub use weighted::find_weighted_route;

// ============================================================================
// Search Scratch
// ============================================================================

/// Reusable per-worker search state.
///
/// The visited bits belong to the search, not to the tiles, so concurrent searches
/// over the same grid never share flags. Every bit set during a search is cleared
/// again before the search returns.
#[derive(Default, Debug)]
pub struct SearchScratch {
    visited: FixedBitSet,
    touched: Vec<usize>,
}

impl SearchScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no visited flag is set.
    pub fn is_clean(&self) -> bool {
        self.touched.is_empty() && self.visited.count_ones(..) == 0
    }

    pub(crate) fn begin(&mut self, tiles: usize) -> VisitGuard<'_> {
        if self.visited.len() < tiles {
            self.visited.grow(tiles);
        }
        VisitGuard { scratch: self }
    }
}

/// Clears every flag it set when dropped, including on early return.
pub(crate) struct VisitGuard<'a> {
    scratch: &'a mut SearchScratch,
}

impl VisitGuard<'_> {
    /// Marks a tile visited. Returns false if it already was.
    pub(crate) fn visit(&mut self, tile: usize) -> bool {
        if self.scratch.visited.put(tile) {
            return false;
        }
        self.scratch.touched.push(tile);
        true
    }

    pub(crate) fn is_visited(&self, tile: usize) -> bool {
        self.scratch.visited.contains(tile)
    }
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        let SearchScratch { visited, touched } = &mut *self.scratch;
        for tile in touched.drain(..) {
            visited.set(tile, false);
        }
    }
}

// ============================================================================
// Route Search
// ============================================================================

/// Breadth-first route from `start` to `goal` (arena indices).
///
/// Returns tile centers from start to goal inclusive, or an empty route when the goal
/// cannot be reached. An unreachable goal is a normal outcome, not an error.
pub fn find_route(grid: &GridMap, scratch: &mut SearchScratch, start: usize, goal: usize) -> Vec<Vec2> {
    if start >= grid.len() || goal >= grid.len() {
        return Vec::new();
    }
    if start == goal {
        return vec![grid.tile_center(start)];
    }

    let mut visited = scratch.begin(grid.len());
    visited.visit(start);

    let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
    queue.push_back(vec![start]);

    while let Some(route) = queue.pop_front() {
        let Some(&current) = route.last() else { continue };

        for &exit in grid.neighbors(current) {
            if exit == goal {
                let mut found = route;
                found.push(exit);
                return found.into_iter().map(|tile| grid.tile_center(tile)).collect();
            }
            if visited.visit(exit) {
                let mut extended = Vec::with_capacity(route.len() + 1);
                extended.extend_from_slice(&route);
                extended.push(exit);
                queue.push_back(extended);
            }
        }
    }

    Vec::new()
}

/// Route for a tank at `position` heading to `destination`, in world coordinates.
///
/// Positions off the grid have no tile, so they get an empty route.
pub fn route_for(
    grid: &GridMap,
    scratch: &mut SearchScratch,
    policy: RoutePolicy,
    position: Vec2,
    destination: Vec2,
) -> Vec<Vec2> {
    let (Some(start), Some(goal)) = (grid.tile_at(position), grid.tile_at(destination)) else {
        debug!(
            "[PATHFINDING] Route request off grid: {:?} -> {:?}",
            position, destination
        );
        return Vec::new();
    };

    match policy {
        RoutePolicy::Uniform => find_route(grid, scratch, start, goal),
        RoutePolicy::Weighted => find_weighted_route(grid, scratch, start, goal),
    }
}
