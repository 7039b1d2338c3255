use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::SearchScratch;
use crate::game::terrain::GridMap;

/// Cost of entering a full-speed tile. Slower tiles cost proportionally more.
const BASE_STEP_COST: u32 = 12;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: u32,
    order: u32,
    tile: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on cost; earlier insertions win ties.
        other.cost.cmp(&self.cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn step_cost(grid: &GridMap, tile: usize) -> u32 {
    let modifier = grid.tile_by_index(tile).kind.speed_modifier();
    (BASE_STEP_COST as f32 / modifier).round() as u32
}

fn reconstruct_route(grid: &GridMap, came_from: &[usize], mut current: usize) -> Vec<Vec2> {
    let mut route = vec![grid.tile_center(current)];
    while came_from[current] != usize::MAX {
        current = came_from[current];
        route.push(grid.tile_center(current));
    }
    route.reverse();
    route
}

/// Movement-cost-optimal route using tile speed modifiers as edge weights.
///
/// Same contract as [`super::find_route`]: tile centers start to goal, empty if
/// unreachable. Settled tiles are tracked in the scratch visited set.
pub fn find_weighted_route(
    grid: &GridMap,
    scratch: &mut SearchScratch,
    start: usize,
    goal: usize,
) -> Vec<Vec2> {
    if start >= grid.len() || goal >= grid.len() {
        return Vec::new();
    }
    if start == goal {
        return vec![grid.tile_center(start)];
    }

    let mut settled = scratch.begin(grid.len());
    let mut best = vec![u32::MAX; grid.len()];
    let mut came_from = vec![usize::MAX; grid.len()];
    let mut order = 0u32;

    let mut open = BinaryHeap::new();
    best[start] = 0;
    open.push(State { cost: 0, order, tile: start });

    while let Some(State { cost, tile, .. }) = open.pop() {
        if settled.is_visited(tile) {
            continue;
        }
        settled.visit(tile);

        if tile == goal {
            return reconstruct_route(grid, &came_from, goal);
        }

        for &exit in grid.neighbors(tile) {
            if settled.is_visited(exit) {
                continue;
            }
            let next = cost + step_cost(grid, exit);
            if next < best[exit] {
                best[exit] = next;
                came_from[exit] = tile;
                order += 1;
                open.push(State { cost: next, order, tile: exit });
            }
        }
    }

    Vec::new()
}
