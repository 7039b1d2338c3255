use bevy::prelude::*;
use bastion::game::config::{BattleConfig, RoutePolicy};
use bastion::game::pathfinding::{route_for, SearchScratch};
use bastion::game::terrain::{GridMap, TileKind};

fn shipped_grid() -> GridMap {
    let config = BattleConfig::default();
    GridMap::load(&config.terrain_path, config.grid_width, config.grid_height, config.tile_size)
}

fn weighted_cost(grid: &GridMap, route: &[Vec2]) -> f32 {
    route
        .iter()
        .skip(1)
        .map(|p| 1.0 / grid.speed_modifier_at(*p))
        .sum()
}

#[test]
fn test_shipped_terrain_has_obstacles() {
    let grid = shipped_grid();
    assert_eq!((grid.width(), grid.height()), (80, 45));

    let count = |kind: TileKind| (0..grid.len()).filter(|&i| grid.tile_by_index(i).kind == kind).count();
    assert!(count(TileKind::Mountain) > 0);
    assert!(count(TileKind::Water) > 0);
    assert!(count(TileKind::Dense) > 0);
    assert!(count(TileKind::Rough) > 0);
}

#[test]
fn test_routes_cross_the_ridge_through_passes() {
    let grid = shipped_grid();
    let mut scratch = SearchScratch::new();

    let start = Vec2::new(100.0, 200.0);
    let goal = Vec2::new(1100.0, 600.0);
    let route = route_for(&grid, &mut scratch, RoutePolicy::Uniform, start, goal);

    assert!(!route.is_empty());
    assert_eq!(route.first().copied(), Some(grid.tile_center(grid.tile_at(start).unwrap())));
    assert_eq!(route.last().copied(), Some(grid.tile_center(grid.tile_at(goal).unwrap())));
    for waypoint in &route {
        let tile = grid.tile_at(*waypoint).unwrap();
        assert!(grid.tile_by_index(tile).kind.is_passable());
    }
    assert!(scratch.is_clean());
}

#[test]
fn test_weighted_route_is_never_more_expensive() {
    let grid = shipped_grid();
    let mut scratch = SearchScratch::new();

    let pairs = [
        (Vec2::new(100.0, 120.0), Vec2::new(1100.0, 120.0)),
        (Vec2::new(300.0, 100.0), Vec2::new(900.0, 620.0)),
        (Vec2::new(760.0, 600.0), Vec2::new(760.0, 100.0)),
    ];

    for (start, goal) in pairs {
        let uniform = route_for(&grid, &mut scratch, RoutePolicy::Uniform, start, goal);
        let weighted = route_for(&grid, &mut scratch, RoutePolicy::Weighted, start, goal);

        assert!(!uniform.is_empty() && !weighted.is_empty());
        assert!(weighted.len() >= uniform.len(), "BFS is optimal in steps");
        assert!(
            weighted_cost(&grid, &weighted) <= weighted_cost(&grid, &uniform) + 1e-3,
            "weighted route costs more than the uniform one for {:?} -> {:?}",
            start,
            goal
        );
        assert!(scratch.is_clean());
    }
}
