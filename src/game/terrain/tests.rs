use super::*;

#[test]
fn test_layout_codes_are_case_insensitive() {
    let grid = GridMap::from_layout("1\ngFrMw\n", 5, 1, 16.0);

    assert_eq!(grid.tile(0, 0).kind, TileKind::Open);
    assert_eq!(grid.tile(0, 1).kind, TileKind::Dense);
    assert_eq!(grid.tile(0, 2).kind, TileKind::Rough);
    assert_eq!(grid.tile(0, 3).kind, TileKind::Mountain);
    assert_eq!(grid.tile(0, 4).kind, TileKind::Water);
}

#[test]
fn test_unknown_codes_and_short_lines_default_to_open() {
    let grid = GridMap::from_layout("3\nMX\nM\n", 3, 3, 16.0);

    assert_eq!(grid.tile(0, 0).kind, TileKind::Mountain);
    assert_eq!(grid.tile(0, 1).kind, TileKind::Open, "unknown code");
    assert_eq!(grid.tile(0, 2).kind, TileKind::Open, "short line");
    assert_eq!(grid.tile(1, 0).kind, TileKind::Mountain);
    assert_eq!(grid.tile(2, 0).kind, TileKind::Open, "missing row");
}

#[test]
fn test_bad_row_count_yields_open_grid() {
    let grid = GridMap::from_layout("lots\nMMM\n", 3, 1, 16.0);
    assert!((0..3).all(|col| grid.tile(0, col).kind == TileKind::Open));
}

#[test]
fn test_missing_layout_file_yields_open_grid() {
    let grid = GridMap::load("assets/no_such_terrain.txt", 4, 3, 16.0);

    assert_eq!(grid.len(), 12);
    assert!((0..3).all(|row| (0..4).all(|col| grid.tile(row, col).kind == TileKind::Open)));
}

#[test]
fn test_exits_follow_expansion_order_and_skip_impassable() {
    // G W G
    // G G G
    let grid = GridMap::from_layout("2\nGWG\nGGG\n", 3, 2, 16.0);

    // Middle of the bottom row: +col, -col, then -row is water so skipped.
    let middle = grid.index(1, 1);
    assert_eq!(grid.neighbors(middle), &[grid.index(1, 2), grid.index(1, 0)]);

    // Top-left corner: +col is water, only +row remains.
    assert_eq!(grid.neighbors(grid.index(0, 0)), &[grid.index(1, 0)]);
}

#[test]
fn test_is_traversable_bounds_and_kinds() {
    let grid = GridMap::from_layout("1\nGM\n", 2, 1, 16.0);

    assert!(grid.is_traversable(0, 0));
    assert!(!grid.is_traversable(0, 1));
    assert!(!grid.is_traversable(-1, 0));
    assert!(!grid.is_traversable(0, 2));
    assert!(!grid.is_traversable(1, 0));
}

#[test]
fn test_world_position_to_tile_and_back() {
    let grid = GridMap::open(10, 10, 16.0);

    let index = grid.tile_at(Vec2::new(40.0, 20.0)).expect("on grid");
    assert_eq!(grid.tile_by_index(index).col, 2);
    assert_eq!(grid.tile_by_index(index).row, 1);
    assert_eq!(grid.tile_center(index), Vec2::new(40.0, 24.0));

    assert_eq!(grid.tile_at(Vec2::new(-1.0, 5.0)), None);
    assert_eq!(grid.tile_at(Vec2::new(5.0, 160.0)), None);
}

#[test]
fn test_speed_modifier_by_terrain() {
    let grid = GridMap::from_layout("1\nGFRM\n", 4, 1, 16.0);

    assert_eq!(grid.speed_modifier_at(Vec2::new(8.0, 8.0)), 1.0);
    assert_eq!(grid.speed_modifier_at(Vec2::new(24.0, 8.0)), 0.5);
    assert_eq!(grid.speed_modifier_at(Vec2::new(40.0, 8.0)), 0.75);
    assert_eq!(grid.speed_modifier_at(Vec2::new(56.0, 8.0)), 0.0);
    assert_eq!(grid.speed_modifier_at(Vec2::new(500.0, 8.0)), 1.0, "off grid");
}

#[test]
#[should_panic]
fn test_out_of_grid_index_panics() {
    let grid = GridMap::open(2, 2, 16.0);
    let _ = grid.index(2, 0);
}
