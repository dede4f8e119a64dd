use std::collections::HashSet;

use terrasim::rng::Rng;
use terrasim::springs::{ADJACENT_WEIGHT, DIAGONAL_WEIGHT};
use terrasim::{
    FloraParams, FloraSim, HexTiling, SquareTiling, Tile, TileSim, TiledGrid, WaterParams, WaterSim,
};

fn neighbors(springs: &[terrasim::Spring], i: usize) -> HashSet<usize> {
    springs
        .iter()
        .filter_map(|s| {
            if s.a == i {
                Some(s.b)
            } else if s.b == i {
                Some(s.a)
            } else {
                None
            }
        })
        .collect()
}

#[test]
fn panning_never_disturbs_flat_indices_or_topology() {
    let mut grid = TiledGrid::new(9, 7, SquareTiling::default()).unwrap();
    let springs = grid.springs().unwrap();
    let before: Vec<HashSet<usize>> = (0..grid.n()).map(|i| neighbors(&springs, i)).collect();

    let mut rng = Rng::new(2024);
    for _ in 0..100 {
        let dx = rng.range_usize(5) as i32 - 2;
        let dz = rng.range_usize(5) as i32 - 2;
        grid.pan(dx, dz).unwrap();

        let flat: HashSet<usize> = grid.tiles().iter().map(|t| t.i).collect();
        assert_eq!(flat.len(), grid.n());
        assert!(flat.iter().all(|&i| i < grid.n()));
    }

    // Cached topology still matches the live coordinates: every spring joins
    // tiles that are toroidal neighbors in the current window.
    let (w, d) = (grid.width() as i32, grid.depth() as i32);
    for s in grid.springs().unwrap().iter() {
        let (a, b) = (grid.tile(s.a).unwrap(), grid.tile(s.b).unwrap());
        let dx = (a.x() - b.x()).rem_euclid(w);
        let dz = (a.z() - b.z()).rem_euclid(d);
        let dx = dx.min(w - dx);
        let dz = dz.min(d - dz);
        if s.weight == ADJACENT_WEIGHT {
            assert_eq!(dx + dz, 1);
        } else {
            assert_eq!(s.weight, DIAGONAL_WEIGHT);
            assert_eq!((dx, dz), (1, 1));
        }
    }
    let rebuilt = terrasim::springs::build_springs(&grid, grid.tiling()).unwrap();
    let after: Vec<HashSet<usize>> = (0..grid.n()).map(|i| neighbors(&rebuilt, i)).collect();
    assert_eq!(before, after);
}

#[test]
fn edge_tiles_wrap_to_the_opposite_side() {
    let (w, d) = (6, 5);
    let grid = TiledGrid::new(w, d, SquareTiling::default()).unwrap();
    let springs = grid.springs().unwrap();
    for z in 0..d as i32 {
        let left = grid.xz_to_index(0, z).unwrap().i;
        let right = grid.xz_to_index(w as i32 - 1, z).unwrap().i;
        assert!(neighbors(&springs, left).contains(&right));
        assert!(neighbors(&springs, right).contains(&left));
    }
}

#[test]
fn both_sims_share_the_grid_cache() {
    let grid = TiledGrid::new(10, 10, HexTiling::default()).unwrap();
    let water = WaterSim::new(&grid, WaterParams::default()).unwrap();
    let flora = FloraSim::new(&grid, FloraParams::default()).unwrap();
    assert!(water.network().shares_springs_with(flora.network()));
    assert_eq!(water.n(), 100);
    assert_eq!(flora.pos().len(), 200);
}

#[test]
fn relocated_tile_needs_an_explicit_reset() {
    let mut grid = TiledGrid::new(4, 4, SquareTiling::default()).unwrap();
    let params = WaterParams {
        limit_pos: 0.25,
        ..WaterParams::default()
    };
    let mut water = WaterSim::new(&grid, params).unwrap();
    let tiles = vec![Tile::WATER; 16];
    for _ in 0..5 {
        water.hit_tile(0);
    }
    water.step(&tiles);
    let deep = water.pos()[0];
    assert!(deep < -0.25);

    let moved = grid.pan(1, 0).unwrap();
    assert!(moved.contains(&0));
    // Relocation alone leaves the wave in place.
    assert_eq!(water.pos()[0], deep);

    for &i in &moved {
        water.reset_tile(i);
    }
    assert_eq!(water.pos()[0], -0.25);
}

#[test]
fn mixed_shore_only_moves_wet_and_green_tiles() {
    let grid = TiledGrid::new(8, 8, SquareTiling::default()).unwrap();
    let tiles: Vec<Tile> = grid
        .tiles()
        .iter()
        .map(|t| if t.x() < 4 { Tile::WATER } else { Tile::FLORA })
        .collect();
    let mut water = WaterSim::new(&grid, WaterParams::default()).unwrap();
    let mut flora = FloraSim::new(&grid, FloraParams::default()).unwrap();

    let dry_i = grid.xz_to_index(6, 3).unwrap().i;
    let wet_i = grid.xz_to_index(2, 3).unwrap().i;
    water.hit_tile(wet_i);
    water.run(&tiles, 30);
    flora.run(&tiles, 30);

    assert!(water.pos()[wet_i] != 0.0);
    // Flora tiles never take part in a water spring.
    assert_eq!(water.pos()[dry_i], 0.0);
    let (sx, sz) = flora.sway(wet_i);
    assert_eq!((sx, sz), (0.0, 0.0));
    assert!(flora.sway(dry_i) != (0.0, 0.0));
}
