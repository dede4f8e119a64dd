use log::debug;

use crate::config::SceneParams;
use crate::error::GridError;
use crate::noise::layered;
use crate::rng::derive_seed;
use crate::sim::flora::FloraSim;
use crate::sim::water::WaterSim;
use crate::sim::{Tile, TileSim};
use crate::tiled_grid::TiledGrid;
use crate::tiling::SquareTiling;

const SALT_TERRAIN: u64 = 0x7E22_A1A0_CAFE_0001;

/// Terrain height at a logical coordinate. Depends only on the coordinate, so
/// a tile panned to `(x, z)` sees the same ground a fresh grid would.
pub fn terrain_height(x: i32, z: i32, terrain_seed: u32, params: &SceneParams) -> f32 {
    layered(x as f32, z as f32, terrain_seed, 4, params.terrain_freq)
}

pub fn classify(height: f32, params: &SceneParams) -> Tile {
    Tile {
        is_water: height < params.sea_level,
        is_flora: height >= params.flora_min && height < params.flora_max,
    }
}

/// A square grid with water and flora running over it.
///
/// Owns the tile flags (here derived from noise) and keeps them in step with
/// the grid as it pans.
pub struct Scene {
    grid: TiledGrid<SquareTiling>,
    tiles: Vec<Tile>,
    water: WaterSim,
    flora: FloraSim,
    params: SceneParams,
    terrain_seed: u32,
    frames: u64,
}

impl Scene {
    pub fn new(params: SceneParams) -> Result<Self, GridError> {
        let grid = TiledGrid::new(params.width, params.depth, SquareTiling::default())?;
        let terrain_seed = derive_seed(params.seed, SALT_TERRAIN);
        let tiles: Vec<Tile> = grid
            .tiles()
            .iter()
            .map(|t| classify(terrain_height(t.x(), t.z(), terrain_seed, &params), &params))
            .collect();

        // The first sim builds the springs, the second reuses them.
        let water = WaterSim::new(&grid, params.water.clone())?;
        let flora = FloraSim::new(&grid, params.flora.clone())?;

        debug!(
            "scene {}x{}: {} water tiles, {} flora tiles, {} springs",
            params.width,
            params.depth,
            tiles.iter().filter(|t| t.is_water).count(),
            tiles.iter().filter(|t| t.is_flora).count(),
            water.network().springs().len()
        );

        Ok(Self {
            grid,
            tiles,
            water,
            flora,
            params,
            terrain_seed,
            frames: 0,
        })
    }

    pub fn grid(&self) -> &TiledGrid<SquareTiling> {
        &self.grid
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn water(&self) -> &WaterSim {
        &self.water
    }

    pub fn water_mut(&mut self) -> &mut WaterSim {
        &mut self.water
    }

    pub fn flora(&self) -> &FloraSim {
        &self.flora
    }

    pub fn flora_mut(&mut self) -> &mut FloraSim {
        &mut self.flora
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run `frames` frames of `substeps` fixed steps each.
    pub fn advance(&mut self, frames: u32) {
        for _ in 0..frames {
            self.water.run(&self.tiles, self.params.substeps);
            self.flora.run(&self.tiles, self.params.substeps);
            self.frames += 1;
        }
    }

    /// Pan the window and re-derive everything tied to the old coordinates of
    /// the tiles that moved: flags are reclassified, wave heights clamped.
    pub fn pan(&mut self, dx: i32, dz: i32) -> Result<Vec<usize>, GridError> {
        let moved = self.grid.pan(dx, dz)?;
        for &i in &moved {
            let t = self.grid.tiles()[i];
            let h = terrain_height(t.x(), t.z(), self.terrain_seed, &self.params);
            self.tiles[i] = classify(h, &self.params);
            self.water.reset_tile(i);
        }
        Ok(moved)
    }

    /// Splash the tile at a logical coordinate. Returns whether a water tile
    /// was hit; dry or absent tiles are ignored.
    pub fn splash(&mut self, x: f32, z: f32) -> Result<bool, GridError> {
        let Some(i) = self.grid.xz_to_index_f32(x, z)?.map(|t| t.i) else {
            return Ok(false);
        };
        if !self.tiles[i].is_water {
            return Ok(false);
        }
        self.water.hit_tile(i);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SceneParams {
        SceneParams {
            width: 24,
            depth: 16,
            seed: 9,
            // Several noise cells across, so both water and flora show up.
            terrain_freq: 0.3,
            ..SceneParams::default()
        }
    }

    fn first_water(scene: &Scene) -> (i32, i32) {
        let i = scene.tiles().iter().position(|t| t.is_water).unwrap();
        let t = scene.grid().tile(i).unwrap();
        (t.x(), t.z())
    }

    #[test]
    fn sims_share_one_topology() {
        let scene = Scene::new(small()).unwrap();
        assert!(scene.grid().springs_built());
        assert!(scene.water().network().shares_springs_with(scene.flora().network()));
        assert_eq!(scene.tiles().len(), 24 * 16);
    }

    #[test]
    fn classifier_bands() {
        let p = SceneParams::default();
        assert_eq!(classify(-0.3, &p), Tile::WATER);
        assert_eq!(classify(0.05, &p), Tile::LAND);
        assert_eq!(classify(0.2, &p), Tile::FLORA);
        assert_eq!(classify(0.9, &p), Tile::LAND);
    }

    #[test]
    fn panned_tiles_match_fresh_terrain() {
        let mut scene = Scene::new(small()).unwrap();
        scene.pan(5, -3).unwrap();
        let seed = scene.terrain_seed;
        for (i, t) in scene.grid().tiles().iter().enumerate() {
            let expect = classify(terrain_height(t.x(), t.z(), seed, scene.params()), scene.params());
            assert_eq!(scene.tiles()[i], expect);
        }
    }

    #[test]
    fn pan_clamps_relocated_waves() {
        let mut scene = Scene::new(small()).unwrap();
        let limit = scene.params().water.limit_pos;
        for i in 0..24 * 16 {
            scene.water_mut().accel_tile(i, 50.0);
        }
        scene.advance(1);
        let moved = scene.pan(1, 0).unwrap();
        assert_eq!(moved.len(), 16);
        for &i in &moved {
            assert!(scene.water().pos()[i].abs() <= limit);
        }
        // Tiles that stayed put keep their state.
        let stayed = (0..24 * 16).find(|i| !moved.contains(i)).unwrap();
        assert!(scene.water().pos()[stayed].abs() > limit);
    }

    #[test]
    fn splash_hits_water_only() {
        let mut scene = Scene::new(small()).unwrap();
        let (x, z) = first_water(&scene);
        assert!(scene.splash(x as f32, z as f32).unwrap());
        let i = scene.grid().xz_to_index(x, z).unwrap().i;
        assert!(scene.water().vel()[i] < 0.0);

        assert!(!scene.splash(-100.0, -100.0).unwrap());
        assert!(matches!(
            scene.splash(0.5, 0.0),
            Err(GridError::NonIntegerCoord { .. })
        ));
    }

    #[test]
    fn advance_counts_frames_and_spreads_waves() {
        let mut scene = Scene::new(small()).unwrap();
        let (x, z) = first_water(&scene);
        scene.splash(x as f32, z as f32).unwrap();
        scene.advance(10);
        assert_eq!(scene.frames(), 10);
        assert!(scene.water().pos().iter().any(|&p| p != 0.0));
    }
}
