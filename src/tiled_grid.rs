use std::cell::OnceCell;
use std::ops::Deref;
use std::rc::Rc;

use crate::error::GridError;
use crate::grid::{IndexedGrid, TileIndex};
use crate::springs::{Spring, build_springs};
use crate::tiling::{Tiling, check_wrap};

/// An [`IndexedGrid`] laid out in world space by a [`Tiling`], centered on the
/// origin, with a lazily built spring topology shared by every simulation
/// over it.
pub struct TiledGrid<T: Tiling> {
    grid: IndexedGrid,
    tiling: T,
    offset: (f32, f32),
    springs: OnceCell<Rc<[Spring]>>,
}

impl<T: Tiling> TiledGrid<T> {
    pub fn new(width: usize, depth: usize, tiling: T) -> Result<Self, GridError> {
        let grid = IndexedGrid::new(width, depth)?;
        check_wrap(&tiling, width, depth)?;
        let (x0, z0) = tiling.index_to_position(0, 0);
        let (x1, z1) = tiling.index_to_position(width as i32 - 1, depth as i32 - 1);
        Ok(Self {
            grid,
            tiling,
            offset: ((x0 + x1) * 0.5, (z0 + z1) * 0.5),
            springs: OnceCell::new(),
        })
    }

    pub fn tiling(&self) -> &T {
        &self.tiling
    }

    /// Tile coordinate under a world-space point.
    pub fn position_to_coord(&self, world_x: f32, world_z: f32) -> (i32, i32) {
        self.tiling
            .position_to_index(world_x + self.offset.0, world_z + self.offset.1)
    }

    /// World-space center of a tile at its current logical coordinate.
    pub fn index_to_position(&self, tile: &TileIndex) -> (f32, f32) {
        let (wx, wz) = self.tiling.index_to_position(tile.x(), tile.z());
        (wx - self.offset.0, wz - self.offset.1)
    }

    /// Shared spring topology, built on first call.
    ///
    /// The topology is toroidal, so relocating tiles never invalidates it.
    /// A failed build caches nothing.
    pub fn springs(&self) -> Result<Rc<[Spring]>, GridError> {
        if let Some(springs) = self.springs.get() {
            return Ok(Rc::clone(springs));
        }
        let built: Rc<[Spring]> = build_springs(&self.grid, &self.tiling)?.into();
        Ok(Rc::clone(self.springs.get_or_init(|| built)))
    }

    pub fn springs_built(&self) -> bool {
        self.springs.get().is_some()
    }

    pub fn update_mapping(&mut self, i: usize, new_x: i32, new_z: i32) -> Result<(), GridError> {
        self.grid.update_mapping(i, new_x, new_z)
    }

    pub fn pan(&mut self, dx: i32, dz: i32) -> Result<Vec<usize>, GridError> {
        self.grid.pan(dx, dz)
    }
}

impl<T: Tiling> Deref for TiledGrid<T> {
    type Target = IndexedGrid;

    fn deref(&self) -> &IndexedGrid {
        &self.grid
    }
}
