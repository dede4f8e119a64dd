//! Spring-mass simulations over a shared tile topology.
//!
//! Both simulations are driven the same way: build them over a
//! [`TiledGrid`], then call [`TileSim::step`] a fixed number of times per
//! frame with the current tile flags. Flags gate springs per step; a spring
//! only acts when both of its tiles carry the flag the simulation cares about.

pub mod flora;
pub mod water;

use std::rc::Rc;

use crate::error::GridError;
use crate::springs::Spring;
use crate::tiled_grid::TiledGrid;
use crate::tiling::Tiling;

/// Per-tile classification owned by whoever generates terrain.
pub trait TileFlags {
    fn is_water(&self) -> bool;
    fn is_flora(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    pub is_water: bool,
    pub is_flora: bool,
}

impl Tile {
    pub const LAND: Tile = Tile { is_water: false, is_flora: false };
    pub const WATER: Tile = Tile { is_water: true, is_flora: false };
    pub const FLORA: Tile = Tile { is_water: false, is_flora: true };
}

impl TileFlags for Tile {
    #[inline]
    fn is_water(&self) -> bool {
        self.is_water
    }

    #[inline]
    fn is_flora(&self) -> bool {
        self.is_flora
    }
}

/// Tile count plus the grid's spring list. The springs are shared with the
/// grid's cache and with every other simulation built over the same grid.
#[derive(Clone, Debug)]
pub struct SpringNetwork {
    n: usize,
    springs: Rc<[Spring]>,
}

impl SpringNetwork {
    pub fn new<T: Tiling>(grid: &TiledGrid<T>) -> Result<Self, GridError> {
        Ok(Self {
            n: grid.n(),
            springs: grid.springs()?,
        })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn shares_springs_with(&self, other: &SpringNetwork) -> bool {
        Rc::ptr_eq(&self.springs, &other.springs)
    }

    /// Panics unless there is a flag for every tile. Called before a step
    /// touches any state, so a short slice never leaves velocities half updated.
    #[inline]
    pub fn check_members<M>(&self, members: &[M]) {
        assert!(
            members.len() >= self.n,
            "step needs flags for {} tiles, got {}",
            self.n,
            members.len()
        );
    }
}

pub trait TileSim {
    fn network(&self) -> &SpringNetwork;

    /// Advance one fixed timestep. `members[i]` holds the flags of flat index `i`.
    ///
    /// # Panics
    ///
    /// If `members` is shorter than [`TileSim::n`]. Nothing is modified first.
    fn step<M: TileFlags>(&mut self, members: &[M]);

    fn n(&self) -> usize {
        self.network().n()
    }

    fn run<M: TileFlags>(&mut self, members: &[M], steps: u32) {
        for _ in 0..steps {
            self.step(members);
        }
    }
}
