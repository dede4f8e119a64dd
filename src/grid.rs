use std::collections::HashMap;

use log::{trace, warn};

use crate::error::GridError;

/// Wrap `v` into `[0, len)`. Safe for negative `v`, unlike a bare `%`.
#[inline]
pub fn wrap_coord(v: i32, len: usize) -> i32 {
    let len = len as i32;
    ((v % len) + len) % len
}

/// Reject anything that is not an exact integer instead of truncating it.
#[inline]
fn integral(axis: char, value: f32) -> Result<i32, GridError> {
    // `i32::MAX as f32` rounds up to 2^31, so the upper bound must be exclusive.
    const LIMIT: f32 = 2_147_483_648.0;
    if value.is_finite() && value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
        Ok(value as i32)
    } else {
        Err(GridError::NonIntegerCoord { axis, value })
    }
}

/// One grid cell. `i` is fixed for the tile's lifetime; `(x, z)` only
/// changes through [`IndexedGrid::update_mapping`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileIndex {
    pub i: usize,
    x: i32,
    z: i32,
}

impl TileIndex {
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }
}

/// Bidirectional map between logical `(x, z)` coordinates and stable flat
/// indices in `[0, n)`.
///
/// Flat indices are assigned x-major (`i = x * depth + z`) at construction and
/// never change, so per-tile arrays stay valid while tiles are relocated.
/// The grid also tracks the origin of its resident window: tiles always cover
/// `[ox, ox + width) x [oz, oz + depth)`.
#[derive(Clone, Debug)]
pub struct IndexedGrid {
    width: usize,
    depth: usize,
    n: usize,
    tiles: Vec<TileIndex>,
    lookup: HashMap<i32, HashMap<i32, usize>>,
    origin: (i32, i32),
}

impl IndexedGrid {
    pub fn new(width: usize, depth: usize) -> Result<Self, GridError> {
        if width == 0 || depth == 0 {
            return Err(GridError::EmptyGrid { width, depth });
        }
        let n = width * depth;
        let mut tiles = Vec::with_capacity(n);
        let mut lookup: HashMap<i32, HashMap<i32, usize>> = HashMap::with_capacity(width);
        for x in 0..width as i32 {
            let column = lookup.entry(x).or_insert_with(|| HashMap::with_capacity(depth));
            for z in 0..depth as i32 {
                let i = tiles.len();
                tiles.push(TileIndex { i, x, z });
                column.insert(z, i);
            }
        }
        Ok(Self {
            width,
            depth,
            n,
            tiles,
            lookup,
            origin: (0, 0),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Logical coordinate of the window's low corner.
    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// All tiles in flat-index order.
    #[inline]
    pub fn tiles(&self) -> &[TileIndex] {
        &self.tiles
    }

    #[inline]
    pub fn tile(&self, i: usize) -> Option<&TileIndex> {
        self.tiles.get(i)
    }

    /// Tile currently at `(x, z)`, if any. An empty slot is a normal result.
    #[inline]
    pub fn xz_to_index(&self, x: i32, z: i32) -> Option<&TileIndex> {
        let i = *self.lookup.get(&x)?.get(&z)?;
        Some(&self.tiles[i])
    }

    /// Same as [`xz_to_index`](Self::xz_to_index) for callers holding float
    /// coordinates. Fails on anything that is not an exact integer.
    pub fn xz_to_index_f32(&self, x: f32, z: f32) -> Result<Option<&TileIndex>, GridError> {
        let x = integral('x', x)?;
        let z = integral('z', z)?;
        Ok(self.xz_to_index(x, z))
    }

    /// Move tile `i` to `(new_x, new_z)`. The flat index is untouched and
    /// per-tile simulation state is NOT reset; that is the caller's job.
    pub fn update_mapping(&mut self, i: usize, new_x: i32, new_z: i32) -> Result<(), GridError> {
        let tile = *self
            .tiles
            .get(i)
            .ok_or(GridError::TileOutOfRange { index: i, n: self.n })?;
        if (tile.x, tile.z) == (new_x, new_z) {
            return Ok(());
        }

        let mapped = self.lookup.get(&tile.x).and_then(|col| col.get(&tile.z)).copied();
        if mapped != Some(i) {
            return Err(GridError::UnmappedTile {
                index: i,
                x: tile.x,
                z: tile.z,
            });
        }
        if self.xz_to_index(new_x, new_z).is_some() {
            warn!("refusing to move tile {i} onto occupied ({new_x}, {new_z})");
            return Err(GridError::CoordinateOccupied { x: new_x, z: new_z });
        }

        let depth = self.depth;
        if let Some(col) = self.lookup.get_mut(&tile.x) {
            col.remove(&tile.z);
            if col.is_empty() {
                self.lookup.remove(&tile.x);
            }
        }
        self.lookup
            .entry(new_x)
            .or_insert_with(|| HashMap::with_capacity(depth))
            .insert(new_z, i);

        let t = &mut self.tiles[i];
        t.x = new_x;
        t.z = new_z;
        Ok(())
    }

    /// Shift the resident window by `(dx, dz)` tiles.
    ///
    /// Each unit step relocates the column (or row) leaving the window to the
    /// opposite edge. Returns the flat indices that moved, each once, in the
    /// order they first moved.
    pub fn pan(&mut self, dx: i32, dz: i32) -> Result<Vec<usize>, GridError> {
        let mut seen = vec![false; self.n];
        let mut moved = Vec::new();

        for _ in 0..dx.unsigned_abs() {
            let (ox, oz) = self.origin;
            let (from_x, to_x) = if dx > 0 {
                (ox, ox + self.width as i32)
            } else {
                (ox + self.width as i32 - 1, ox - 1)
            };
            for z in oz..oz + self.depth as i32 {
                let i = self.resident(from_x, z)?;
                self.update_mapping(i, to_x, z)?;
                if !seen[i] {
                    seen[i] = true;
                    moved.push(i);
                }
            }
            self.origin.0 += dx.signum();
        }

        for _ in 0..dz.unsigned_abs() {
            let (ox, oz) = self.origin;
            let (from_z, to_z) = if dz > 0 {
                (oz, oz + self.depth as i32)
            } else {
                (oz + self.depth as i32 - 1, oz - 1)
            };
            for x in ox..ox + self.width as i32 {
                let i = self.resident(x, from_z)?;
                self.update_mapping(i, x, to_z)?;
                if !seen[i] {
                    seen[i] = true;
                    moved.push(i);
                }
            }
            self.origin.1 += dz.signum();
        }

        trace!(
            "panned by ({dx}, {dz}), origin now {:?}, {} tiles relocated",
            self.origin,
            moved.len()
        );
        Ok(moved)
    }

    fn resident(&self, x: i32, z: i32) -> Result<usize, GridError> {
        self.xz_to_index(x, z)
            .map(|t| t.i)
            .ok_or(GridError::WindowHole { x, z })
    }

    /// Drop a coordinate mapping without touching the tile, to simulate
    /// corruption in tests.
    #[cfg(test)]
    pub(crate) fn forget(&mut self, x: i32, z: i32) {
        if let Some(col) = self.lookup.get_mut(&x) {
            col.remove(&z);
        }
    }
}
