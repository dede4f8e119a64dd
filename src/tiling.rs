use crate::error::GridError;

/// Tile shape strategy: neighbor offsets and tile-space <-> world-space
/// projection. Implementations are stateless apart from their scale.
///
/// Offsets may depend on `(x, z)` (hex rows alternate), which is why they take
/// the coordinate.
pub trait Tiling {
    fn adjacent(&self, x: i32, z: i32) -> &'static [(i32, i32)];
    fn diagonal(&self, x: i32, z: i32) -> &'static [(i32, i32)];
    fn position_to_index(&self, world_x: f32, world_z: f32) -> (i32, i32);
    fn index_to_position(&self, x: i32, z: i32) -> (f32, f32);

    /// Offset tables repeat every `(px, pz)` tiles. A torus only closes up when
    /// its sides are multiples of this.
    fn wrap_period(&self) -> (usize, usize) {
        (1, 1)
    }
}

/// Fails when a `width x depth` torus would cut the tiling's offset pattern
/// mid-period and leave some tiles with mismatched neighbors.
pub fn check_wrap<T: Tiling + ?Sized>(tiling: &T, width: usize, depth: usize) -> Result<(), GridError> {
    let (px, pz) = tiling.wrap_period();
    if width % px == 0 && depth % pz == 0 {
        Ok(())
    } else {
        Err(GridError::WrapMismatch {
            width,
            depth,
            period: (px, pz),
        })
    }
}

/// Axis-aligned squares, `spacing` world units apart.
#[derive(Clone, Copy, Debug)]
pub struct SquareTiling {
    pub spacing: f32,
}

impl Default for SquareTiling {
    fn default() -> Self {
        Self { spacing: 1.0 }
    }
}

const SQUARE_ADJACENT: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const SQUARE_DIAGONAL: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

impl Tiling for SquareTiling {
    fn adjacent(&self, _x: i32, _z: i32) -> &'static [(i32, i32)] {
        &SQUARE_ADJACENT
    }

    fn diagonal(&self, _x: i32, _z: i32) -> &'static [(i32, i32)] {
        &SQUARE_DIAGONAL
    }

    fn position_to_index(&self, world_x: f32, world_z: f32) -> (i32, i32) {
        (
            (world_x / self.spacing).round() as i32,
            (world_z / self.spacing).round() as i32,
        )
    }

    fn index_to_position(&self, x: i32, z: i32) -> (f32, f32) {
        (x as f32 * self.spacing, z as f32 * self.spacing)
    }
}

/// Pointy-top hexagons in "odd-r" layout: rows run along x, odd rows are
/// shifted half a tile right. `size` is the center-to-corner radius.
///
/// Row parity drives the neighbor offsets, so the grid depth must be even.
#[derive(Clone, Copy, Debug)]
pub struct HexTiling {
    pub size: f32,
}

impl Default for HexTiling {
    fn default() -> Self {
        Self { size: 1.0 }
    }
}

const HEX_EVEN_ROW: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, -1), (-1, -1), (0, 1), (-1, 1)];
const HEX_ODD_ROW: [(i32, i32); 6] = [(1, 0), (-1, 0), (1, -1), (0, -1), (1, 1), (0, 1)];

impl Tiling for HexTiling {
    fn adjacent(&self, _x: i32, z: i32) -> &'static [(i32, i32)] {
        // `& 1` is 1 for negative odd rows too.
        if z & 1 == 0 { &HEX_EVEN_ROW } else { &HEX_ODD_ROW }
    }

    fn diagonal(&self, _x: i32, _z: i32) -> &'static [(i32, i32)] {
        &[]
    }

    fn wrap_period(&self) -> (usize, usize) {
        (1, 2)
    }

    fn position_to_index(&self, world_x: f32, world_z: f32) -> (i32, i32) {
        const SQRT3: f32 = 1.732_050_8;
        // Fractional axial coordinates, then cube rounding.
        let q = (SQRT3 / 3.0 * world_x - world_z / 3.0) / self.size;
        let r = (2.0 / 3.0 * world_z) / self.size;
        let s = -q - r;

        let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
        let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());
        if dq > dr && dq > ds {
            rq = -rr - rs;
        } else if dr > ds {
            rr = -rq - rs;
        }

        let (q, r) = (rq as i32, rr as i32);
        (q + (r - (r & 1)) / 2, r)
    }

    fn index_to_position(&self, x: i32, z: i32) -> (f32, f32) {
        const SQRT3: f32 = 1.732_050_8;
        let shift = if z & 1 == 0 { 0.0 } else { 0.5 };
        (
            self.size * SQRT3 * (x as f32 + shift),
            self.size * 1.5 * z as f32,
        )
    }
}
