use rayon::prelude::*;

use crate::grid::IndexedGrid;
use crate::sim::Tile;
use crate::sim::flora::FloraSim;
use crate::sim::water::WaterSim;

// Palette
const WATER_TROUGH: [u8; 4] = [18, 36, 70, 255];
const WATER_REST: [u8; 4] = [38, 78, 120, 255];
const WATER_CREST: [u8; 4] = [170, 205, 230, 255];
const LAND: [u8; 4] = [190, 170, 120, 255];
const FLORA_CALM: [u8; 4] = [40, 90, 40, 255];
const FLORA_SWAY: [u8; 4] = [170, 220, 90, 255];
const HOLE: [u8; 4] = [255, 0, 255, 255];

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
        255,
    ]
}

/// Clamp a sway vector to `limit` length, keeping its direction.
#[inline]
pub fn clamp_sway(dx: f32, dz: f32, limit: f32) -> (f32, f32) {
    let len = (dx * dx + dz * dz).sqrt();
    if len <= limit || len == 0.0 {
        (dx, dz)
    } else {
        let s = limit / len;
        (dx * s, dz * s)
    }
}

/// Paint the resident window, one pixel per tile, row `r` = `oz + r`.
/// `color` gets the flat index and flags of the tile under each pixel.
fn paint<F>(grid: &IndexedGrid, tiles: &[Tile], color: F) -> Vec<u8>
where
    F: Fn(usize, Tile) -> [u8; 4] + Sync,
{
    let w = grid.width();
    let (ox, oz) = grid.origin();
    let mut rgba = vec![0u8; w * grid.depth() * 4];

    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(r, row)| {
        let z = oz + r as i32;
        for c in 0..w {
            let px = match grid.xz_to_index(ox + c as i32, z) {
                Some(t) => color(t.i, tiles[t.i]),
                None => HOLE,
            };
            row[c * 4..c * 4 + 4].copy_from_slice(&px);
        }
    });

    rgba
}

/// Terrain classes only.
pub fn render_flags(grid: &IndexedGrid, tiles: &[Tile]) -> Vec<u8> {
    paint(grid, tiles, |_, tile| {
        if tile.is_water {
            WATER_REST
        } else if tile.is_flora {
            FLORA_CALM
        } else {
            LAND
        }
    })
}

/// Water tiles shaded by rendered wave offset; troughs dark, crests light.
pub fn render_water(grid: &IndexedGrid, tiles: &[Tile], water: &WaterSim) -> Vec<u8> {
    let p = water.params();
    let full = (p.wave_amplitude * p.limit_pos).max(f32::EPSILON);
    let waves: Vec<f32> = (0..grid.n()).map(|i| water.get_wave_pos(i) / full).collect();

    paint(grid, tiles, |i, tile| {
        if !tile.is_water {
            return LAND;
        }
        let h = waves[i];
        if h < 0.0 {
            lerp_color(WATER_REST, WATER_TROUGH, -h)
        } else {
            lerp_color(WATER_REST, WATER_CREST, h)
        }
    })
}

/// Flora tiles shaded by clamped sway magnitude.
pub fn render_flora(grid: &IndexedGrid, tiles: &[Tile], flora: &FloraSim) -> Vec<u8> {
    let limit = flora.params().limit_radius.max(f32::EPSILON);
    let sway = flora.pos();

    paint(grid, tiles, |i, tile| {
        if tile.is_water {
            return WATER_REST;
        }
        if !tile.is_flora {
            return LAND;
        }
        let (dx, dz) = clamp_sway(sway[2 * i], sway[2 * i + 1], limit);
        lerp_color(FLORA_CALM, FLORA_SWAY, (dx * dx + dz * dz).sqrt() / limit)
    })
}
