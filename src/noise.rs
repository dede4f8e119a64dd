//! Lattice gradient noise: layered for terrain height, and sampled along an
//! advancing time coordinate for wind.

use std::f32::consts::{FRAC_1_SQRT_2, SQRT_2};

use crate::rng::lattice_hash;

// Axis and diagonal unit gradients; the top three hash bits pick one.
const GRADIENTS: [[f32; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [-FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
    [-FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
];

// Rows of noise space read by the two wind axes, far enough apart to be
// uncorrelated.
const WIND_ROWS: [f32; 2] = [0.37, 91.37];

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn corner(ix: i32, iz: i32, seed: u32, dx: f32, dz: f32) -> f32 {
    let [gx, gz] = GRADIENTS[(lattice_hash(ix, iz, seed) >> 29) as usize];
    gx * dx + gz * dz
}

/// Gradient noise in roughly `[-1, 1]`, zero on every lattice point.
pub fn gradient_noise(x: f32, z: f32, seed: u32) -> f32 {
    let (x0, z0) = (x.floor(), z.floor());
    let (ix, iz) = (x0 as i32, z0 as i32);
    let (fx, fz) = (x - x0, z - z0);
    let (u, w) = (fade(fx), fade(fz));

    let c00 = corner(ix, iz, seed, fx, fz);
    let c10 = corner(ix + 1, iz, seed, fx - 1.0, fz);
    let c01 = corner(ix, iz + 1, seed, fx, fz - 1.0);
    let c11 = corner(ix + 1, iz + 1, seed, fx - 1.0, fz - 1.0);

    let near = c00 + (c10 - c00) * u;
    let far = c01 + (c11 - c01) * u;
    (near + (far - near) * w) * SQRT_2
}

/// Terrain height: `octaves` layers of noise, each twice the frequency and
/// half the weight of the last, normalized back to the single-layer range.
/// Every layer reads its own seed so lattice points do not line up.
pub fn layered(x: f32, z: f32, seed: u32, octaves: u32, base_freq: f32) -> f32 {
    let (mut sum, mut total) = (0.0, 0.0);
    let (mut freq, mut weight) = (base_freq, 1.0);
    for octave in 0..octaves {
        let layer_seed = seed.wrapping_add(octave.wrapping_mul(0x9E37_79B9));
        sum += gradient_noise(x * freq, z * freq, layer_seed) * weight;
        total += weight;
        freq *= 2.0;
        weight *= 0.5;
    }
    if total > 0.0 { sum / total } else { 0.0 }
}

/// Wind direction at time `t`, one noise row per axis. Each component is in
/// roughly `[-1, 1]` and varies continuously with `t`.
pub fn wind_at(t: f32, seed: u32) -> [f32; 2] {
    WIND_ROWS.map(|row| gradient_noise(t, row, seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_lattice_points() {
        for (x, z) in [(0.0, 0.0), (3.0, -2.0), (17.0, 5.0)] {
            assert!(gradient_noise(x, z, 11).abs() < 1e-6);
        }
    }

    #[test]
    fn wind_changes_gradually() {
        let mut prev = wind_at(0.0, 4);
        let mut t = 0.0;
        let mut peak: f32 = 0.0;
        for _ in 0..2000 {
            t += 0.01;
            let w = wind_at(t, 4);
            for axis in 0..2 {
                assert!((w[axis] - prev[axis]).abs() < 0.1);
                assert!(w[axis].abs() <= 1.5);
                peak = peak.max(w[axis].abs());
            }
            prev = w;
        }
        assert!(peak > 0.05);
    }

    #[test]
    fn layered_is_deterministic_and_bounded() {
        let a = layered(1.3, 2.7, 5, 4, 0.3);
        assert_eq!(a, layered(1.3, 2.7, 5, 4, 0.3));
        assert_ne!(a, layered(1.3, 2.7, 6, 4, 0.3));
        for i in 0..200 {
            let v = layered(i as f32 * 0.7, i as f32 * -1.3, 5, 4, 0.3);
            assert!(v.abs() <= 1.5);
        }
        assert_eq!(layered(1.0, 1.0, 5, 0, 0.3), 0.0);
    }
}
