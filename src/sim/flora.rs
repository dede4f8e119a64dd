use crate::config::FloraParams;
use crate::error::GridError;
use crate::noise::wind_at;
use crate::rng::{Rng, derive_seed};
use crate::sim::{SpringNetwork, TileFlags, TileSim};
use crate::tiled_grid::TiledGrid;
use crate::tiling::Tiling;

const SALT_WIND: u64 = 0x5A7_F10A_0000_0001;
const SALT_JITTER: u64 = 0x5A7_F10A_0000_0002;

/// Horizontal sway simulation. State is interleaved: tile `i` owns
/// `pos[2 * i]` (x) and `pos[2 * i + 1]` (z).
///
/// Displacement is unbounded here; renderers clamp it to
/// [`FloraParams::limit_radius`].
pub struct FloraSim {
    net: SpringNetwork,
    params: FloraParams,
    pos: Vec<f32>,
    vel: Vec<f32>,
    rng: Rng,
    wind_seed: u32,
    wind_t: f32,
    wind: [f32; 2],
}

impl FloraSim {
    pub fn new<T: Tiling>(grid: &TiledGrid<T>, params: FloraParams) -> Result<Self, GridError> {
        let net = SpringNetwork::new(grid)?;
        let n = net.n();
        Ok(Self {
            net,
            rng: Rng::new(params.seed ^ SALT_JITTER),
            wind_seed: derive_seed(params.seed, SALT_WIND),
            params,
            pos: vec![0.0; 2 * n],
            vel: vec![0.0; 2 * n],
            wind_t: 0.0,
            wind: [0.0; 2],
        })
    }

    pub fn params(&self) -> &FloraParams {
        &self.params
    }

    /// Swap tunables in place. The wind and jitter streams keep the seed they
    /// were built with.
    pub fn set_params(&mut self, params: FloraParams) {
        self.params = params;
    }

    #[inline]
    pub fn pos(&self) -> &[f32] {
        &self.pos
    }

    #[inline]
    pub fn vel(&self) -> &[f32] {
        &self.vel
    }

    /// `(x, z)` displacement of tile `i`.
    #[inline]
    pub fn sway(&self, i: usize) -> (f32, f32) {
        (self.pos[2 * i], self.pos[2 * i + 1])
    }

    /// Wind force applied during the most recent step.
    pub fn wind(&self) -> (f32, f32) {
        (self.wind[0], self.wind[1])
    }

    fn advance_wind(&mut self) {
        self.wind_t += self.params.wind_speed;
        let strength = self.params.wind_strength;
        self.wind = wind_at(self.wind_t, self.wind_seed).map(|w| w * strength);
    }

    fn spring_pass<M: TileFlags>(&mut self, members: &[M]) {
        let k = self.params.spring_const;
        let damping = self.params.damping_const;
        let temperature = self.params.temperature;
        for s in self.net.springs() {
            if !(members[s.a].is_flora() && members[s.b].is_flora()) {
                continue;
            }
            for axis in 0..2 {
                let (ia, ib) = (2 * s.a + axis, 2 * s.b + axis);
                let d = self.pos[ib] - self.pos[ia];
                let rel_vel = self.vel[ib] - self.vel[ia];
                let jitter = self.rng.range_f32(-0.5, 0.5) * temperature;
                let force = d * s.weight * k + rel_vel * damping + self.wind[axis] + jitter;
                self.vel[ia] += force;
                self.vel[ib] -= force;
            }
        }
    }

    fn integrate(&mut self) {
        let centering = self.params.centering_const;
        let keep = 1.0 - self.params.friction;
        for (p, v) in self.pos.iter_mut().zip(self.vel.iter_mut()) {
            *v -= *p * centering;
            *p += *v;
            *v *= keep;
        }
    }
}

impl TileSim for FloraSim {
    fn network(&self) -> &SpringNetwork {
        &self.net
    }

    fn step<M: TileFlags>(&mut self, members: &[M]) {
        self.net.check_members(members);
        self.advance_wind();
        self.spring_pass(members);
        self.integrate();
    }
}
