use crate::config::WaterParams;
use crate::error::GridError;
use crate::sim::{SpringNetwork, TileFlags, TileSim};
use crate::tiled_grid::TiledGrid;
use crate::tiling::Tiling;

/// Vertical wave simulation: one height and one velocity per tile, pulled
/// back toward sea level (zero).
pub struct WaterSim {
    net: SpringNetwork,
    params: WaterParams,
    pos: Vec<f32>,
    vel: Vec<f32>,
}

impl WaterSim {
    pub fn new<T: Tiling>(grid: &TiledGrid<T>, params: WaterParams) -> Result<Self, GridError> {
        let net = SpringNetwork::new(grid)?;
        let n = net.n();
        Ok(Self {
            net,
            params,
            pos: vec![0.0; n],
            vel: vec![0.0; n],
        })
    }

    pub fn params(&self) -> &WaterParams {
        &self.params
    }

    /// Swap tunables in place; heights and velocities carry over.
    pub fn set_params(&mut self, params: WaterParams) {
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

    /// Rendered surface offset of tile `i`.
    #[inline]
    pub fn get_wave_pos(&self, i: usize) -> f32 {
        self.pos[i] * self.params.wave_amplitude
    }

    /// Splash: push tile `i` downward.
    pub fn hit_tile(&mut self, i: usize) {
        self.vel[i] -= self.params.hit_impulse;
    }

    pub fn accel_tile(&mut self, i: usize, accel: f32) {
        self.vel[i] -= accel;
    }

    /// Clamp tile `i`'s height into `[-limit_pos, limit_pos]`.
    ///
    /// Call after relocating a tile, otherwise its old wave follows it to the
    /// new spot. Velocity is deliberately left alone.
    pub fn reset_tile(&mut self, i: usize) {
        let limit = self.params.limit_pos;
        self.pos[i] = self.pos[i].clamp(-limit, limit);
    }

    fn spring_pass<M: TileFlags>(&mut self, members: &[M]) {
        let k = self.params.spring_const;
        let damping = self.params.damping_const;
        for s in self.net.springs() {
            if !(members[s.a].is_water() && members[s.b].is_water()) {
                continue;
            }
            let d = self.pos[s.b] - self.pos[s.a];
            let rel_vel = self.vel[s.b] - self.vel[s.a];
            let force = d * s.weight * k + rel_vel * damping;
            self.vel[s.a] += force;
            self.vel[s.b] -= force;
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

impl TileSim for WaterSim {
    fn network(&self) -> &SpringNetwork {
        &self.net
    }

    fn step<M: TileFlags>(&mut self, members: &[M]) {
        self.net.check_members(members);
        self.spring_pass(members);
        self.integrate();
    }
}
