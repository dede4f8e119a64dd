use serde::Deserialize;

/// Tunables for [`WaterSim`](crate::sim::water::WaterSim). Any subset can be
/// given in JSON; missing fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaterParams {
    pub spring_const: f32,
    pub damping_const: f32,
    pub centering_const: f32,
    pub friction: f32,
    /// Scale from simulated height to rendered offset.
    pub wave_amplitude: f32,
    /// Downward velocity added by a splash.
    pub hit_impulse: f32,
    /// `reset_tile` clamps heights into `[-limit_pos, limit_pos]`.
    pub limit_pos: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            spring_const: 0.02,
            damping_const: 0.005,
            centering_const: 0.002,
            friction: 0.01,
            wave_amplitude: 0.25,
            hit_impulse: 0.6,
            limit_pos: 1.0,
        }
    }
}

/// Tunables for [`FloraSim`](crate::sim::flora::FloraSim).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloraParams {
    pub spring_const: f32,
    pub damping_const: f32,
    pub centering_const: f32,
    pub friction: f32,
    /// Amplitude of the per-spring random jitter.
    pub temperature: f32,
    pub wind_strength: f32,
    /// How far the wind noise coordinate advances per step.
    pub wind_speed: f32,
    /// Largest sway a renderer should draw. The simulation itself is unbounded.
    pub limit_radius: f32,
    pub seed: u64,
}

impl Default for FloraParams {
    fn default() -> Self {
        Self {
            spring_const: 0.05,
            damping_const: 0.01,
            centering_const: 0.01,
            friction: 0.05,
            temperature: 0.002,
            wind_strength: 0.001,
            wind_speed: 0.005,
            limit_radius: 0.3,
            seed: 1,
        }
    }
}

/// Everything needed to build a [`Scene`](crate::scene::Scene).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub width: usize,
    pub depth: usize,
    pub seed: u64,
    /// Fixed sub-steps per rendered frame.
    pub substeps: u32,

    // Stand-in terrain classifier
    pub terrain_freq: f32,
    pub sea_level: f32,
    pub flora_min: f32,
    pub flora_max: f32,

    pub water: WaterParams,
    pub flora: FloraParams,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            width: 64,
            depth: 64,
            seed: 42,
            substeps: 2,
            terrain_freq: 0.05,
            sea_level: 0.0,
            flora_min: 0.1,
            flora_max: 0.45,
            water: WaterParams::default(),
            flora: FloraParams::default(),
        }
    }
}
