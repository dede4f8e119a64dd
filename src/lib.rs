pub mod config;
pub mod error;
pub mod grid;
pub mod noise;
pub mod render;
pub mod rng;
pub mod scene;
pub mod sim;
pub mod springs;
pub mod tiled_grid;
pub mod tiling;

use std::time::Instant;

pub use config::{FloraParams, SceneParams, WaterParams};
pub use error::GridError;
pub use grid::{IndexedGrid, TileIndex};
pub use scene::Scene;
pub use sim::flora::FloraSim;
pub use sim::water::WaterSim;
pub use sim::{Tile, TileFlags, TileSim};
pub use springs::Spring;
pub use tiled_grid::TiledGrid;
pub use tiling::{HexTiling, SquareTiling, Tiling};

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// One preview run: what to build, which tiles to splash, how far to pan.
#[derive(Clone, Debug, Default)]
pub struct RunPlan {
    pub frames: u32,
    /// Logical coordinates to splash before the first frame.
    pub splashes: Vec<[f32; 2]>,
    /// Window shift applied halfway through, in tiles.
    pub pan: [i32; 2],
}

/// Build a scene, splash it, run the first half of the frames, pan, run the
/// rest. Returns the final scene and per-phase timings.
pub fn simulate(params: &SceneParams, plan: &RunPlan) -> Result<(Scene, Vec<Timing>), GridError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    let t = Instant::now();
    let mut scene = Scene::new(params.clone())?;
    timings.push(Timing {
        name: "build",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let t = Instant::now();
    let mut hits = 0;
    for &[x, z] in &plan.splashes {
        if scene.splash(x, z)? {
            hits += 1;
        }
    }
    log::debug!("{hits} of {} splashes landed on water", plan.splashes.len());
    timings.push(Timing {
        name: "splash",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let first = plan.frames / 2;
    let t = Instant::now();
    scene.advance(first);
    timings.push(Timing {
        name: "step_before_pan",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let t = Instant::now();
    let moved = scene.pan(plan.pan[0], plan.pan[1])?;
    log::debug!("pan {:?} relocated {} tiles", plan.pan, moved.len());
    timings.push(Timing {
        name: "pan",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let t = Instant::now();
    scene.advance(plan.frames - first);
    timings.push(Timing {
        name: "step_after_pan",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    Ok((scene, timings))
}
