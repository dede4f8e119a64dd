use std::path::PathBuf;

use log::info;
use terrasim::config::SceneParams;
use terrasim::render;

fn main() {
    simple_logger::init_with_level(log::Level::Info).expect("failed to install logger");

    let args: Vec<String> = std::env::args().collect();

    let seed: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let width: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(128);
    let depth: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(128);
    let frames: u32 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(240);
    let out_dir: PathBuf = args
        .get(5)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    // Optional JSON overrides; anything missing keeps its default.
    let mut params: SceneParams = match args.get(6) {
        Some(path) => {
            let text = std::fs::read_to_string(path).expect("failed to read params file");
            serde_json::from_str(&text).expect("failed to parse params file")
        }
        None => SceneParams::default(),
    };
    params.seed = seed;
    params.width = width;
    params.depth = depth;

    std::fs::create_dir_all(&out_dir).expect("failed to create output directory");

    info!(
        "Simulating {}x{} tiles with seed={}, {} frames x {} substeps",
        width, depth, seed, frames, params.substeps
    );

    // A ring of splashes around the center.
    let (cx, cz) = (width as f32 / 2.0, depth as f32 / 2.0);
    let splashes = (0..16)
        .map(|k| {
            let a = k as f32 / 16.0 * std::f32::consts::TAU;
            let r = width.min(depth) as f32 / 4.0;
            [(cx + a.cos() * r).round(), (cz + a.sin() * r).round()]
        })
        .collect();
    let plan = terrasim::RunPlan {
        frames,
        splashes,
        pan: [(width / 8) as i32, 0],
    };

    let (scene, timings) =
        terrasim::simulate(&params, &plan).expect("scene construction failed");

    info!("Timings:");
    for t in &timings {
        info!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    let save = |name: &str, rgba: &[u8]| {
        let path = out_dir.join(name);
        image::save_buffer(&path, rgba, width as u32, depth as u32, image::ColorType::Rgba8)
            .expect("failed to save image");
        info!("Saved {}", path.display());
    };

    let grid = scene.grid();
    save("flags.png", &render::render_flags(grid, scene.tiles()));
    save("water.png", &render::render_water(grid, scene.tiles(), scene.water()));
    save("flora.png", &render::render_flora(grid, scene.tiles(), scene.flora()));

    info!("Done.");
}
