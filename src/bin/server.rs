use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use terrasim::config::{FloraParams, SceneParams, WaterParams};
use terrasim::{RunPlan, render};

#[derive(Deserialize)]
struct SimulateRequest {
    seed: Option<u64>,
    width: Option<usize>,
    depth: Option<usize>,
    substeps: Option<u32>,
    frames: Option<u32>,
    pan: Option<[i32; 2]>,
    /// Logical tile coordinates. Must be whole numbers.
    #[serde(default)]
    splashes: Vec<[f32; 2]>,
    water: Option<WaterParams>,
    flora: Option<FloraParams>,
}

#[derive(Serialize)]
struct SimulateResponse {
    layers: Vec<Layer>,
    timings: Vec<TimingEntry>,
    width: usize,
    depth: usize,
    origin: [i32; 2],
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

const MAX_SIDE: usize = 1024;
const MAX_FRAMES: u32 = 10_000;
const MAX_SUBSTEPS: u32 = 16;
/// Panning costs one column or row of relocations per tile moved.
const MAX_PAN: i32 = MAX_SIDE as i32;

fn check_limits(params: &SceneParams, plan: &RunPlan) -> Result<(), (StatusCode, String)> {
    if params.width > MAX_SIDE || params.depth > MAX_SIDE {
        return Err(bad_request(format!("grid sides are capped at {MAX_SIDE}")));
    }
    if params.substeps > MAX_SUBSTEPS {
        return Err(bad_request(format!("substeps are capped at {MAX_SUBSTEPS}")));
    }
    if plan.pan.iter().any(|p| p.unsigned_abs() > MAX_PAN as u32) {
        return Err(bad_request(format!("pan is capped at {MAX_PAN} tiles per axis")));
    }
    Ok(())
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

fn bad_request<E: ToString>(msg: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.to_string())
}

fn internal<E: ToString>(msg: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string())
}

async fn simulate_handler(
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, (StatusCode, String)> {
    let defaults = SceneParams::default();
    let params = SceneParams {
        seed: req.seed.unwrap_or(defaults.seed),
        width: req.width.unwrap_or(defaults.width),
        depth: req.depth.unwrap_or(defaults.depth),
        substeps: req.substeps.unwrap_or(defaults.substeps),
        water: req.water.unwrap_or_default(),
        flora: req.flora.unwrap_or_default(),
        ..defaults
    };
    let plan = RunPlan {
        frames: req.frames.unwrap_or(120).min(MAX_FRAMES),
        splashes: req.splashes,
        pan: req.pan.unwrap_or([0, 0]),
    };
    check_limits(&params, &plan)?;

    let response = tokio::task::spawn_blocking(move || -> Result<SimulateResponse, (StatusCode, String)> {
        let (scene, timings) = terrasim::simulate(&params, &plan).map_err(|e| {
            warn!("rejected simulate request: {e}");
            bad_request(e)
        })?;

        let (w, d) = (params.width, params.depth);
        let grid = scene.grid();
        let mut layers = Vec::with_capacity(3);
        for (name, rgba) in [
            ("flags", render::render_flags(grid, scene.tiles())),
            ("water", render::render_water(grid, scene.tiles(), scene.water())),
            ("flora", render::render_flora(grid, scene.tiles(), scene.flora())),
        ] {
            layers.push(Layer {
                name: name.into(),
                data_url: encode_png(&rgba, w, d).map_err(internal)?,
            });
        }

        let timing_entries = timings
            .iter()
            .map(|t| TimingEntry {
                name: t.name.to_string(),
                ms: t.ms,
            })
            .collect();

        let (ox, oz) = grid.origin();
        Ok(SimulateResponse {
            layers,
            timings: timing_entries,
            width: w,
            depth: d,
            origin: [ox, oz],
        })
    })
    .await
    .map_err(internal)??;

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    simple_logger::init_with_level(log::Level::Info).expect("failed to install logger");

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/simulate", post(simulate_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("terrasim preview server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
