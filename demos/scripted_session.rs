//! Scripted fit session
//!
//! Drives a [`FitSession`] headlessly: a synthetic depth source renders a
//! noisy ball in front of a wall, a ground-truth oracle answers fit requests,
//! and a fixed input script picks, orbits, zooms and resets the camera.
//!
//! ```text
//! RUST_LOG=debug cargo run -p pickfit-demos --bin scripted_session -- --frames 12
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::Vector3;
use pickfit_core::{
    Drawable, Error, FeatureType, FitError, FitRequest, Point3f, PointCloudFrame, PointCloudSource, RawFit, RawParams, Ray,
    SurfaceFitOracle, Unproject,
};
use pickfit_visualization::{FitSession, InputEvent, KeyAction, PointerButton, SessionConfig};
use rand::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a scripted pick-and-fit session on synthetic depth frames", long_about = None)]
struct Args {
    /// Number of frames to run
    #[arg(short, long, default_value_t = 10)]
    frames: usize,

    /// Depth noise amplitude in meters
    #[arg(long, default_value_t = 0.002)]
    noise: f32,

    /// Random seed for the synthetic scene
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Session settings as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the default settings as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// A ball in front of a wall, seen from the origin looking down +z
#[derive(Debug, Clone, Copy)]
struct Scene {
    ball_center: Point3f,
    ball_radius: f32,
    wall_depth: f32,
}

impl Scene {
    fn ball_contains(&self, p: &Point3f, tolerance: f32) -> bool {
        (nalgebra::distance(p, &self.ball_center) - self.ball_radius).abs() <= tolerance
    }
}

/// Synthetic depth source; the frame rate is not simulated
struct SyntheticSource {
    scene: Scene,
    noise: f32,
    rng: StdRng,
    remaining: usize,
}

impl PointCloudSource for SyntheticSource {
    fn next_frame(&mut self) -> pickfit_core::Result<PointCloudFrame> {
        if self.remaining == 0 {
            return Err(Error::Device("synthetic stream ended".to_string()));
        }
        self.remaining -= 1;

        let scene = self.scene;
        let mut points = Vec::new();
        let mut colors = Vec::new();
        for row in 0..60 {
            for col in 0..80 {
                let x = (col as f32 - 40.0) * 0.02;
                let y = (row as f32 - 30.0) * 0.02;
                let jitter = self.rng.gen_range(-self.noise..=self.noise);

                // front surface of the ball where it covers this (x, y)
                let dx = x - scene.ball_center.x;
                let dy = y - scene.ball_center.y;
                let inside = scene.ball_radius * scene.ball_radius - dx * dx - dy * dy;
                if inside > 0.0 {
                    points.push(Point3f::new(x, y, scene.ball_center.z - inside.sqrt() + jitter));
                    colors.push([220, 80, 40]);
                } else {
                    points.push(Point3f::new(x, y, scene.wall_depth + jitter));
                    colors.push([180, 180, 180]);
                }
            }
        }
        PointCloudFrame::with_colors(points, colors)
    }
}

/// Oracle that knows the scene and reports the shape under the seed point
struct GroundTruthOracle {
    scene: Scene,
    inliers: Vec<bool>,
}

impl SurfaceFitOracle for GroundTruthOracle {
    fn fit(&mut self, points: &[Point3f], request: &FitRequest) -> Result<RawFit, FitError> {
        let seed = points.get(request.seed_index).ok_or(FitError::NotFound)?;
        let tolerance = request.accuracy * 3.0;

        let params = if self.scene.ball_contains(seed, tolerance) {
            if !matches!(request.feature, FeatureType::Any | FeatureType::Sphere) {
                return Err(FitError::NotFound);
            }
            self.inliers = points.iter().map(|p| self.scene.ball_contains(p, tolerance)).collect();
            RawParams::Sphere {
                center: self.scene.ball_center,
                radius: self.scene.ball_radius,
            }
        } else {
            if !matches!(request.feature, FeatureType::Any | FeatureType::Plane) {
                return Err(FitError::NotFound);
            }
            let depth = self.scene.wall_depth;
            self.inliers = points.iter().map(|p| (p.z - depth).abs() <= tolerance).collect();
            RawParams::Plane {
                ll: Point3f::new(-0.8, 0.6, depth),
                lr: Point3f::new(0.8, 0.6, depth),
                ur: Point3f::new(0.8, -0.6, depth),
                ul: Point3f::new(-0.8, -0.6, depth),
            }
        };

        let inlier_count = self.inliers.iter().filter(|&&f| f).count();
        if inlier_count < 3 {
            return Err(FitError::UnacceptableResult);
        }
        Ok(RawFit::new(params, tolerance / 3.0))
    }

    fn inlier_mask(&self) -> Vec<bool> {
        self.inliers.clone()
    }
}

/// Pinhole camera at the origin with y pointing down
struct Pinhole {
    half_height: f32,
    aspect: f32,
}

impl Unproject for Pinhole {
    fn unproject(&self, x: f32, y: f32) -> pickfit_core::Result<Ray> {
        let direction = Vector3::new(
            (2.0 * x - 1.0) * self.half_height * self.aspect,
            (2.0 * y - 1.0) * self.half_height,
            1.0,
        );
        Ray::new(Point3f::origin(), direction)
    }
}

/// Input for each frame of the script
fn script(frame: usize) -> Vec<InputEvent> {
    let key = |action| InputEvent::Key { action, pressed: true };
    let press = |x, y, button| InputEvent::PointerPressed { x, y, button };
    let release = |x, y, button| InputEvent::PointerReleased { x, y, button };
    match frame {
        1 => vec![key(KeyAction::SelectFeature(FeatureType::Sphere)), press(0.5, 0.5, PointerButton::Primary)],
        2 => vec![
            key(KeyAction::ToggleMode),
            press(0.5, 0.5, PointerButton::Primary),
            InputEvent::PointerMoved { x: 0.65, y: 0.45 },
        ],
        3 => vec![
            InputEvent::PointerMoved { x: 0.8, y: 0.4 },
            release(0.8, 0.4, PointerButton::Primary),
            InputEvent::Wheel { notches: 3.0 },
        ],
        4 => vec![key(KeyAction::ToggleMode), key(KeyAction::SelectFeature(FeatureType::Cylinder)), press(0.5, 0.5, PointerButton::Primary)],
        5 => vec![key(KeyAction::SelectFeature(FeatureType::Plane)), press(0.1, 0.1, PointerButton::Primary)],
        6 => vec![key(KeyAction::ResetCamera)],
        _ => Vec::new(),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: SessionConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&SessionConfig::default())?);
        return Ok(());
    }

    let config = load_config(args.config.as_ref())?;
    let heuristics = config.heuristics;
    let scene = Scene {
        ball_center: Point3f::new(0.0, 0.0, 1.2),
        ball_radius: 0.15,
        wall_depth: 1.5,
    };

    let mut source = SyntheticSource {
        scene,
        noise: args.noise.abs(),
        rng: StdRng::seed_from_u64(args.seed),
        remaining: args.frames,
    };
    let unproject = Pinhole {
        half_height: (heuristics.vertical_fov_deg.to_radians() * 0.5).tan(),
        aspect: 4.0 / 3.0,
    };
    let oracle = GroundTruthOracle {
        scene,
        inliers: Vec::new(),
    };
    let mut session = FitSession::new(oracle, config).context("invalid session settings")?;

    let mut last = instant::Instant::now();
    for frame in 1..=args.frames {
        let now = instant::Instant::now();
        let elapsed = now - last;
        last = now;

        let events = script(frame);
        let view = match session.step(&mut source, &unproject, &events, elapsed) {
            Ok(view) => view,
            Err(err) => {
                warn!(%err, frame, "stopping session");
                break;
            }
        };

        match view.outcome {
            Some(outcome) => info!(
                frame,
                points = view.frame.len(),
                inliers = outcome.inlier_points.len(),
                "{}",
                outcome.measurement()
            ),
            None => info!(frame, points = view.frame.len(), center = ?view.frame.center(), "no fit yet"),
        }
    }

    let pose = session.camera().current();
    info!(eye = ?pose.eye, at = ?pose.at, zoom = pose.zoom_factor, "final camera pose");
    Ok(())
}
