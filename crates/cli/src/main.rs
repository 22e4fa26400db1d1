use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use facefollow_core::animation::indicator::IndicatorState;
use facefollow_core::capture::infrastructure::synthetic_camera::SyntheticCamera;
use facefollow_core::detection::domain::face_detector::FaceDetector;
use facefollow_core::detection::infrastructure::blob_detector::BlobDetector;
use facefollow_core::detection::infrastructure::delayed_detector::DelayedDetector;
use facefollow_core::detection::infrastructure::scripted_detector::ScriptedDetector;
use facefollow_core::pipeline::face_follower::{FaceFollower, FollowConfig};
use facefollow_core::pipeline::frame_gate::GateStats;
use facefollow_core::pipeline::infrastructure::live_pipeline::LivePipeline;
use facefollow_core::shared::geometry::{Point, Viewport};
use facefollow_core::targeting::overlay::{LogOverlaySink, NullOverlaySink, OverlaySink};
use facefollow_core::targeting::target::Target;

mod scenario;

/// Follows detected faces with an eased on-screen indicator.
#[derive(Parser)]
#[command(name = "facefollow")]
struct Cli {
    /// View width in points.
    #[arg(long, default_value = "390.0")]
    view_width: f64,

    /// View height in points.
    #[arg(long, default_value = "844.0")]
    view_height: f64,

    /// Camera frame width in pixels.
    #[arg(long, default_value = "640")]
    camera_width: u32,

    /// Camera frame height in pixels.
    #[arg(long, default_value = "480")]
    camera_height: u32,

    /// Capture rate in frames per second.
    #[arg(long, default_value = "30.0")]
    fps: f64,

    /// Frames per full orbit of the synthetic blob.
    #[arg(long, default_value = "120")]
    orbit_frames: u64,

    /// Detector: blob or scripted.
    #[arg(long, default_value = "blob")]
    detector: String,

    /// Scenario JSON file with per-cycle face boxes for the scripted detector.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Artificial detection latency in milliseconds.
    #[arg(long, default_value = "0")]
    latency_ms: u64,

    /// Indicator convergence time in seconds.
    #[arg(long, default_value = "3.0")]
    convergence: f64,

    /// Launch anchor X in points (defaults to the view centre).
    #[arg(long)]
    anchor_x: Option<f64>,

    /// Launch anchor Y in points (defaults to near the bottom edge).
    #[arg(long)]
    anchor_y: Option<f64>,

    /// Seconds after start to fire the trigger (comma-separated).
    #[arg(long, value_delimiter = ',')]
    fire_at: Vec<f64>,

    /// How long to run, in seconds.
    #[arg(long, default_value = "10.0")]
    duration: f64,

    /// Indicator update rate in ticks per second.
    #[arg(long, default_value = "60.0")]
    tick_hz: f64,

    /// Log every overlay rectangle as it is presented.
    #[arg(long)]
    show_overlay: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = build_detector(&cli)?;
    let overlay = build_overlay(&cli);
    let source = Box::new(
        SyntheticCamera::new(cli.camera_width, cli.camera_height, cli.fps)
            .with_orbit_frames(cli.orbit_frames),
    );

    let anchor = Point::new(
        cli.anchor_x.unwrap_or(cli.view_width / 2.0),
        cli.anchor_y.unwrap_or(cli.view_height - 80.0),
    );
    let mut config = FollowConfig::new(Viewport::new(cli.view_width, cli.view_height), anchor);
    config.convergence = Duration::from_secs_f64(cli.convergence);

    let pipeline = LivePipeline::spawn(source, detector)?;
    let mut follower = FaceFollower::new(config, overlay, pipeline.events());

    log::info!(
        "Following for {:.1}s in a {:.0}x{:.0} view, anchor ({:.0}, {:.0})",
        cli.duration,
        cli.view_width,
        cli.view_height,
        anchor.x,
        anchor.y
    );

    let mut fires: Vec<Duration> = cli
        .fire_at
        .iter()
        .copied()
        .map(Duration::from_secs_f64)
        .collect();
    fires.sort();
    let mut fires = fires.into_iter().peekable();

    let duration = Duration::from_secs_f64(cli.duration);
    let tick = Duration::from_secs_f64(1.0 / cli.tick_hz);
    let started = Instant::now();

    loop {
        let now = Instant::now();
        let elapsed = now.duration_since(started);
        if elapsed >= duration {
            break;
        }

        follower.process_events(now);
        while fires.peek().map(|at| *at <= elapsed).unwrap_or(false) {
            fires.next();
            log::info!("Trigger fired at {:.2}s", elapsed.as_secs_f64());
            follower.fire(now);
        }

        let state = follower.tick(now);
        eprint!(
            "\r{:>5.1}s  indicator ({:6.1}, {:6.1})  {:?}      ",
            elapsed.as_secs_f64(),
            state.position.x,
            state.position.y,
            state.phase
        );

        thread::sleep(tick);
    }
    eprintln!();

    let stats = pipeline.stats();
    pipeline.stop()?;

    // Completions that landed during the last sleep still count.
    let now = Instant::now();
    follower.process_events(now);
    let state = follower.tick(now);
    summarize(&stats, &state, follower.current_target());

    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let base: Box<dyn FaceDetector> = match cli.scenario.as_ref() {
        Some(path) => Box::new(ScriptedDetector::new(scenario::load(path)?)?),
        None => Box::new(BlobDetector::new()),
    };

    if cli.latency_ms > 0 {
        Ok(Box::new(DelayedDetector::new(
            base,
            Duration::from_millis(cli.latency_ms),
        )))
    } else {
        Ok(base)
    }
}

fn build_overlay(cli: &Cli) -> Box<dyn OverlaySink> {
    if cli.show_overlay {
        Box::new(LogOverlaySink)
    } else {
        Box::new(NullOverlaySink)
    }
}

fn summarize(stats: &GateStats, state: &IndicatorState, target: Option<Target>) {
    log::info!(
        "Capture: {} frames submitted, {} admitted for detection, {} dropped",
        stats.submitted(),
        stats.admitted(),
        stats.dropped()
    );
    match target {
        Some(t) => log::info!(
            "Indicator at ({:.1}, {:.1}), {:.1} points from the last target",
            state.position.x,
            state.position.y,
            state.position.distance_to(t.point)
        ),
        None => log::info!("No face was ever seen"),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(cli.view_width > 0.0 && cli.view_height > 0.0) {
        return Err(format!(
            "View size must be positive, got {}x{}",
            cli.view_width, cli.view_height
        )
        .into());
    }
    if !(cli.fps.is_finite() && cli.fps > 0.0) {
        return Err(format!("Capture rate must be positive, got {}", cli.fps).into());
    }
    if !(cli.tick_hz.is_finite() && cli.tick_hz > 0.0) {
        return Err(format!("Tick rate must be positive, got {}", cli.tick_hz).into());
    }
    if !(cli.duration.is_finite() && cli.duration >= 0.0) {
        return Err(format!("Duration must be non-negative, got {}", cli.duration).into());
    }
    if !(cli.convergence.is_finite() && cli.convergence >= 0.0) {
        return Err(format!(
            "Convergence time must be non-negative, got {}",
            cli.convergence
        )
        .into());
    }
    if cli.fire_at.iter().any(|t| !t.is_finite() || *t < 0.0) {
        return Err("Trigger times must be non-negative".into());
    }
    if cli.detector != "blob" && cli.detector != "scripted" {
        return Err(format!(
            "Detector must be 'blob' or 'scripted', got '{}'",
            cli.detector
        )
        .into());
    }
    if cli.detector == "scripted" && cli.scenario.is_none() {
        return Err("The scripted detector requires --scenario".into());
    }
    if cli.detector != "scripted" && cli.scenario.is_some() {
        return Err("--scenario only applies to the scripted detector".into());
    }
    Ok(())
}
