//! Headless walkthrough of the Strider locomotion controller.
//!
//! Loads `strider.ron` (CLI flags override it), builds a small Rapier level
//! with a low ceiling, and drives one character through a scripted input
//! timeline on a fixed-timestep loop, logging its posture as it goes.
//!
//! Run with `cargo run -p strider-demo -- --frames 900 --log-level debug`.

mod game_loop;
mod scene;
mod script;

use clap::Parser;
use strider_config::{CliArgs, Config, default_config_dir};
use tracing::info;

use crate::game_loop::FixedStepLoop;
use crate::scene::Scene;
use crate::script::Script;

/// Render frame times fed to the loop, cycled. Uneven on purpose so the
/// accumulator has work to do.
const FRAME_TIMES: [f64; 7] = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args);
    config.validate()?;

    let log_dir = config_dir.join("logs");
    strider_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!("Config directory: {}", config_dir.display());

    let mut scene = Scene::new(&config)?;
    let mut script = Script::walkthrough();
    let total_frames = args
        .frames
        .map_or(script.last_frame() + 120, u64::from);
    let report_interval = u64::from(config.debug.report_interval.max(1));

    let mut game_loop = FixedStepLoop::new();
    let mut frame = 0u64;
    for frame_time in FRAME_TIMES.iter().cycle() {
        if frame >= total_frames {
            break;
        }
        game_loop.tick(
            *frame_time,
            |dt, _sim_time| {
                if frame >= total_frames {
                    return;
                }
                if let Some(mut input) = scene.input_mut() {
                    script.apply(frame, &mut input);
                }
                scene.step(dt as f32);
                if frame % report_interval == 0 {
                    log_posture(&scene, frame);
                }
                frame += 1;
            },
            |_alpha| {},
        );
    }

    for record in scene.transitions() {
        info!(
            event = ?record.event,
            outcome = ?record.outcome,
            from = ?record.from,
            to = ?record.to,
            "Transition"
        );
    }
    info!(
        frames = frame,
        rendered = game_loop.frame_count(),
        sim_time = game_loop.total_sim_time(),
        script_finished = script.is_finished(),
        "Walkthrough complete"
    );
    Ok(())
}

fn log_posture(scene: &Scene, frame: u64) {
    let (Some(snapshot), Some(feet)) = (scene.snapshot(), scene.feet()) else {
        return;
    };
    info!(
        frame,
        stance = ?snapshot.stance,
        sprinting = snapshot.sprinting,
        grounded = scene.grounded(),
        x = feet.x,
        y = feet.y,
        z = feet.z,
        yaw = snapshot.yaw,
        pitch = snapshot.pitch,
        camera_height = snapshot.camera_height,
        collider_height = snapshot.collider_height,
        "Posture"
    );
}
