//! Locomotion Replay - Headless Script Runner
//!
//! Replays a recorded session against a static scene at a fixed frame rate
//! and prints the viewpoint track. Useful for tuning the configuration
//! without a headset.
//!
//! Run with:
//!   `cargo run --bin locomotion_replay -- <scene.json> <script.json> [config.json]`
//!
//! Example:
//!   `cargo run --bin locomotion_replay -- demos/courtyard.json demos/teleport_then_walk.json`
//!
//! Set `RUST_LOG=debug` to see mode transitions.

use std::error::Error;
use std::path::Path;

use serde::Deserialize;

use xr_mover_engine::input::{DeviceEvent, Hand};
use xr_mover_engine::locomotion::{
    FadeOverlay, HeadPose, LocomotionConfig, LocomotionController, LocomotionNotice, Notify,
    PointerPose,
};
use xr_mover_engine::physics::{StaticScene, Vec3};

// ============================================================================
// SCRIPT FORMAT
// ============================================================================

/// A recorded session: timed inputs applied at the start of the frame they fall in.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct Script {
    /// Simulation steps per second
    fps: u32,
    /// Total simulated time in seconds
    duration: f32,
    /// Print one track line every this many frames
    print_every: u32,
    steps: Vec<ScriptStep>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            fps: 60,
            duration: 5.0,
            print_every: 15,
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptStep {
    /// Seconds since the start of the replay
    at: f32,
    #[serde(flatten)]
    action: ScriptAction,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScriptAction {
    /// A raw device event
    Event(DeviceEvent),
    /// Point a hand at a destination marker
    Aim {
        hand: Hand,
        marker: Vec3,
        forward: Vec3,
    },
    /// Point a hand somewhere with no valid destination
    Point { hand: Hand, forward: Vec3 },
    /// Drop a hand's pointer and marker
    ClearHand { hand: Hand },
    Head { height: f32, forward: Vec3 },
    Brakes,
    Style { index: usize },
    SnapToGround,
}

fn load_script(path: &Path) -> Result<Script, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read script {}: {e}", path.display()))?;
    let mut script: Script = serde_json::from_str(&json)?;
    if script.fps == 0 {
        return Err("script fps must be positive".into());
    }
    script.steps.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(script)
}

fn apply(controller: &mut LocomotionController<StaticScene>, action: ScriptAction) {
    match action {
        ScriptAction::Event(event) => controller.queue_event(event),
        ScriptAction::Aim {
            hand,
            marker,
            forward,
        } => controller.rig_mut().aim(hand, marker, forward),
        ScriptAction::Point { hand, forward } => {
            let rig = controller.rig_mut().hand_mut(hand);
            rig.marker = None;
            rig.pointer = Some(PointerPose {
                forward,
                is_targeting: false,
            });
        }
        ScriptAction::ClearHand { hand } => {
            let rig = controller.rig_mut().hand_mut(hand);
            rig.marker = None;
            rig.pointer = None;
        }
        ScriptAction::Head { height, forward } => {
            controller.rig_mut().head = Some(HeadPose { height, forward });
        }
        ScriptAction::Brakes => controller.apply_brakes(),
        ScriptAction::Style { index } => controller.set_movement_style(index, Notify::Announce),
        ScriptAction::SnapToGround => controller.snap_to_ground(),
    }
}

fn describe(notice: &LocomotionNotice) -> String {
    match notice {
        LocomotionNotice::FirstMovement => "first movement".to_string(),
        LocomotionNotice::ModeChanged { from, to } => format!("mode {from:?} -> {to:?}"),
        LocomotionNotice::StyleChanged(style) => format!("style {style:?}"),
        LocomotionNotice::TeleportCommitted(target) => {
            format!("teleport to ({:.3}, {:.3}, {:.3})", target.x, target.y, target.z)
        }
        LocomotionNotice::BrakesApplied => "brakes".to_string(),
        LocomotionNotice::Landed => "landed".to_string(),
    }
}

fn print_track_line(frame: u32, controller: &LocomotionController<StaticScene>) {
    let position = controller.position();
    println!(
        "{:>6} t={:>7.3} pos=({:>8.3}, {:>7.3}, {:>8.3}) yaw={:>7.2} speed={:.4} mode={:?} opacity={:.2}",
        frame,
        controller.clock(),
        position.x,
        position.y,
        position.z,
        controller.yaw_degrees(),
        controller.velocity().length(),
        controller.mode().kind(),
        controller.opacity(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        return Err("usage: locomotion_replay <scene.json> <script.json> [config.json]".into());
    }

    let scene = StaticScene::from_json_file(Path::new(&args[0]))?;
    let script = load_script(Path::new(&args[1]))?;
    let config = match args.get(2) {
        Some(path) => LocomotionConfig::from_json_file(Path::new(path))?,
        None => LocomotionConfig::default(),
    };

    log::info!(
        "Replaying {} steps over {:.1}s at {} fps against {} boxes",
        script.steps.len(),
        script.duration,
        script.fps,
        scene.len()
    );

    let mut controller =
        LocomotionController::new(config, scene).with_fade_visual(Box::new(FadeOverlay::default()));

    let dt = 1.0 / script.fps as f32;
    let frames = (script.duration * script.fps as f32).ceil() as u32;
    let mut pending = script.steps.into_iter().peekable();

    print_track_line(0, &controller);
    for frame in 1..=frames {
        let frame_start = (frame - 1) as f32 * dt;
        while let Some(step) = pending.next_if(|step| step.at <= frame_start) {
            apply(&mut controller, step.action);
        }

        controller.step(dt);

        for notice in controller.drain_notices() {
            println!("{:>6} -- {}", frame, describe(&notice));
        }
        if frame % script.print_every.max(1) == 0 || frame == frames {
            print_track_line(frame, &controller);
        }
    }

    Ok(())
}
