//! Desk Replay - Headless Camera Scenario Runner
//!
//! Run with: `cargo run --bin desk_replay -- <scenario.json> [config.json]`
//!
//! Feeds a recorded sequence of frames through the desk scene and logs every
//! camera transition. Set `RUST_LOG=debug` to also see zone events.
//!
//! Scenario format:
//!
//! ```json
//! {
//!   "start_yaw": 90.0,
//!   "steps": [
//!     { "dt": 0.016, "look": [0.0, -1.0], "repeat": 30 },
//!     { "dt": 0.016, "look_events": [[0.5, 0.0], [0.25, 0.0]] },
//!     { "dt": 0.016, "captured": false, "look": [3.0, 0.0] },
//!     { "dt": 0.016, "captured": true, "enter_zone": 0 },
//!     { "dt": 0.016, "movement": [0.0, -1.0], "exit_zone": 0 }
//!   ]
//! }
//! ```
//!
//! `look` is one raw motion event per frame and `look_events` are extra events
//! landing in the same frame; both go through the look accumulator, so motion
//! is dropped while `captured` is false (cursor released).

use std::error::Error;
use std::path::{Path, PathBuf};

use dust_journal_engine::camera::ZoneId;
use dust_journal_engine::game::{DeskScene, GameConfig};
use dust_journal_engine::input::{FrameInput, LookAccumulator};
use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    start_yaw: f32,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    dt: f32,
    #[serde(default)]
    look: Vec2,
    #[serde(default)]
    look_events: Vec<Vec2>,
    /// Capture or release the cursor from this step on
    captured: Option<bool>,
    #[serde(default)]
    movement: Vec2,
    enter_zone: Option<u32>,
    exit_zone: Option<u32>,
    /// Run the same frame this many times (zone callbacks fire once)
    #[serde(default = "one")]
    repeat: u32,
}

fn one() -> u32 {
    1
}

fn load_scenario(path: &Path) -> Result<Scenario, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read scenario {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(scenario_path) = args.next().map(PathBuf::from) else {
        return Err("usage: desk_replay <scenario.json> [config.json]".into());
    };
    let config = match args.next() {
        Some(path) => GameConfig::load(Path::new(&path))?,
        None => GameConfig::default(),
    };
    let scenario = load_scenario(&scenario_path)?;

    let mut scene = DeskScene::from_config(&config);
    scene.body.set_yaw(scenario.start_yaw);
    let mut look = LookAccumulator::new();
    look.set_captured(true);

    let mut frame_index = 0u64;
    let mut elapsed = 0.0f32;
    for step in &scenario.steps {
        if let Some(zone) = step.enter_zone {
            scene.enter_zone(ZoneId(zone));
        }
        if let Some(zone) = step.exit_zone {
            scene.exit_zone(ZoneId(zone));
        }

        if let Some(captured) = step.captured {
            look.set_captured(captured);
            tracing::debug!(captured, "cursor capture changed");
        }

        for _ in 0..step.repeat.max(1) {
            look.accumulate(step.look.x, step.look.y);
            for event in &step.look_events {
                look.accumulate(event.x, event.y);
            }
            let input = FrameInput::new(step.dt)
                .with_movement(step.movement)
                .with_look(look.consume());
            let frame = scene.tick(&input);
            elapsed += step.dt;
            frame_index += 1;

            for event in &frame.zone_events {
                tracing::debug!(frame = frame_index, ?event, "zone event");
            }
            if let Some((from, to)) = frame.transition {
                tracing::info!(
                    frame = frame_index,
                    time = elapsed,
                    ?from,
                    ?to,
                    yaw = scene.body.yaw(),
                    pitch = scene.rig.head.pitch,
                    "camera transition"
                );
            }
        }
    }

    tracing::info!(
        frames = frame_index,
        state = ?scene.camera_state(),
        yaw = scene.body.yaw(),
        head = ?scene.rig.head.position,
        "replay finished"
    );
    Ok(())
}
