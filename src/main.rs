//! Grid Raiders headless runner
//!
//! Runs the simulation without a renderer, optionally flown by the built-in
//! autopilot. Usage: `grid-raiders [settings.json]`

use std::path::Path;

use grid_raiders::Settings;
use grid_raiders::sim::{Autopilot, GameState, SimEvent, TickInput, tick};

fn main() {
    env_logger::init();
    log::info!("Grid Raiders (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    log::info!(
        "Seed {:#x}, field {}x{}, up to {} ticks",
        settings.seed,
        settings.field.width,
        settings.field.height,
        settings.max_ticks
    );

    let mut state = GameState::from_settings(&settings);
    let mut pilot = Autopilot::new();
    let mut kills = 0u32;
    let mut placed = 0u32;
    let mut steps = 0u64;

    while steps < settings.max_ticks && state.is_running() {
        let input = if settings.autopilot {
            pilot.input(&state)
        } else {
            TickInput::default()
        };
        tick(&mut state, &input, settings.tick_ms);
        steps += 1;

        for event in state.drain_events() {
            match event {
                SimEvent::Explosion { .. } => kills += 1,
                SimEvent::ModulePlaced { coord, kind } => {
                    placed += 1;
                    log::info!("Built {} at {}", kind.as_str(), coord);
                }
                SimEvent::PlacementRejected(err) => log::warn!("Build rejected: {}", err),
                _ => {}
            }
        }
    }

    let hud = state.hud();
    println!(
        "{} after {} ticks ({:.1}s game time): score {}, scrap {}, wave {}, {} kills, {} modules built, health {:.0}",
        if hud.running { "Stopped" } else { "Game over" },
        steps,
        state.elapsed_ms / 1000.0,
        hud.score,
        hud.scrap,
        hud.wave,
        kills,
        placed,
        hud.health
    );

    if settings.dump_state {
        match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize final state: {}", e),
        }
    }
}
