//! Headless driver: ticks the simulation at a fixed frame rate and logs what happens.
//!
//! ```text
//! cargo run --example headless_run -- [config.ron] [real_seconds]
//! ```
//!
//! Without a configuration file the default scene is used, sped up to one simulated day per
//! real second and started at a full moon so that the first frames already show an eclipse.

use std::path::Path;

use syzygy::{
    config::SimulationConfig,
    constants::SECONDS_PER_DAY,
    controller::{PhaseChange, SimulationController, SimulationEvent, SimulationObserver},
    ephemeris::BodyPositions,
    shadow::EclipseEvent,
    time::format_epoch_ms,
};

const FRAME_RATE: f64 = 60.0;

/// Logs every phase change and eclipse, and the positions once per real second.
#[derive(Default)]
struct LogObserver {
    frame: u64,
}

impl SimulationObserver for LogObserver {
    fn on_positions(&mut self, positions: &BodyPositions, t: f64) {
        if self.frame % FRAME_RATE as u64 == 0 {
            log::info!(
                "{} earth = [{:.3}, {:.3}, {:.3}] moon = [{:.3}, {:.3}, {:.3}]",
                format_epoch_ms(t),
                positions.earth.x,
                positions.earth.y,
                positions.earth.z,
                positions.moon.x,
                positions.moon.y,
                positions.moon.z,
            );
        }
        self.frame += 1;
    }

    fn on_phase_change(&mut self, change: &PhaseChange) {
        log::info!(
            "{} moon is {} ({:.1}% lit)",
            format_epoch_ms(change.t),
            change.phase,
            change.illuminated_fraction * 100.0
        );
    }

    fn on_eclipse(&mut self, event: &EclipseEvent) {
        log::warn!("{} {event}", format_epoch_ms(event.t));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::load(Path::new(&path))?,
        None => {
            let mut config = SimulationConfig::default();
            config.time.start_epoch_ms = Some(0.0);
            config.time.time_scale = SECONDS_PER_DAY;
            config
        }
    };
    let real_seconds: f64 = match args.next() {
        Some(s) => s.parse()?,
        None => 30.0,
    };

    let mut sim = SimulationController::with_observer(config, Box::new(LogObserver::default()))?;

    let frames = (real_seconds * FRAME_RATE).round() as u64;
    let mut eclipses = 0usize;
    for _ in 0..frames {
        eclipses += sim
            .tick(1.0 / FRAME_RATE)
            .iter()
            .filter(|e| matches!(e, SimulationEvent::Eclipse(_)))
            .count();
    }

    let state = sim.state();
    log::info!(
        "Stopped at {} after {frames} frames: {eclipses} eclipse(s), moon {:.1}% lit",
        format_epoch_ms(state.now),
        state.illuminated_fraction.unwrap_or_default() * 100.0
    );

    match sim.jump_to_new_moon() {
        Some(t) => log::info!("New moon within the search window at {}", format_epoch_ms(t)),
        None => log::info!("No new moon within the search window"),
    }
    Ok(())
}
