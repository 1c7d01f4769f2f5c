//! # Simulation controller
//!
//! [`SimulationController`] owns the simulated clock and drives the three-body model. Each
//! [`tick`](SimulationController::tick) advances time, evaluates the positions, updates the lunar
//! phase, runs eclipse detection and reports what happened, both to an optional
//! [`SimulationObserver`] and as the returned list of [`SimulationEvent`]s.
//!
//! ## Tick pipeline
//!
//! ```text
//! now += dt_real · time_scale · 1000
//!   └─► positions ─► phase metrics ─► named phase changed?  ─► PhaseChange
//!                 └─► cooldown over? ─► solar, then lunar    ─► Eclipse
//!                 └─────────────────────────────────────────► Positions
//! ```
//!
//! ## Eclipse cooldown
//!
//! After an eclipse is reported, detection is suspended while the simulated clock stays within
//! `eclipse_cooldown_sim_sec` seconds of that report, whatever the kind of the next eclipse.
//! The window is measured in both directions and survives explicit time jumps
//! ([`set_sim_time`](SimulationController::set_sim_time),
//! [`reset_to_now`](SimulationController::reset_to_now) and the phase jumps), so jumping back
//! onto an alignment that was just reported does not report it again.
//!
//! ## Example
//!
//! ```rust
//! use syzygy::config::SimulationConfig;
//! use syzygy::controller::{SimulationController, SimulationEvent};
//!
//! let mut config = SimulationConfig::default();
//! config.time.start_epoch_ms = Some(0.0);
//!
//! let mut sim = SimulationController::new(config).unwrap();
//! let events = sim.tick(1.0 / 60.0);
//! assert!(matches!(events.last(), Some(SimulationEvent::Positions { .. })));
//! ```

use crate::{
    config::{DetectionConfig, SearchConfig, SimulationConfig},
    constants::{EpochMs, Radian, DEGRAD, MS_PER_SECOND, SECONDS_PER_HOUR},
    ephemeris::{BodyPositions, SolarSystem},
    phase::{classify_phase, phase_metrics, PhaseMetrics, PhaseName},
    phase_search::{find_time_for_phase, phase_error},
    shadow::{cone_shadow_hit, EclipseEvent, EclipseKind},
    syzygy_errors::SyzygyError,
    time::{format_epoch_ms, now_epoch_ms, SimTime},
};

/// Transition of the Moon into a named phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub phase: PhaseName,
    /// Simulated instant of the transition (ms).
    pub t: EpochMs,
    pub phase_angle: Radian,
    pub illuminated_fraction: f64,
}

/// Everything a tick can report, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    PhaseChange(PhaseChange),
    Eclipse(EclipseEvent),
    Positions { positions: BodyPositions, t: EpochMs },
}

/// Receiver of the simulation events.
///
/// Every method has an empty default body; implement only what you listen to.
pub trait SimulationObserver {
    fn on_positions(&mut self, _positions: &BodyPositions, _t: EpochMs) {}

    fn on_phase_change(&mut self, _change: &PhaseChange) {}

    fn on_eclipse(&mut self, _event: &EclipseEvent) {}
}

/// Read-only view of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub now: EpochMs,
    pub time_scale: f64,
    pub is_playing: bool,
    pub current_phase: Option<PhaseName>,
    pub illuminated_fraction: Option<f64>,
    pub last_eclipse: Option<EclipseEvent>,
}

#[derive(Debug, Clone)]
struct SimulationState {
    now: EpochMs,
    time_scale: f64,
    playing: bool,
    current_phase: Option<PhaseName>,
    illuminated_fraction: Option<f64>,
    last_eclipse: Option<EclipseEvent>,
    /// Simulated second of the last reported eclipse.
    last_eclipse_s: Option<f64>,
    eclipse_latch: Option<String>,
}

impl SimulationState {
    fn in_eclipse_cooldown(&self, now_s: f64, cooldown_s: f64) -> bool {
        self.last_eclipse_s
            .is_some_and(|last| (now_s - last).abs() < cooldown_s)
    }
}

/// Clock and event source of the Sun–Earth–Moon simulation.
pub struct SimulationController {
    system: SolarSystem,
    detection: DetectionConfig,
    search: SearchConfig,
    state: SimulationState,
    observer: Option<Box<dyn SimulationObserver + Send>>,
}

impl SimulationController {
    /// Build a playing controller from a configuration.
    ///
    /// Return
    /// ------
    /// * The controller, or the [`SyzygyError`] raised while validating the configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, SyzygyError> {
        let fin = config.finalize()?;
        log::info!(
            "Simulation starts at {} (time scale {}x)",
            format_epoch_ms(fin.start_epoch_ms),
            fin.time_scale
        );
        log::debug!("Earth orbit\n{}", fin.earth);
        log::debug!("Moon orbit\n{}", fin.moon);

        Ok(SimulationController {
            system: SolarSystem::from_config(&fin),
            state: SimulationState {
                now: fin.start_epoch_ms,
                time_scale: fin.time_scale,
                playing: true,
                current_phase: None,
                illuminated_fraction: None,
                last_eclipse: None,
                last_eclipse_s: None,
                eclipse_latch: None,
            },
            detection: fin.detection,
            search: fin.search,
            observer: None,
        })
    }

    /// Build a controller reporting to `observer`.
    pub fn with_observer(
        config: SimulationConfig,
        observer: Box<dyn SimulationObserver + Send>,
    ) -> Result<Self, SyzygyError> {
        let mut controller = Self::new(config)?;
        controller.set_observer(observer);
        Ok(controller)
    }

    pub fn set_observer(&mut self, observer: Box<dyn SimulationObserver + Send>) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    // ---- Play state ----

    pub fn play(&mut self) {
        self.state.playing = true;
    }

    pub fn pause(&mut self) {
        self.state.playing = false;
    }

    pub fn toggle(&mut self) {
        self.state.playing = !self.state.playing;
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    // ---- Clock ----

    /// Advance the simulation by `dt_real_seconds` of real time.
    ///
    /// Arguments
    /// ---------
    /// * `dt_real_seconds`: real time elapsed since the previous tick, scaled by the time scale.
    ///
    /// Return
    /// ------
    /// * The events of this tick, in the order they were sent to the observer: an optional
    ///   [`SimulationEvent::PhaseChange`], an optional [`SimulationEvent::Eclipse`] and always a
    ///   final [`SimulationEvent::Positions`]. Empty while paused.
    pub fn tick(&mut self, dt_real_seconds: f64) -> Vec<SimulationEvent> {
        if !self.state.playing {
            return Vec::new();
        }
        if !dt_real_seconds.is_finite() {
            log::warn!("Ignoring tick with non-finite step {dt_real_seconds}");
            return Vec::new();
        }

        self.state.now += dt_real_seconds * self.state.time_scale * MS_PER_SECOND;
        let t = self.state.now;
        let positions = self.system.positions_at(t);

        let mut events = Vec::with_capacity(3);
        if let Some(change) = self.update_phase(&positions) {
            events.push(SimulationEvent::PhaseChange(change));
        }
        if let Some(eclipse) = self.detect_eclipse(&positions) {
            events.push(SimulationEvent::Eclipse(eclipse));
        }
        events.push(SimulationEvent::Positions { positions, t });

        self.dispatch(&events);
        events
    }

    /// Simulated seconds per real second. Non-finite values are ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.state.time_scale = scale;
        } else {
            log::warn!("Ignoring non-finite time scale {scale}");
        }
    }

    /// Move the clock to an absolute instant.
    ///
    /// Arguments
    /// ---------
    /// * `time`: epoch in ms, a hifitime [`Epoch`](hifitime::Epoch) or a date string.
    ///
    /// Return
    /// ------
    /// * `Ok(())`, or [`SyzygyError::InvalidDate`] with the clock left untouched.
    pub fn set_sim_time(&mut self, time: impl Into<SimTime>) -> Result<(), SyzygyError> {
        let t = time.into().to_epoch_ms()?;
        self.jump_clock(t);
        Ok(())
    }

    /// Move the clock to the current wall-clock instant.
    pub fn reset_to_now(&mut self) -> Result<(), SyzygyError> {
        let t = now_epoch_ms()?;
        self.jump_clock(t);
        Ok(())
    }

    pub fn sim_time(&self) -> EpochMs {
        self.state.now
    }

    // ---- Queries ----

    /// Positions of the three bodies at the current simulated instant.
    pub fn positions(&self) -> BodyPositions {
        self.system.positions_at(self.state.now)
    }

    /// Phase angle and illuminated fraction at the current simulated instant.
    pub fn phase_metrics(&self) -> PhaseMetrics {
        self.system.phase_at(self.state.now)
    }

    pub fn state(&self) -> StateSnapshot {
        StateSnapshot {
            now: self.state.now,
            time_scale: self.state.time_scale,
            is_playing: self.state.playing,
            current_phase: self.state.current_phase,
            illuminated_fraction: self.state.illuminated_fraction,
            last_eclipse: self.state.last_eclipse,
        }
    }

    /// The three-body model driven by the controller.
    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    // ---- Phase jumps ----

    /// Jump to the closest occurrence of a named phase around the current instant.
    ///
    /// New and full moon are searched in a window of `new_full_window_hours`, quarters in a
    /// window of `quarter_window_hours`, both centred on the current instant.
    ///
    /// Return
    /// ------
    /// * `Some(t)` with the new simulated instant, or `None` if the window holds no such phase,
    ///   in which case the clock is left untouched.
    pub fn jump_to_phase(&mut self, target: PhaseName) -> Option<EpochMs> {
        let window_hours = match target {
            PhaseName::New | PhaseName::Full => self.search.new_full_window_hours,
            PhaseName::Quarter => self.search.quarter_window_hours,
        };
        let system = &self.system;
        let found = find_time_for_phase(
            |t| phase_error(system, target, t),
            self.state.now,
            window_hours * SECONDS_PER_HOUR,
        );

        match found {
            Some(t) if t.is_finite() => {
                self.jump_clock(t);
                self.state.current_phase = Some(target);
                self.state.illuminated_fraction = Some(self.system.phase_at(t).illuminated_fraction);
                log::info!("Jumped to {target} moon at {}", format_epoch_ms(t));
                Some(t)
            }
            _ => {
                log::debug!(
                    "No {target} moon within {window_hours} h around {}",
                    format_epoch_ms(self.state.now)
                );
                None
            }
        }
    }

    pub fn jump_to_new_moon(&mut self) -> Option<EpochMs> {
        self.jump_to_phase(PhaseName::New)
    }

    pub fn jump_to_full_moon(&mut self) -> Option<EpochMs> {
        self.jump_to_phase(PhaseName::Full)
    }

    /// [`jump_to_phase`](Self::jump_to_phase) with a textual target such as `"firstQuarter"`.
    pub fn jump_to_phase_named(&mut self, target: &str) -> Result<Option<EpochMs>, SyzygyError> {
        let target: PhaseName = target.parse()?;
        Ok(self.jump_to_phase(target))
    }

    // ---- Internals ----

    fn jump_clock(&mut self, t: EpochMs) {
        log::debug!(
            "Clock jumps from {} to {}",
            format_epoch_ms(self.state.now),
            format_epoch_ms(t)
        );
        self.state.now = t;
    }

    fn update_phase(&mut self, positions: &BodyPositions) -> Option<PhaseChange> {
        let metrics = phase_metrics(&positions.sun, &positions.earth, &positions.moon);
        self.state.illuminated_fraction = Some(metrics.illuminated_fraction);

        let name = classify_phase(metrics.phase_angle, self.detection.phase_epsilon_deg)?;
        if self.state.current_phase == Some(name) {
            return None;
        }
        self.state.current_phase = Some(name);
        log::debug!(
            "Moon enters {name} phase at {} ({:.1}% lit)",
            format_epoch_ms(self.state.now),
            metrics.illuminated_fraction * 100.0
        );
        Some(PhaseChange {
            phase: name,
            t: self.state.now,
            phase_angle: metrics.phase_angle,
            illuminated_fraction: metrics.illuminated_fraction,
        })
    }

    fn detect_eclipse(&mut self, positions: &BodyPositions) -> Option<EclipseEvent> {
        let now_s = self.state.now / MS_PER_SECOND;
        if self
            .state
            .in_eclipse_cooldown(now_s, self.detection.eclipse_cooldown_sim_sec)
        {
            return None;
        }

        let det = &self.detection;
        for (kind, threshold_deg) in [
            (EclipseKind::Solar, det.align_thresh_deg_solar),
            (EclipseKind::Lunar, det.align_thresh_deg_lunar),
        ] {
            if positions.alignment_angle(kind) * DEGRAD >= threshold_deg {
                continue;
            }
            let cone = self
                .system
                .shadow_cone(kind, positions)
                .with_penumbra_scale(det.penumbra_scale)
                .with_antumbra_depth(det.antumbra_depth);
            let Some(subtype) = cone_shadow_hit(&cone).subtype() else {
                continue;
            };

            let event = EclipseEvent::new(kind, subtype, self.state.now);
            let latch = event.latch_key();
            if self.state.eclipse_latch.as_deref() == Some(latch.as_str()) {
                log::debug!("Eclipse {latch} still in progress after cooldown");
            }
            log::info!("{event}");

            self.state.last_eclipse_s = Some(now_s);
            self.state.eclipse_latch = Some(latch);
            self.state.last_eclipse = Some(event);
            return Some(event);
        }
        None
    }

    fn dispatch(&mut self, events: &[SimulationEvent]) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        for event in events {
            match event {
                SimulationEvent::PhaseChange(change) => observer.on_phase_change(change),
                SimulationEvent::Eclipse(eclipse) => observer.on_eclipse(eclipse),
                SimulationEvent::Positions { positions, t } => observer.on_positions(positions, *t),
            }
        }
    }
}
