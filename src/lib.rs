//! # Syzygy
//!
//! A deterministic Sun–Earth–Moon simulator core. The Earth and the Moon move on Keplerian
//! ellipses around a fixed Sun; from their positions the crate derives the lunar phase, detects
//! solar and lunar eclipses with finite-light-source shadow cones, and can jump straight to a
//! named lunar phase by root finding.
//!
//! Rendering is left to the caller, who either implements
//! [`controller::SimulationObserver`] or consumes the events returned by
//! [`controller::SimulationController::tick`].
//!
//! ## Modules
//!
//! * [`kepler`], [`keplerian_element`], [`ref_system`] – two-body orbit evaluation.
//! * [`ephemeris`] – the three bodies evaluated together.
//! * [`phase`], [`phase_search`] – phase metrics, classification and phase jumps.
//! * [`shadow`] – shadow-cone geometry and eclipse classification.
//! * [`controller`] – simulated clock, tick pipeline and events.
//! * [`config`], [`time`], [`syzygy_errors`], [`constants`] – configuration and plumbing.

pub mod config;
pub mod constants;
pub mod controller;
pub mod ephemeris;
pub mod kepler;
pub mod keplerian_element;
pub mod phase;
pub mod phase_search;
pub mod ref_system;
pub mod shadow;
pub mod syzygy_errors;
pub mod time;
