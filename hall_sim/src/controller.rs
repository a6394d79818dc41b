//! Frame orchestration and the command surface
//!
//! The controller is the only owner of simulation state. Per frame the caller
//! applies any pending [`Command`]s, then calls [`SimulationController::step`],
//! then reads a [`Snapshot`] for display.

use glam::DVec2;

use crate::carrier::{apply_polarity, Carrier, Polarity};
use crate::collision::{self, Termination};
use crate::config::{ConfigError, SimulationConfig};
use crate::feedback::FeedbackAccumulator;
use crate::geometry::Geometry;
use crate::integrator::Integrator;
use crate::params::{RunMode, SimulationParameters};

/// Displacement reported by the most recent terminated run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LastRunResult {
    pub x_deflection: f64,
    pub y_deflection: f64,
}

/// Input commands, applied in order before the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    AdjustField(f64),
    AdjustCurrent(f64),
    TogglePause,
    TogglePolarity,
    Reset,
}

/// Read-only view of everything the display needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub magnetic_field: f64,
    pub current_factor: f64,
    pub top_count: u64,
    pub bottom_count: u64,
    pub total_carriers: u64,
    pub hall_voltage: f64,
    pub last_x_deflection: f64,
    pub last_y_deflection: f64,
    pub carrier_position: DVec2,
    pub carrier_velocity: DVec2,
    pub polarity: Polarity,
    pub paused: bool,
}

pub struct SimulationController {
    geometry: Geometry,
    integrator: Integrator,
    params: SimulationParameters,
    current_floor: f64,
    carrier: Carrier,
    feedback: FeedbackAccumulator,
    last_run: LastRunResult,
}

impl SimulationController {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;

        let params = SimulationParameters {
            magnetic_field: config.magnetic_field,
            current_factor: config.current_factor.max(config.current_floor),
            polarity: config.polarity,
            mode: RunMode::Running,
        };

        log::info!(
            "Conductor {}x{} at ({}, {}), carrier radius {}; B = {}, I = {}, {}",
            geometry.width(),
            geometry.height(),
            geometry.left(),
            geometry.top(),
            geometry.carrier_radius(),
            params.magnetic_field,
            params.current_factor,
            params.polarity.label(),
        );

        Ok(Self {
            geometry,
            integrator: Integrator::new(config.force_scale, config.carrier_mass),
            params,
            current_floor: config.current_floor,
            carrier: Carrier::new(&geometry, config.polarity.charge(config.charge_magnitude)),
            feedback: FeedbackAccumulator::new(config.collision_increment, config.voltage_scale),
            last_run: LastRunResult::default(),
        })
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::AdjustField(delta) => self.adjust_field(delta),
            Command::AdjustCurrent(delta) => self.adjust_current(delta),
            Command::TogglePause => self.toggle_pause(),
            Command::TogglePolarity => self.toggle_polarity(),
            Command::Reset => self.reset(),
        }
    }

    /// Change B by `delta`; no bounds, so unstable regimes stay reachable
    pub fn adjust_field(&mut self, delta: f64) {
        self.params.magnetic_field += delta;
        log::debug!("B = {:.2}", self.params.magnetic_field);
    }

    /// Change I by `delta`, never dropping below the current floor
    pub fn adjust_current(&mut self, delta: f64) {
        let requested = self.params.current_factor + delta;
        if requested < self.current_floor {
            log::warn!(
                "Current factor {:.2} below floor, clamped to {}",
                requested,
                self.current_floor
            );
        }
        self.params.current_factor = requested.max(self.current_floor);
        log::debug!("I = {:.2}", self.params.current_factor);
    }

    pub fn toggle_pause(&mut self) {
        self.params.mode = match self.params.mode {
            RunMode::Running => RunMode::Paused,
            RunMode::Paused => RunMode::Running,
        };
        log::info!("Simulation {:?}", self.params.mode);
    }

    /// Switch carrier type; the accumulated history is discarded with it
    pub fn toggle_polarity(&mut self) {
        self.params.polarity = self.params.polarity.flipped();
        apply_polarity(&mut self.carrier, self.params.polarity);
        log::info!("Carrier type: {}", self.params.polarity.label());
        self.clear_history();
    }

    /// Zero counters, voltage and last-run result; carrier back to injection
    pub fn reset(&mut self) {
        log::info!("Reset");
        self.clear_history();
    }

    fn clear_history(&mut self) {
        self.feedback.reset();
        self.last_run = LastRunResult::default();
        self.carrier.reset(&self.geometry);
    }

    /// Advance one frame; returns the termination if a run ended
    pub fn step(&mut self, dt: f64) -> Option<Termination> {
        if self.params.mode == RunMode::Paused {
            return None;
        }

        let dt = dt.max(0.0);
        self.integrator.step(
            &mut self.carrier,
            &self.params,
            self.feedback.hall_voltage(),
            &self.geometry,
            dt,
        );

        let termination = collision::detect(self.carrier.position, &self.geometry)?;

        let voltage = self
            .feedback
            .record(termination.cause.wall(), self.params.polarity);
        self.last_run = LastRunResult {
            x_deflection: termination.deflection.x,
            y_deflection: termination.deflection.y,
        };
        self.carrier.reset(&self.geometry);

        log::debug!(
            "Run ended: {:?}, deflection ({:.1}, {:.1}), top {} bottom {}, V_H = {:.3e}",
            termination.cause,
            termination.deflection.x,
            termination.deflection.y,
            self.feedback.top_count(),
            self.feedback.bottom_count(),
            voltage,
        );

        Some(termination)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            magnetic_field: self.params.magnetic_field,
            current_factor: self.params.current_factor,
            top_count: self.feedback.top_count(),
            bottom_count: self.feedback.bottom_count(),
            total_carriers: self.feedback.total_count(),
            hall_voltage: self.feedback.hall_voltage(),
            last_x_deflection: self.last_run.x_deflection,
            last_y_deflection: self.last_run.y_deflection,
            carrier_position: self.carrier.position,
            carrier_velocity: self.carrier.velocity,
            polarity: self.params.polarity,
            paused: self.is_paused(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.params.mode == RunMode::Paused
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn carrier(&self) -> &Carrier {
        &self.carrier
    }

    pub fn feedback(&self) -> &FeedbackAccumulator {
        &self.feedback
    }

    pub fn last_run(&self) -> &LastRunResult {
        &self.last_run
    }
}
