//! Run-time tunables shared by the integrator and the controller

use crate::carrier::Polarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Running,
    Paused,
}

/// Tunables adjusted by external input and read by the integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    pub magnetic_field: f64,
    pub current_factor: f64,
    pub polarity: Polarity,
    pub mode: RunMode,
}
