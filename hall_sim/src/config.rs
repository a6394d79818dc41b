//! Simulation configuration

use glam::DVec2;
use thiserror::Error;

use crate::carrier::Polarity;
use crate::constants::*;
use crate::geometry::{Geometry, GeometryError};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("carrier mass must be positive and finite, got {0}")]
    InvalidMass(f64),
    #[error("current floor must be positive and finite, got {0}")]
    InvalidCurrentFloor(f64),
    #[error("charge magnitude must be positive and finite, got {0}")]
    InvalidChargeMagnitude(f64),
    #[error("force scale must be positive and finite, got {0}")]
    InvalidForceScale(f64),
    #[error("voltage scale must be positive and finite, got {0}")]
    InvalidVoltageScale(f64),
    #[error("initial magnetic field must be finite, got {0}")]
    InvalidMagneticField(f64),
    #[error("initial current factor must be finite, got {0}")]
    InvalidCurrentFactor(f64),
}

/// Everything needed to build a [`SimulationController`](crate::SimulationController)
///
/// The defaults reproduce the classic setup: a 1000 x 400 conductor, electrons,
/// B = 2 and I = 200.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub conductor_origin: DVec2,
    pub conductor_width: f64,
    pub conductor_height: f64,
    pub carrier_radius: f64,

    pub magnetic_field: f64,
    pub current_factor: f64,
    pub current_floor: f64,
    pub polarity: Polarity,

    pub carrier_mass: f64,
    pub charge_magnitude: f64,
    pub force_scale: f64,

    pub collision_increment: u64,
    pub voltage_scale: f64,
}

impl SimulationConfig {
    /// Check the configuration and build its geometry
    pub fn validate(&self) -> Result<Geometry, ConfigError> {
        let geometry = Geometry::new(
            self.conductor_origin,
            self.conductor_width,
            self.conductor_height,
            self.carrier_radius,
        )?;

        if !positive_finite(self.carrier_mass) {
            return Err(ConfigError::InvalidMass(self.carrier_mass));
        }
        if !positive_finite(self.current_floor) {
            return Err(ConfigError::InvalidCurrentFloor(self.current_floor));
        }
        if !positive_finite(self.charge_magnitude) {
            return Err(ConfigError::InvalidChargeMagnitude(self.charge_magnitude));
        }
        if !positive_finite(self.force_scale) {
            return Err(ConfigError::InvalidForceScale(self.force_scale));
        }
        if !positive_finite(self.voltage_scale) {
            return Err(ConfigError::InvalidVoltageScale(self.voltage_scale));
        }
        // Any finite B is allowed; the current is raised to the floor later
        if !self.magnetic_field.is_finite() {
            return Err(ConfigError::InvalidMagneticField(self.magnetic_field));
        }
        if !self.current_factor.is_finite() {
            return Err(ConfigError::InvalidCurrentFactor(self.current_factor));
        }

        Ok(geometry)
    }

    pub fn with_magnetic_field(mut self, magnetic_field: f64) -> Self {
        self.magnetic_field = magnetic_field;
        self
    }

    pub fn with_current_factor(mut self, current_factor: f64) -> Self {
        self.current_factor = current_factor;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            conductor_origin: DVec2::new(CONDUCTOR_X, CONDUCTOR_Y),
            conductor_width: CONDUCTOR_WIDTH,
            conductor_height: CONDUCTOR_HEIGHT,
            carrier_radius: CARRIER_RADIUS,
            magnetic_field: INITIAL_MAGNETIC_FIELD,
            current_factor: INITIAL_CURRENT_FACTOR,
            current_floor: MIN_CURRENT_FACTOR,
            polarity: Polarity::Negative,
            carrier_mass: CARRIER_MASS,
            charge_magnitude: ELEMENTARY_CHARGE,
            force_scale: FORCE_SCALING_FACTOR,
            collision_increment: CARRIER_INCREASE_RATE,
            voltage_scale: VOLTAGE_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let geometry = SimulationConfig::default().validate().unwrap();
        assert_eq!(geometry.width(), CONDUCTOR_WIDTH);
        assert_eq!(geometry.height(), CONDUCTOR_HEIGHT);
    }

    #[test]
    fn geometry_errors_pass_through() {
        let config = SimulationConfig {
            carrier_radius: 250.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Geometry(GeometryError::CarrierTooLarge { .. }))
        ));
    }

    #[test]
    fn rejects_bad_scalars() {
        let config = SimulationConfig {
            carrier_mass: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidMass(0.0)));

        let config = SimulationConfig {
            current_floor: -0.1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidCurrentFloor(-0.1)));

        let config = SimulationConfig {
            charge_magnitude: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidChargeMagnitude(0.0)));

        let config = SimulationConfig {
            force_scale: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidForceScale(v)) if v.is_nan()));

        let config = SimulationConfig {
            force_scale: -1.5e18,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidForceScale(-1.5e18)));

        let config = SimulationConfig {
            voltage_scale: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidVoltageScale(f64::INFINITY))
        );

        let config = SimulationConfig::default().with_magnetic_field(f64::NEG_INFINITY);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMagneticField(f64::NEG_INFINITY))
        );

        let config = SimulationConfig::default().with_current_factor(f64::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCurrentFactor(v)) if v.is_nan()));
    }

    #[test]
    fn field_sign_and_low_current_are_accepted() {
        let config = SimulationConfig::default()
            .with_magnetic_field(-5.0)
            .with_current_factor(0.0);
        assert!(config.validate().is_ok());
    }
}
