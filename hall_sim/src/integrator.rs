//! Carrier kinematics
//!
//! Semi-implicit (symplectic) Euler: the vertical velocity is updated from the
//! transverse force first, then the position advances with the new velocity.

use crate::carrier::Carrier;
use crate::constants::{CARRIER_MASS, FORCE_SCALING_FACTOR};
use crate::geometry::Geometry;
use crate::params::SimulationParameters;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    /// Visualization gain applied to the physical forces
    pub force_scale: f64,
    pub mass: f64,
}

impl Integrator {
    pub fn new(force_scale: f64, mass: f64) -> Self {
        Self { force_scale, mass }
    }

    /// Net transverse force on the carrier, before visualization scaling
    ///
    /// Lorentz force restricted to its transverse component, plus the force of
    /// the uniform Hall field E = V_H / height.
    pub fn transverse_force(
        &self,
        carrier: &Carrier,
        params: &SimulationParameters,
        hall_voltage: f64,
        geometry: &Geometry,
    ) -> f64 {
        let electric_field = hall_voltage / geometry.height();
        let electric_force = carrier.charge * electric_field;
        let magnetic_force = carrier.charge * carrier.velocity.x * params.magnetic_field;
        magnetic_force + electric_force
    }

    /// Advance `carrier` by `dt` seconds
    pub fn step(
        &self,
        carrier: &mut Carrier,
        params: &SimulationParameters,
        hall_voltage: f64,
        geometry: &Geometry,
        dt: f64,
    ) {
        // The drive current sets the drift speed directly
        carrier.velocity.x = params.current_factor;

        let total_force =
            self.transverse_force(carrier, params, hall_voltage, geometry) * self.force_scale;
        let acceleration_y = -total_force / self.mass;

        carrier.velocity.y += acceleration_y * dt;
        carrier.position += carrier.velocity * dt;
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(FORCE_SCALING_FACTOR, CARRIER_MASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::Polarity;
    use crate::constants::ELEMENTARY_CHARGE;
    use crate::params::RunMode;
    use glam::DVec2;

    fn geometry() -> Geometry {
        Geometry::new(DVec2::new(100.0, 200.0), 1000.0, 400.0, 5.0).unwrap()
    }

    fn params(b: f64, i: f64) -> SimulationParameters {
        SimulationParameters {
            magnetic_field: b,
            current_factor: i,
            polarity: Polarity::Negative,
            mode: RunMode::Running,
        }
    }

    #[test]
    fn zero_dt_leaves_position_and_vertical_velocity() {
        let g = geometry();
        let mut c = Carrier::new(&g, -ELEMENTARY_CHARGE);
        c.velocity.y = 3.0;
        let before = c;

        Integrator::default().step(&mut c, &params(2.0, 200.0), 1234.0, &g, 0.0);

        assert_eq!(c.position, before.position);
        assert_eq!(c.velocity.y, before.velocity.y);
        assert_eq!(c.velocity.x, 200.0);
    }

    #[test]
    fn position_uses_updated_velocity() {
        let g = geometry();
        let mut c = Carrier::new(&g, -ELEMENTARY_CHARGE);
        let integrator = Integrator::new(1.0e18, 1.0);
        let p = params(1.0, 100.0);
        let dt = 0.5;

        integrator.step(&mut c, &p, 0.0, &g, dt);

        // F = q * v * B * scale = -0.1602 * 100, a = -F / m
        let a = -(-ELEMENTARY_CHARGE * 100.0 * 1.0 * 1.0e18) / 1.0;
        assert_eq!(c.velocity.y, a * dt);
        assert_eq!(c.position.y, 400.0 + a * dt * dt);
        assert_eq!(c.position.x, 100.0 + 100.0 * dt);
    }

    #[test]
    fn hall_field_opposes_magnetic_deflection() {
        let g = geometry();
        let c = Carrier {
            position: g.injection_point(),
            velocity: DVec2::new(200.0, 0.0),
            charge: -ELEMENTARY_CHARGE,
        };
        let integrator = Integrator::default();
        let p = params(2.0, 200.0);

        let magnetic_only = integrator.transverse_force(&c, &p, 0.0, &g);
        // E = -v * B balances the Lorentz force exactly
        let balanced = integrator.transverse_force(&c, &p, -200.0 * 2.0 * g.height(), &g);

        assert!(magnetic_only < 0.0);
        assert!(balanced.abs() < 1e-30);
    }

    #[test]
    fn no_field_no_deflection() {
        let g = geometry();
        let mut c = Carrier::new(&g, -ELEMENTARY_CHARGE);
        let integrator = Integrator::default();
        for _ in 0..100 {
            integrator.step(&mut c, &params(0.0, 200.0), 0.0, &g, 1.0 / 60.0);
        }
        assert_eq!(c.position.y, g.vertical_center());
        assert_eq!(c.velocity.y, 0.0);
    }
}
