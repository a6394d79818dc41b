//! Default simulation constants
//!
//! Lengths are in pixels of the scene, time in seconds. The force scaling is a
//! presentation constant that makes otherwise imperceptible forces visible.

/// Conductor top-left corner
pub const CONDUCTOR_X: f64 = 100.0;
pub const CONDUCTOR_Y: f64 = 200.0;

/// Conductor size
pub const CONDUCTOR_WIDTH: f64 = 1000.0;
pub const CONDUCTOR_HEIGHT: f64 = 400.0;

/// Carrier radius
pub const CARRIER_RADIUS: f64 = 5.0;

/// Carrier mass (unit)
pub const CARRIER_MASS: f64 = 1.0;

/// Elementary charge magnitude
pub const ELEMENTARY_CHARGE: f64 = 1.602e-19;

/// Amplifies Lorentz and electric forces to on-screen scale
pub const FORCE_SCALING_FACTOR: f64 = 1.5e18;

/// Carriers added to an edge per wall strike ("effective carrier density")
pub const CARRIER_INCREASE_RATE: u64 = 50;

/// Hall voltage per unit of edge imbalance; equals B * I at the default operating point
pub const VOLTAGE_SCALE: f64 = 400.0;

/// Initial magnetic field B
pub const INITIAL_MAGNETIC_FIELD: f64 = 2.0;

/// Initial drive-current factor I
pub const INITIAL_CURRENT_FACTOR: f64 = 200.0;

/// Lowest allowed drive-current factor
pub const MIN_CURRENT_FACTOR: f64 = 0.1;
