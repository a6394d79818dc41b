//! Classical Hall Effect Simulation
//!
//! A single charge carrier is driven across a rectangular conductor while a
//! magnetic field pushes it toward the top or bottom wall. Every wall strike
//! adds to a charge buildup on that edge, and the imbalance sets the Hall
//! voltage whose transverse electric field acts on the next carrier. Run after
//! run the electric force grows until it cancels the magnetic force and the
//! carrier crosses the conductor undeflected.
//!
//! - [`controller::SimulationController`]: owns all state, applies commands, steps frames
//! - [`integrator::Integrator`]: semi-implicit Euler carrier kinematics
//! - [`collision`]: termination detection and deflection reporting
//! - [`feedback::FeedbackAccumulator`]: edge charge counts and the Hall voltage
//! - [`renderer`], [`equations_ui`]: wgpu/egui presentation used by the binary

pub mod constants;
pub mod config;
pub mod geometry;
pub mod params;
pub mod carrier;
pub mod integrator;
pub mod collision;
pub mod feedback;
pub mod controller;
pub mod renderer;
pub mod equations_ui;

pub use config::{ConfigError, SimulationConfig};
pub use controller::{Command, SimulationController, Snapshot};
pub use geometry::{Geometry, GeometryError};
pub use params::{RunMode, SimulationParameters};
