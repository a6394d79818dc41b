//! The single simulated charge carrier

use glam::DVec2;

use crate::geometry::Geometry;

/// Carrier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Electron-like
    #[default]
    Negative,
    /// Hole-like
    Positive,
}

impl Polarity {
    pub fn sign(self) -> f64 {
        match self {
            Polarity::Negative => -1.0,
            Polarity::Positive => 1.0,
        }
    }

    pub fn is_negative(self) -> bool {
        self == Polarity::Negative
    }

    pub fn flipped(self) -> Self {
        match self {
            Polarity::Negative => Polarity::Positive,
            Polarity::Positive => Polarity::Negative,
        }
    }

    /// Signed charge for a carrier of this type
    pub fn charge(self, magnitude: f64) -> f64 {
        self.sign() * magnitude.abs()
    }

    /// Display color: cyan for electrons, red for holes
    pub fn color(self) -> [f32; 4] {
        match self {
            Polarity::Negative => [0.0, 1.0, 1.0, 1.0],
            Polarity::Positive => [1.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Polarity::Negative => "Electrons (-)",
            Polarity::Positive => "Holes (+)",
        }
    }
}

/// Position is the carrier's top-left anchor; its far edge along y sits one
/// diameter below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carrier {
    pub position: DVec2,
    pub velocity: DVec2,
    pub charge: f64,
}

impl Carrier {
    /// New carrier at the injection point, at rest
    pub fn new(geometry: &Geometry, charge: f64) -> Self {
        Self {
            position: geometry.injection_point(),
            velocity: DVec2::ZERO,
            charge,
        }
    }

    /// Back to the injection point at rest; the charge is kept
    pub fn reset(&mut self, geometry: &Geometry) {
        self.position = geometry.injection_point();
        self.velocity = DVec2::ZERO;
    }

    /// Center of the carrier disc, for drawing
    pub fn center(&self, geometry: &Geometry) -> DVec2 {
        self.position + DVec2::splat(geometry.carrier_radius())
    }
}

/// Give `carrier` the charge sign of `polarity`, keeping its magnitude
pub fn apply_polarity(carrier: &mut Carrier, polarity: Polarity) {
    carrier.charge = polarity.charge(carrier.charge);
}
