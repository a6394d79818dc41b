//! Conductor geometry
//!
//! Scene coordinates follow the screen: x grows to the right, y grows downward,
//! so the conductor's top wall has the smallest y.

use glam::DVec2;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("conductor width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("conductor height must be positive and finite, got {0}")]
    InvalidHeight(f64),
    #[error("carrier radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("carrier radius {radius} does not fit in conductor of height {height}")]
    CarrierTooLarge { radius: f64, height: f64 },
    #[error("conductor origin must be finite")]
    InvalidOrigin,
}

/// Conductor rectangle and carrier size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    origin: DVec2,
    width: f64,
    height: f64,
    carrier_radius: f64,
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Geometry {
    pub fn new(
        origin: DVec2,
        width: f64,
        height: f64,
        carrier_radius: f64,
    ) -> Result<Self, GeometryError> {
        if !origin.is_finite() {
            return Err(GeometryError::InvalidOrigin);
        }
        if !positive(width) {
            return Err(GeometryError::InvalidWidth(width));
        }
        if !positive(height) {
            return Err(GeometryError::InvalidHeight(height));
        }
        if !positive(carrier_radius) {
            return Err(GeometryError::InvalidRadius(carrier_radius));
        }
        if carrier_radius >= height / 2.0 {
            return Err(GeometryError::CarrierTooLarge {
                radius: carrier_radius,
                height,
            });
        }

        Ok(Self {
            origin,
            width,
            height,
            carrier_radius,
        })
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn carrier_radius(&self) -> f64 {
        self.carrier_radius
    }

    pub fn carrier_diameter(&self) -> f64 {
        2.0 * self.carrier_radius
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.height
    }

    pub fn vertical_center(&self) -> f64 {
        self.origin.y + self.height / 2.0
    }

    /// Where every run starts: left edge, on the centerline
    pub fn injection_point(&self) -> DVec2 {
        DVec2::new(self.left(), self.vertical_center())
    }

    /// Whether a carrier anchored at `position` lies fully inside the conductor
    pub fn contains(&self, position: DVec2) -> bool {
        position.x >= self.left()
            && position.x <= self.right()
            && position.y >= self.top()
            && position.y <= self.bottom() - self.carrier_diameter()
    }
}
