//! Run termination detection
//!
//! Checks are ordered top, bottom, right: a wall strike wins over an exit when
//! a large step satisfies both.

use glam::DVec2;

use crate::geometry::Geometry;

/// Conductor edge that collects charge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    HitTop,
    HitBottom,
    ExitedRight,
}

impl Cause {
    /// Wall that received the carrier, `None` for an exit
    pub fn wall(self) -> Option<Wall> {
        match self {
            Cause::HitTop => Some(Wall::Top),
            Cause::HitBottom => Some(Wall::Bottom),
            Cause::ExitedRight => None,
        }
    }
}

/// How a run ended and the displacement it reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Termination {
    pub cause: Cause,
    pub deflection: DVec2,
}

/// Classify a post-step carrier position; `None` while the run continues
///
/// Wall strikes report the nominal centerline-to-wall distance as their y
/// deflection, exits report the actual vertical displacement.
pub fn detect(position: DVec2, geometry: &Geometry) -> Option<Termination> {
    let half_height = geometry.height() / 2.0;

    if position.y < geometry.top() {
        Some(Termination {
            cause: Cause::HitTop,
            deflection: DVec2::new(position.x - geometry.left(), -half_height),
        })
    } else if position.y > geometry.bottom() - geometry.carrier_diameter() {
        Some(Termination {
            cause: Cause::HitBottom,
            deflection: DVec2::new(position.x - geometry.left(), half_height),
        })
    } else if position.x > geometry.right() {
        Some(Termination {
            cause: Cause::ExitedRight,
            deflection: DVec2::new(geometry.width(), position.y - geometry.vertical_center()),
        })
    } else {
        None
    }
}
