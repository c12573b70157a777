//! # Localisation types
//!
//! Pose representation used by the trajectory and tracking modules. Estimation itself is
//! provided by whatever sits behind the drivetrain (the simulated drivetrain integrates its own
//! commands).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use util::maths::wrap_angle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The planar pose of the robot body in the field frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position of the robot centre.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading, the angle between the robot's forward axis and the field +X axis, positive
    /// anticlockwise.
    ///
    /// Units: radians
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Pose {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Pose {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    pub fn x(&self) -> f64 {
        self.position_m[0]
    }

    pub fn y(&self) -> f64 {
        self.position_m[1]
    }

    /// Express `other` in the body frame of `self`.
    ///
    /// Returns the (forward, left) position of `other` and its heading relative to `self`,
    /// wrapped to `[-pi, pi)`.
    pub fn to_body_frame(&self, other: &Pose) -> (Vector2<f64>, f64) {
        let rot = Rotation2::new(-self.heading_rad);
        let delta = rot * (other.position_m - self.position_m);

        (delta, wrap_angle(other.heading_rad - self.heading_rad))
    }

    /// Straight line distance between the positions of two poses.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (other.position_m - self.position_m).norm()
    }
}
