//! # Differential drive kinematics
//!
//! Conversions between the velocity of the whole chassis and the velocities of the left and right
//! wheel groups. The conversions never clip, callers which need to respect a top speed should use
//! [`WheelVels::desaturate`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity of the chassis in its own frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChassisVel {
    /// Forward speed.
    ///
    /// Units: meters/second
    pub linear_ms: f64,

    /// Rotation rate, positive anticlockwise.
    ///
    /// Units: radians/second
    pub angular_rads: f64,
}

/// Left and right wheel group velocities, in whatever units the producer chose (meters/second or
/// normalised).
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelVels {
    pub left: f64,
    pub right: f64,
}

/// Kinematic model of a differential drive.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffDriveKinematics {
    /// Distance between the left and right wheel contact patches.
    ///
    /// Units: meters
    pub track_width_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChassisVel {
    pub fn new(linear_ms: f64, angular_rads: f64) -> Self {
        Self {
            linear_ms,
            angular_rads,
        }
    }
}

impl WheelVels {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Largest magnitude of the two wheels.
    pub fn max_abs(&self) -> f64 {
        self.left.abs().max(self.right.abs())
    }

    /// Scale both wheels by the same factor so that neither exceeds `max` in magnitude.
    ///
    /// The ratio between the wheels is preserved. Pairs already within the limit are returned
    /// unchanged.
    pub fn desaturate(self, max: f64) -> Self {
        let largest = self.max_abs();

        if largest > max && largest > 0.0 {
            let scale = max / largest;
            Self {
                left: self.left * scale,
                right: self.right * scale,
            }
        } else {
            self
        }
    }

    /// Multiply both wheels by a factor.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            left: self.left * factor,
            right: self.right * factor,
        }
    }
}

impl DiffDriveKinematics {
    pub fn new(track_width_m: f64) -> Self {
        Self { track_width_m }
    }

    /// Convert a chassis velocity into wheel velocities (meters/second).
    pub fn to_wheel_vels(&self, vel: ChassisVel) -> WheelVels {
        chassis_to_wheels(vel, self.track_width_m)
    }

    /// Convert wheel velocities (meters/second) into a chassis velocity.
    pub fn to_chassis_vel(&self, wheels: WheelVels) -> ChassisVel {
        wheels_to_chassis(wheels, self.track_width_m)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a chassis velocity into left and right wheel velocities.
///
/// A positive angular rate (anticlockwise) makes the right wheels faster than the left.
pub fn chassis_to_wheels(vel: ChassisVel, track_width_m: f64) -> WheelVels {
    let half_track_m = track_width_m / 2.0;

    WheelVels {
        left: vel.linear_ms - vel.angular_rads * half_track_m,
        right: vel.linear_ms + vel.angular_rads * half_track_m,
    }
}

/// Convert left and right wheel velocities into a chassis velocity.
pub fn wheels_to_chassis(wheels: WheelVels, track_width_m: f64) -> ChassisVel {
    ChassisVel {
        linear_ms: (wheels.left + wheels.right) / 2.0,
        angular_rads: (wheels.right - wheels.left) / track_width_m,
    }
}
