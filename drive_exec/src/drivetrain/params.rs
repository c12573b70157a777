//! Parameters structure for the drivetrain

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::kinematics::DiffDriveKinematics;
use crate::traj::SimpleMotorFeedforward;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Physical description of the drivetrain.
#[derive(Debug, Clone, Deserialize)]
pub struct DrivetrainParams {
    // ---- GEOMETRY ----
    /// Distance between the left and right wheel contact patches.
    ///
    /// Units: meters
    pub track_width_m: f64,

    // ---- CAPABILITIES ----
    /// Wheel speed reached at full open-loop effort.
    ///
    /// Units: meters/second
    pub top_speed_ms: f64,

    // ---- FEEDFORWARD MODEL ----
    /// Static friction voltage.
    ///
    /// Units: volts
    pub ks_v: f64,

    /// Velocity gain.
    ///
    /// Units: volts/(meters/second)
    pub kv_vspm: f64,

    /// Acceleration gain.
    ///
    /// Units: volts/(meters/second^2)
    pub ka_vsspm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DrivetrainParams {
    pub fn kinematics(&self) -> DiffDriveKinematics {
        DiffDriveKinematics::new(self.track_width_m)
    }

    pub fn feedforward(&self) -> SimpleMotorFeedforward {
        SimpleMotorFeedforward::new(self.ks_v, self.kv_vspm, self.ka_vsspm)
    }
}
