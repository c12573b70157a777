//! Parameters structure for the autonomous container

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::traj_ctrl::RamseteController;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for autonomous path generation and tracking.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoParams {
    // ---- GENERATION ----
    /// Units: meters/second
    pub max_vel_ms: f64,

    /// Units: meters/second^2
    pub max_accel_mss: f64,

    /// Largest voltage either side of the drivetrain may need to follow the path.
    ///
    /// Units: volts
    pub max_voltage_v: f64,

    // ---- TRACKING ----
    /// Ramsete convergence gain.
    ///
    /// Units: radians^2/meters^2
    pub ramsete_b: f64,

    /// Ramsete damping.
    pub ramsete_zeta: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoParams {
    pub fn ramsete(&self) -> RamseteController {
        RamseteController::new(self.ramsete_b, self.ramsete_zeta)
    }
}
