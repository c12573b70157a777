//! # Drive Executable Parameters
//!
//! This module provides parameters for the drive executable itself.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecParams {
    /// Target period of one control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Deadband applied to scripted throttle and turn inputs.
    pub input_deadband: f64,

    /// The executable stops after this long regardless of mode.
    ///
    /// Units: seconds
    pub max_run_time_s: f64,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{auto::AutoParams, drivetrain::DrivetrainParams};

    #[test]
    fn test_load_params_files() {
        let exec: ExecParams =
            util::params::from_str(include_str!("../../params/exec.toml")).unwrap();
        assert!(exec.cycle_period_s > 0.0);

        let dt: DrivetrainParams =
            util::params::from_str(include_str!("../../params/drivetrain.toml")).unwrap();
        assert!(dt.top_speed_ms > 0.0);

        let auto: AutoParams =
            util::params::from_str(include_str!("../../params/auto.toml")).unwrap();
        assert_eq!(auto.max_vel_ms, 3.0);
        assert_eq!(auto.max_accel_mss, 5.0);
        assert_eq!(auto.max_voltage_v, 9.0);
    }
}
