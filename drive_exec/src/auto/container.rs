//! Autonomous container

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use nalgebra::Vector2;
use std::sync::Arc;

use super::{AutoError, AutoParams, AutoRoutine};
use crate::{
    drivetrain::DrivetrainParams,
    kinematics::DiffDriveKinematics,
    loc::Pose,
    traj::{self, DiffDriveVoltageConstraint, Path, TrajConfig},
    traj_ctrl::{PathTracker, RamseteController},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Holds the autonomous path for the lifetime of the executable.
pub struct AutoContainer {
    path: Arc<Path>,

    ramsete: RamseteController,

    kinematics: DiffDriveKinematics,

    /// Units: meters/second
    top_speed_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoContainer {
    /// Generate the autonomous path.
    ///
    /// The path runs from (0, 5) through (1, 5) to (2, 5), starting and ending facing +X.
    pub fn new(params: &AutoParams, drivetrain: &DrivetrainParams) -> Result<Self, AutoError> {
        let config = TrajConfig::new(params.max_vel_ms, params.max_accel_mss).with_constraint(
            DiffDriveVoltageConstraint::new(
                drivetrain.feedforward(),
                drivetrain.kinematics(),
                params.max_voltage_v,
            ),
        );

        let path = traj::generate(
            Pose::new(0.0, 5.0, 0.0),
            &[Vector2::new(1.0, 5.0)],
            Pose::new(2.0, 5.0, 0.0),
            &config,
        )?;

        info!(
            "Autonomous path generated, {} samples lasting {:.3} s",
            path.samples().len(),
            path.total_time()
        );

        Ok(Self {
            path: Arc::new(path),
            ramsete: params.ramsete(),
            kinematics: drivetrain.kinematics(),
            top_speed_ms: drivetrain.top_speed_ms,
        })
    }

    /// The autonomous path. Every call returns the same allocation.
    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    /// Build a routine which follows the path and then stops the drivetrain.
    pub fn autonomous_routine(&self) -> AutoRoutine {
        AutoRoutine::new(PathTracker::new(
            self.path.clone(),
            self.ramsete,
            self.kinematics,
            self.top_speed_ms,
        ))
    }
}
