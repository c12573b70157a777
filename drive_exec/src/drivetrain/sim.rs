//! # Simulated drivetrain
//!
//! Stand-in for the motor controllers. Every command is recorded and the wheels are assumed to
//! reach the commanded speed instantly, so the pose is obtained by integrating the kinematics.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use util::maths::clamp;

use super::{Drivetrain, DrivetrainCmd, DrivetrainParams};
use crate::{
    kinematics::{DiffDriveKinematics, WheelVels},
    loc::Pose,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct SimDrivetrain {
    kinematics: DiffDriveKinematics,

    /// Wheel speed at full open-loop effort.
    ///
    /// Units: meters/second
    top_speed_ms: f64,

    /// Current wheel speeds.
    ///
    /// Units: meters/second
    wheel_vels_ms: WheelVels,

    pose: Pose,

    history: Vec<DrivetrainCmd>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimDrivetrain {
    pub fn new(params: &DrivetrainParams, initial_pose: Pose) -> Self {
        Self {
            kinematics: params.kinematics(),
            top_speed_ms: params.top_speed_ms,
            wheel_vels_ms: WheelVels::default(),
            pose: initial_pose,
            history: Vec::new(),
        }
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        let vel = self.kinematics.to_chassis_vel(self.wheel_vels_ms);

        // Midpoint heading integration
        let mid_heading_rad = self.pose.heading_rad + 0.5 * vel.angular_rads * dt_s;
        self.pose.position_m[0] += vel.linear_ms * mid_heading_rad.cos() * dt_s;
        self.pose.position_m[1] += vel.linear_ms * mid_heading_rad.sin() * dt_s;
        self.pose.heading_rad += vel.angular_rads * dt_s;

        trace!("SimDrivetrain pose: {:?}", self.pose);
    }

    /// The integrated pose of the robot.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Current wheel speeds in meters/second.
    pub fn wheel_vels_ms(&self) -> WheelVels {
        self.wheel_vels_ms
    }

    /// All commands received since creation, oldest first.
    pub fn history(&self) -> &[DrivetrainCmd] {
        &self.history
    }

    /// The most recently received command.
    pub fn last_cmd(&self) -> Option<&DrivetrainCmd> {
        self.history.last()
    }
}

impl Drivetrain for SimDrivetrain {
    fn set_open_loop(&mut self, left: f64, right: f64) {
        self.history.push(DrivetrainCmd::OpenLoop { left, right });

        self.wheel_vels_ms = WheelVels::new(
            clamp(left, -1.0, 1.0) * self.top_speed_ms,
            clamp(right, -1.0, 1.0) * self.top_speed_ms,
        );
    }

    fn set_closed_loop(&mut self, left_ms: f64, right_ms: f64) {
        self.history.push(DrivetrainCmd::ClosedLoop { left_ms, right_ms });

        self.wheel_vels_ms = WheelVels::new(
            clamp(left_ms, -self.top_speed_ms, self.top_speed_ms),
            clamp(right_ms, -self.top_speed_ms, self.top_speed_ms),
        );
    }

    fn stop(&mut self) {
        self.history.push(DrivetrainCmd::Stop);

        self.wheel_vels_ms = WheelVels::default();
    }
}
