//! # Drive library
//!
//! Motion control for a differential drive robot: teleoperated drive modes, drivetrain
//! kinematics, path generation and path following.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod auto;
pub mod control;
pub mod drive_ctrl;
pub mod drivetrain;
pub mod input;
pub mod kinematics;
pub mod loc;
pub mod params;
pub mod telemetry;
pub mod traj;
pub mod traj_ctrl;
