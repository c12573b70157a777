//! # Trajectory control module
//!
//! Keeps the robot on a generated [`Path`](crate::traj::Path). The [`PathTracker`] control unit
//! steps through the path in time, and on each cycle the [`RamseteController`] corrects the
//! path's reference velocity for the error between the estimated pose and the reference pose.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod ramsete;
mod tracker;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use ramsete::RamseteController;
pub use tracker::PathTracker;
