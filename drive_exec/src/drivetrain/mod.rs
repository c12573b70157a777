//! # Drivetrain module
//!
//! The drivetrain is the single actuator shared by every control unit. Control units never own
//! it, they are handed a mutable reference for the duration of one cycle and issue one of three
//! commands through the [`Drivetrain`] trait.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod sim;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

pub use params::DrivetrainParams;
pub use sim::SimDrivetrain;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Actuator interface of a differential drive.
pub trait Drivetrain {
    /// Command a normalised effort to each side, nominally in `[-1, 1]`.
    fn set_open_loop(&mut self, left: f64, right: f64);

    /// Command a target velocity to each side, tracked by the motor controllers.
    ///
    /// Units: meters/second
    fn set_closed_loop(&mut self, left_ms: f64, right_ms: f64);

    /// Bring both sides to rest.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A record of a single command issued to a drivetrain.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum DrivetrainCmd {
    OpenLoop { left: f64, right: f64 },
    ClosedLoop { left_ms: f64, right_ms: f64 },
    Stop,
}

impl DrivetrainCmd {
    /// True if this command moves (or may move) the wheels.
    pub fn is_wheel_cmd(&self) -> bool {
        !matches!(self, DrivetrainCmd::Stop)
    }
}
