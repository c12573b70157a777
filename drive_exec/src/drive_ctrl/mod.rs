//! Drive control module
//!
//! Converts operator throttle and turn demands into drivetrain commands. The conversion used is
//! fixed by the [`DriveMode`] chosen when the [`DriveCtrl`] unit is built; switching modes means
//! building a new unit and letting it claim the drivetrain.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_cheesy_closed_loop;
mod calc_cheesy_open_loop;
mod calc_open_loop;
mod curvature;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::{fmt, str::FromStr};

// Internal
pub use curvature::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The ways operator input can be turned into drivetrain commands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriveMode {
    /// Direct throttle/turn mix sent as open-loop effort, turning in place when there is no
    /// throttle.
    OpenLoop,

    /// Chassis velocity from throttle and turn, converted through the kinematics and sent as
    /// open-loop effort.
    CheesyOpenLoop,

    /// Curvature drive scaled to top speed and sent as closed-loop wheel velocities.
    CheesyClosedLoop,
}

/// Possible errors that can occur during DriveCtrl setup.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error(
        "Unknown drive mode \"{0}\", expected one of open-loop, cheesy-open-loop, \
        cheesy-closed-loop"
    )]
    UnknownMode(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FromStr for DriveMode {
    type Err = DriveCtrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open-loop" => Ok(DriveMode::OpenLoop),
            "cheesy-open-loop" => Ok(DriveMode::CheesyOpenLoop),
            "cheesy-closed-loop" => Ok(DriveMode::CheesyClosedLoop),
            _ => Err(DriveCtrlError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriveMode::OpenLoop => "open-loop",
            DriveMode::CheesyOpenLoop => "cheesy-open-loop",
            DriveMode::CheesyClosedLoop => "cheesy-closed-loop",
        };
        write!(f, "{}", s)
    }
}
