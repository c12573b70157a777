//! # Autonomous module
//!
//! Owns the fixed autonomous path and builds the routine which follows it. The path is generated
//! once when the [`AutoContainer`] is created by the executable, every routine shares it.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod container;
mod params;
mod routine;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use container::AutoContainer;
pub use params::AutoParams;
pub use routine::AutoRoutine;

use crate::traj::TrajGenError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AutoError {
    #[error("Could not generate the autonomous path: {0}")]
    PathGenError(#[from] TrajGenError),
}
