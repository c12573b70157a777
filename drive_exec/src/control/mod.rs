//! # Control units
//!
//! A control unit is a tick-driven piece of behaviour which commands the drivetrain. Units are
//! run one at a time by the [`DrivetrainArbiter`], which calls `execute` once per cycle and calls
//! `end` synchronously when the unit finishes or loses the drivetrain to another unit.
//!
//! Every unit must leave the drivetrain in a safe state from its `end` hook, whether or not it
//! was interrupted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arbiter;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use arbiter::{DefaultUnitFactory, DrivetrainArbiter};

use crate::{drivetrain::Drivetrain, input::OperatorInput, loc::Pose, telemetry::Telemetry};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything a control unit may read or command during one cycle.
pub struct CycleContext<'a> {
    /// Deadbanded operator input for this cycle.
    pub input: OperatorInput,

    /// Latest estimate of the robot pose.
    pub pose: Pose,

    /// Period of the control loop.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    pub drivetrain: &'a mut dyn Drivetrain,

    pub telemetry: &'a mut dyn Telemetry,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

pub trait ControlUnit {
    /// Human readable name used in logs.
    fn name(&self) -> &str;

    /// Called once when the unit is granted the drivetrain, before the first `execute`.
    fn initialise(&mut self) {}

    /// Perform one cycle of processing.
    fn execute(&mut self, ctx: &mut CycleContext);

    /// True once the unit has nothing more to do.
    fn is_finished(&self) -> bool;

    /// Called when the unit finishes or is interrupted.
    ///
    /// Must be idempotent, and must only ever bring the drivetrain to rest.
    fn end(&mut self, interrupted: bool, ctx: &mut CycleContext);
}
