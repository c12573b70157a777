//! Follow-then-stop autonomous routine

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use std::sync::Arc;

use crate::{
    control::{ControlUnit, CycleContext},
    traj::Path,
    traj_ctrl::PathTracker,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Follows the autonomous path to completion, then commands zero open-loop effort.
///
/// The explicit stop is needed as the tracker leaves its last wheel velocities commanded.
pub struct AutoRoutine {
    path: Arc<Path>,

    state: RoutineState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

enum RoutineState {
    /// Following the path.
    RunPath(PathTracker),

    /// Path complete, zero effort to be commanded on the next cycle.
    ThenStop,

    Done,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoRoutine {
    pub fn new(tracker: PathTracker) -> Self {
        Self {
            path: tracker.path().clone(),
            state: RoutineState::RunPath(tracker),
        }
    }

    /// The path followed by this routine.
    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    pub fn state_name(&self) -> &'static str {
        match self.state {
            RoutineState::RunPath(_) => "RunPath",
            RoutineState::ThenStop => "ThenStop",
            RoutineState::Done => "Done",
        }
    }
}

impl ControlUnit for AutoRoutine {
    fn name(&self) -> &str {
        "AutoRoutine"
    }

    fn initialise(&mut self) {
        if let RoutineState::RunPath(tracker) = &mut self.state {
            tracker.initialise();
        }
    }

    fn execute(&mut self, ctx: &mut CycleContext) {
        match &mut self.state {
            RoutineState::RunPath(tracker) => {
                tracker.execute(ctx);

                if !tracker.is_finished() {
                    return;
                }
                tracker.end(false, ctx);
            }
            RoutineState::ThenStop => ctx.drivetrain.set_open_loop(0.0, 0.0),
            RoutineState::Done => return,
        }

        self.state = match self.state {
            RoutineState::RunPath(_) => {
                debug!("Path complete, stopping");
                RoutineState::ThenStop
            }
            _ => {
                info!("Autonomous routine complete");
                RoutineState::Done
            }
        };
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, RoutineState::Done)
    }

    fn end(&mut self, interrupted: bool, ctx: &mut CycleContext) {
        match std::mem::replace(&mut self.state, RoutineState::Done) {
            RoutineState::RunPath(mut tracker) => {
                tracker.end(interrupted, ctx);
                ctx.drivetrain.set_open_loop(0.0, 0.0);
            }
            RoutineState::ThenStop => ctx.drivetrain.set_open_loop(0.0, 0.0),
            RoutineState::Done => return,
        }

        info!("Autonomous routine ended (interrupted: {})", interrupted);
    }
}
