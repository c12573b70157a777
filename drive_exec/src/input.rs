//! # Operator input
//!
//! Throttle and turn demands from the operator. Sources are responsible for deadbanding, so the
//! values handed to control units are ready to use.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use util::{
    maths::deadband,
    script_interpreter::{Pending, ScriptError, ScriptInterpreter},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single sample of operator input.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatorInput {
    /// Forward demand, nominally in `[-1, 1]`.
    pub throttle: f64,

    /// Turn demand, nominally in `[-1, 1]`.
    pub turn: f64,
}

/// Operator input replayed from a timed script.
///
/// Each script entry holds its value until the next entry becomes active.
pub struct ScriptedInput {
    interpreter: ScriptInterpreter<OperatorInput>,
    deadband: f64,
    current: OperatorInput,
    finished: bool,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

pub trait InputSource {
    /// Read the operator input at `time_s` seconds after the start of the run.
    fn read(&mut self, time_s: f64) -> OperatorInput;

    /// True once the source has no more input to give.
    fn is_finished(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl OperatorInput {
    pub fn new(throttle: f64, turn: f64) -> Self {
        Self { throttle, turn }
    }

    /// Apply the same deadband to both axes.
    pub fn deadbanded(self, band: f64) -> Self {
        Self {
            throttle: deadband(self.throttle, band),
            turn: deadband(self.turn, band),
        }
    }
}

impl ScriptedInput {
    /// Load an input script from the given path.
    pub fn new<P: AsRef<Path>>(script_path: P, deadband: f64) -> Result<Self, ScriptError> {
        let interpreter = ScriptInterpreter::new(script_path)?;

        info!(
            "Loaded input script lasting {:.02} s with {} entries",
            interpreter.get_duration(),
            interpreter.get_num_pending()
        );

        Ok(Self::from_interpreter(interpreter, deadband))
    }

    pub fn from_interpreter(interpreter: ScriptInterpreter<OperatorInput>, deadband: f64) -> Self {
        Self {
            interpreter,
            deadband,
            current: OperatorInput::default(),
            finished: false,
        }
    }
}

impl InputSource for ScriptedInput {
    fn read(&mut self, time_s: f64) -> OperatorInput {
        match self.interpreter.get_pending(time_s) {
            Pending::Some(items) => {
                if let Some(latest) = items.last() {
                    self.current = latest.deadbanded(self.deadband);
                    debug!("New operator input at {:.3} s: {:?}", time_s, self.current);
                }
            }
            Pending::EndOfScript => {
                if !self.finished {
                    info!("End of input script reached");
                    self.finished = true;
                }
                self.current = OperatorInput::default();
            }
            Pending::None => (),
        }

        self.current
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
