//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use serde::Serialize;

// Internal
use super::{CurvatureDrive, DriveMode, Params};
use crate::{
    control::{ControlUnit, CycleContext},
    drivetrain::DrivetrainParams,
    input::OperatorInput,
    kinematics::{DiffDriveKinematics, WheelVels},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Teleoperated drive control unit.
///
/// Runs until interrupted. Whatever ends it, the drivetrain is stopped exactly once.
pub struct DriveCtrl {
    pub(crate) mode: DriveMode,

    pub(crate) params: Params,

    pub(crate) curvature: CurvatureDrive,

    pub(crate) kinematics: DiffDriveKinematics,

    /// Wheel speed at full effort.
    ///
    /// Units: meters/second
    pub(crate) top_speed_ms: f64,

    /// The command sent on the last cycle.
    pub(crate) output: Option<OutputData>,

    /// Set once the end hook has run, after which no further commands are issued.
    ended: bool,
}

/// Command produced by DriveCtrl on one cycle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum OutputData {
    /// Normalised effort per side.
    OpenLoop(WheelVels),

    /// Wheel velocity demand per side.
    ///
    /// Units: meters/second
    ClosedLoop(WheelVels),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Create a new drive control unit running in the given mode.
    pub fn new(mode: DriveMode, params: Params, drivetrain: &DrivetrainParams) -> Self {
        info!("DriveCtrl created in {} mode", mode);

        Self {
            mode,
            curvature: params.curvature_drive(),
            params,
            kinematics: drivetrain.kinematics(),
            top_speed_ms: drivetrain.top_speed_ms,
            output: None,
            ended: false,
        }
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// The command sent on the most recent cycle, if any.
    pub fn output(&self) -> Option<OutputData> {
        self.output
    }

    /// Calculate the command for the given input according to the current mode.
    pub fn calc_output(&self, input: &OperatorInput) -> OutputData {
        match self.mode {
            DriveMode::OpenLoop => self.calc_open_loop(input),
            DriveMode::CheesyOpenLoop => self.calc_cheesy_open_loop(input),
            DriveMode::CheesyClosedLoop => self.calc_cheesy_closed_loop(input),
        }
    }
}

impl OutputData {
    /// Output expressed as normalised effort per side.
    pub fn effort(&self, top_speed_ms: f64) -> WheelVels {
        match self {
            OutputData::OpenLoop(w) => *w,
            OutputData::ClosedLoop(w) => w.scaled(1.0 / top_speed_ms),
        }
    }
}

impl ControlUnit for DriveCtrl {
    fn name(&self) -> &str {
        "DriveCtrl"
    }

    /// Perform cyclic processing of drive control.
    fn execute(&mut self, ctx: &mut CycleContext) {
        if self.ended {
            warn!("DriveCtrl executed after ending, command ignored");
            return;
        }

        let input = ctx.input;
        let output = self.calc_output(&input);

        match output {
            OutputData::OpenLoop(w) => ctx.drivetrain.set_open_loop(w.left, w.right),
            OutputData::ClosedLoop(w) => ctx.drivetrain.set_closed_loop(w.left, w.right),
        }

        let effort = output.effort(self.top_speed_ms);
        ctx.telemetry.put_number("drive/throttle", input.throttle);
        ctx.telemetry.put_number("drive/turn", input.turn);
        ctx.telemetry.put_number("drive/l_effort", effort.left);
        ctx.telemetry.put_number("drive/r_effort", effort.right);

        trace!("DriveCtrl output: {:?}", output);

        self.output = Some(output);
    }

    /// Teleoperated driving never finishes on its own.
    fn is_finished(&self) -> bool {
        false
    }

    fn end(&mut self, interrupted: bool, ctx: &mut CycleContext) {
        if self.ended {
            return;
        }

        ctx.drivetrain.stop();
        self.ended = true;

        info!(
            "DriveCtrl ({}) ended (interrupted: {}), drivetrain stopped",
            self.mode, interrupted
        );
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::{
        drive_ctrl::CheesyNorm,
        drivetrain::{DrivetrainCmd, SimDrivetrain},
        loc::Pose,
        telemetry::MapTelemetry,
    };

    pub(crate) fn params() -> Params {
        Params {
            turn_sens: 0.6,
            turn_in_place_sens: 0.45,
            max_turn_rate_rads: 4.0,
            cheesy_norm: CheesyNorm::Ratio,
        }
    }

    pub(crate) fn drivetrain_params() -> DrivetrainParams {
        DrivetrainParams {
            track_width_m: 0.7,
            top_speed_ms: 3.5,
            ks_v: 0.25,
            kv_vspm: 2.8,
            ka_vsspm: 0.4,
        }
    }

    const MODES: [DriveMode; 3] = [
        DriveMode::OpenLoop,
        DriveMode::CheesyOpenLoop,
        DriveMode::CheesyClosedLoop,
    ];

    #[test]
    fn test_end_stops_once() {
        for &mode in MODES.iter() {
            for &interrupted in [true, false].iter() {
                let mut dt = SimDrivetrain::new(&drivetrain_params(), Pose::default());
                let mut tm = MapTelemetry::new();
                let mut ctx = CycleContext {
                    input: OperatorInput::new(0.5, 0.2),
                    pose: Pose::default(),
                    cycle_period_s: 0.02,
                    drivetrain: &mut dt,
                    telemetry: &mut tm,
                };

                let mut dc = DriveCtrl::new(mode, params(), &drivetrain_params());
                dc.execute(&mut ctx);
                dc.execute(&mut ctx);
                dc.end(interrupted, &mut ctx);

                // Neither a second end nor a late execute may reach the drivetrain
                dc.end(interrupted, &mut ctx);
                dc.execute(&mut ctx);

                let history = dt.history();
                assert_eq!(history.len(), 3, "mode {}", mode);
                assert!(history[0].is_wheel_cmd());
                assert!(history[1].is_wheel_cmd());
                assert_eq!(history[2], DrivetrainCmd::Stop);
            }
        }
    }

    #[test]
    fn test_execute_publishes_telemetry() {
        let mut dt = SimDrivetrain::new(&drivetrain_params(), Pose::default());
        let mut tm = MapTelemetry::new();
        let mut ctx = CycleContext {
            input: OperatorInput::new(0.5, 0.0),
            pose: Pose::default(),
            cycle_period_s: 0.02,
            drivetrain: &mut dt,
            telemetry: &mut tm,
        };

        let mut dc = DriveCtrl::new(DriveMode::CheesyClosedLoop, params(), &drivetrain_params());
        dc.execute(&mut ctx);

        assert_eq!(tm.get("drive/throttle"), Some(0.5));
        assert_eq!(tm.get("drive/turn"), Some(0.0));
        assert!((tm.get("drive/l_effort").unwrap() - 0.5).abs() < 1e-12);
        assert!((tm.get("drive/r_effort").unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(
            dc.output(),
            Some(OutputData::ClosedLoop(WheelVels::new(1.75, 1.75)))
        );
    }
}
