//! Open loop drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::*;
use crate::{input::OperatorInput, kinematics::WheelVels};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Mix throttle and turn directly into open loop efforts.
    ///
    /// With throttle the turn is scaled by the throttle. Without throttle the robot turns in
    /// place. Unlike the curvature transform the result is not desaturated, the drivetrain clamps
    /// any effort outside `[-1, 1]`.
    pub(crate) fn calc_open_loop(&self, input: &OperatorInput) -> OutputData {
        let throttle = input.throttle;
        let turn = input.turn;

        let efforts = if throttle != 0.0 {
            WheelVels::new(
                throttle + throttle * turn * self.params.turn_sens,
                throttle - throttle * turn * self.params.turn_sens,
            )
        } else {
            WheelVels::new(
                turn * self.params.turn_in_place_sens,
                -turn * self.params.turn_in_place_sens,
            )
        };

        OutputData::OpenLoop(efforts)
    }
}

#[cfg(test)]
mod test {
    use super::super::state::test::{drivetrain_params, params};
    use super::*;

    #[test]
    fn test_turn_in_place() {
        let p = params();
        let dc = DriveCtrl::new(DriveMode::OpenLoop, p.clone(), &drivetrain_params());

        let out = dc.calc_output(&OperatorInput::new(0.0, 0.5));
        assert_eq!(
            out,
            OutputData::OpenLoop(WheelVels::new(
                0.5 * p.turn_in_place_sens,
                -0.5 * p.turn_in_place_sens
            ))
        );
    }

    #[test]
    fn test_mix_with_throttle() {
        let p = params();
        let dc = DriveCtrl::new(DriveMode::OpenLoop, p.clone(), &drivetrain_params());

        let out = dc.calc_output(&OperatorInput::new(0.4, -0.5));
        assert_eq!(
            out,
            OutputData::OpenLoop(WheelVels::new(
                0.4 + 0.4 * -0.5 * p.turn_sens,
                0.4 - 0.4 * -0.5 * p.turn_sens
            ))
        );

        assert_eq!(
            dc.calc_output(&OperatorInput::new(0.0, 0.0)),
            OutputData::OpenLoop(WheelVels::new(0.0, -0.0))
        );
    }
}
