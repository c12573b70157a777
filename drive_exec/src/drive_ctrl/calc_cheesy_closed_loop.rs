//! Cheesy closed loop drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::*;
use crate::input::OperatorInput;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Curvature drive scaled to top speed and sent as wheel velocity demands.
    ///
    /// Quick turn is engaged whenever there is no throttle.
    pub(crate) fn calc_cheesy_closed_loop(&self, input: &OperatorInput) -> OutputData {
        let quick_turn = input.throttle == 0.0;

        let norm = self
            .curvature
            .calculate(input.throttle, input.turn, quick_turn);

        OutputData::ClosedLoop(norm.scaled(self.top_speed_ms))
    }
}

#[cfg(test)]
mod test {
    use super::super::state::test::{drivetrain_params, params};
    use super::*;

    #[test]
    fn test_scaled_to_top_speed() {
        let p = params();
        let dp = drivetrain_params();
        let dc = DriveCtrl::new(DriveMode::CheesyClosedLoop, p.clone(), &dp);

        for &(throttle, turn) in [(0.5, 0.2), (-0.3, -0.9), (0.0, 0.6), (1.0, 1.0)].iter() {
            let expected = p
                .curvature_drive()
                .calculate(throttle, turn, throttle == 0.0);

            match dc.calc_output(&OperatorInput::new(throttle, turn)) {
                OutputData::ClosedLoop(w) => {
                    assert!((w.left - expected.left * dp.top_speed_ms).abs() < 1e-12);
                    assert!((w.right - expected.right * dp.top_speed_ms).abs() < 1e-12);
                    assert!(w.max_abs() <= dp.top_speed_ms + 1e-12);
                }
                other => panic!("Expected closed loop output, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_quick_turn_without_throttle() {
        let p = params();
        let dp = drivetrain_params();
        let dc = DriveCtrl::new(DriveMode::CheesyClosedLoop, p.clone(), &dp);

        match dc.calc_output(&OperatorInput::new(0.0, 0.5)) {
            OutputData::ClosedLoop(w) => {
                let expected = 0.5 * p.turn_in_place_sens * dp.top_speed_ms;
                assert!((w.left - expected).abs() < 1e-12);
                assert!((w.right + expected).abs() < 1e-12);
            }
            other => panic!("Expected closed loop output, got {:?}", other),
        }
    }
}
