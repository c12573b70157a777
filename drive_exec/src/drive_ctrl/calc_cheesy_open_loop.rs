//! Cheesy open loop drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;

use super::*;
use crate::{input::OperatorInput, kinematics::ChassisVel};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Convert throttle and turn into a chassis velocity, then into normalised wheel efforts.
    ///
    /// Throttle is scaled by the top speed and turn by the max turn rate. How wheel speeds beyond
    /// the top speed are handled depends on [`CheesyNorm`].
    pub(crate) fn calc_cheesy_open_loop(&self, input: &OperatorInput) -> OutputData {
        let vel = ChassisVel::new(
            input.throttle * self.top_speed_ms,
            input.turn * self.params.max_turn_rate_rads,
        );

        let speeds_ms = self.kinematics.to_wheel_vels(vel);

        let efforts = match self.params.cheesy_norm {
            CheesyNorm::Ratio => {
                let factor = (speeds_ms.max_abs() / self.top_speed_ms).max(1.0);
                speeds_ms.scaled(1.0 / self.top_speed_ms / factor)
            }
            CheesyNorm::Legacy => {
                // Computed for the log only, efforts are not divided by it
                let factor = speeds_ms.left.max(speeds_ms.right).max(1.0);
                trace!("Unapplied cheesy normalisation factor: {:.3}", factor);
                speeds_ms.scaled(1.0 / self.top_speed_ms)
            }
        };

        OutputData::OpenLoop(efforts)
    }
}
