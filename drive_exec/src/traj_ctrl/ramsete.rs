//! Ramsete nonlinear tracking controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::maths::sinc;

use crate::{kinematics::ChassisVel, loc::Pose, traj::PathSample};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Ramsete controller for unicycle-like robots.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamseteController {
    /// Aggressiveness of convergence, larger values converge faster.
    ///
    /// Units: radians^2/meters^2
    pub b: f64,

    /// Damping, in `(0, 1)`.
    pub zeta: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RamseteController {
    fn default() -> Self {
        Self { b: 2.0, zeta: 0.7 }
    }
}

impl RamseteController {
    pub fn new(b: f64, zeta: f64) -> Self {
        Self { b, zeta }
    }

    /// Chassis velocity which drives `pose` towards the reference.
    pub fn calculate(&self, pose: &Pose, reference: &PathSample) -> ChassisVel {
        let (err_m, err_heading_rad) = pose.to_body_frame(&reference.pose);

        let v_ref = reference.vel_ms;
        let w_ref = reference.vel_ms * reference.curvature_m;

        let k = 2.0 * self.zeta * (w_ref.powi(2) + self.b * v_ref.powi(2)).sqrt();

        ChassisVel::new(
            v_ref * err_heading_rad.cos() + k * err_m[0],
            w_ref + k * err_heading_rad + self.b * v_ref * sinc(err_heading_rad) * err_m[1],
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reference(x: f64, y: f64, heading: f64, vel_ms: f64, curvature_m: f64) -> PathSample {
        PathSample {
            time_s: 0.0,
            pose: Pose::new(x, y, heading),
            vel_ms,
            accel_mss: 0.0,
            curvature_m,
        }
    }

    #[test]
    fn test_on_path_passes_reference() {
        let ctrl = RamseteController::default();
        let r = reference(1.0, 2.0, 0.4, 1.5, 0.5);

        let vel = ctrl.calculate(&r.pose, &r);
        assert!((vel.linear_ms - 1.5).abs() < 1e-12);
        assert!((vel.angular_rads - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_corrects_errors() {
        let ctrl = RamseteController::default();
        let r = reference(1.0, 0.0, 0.0, 1.0, 0.0);

        // Behind the reference, speed up
        let vel = ctrl.calculate(&Pose::new(0.8, 0.0, 0.0), &r);
        assert!(vel.linear_ms > 1.0);

        // Right of the reference, turn left
        let vel = ctrl.calculate(&Pose::new(1.0, -0.2, 0.0), &r);
        assert!(vel.angular_rads > 0.0);

        // Pointing left of the reference, turn right
        let vel = ctrl.calculate(&Pose::new(1.0, 0.0, 0.3), &r);
        assert!(vel.angular_rads < 0.0);
    }
}
