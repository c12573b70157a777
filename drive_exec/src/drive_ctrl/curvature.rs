//! Curvature ("cheesy") drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::kinematics::WheelVels;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Curvature drive transform.
///
/// With throttle the turn demand is scaled by the throttle, so the robot turns along a curvature
/// rather than at a rate and cannot oversteer at low speed. With quick turn the robot rotates in
/// place regardless of throttle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CurvatureDrive {
    pub turn_sens: f64,
    pub turn_in_place_sens: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CurvatureDrive {
    /// Calculate normalised wheel demands in `[-1, 1]`.
    ///
    /// If either side would exceed one in magnitude both are divided by the larger magnitude.
    pub fn calculate(&self, throttle: f64, turn: f64, quick_turn: bool) -> WheelVels {
        let raw = if quick_turn {
            WheelVels::new(
                turn * self.turn_in_place_sens,
                -turn * self.turn_in_place_sens,
            )
        } else {
            let angular = throttle * turn * self.turn_sens;
            WheelVels::new(throttle + angular, throttle - angular)
        };

        raw.desaturate(1.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CD: CurvatureDrive = CurvatureDrive {
        turn_sens: 0.5,
        turn_in_place_sens: 0.4,
    };

    #[test]
    fn test_curvature_formula() {
        for &(t, k) in [(0.5, 0.3), (-0.4, 0.8), (0.2, -1.0), (0.01, 0.5)].iter() {
            let w = CD.calculate(t, k, false);
            assert_eq!(w.left, t + t * k * CD.turn_sens);
            assert_eq!(w.right, t - t * k * CD.turn_sens);

            // Symmetric about the throttle
            assert!(((w.left + w.right) / 2.0 - t).abs() < 1e-12);
        }
    }

    #[test]
    fn test_turn_scales_with_throttle() {
        let slow = CD.calculate(0.1, 1.0, false);
        let fast = CD.calculate(0.8, 1.0, false);

        assert!((slow.left - slow.right).abs() < (fast.left - fast.right).abs());
        assert!((CD.calculate(1e-6, 1.0, false).left - 1e-6).abs() < 1e-6);
    }

    #[test]
    fn test_quick_turn_ignores_throttle() {
        for &throttle in [0.0, 0.7, -1.0].iter() {
            let w = CD.calculate(throttle, 0.75, true);
            assert_eq!(w.left, 0.75 * CD.turn_in_place_sens);
            assert_eq!(w.right, -0.75 * CD.turn_in_place_sens);
        }
    }

    #[test]
    fn test_saturation_keeps_ratio() {
        let w = CD.calculate(1.0, 1.0, false);

        // Unsaturated would be (1.5, 0.5)
        assert!((w.left - 1.0).abs() < 1e-12);
        assert!((w.right - 1.0 / 3.0).abs() < 1e-12);
    }
}
