//! Constraints applied during trajectory generation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::SimpleMotorFeedforward;
use crate::{
    kinematics::{ChassisVel, DiffDriveKinematics},
    loc::Pose,
};
use util::maths::signum_or_zero;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Acceleration bounds imposed by a constraint.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MinMaxAccel {
    /// Units: meters/second^2
    pub min_mss: f64,

    /// Units: meters/second^2
    pub max_mss: f64,
}

/// Limits chassis acceleration so that neither side of the drivetrain needs more than a given
/// voltage.
#[derive(Debug, Clone)]
pub struct DiffDriveVoltageConstraint {
    feedforward: SimpleMotorFeedforward,
    kinematics: DiffDriveKinematics,
    max_voltage_v: f64,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A limit on the motion allowed at a point on the path.
pub trait TrajConstraint {
    /// Largest linear speed allowed at this point.
    ///
    /// Units: meters/second
    fn max_velocity(&self, pose: &Pose, curvature_m: f64, vel_ms: f64) -> f64;

    /// Acceleration bounds at this point when travelling at `vel_ms`.
    fn min_max_accel(&self, pose: &Pose, curvature_m: f64, vel_ms: f64) -> MinMaxAccel;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DiffDriveVoltageConstraint {
    pub fn new(
        feedforward: SimpleMotorFeedforward,
        kinematics: DiffDriveKinematics,
        max_voltage_v: f64,
    ) -> Self {
        Self {
            feedforward,
            kinematics,
            max_voltage_v,
        }
    }
}

impl TrajConstraint for DiffDriveVoltageConstraint {
    fn max_velocity(&self, _pose: &Pose, _curvature_m: f64, _vel_ms: f64) -> f64 {
        std::f64::INFINITY
    }

    fn min_max_accel(&self, _pose: &Pose, curvature_m: f64, vel_ms: f64) -> MinMaxAccel {
        let wheels = self
            .kinematics
            .to_wheel_vels(ChassisVel::new(vel_ms, vel_ms * curvature_m));

        let max_wheel_ms = wheels.left.max(wheels.right);
        let min_wheel_ms = wheels.left.min(wheels.right);

        // The faster wheel bounds acceleration, the slower bounds deceleration
        let max_wheel_accel = self
            .feedforward
            .max_achievable_accel(self.max_voltage_v, max_wheel_ms);
        let min_wheel_accel = self
            .feedforward
            .min_achievable_accel(self.max_voltage_v, min_wheel_ms);

        // Chassis acceleration of a * (1 +- tw |k| / 2) at the outer/inner wheel
        let half_track_curv = self.kinematics.track_width_m * curvature_m.abs() / 2.0;
        let sgn = signum_or_zero(vel_ms);

        let (mut min_mss, mut max_mss) = if vel_ms == 0.0 {
            (
                min_wheel_accel / (1.0 + half_track_curv),
                max_wheel_accel / (1.0 + half_track_curv),
            )
        } else {
            (
                min_wheel_accel / (1.0 - half_track_curv * sgn),
                max_wheel_accel / (1.0 + half_track_curv * sgn),
            )
        };

        // Turning tighter than half the track width puts the inner wheel in reverse
        if self.kinematics.track_width_m / 2.0 > 1.0 / curvature_m.abs() {
            if vel_ms > 0.0 {
                min_mss = -min_mss;
            } else if vel_ms < 0.0 {
                max_mss = -max_mss;
            }
        }

        MinMaxAccel { min_mss, max_mss }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn constraint() -> DiffDriveVoltageConstraint {
        DiffDriveVoltageConstraint::new(
            SimpleMotorFeedforward::new(0.25, 2.8, 0.4),
            DiffDriveKinematics::new(0.7),
            9.0,
        )
    }

    #[test]
    fn test_straight_line() {
        let c = constraint();
        let pose = Pose::default();

        assert!(c.max_velocity(&pose, 0.0, 1.0).is_infinite());

        let at_rest = c.min_max_accel(&pose, 0.0, 0.0);
        assert!((at_rest.max_mss - 22.5).abs() < 1e-12);
        assert!((at_rest.min_mss + 22.5).abs() < 1e-12);

        let moving = c.min_max_accel(&pose, 0.0, 1.0);
        assert!((moving.max_mss - (9.0 - 0.25 - 2.8) / 0.4).abs() < 1e-12);
        assert!((moving.min_mss - (-9.0 - 0.25 - 2.8) / 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_curvature_reduces_accel() {
        let c = constraint();
        let pose = Pose::default();

        let straight = c.min_max_accel(&pose, 0.0, 1.0);
        let curved = c.min_max_accel(&pose, 1.0, 1.0);
        assert!(curved.max_mss < straight.max_mss);
        assert!(curved.min_mss <= curved.max_mss);

        // Outer wheel demand at the max chassis acceleration is exactly the cap
        let outer_ms = 1.0 + 1.0 * 0.35;
        let outer_accel = curved.max_mss * (1.0 + 0.35);
        let ff = SimpleMotorFeedforward::new(0.25, 2.8, 0.4);
        assert!((ff.calculate(outer_ms, outer_accel) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_speed() {
        let c = constraint();

        // Far beyond the free speed no acceleration is available
        let mm = c.min_max_accel(&Pose::default(), 0.0, 10.0);
        assert!(mm.max_mss < 0.0);
    }
}
