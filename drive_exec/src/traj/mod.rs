//! # Trajectory generation
//!
//! Builds a time parameterised [`Path`] through a start pose, a list of interior positions and an
//! end pose. Generation happens in three stages:
//!
//! 1. A cubic Hermite spline is fitted through the points ([`spline`]).
//! 2. The spline is sampled so that consecutive samples are close together.
//! 3. The samples are given velocities, accelerations and times by a forward/backward pass over
//!    the velocity, acceleration and constraint limits ([`parameteriser`]).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod constraint;
mod feedforward;
mod parameteriser;
mod path;
mod spline;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use nalgebra::Vector2;

use crate::loc::Pose;

pub use constraint::{DiffDriveVoltageConstraint, MinMaxAccel, TrajConstraint};
pub use feedforward::SimpleMotorFeedforward;
pub use path::{Path, PathSample};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Limits applied while generating a path.
pub struct TrajConfig {
    /// Maximum linear speed anywhere on the path.
    ///
    /// Units: meters/second
    pub max_vel_ms: f64,

    /// Maximum magnitude of linear acceleration anywhere on the path.
    ///
    /// Units: meters/second^2
    pub max_accel_mss: f64,

    /// Units: meters/second
    pub start_vel_ms: f64,

    /// Units: meters/second
    pub end_vel_ms: f64,

    /// Additional limits, all of which must hold at every sample.
    pub constraints: Vec<Box<dyn TrajConstraint>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TrajGenError {
    #[error("No velocity profile satisfies the path constraints: {0}")]
    PathInfeasible(String),

    #[error("Consecutive path points {0} and {1} are coincident")]
    CoincidentPoints(usize, usize),

    #[error("The spline could not be sampled finely enough, it may contain a cusp")]
    MalformedSpline,

    #[error("Invalid generation config: {0}")]
    InvalidConfig(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajConfig {
    /// New config starting and ending at rest with no additional constraints.
    pub fn new(max_vel_ms: f64, max_accel_mss: f64) -> Self {
        Self {
            max_vel_ms,
            max_accel_mss,
            start_vel_ms: 0.0,
            end_vel_ms: 0.0,
            constraints: Vec::new(),
        }
    }

    /// Add a constraint to the config.
    pub fn with_constraint<C: TrajConstraint + 'static>(mut self, constraint: C) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    fn validate(&self) -> Result<(), TrajGenError> {
        if !(self.max_vel_ms > 0.0) || !self.max_vel_ms.is_finite() {
            return Err(TrajGenError::InvalidConfig(format!(
                "max velocity must be positive and finite, got {}",
                self.max_vel_ms
            )));
        }
        if !(self.max_accel_mss > 0.0) || !self.max_accel_mss.is_finite() {
            return Err(TrajGenError::InvalidConfig(format!(
                "max acceleration must be positive and finite, got {}",
                self.max_accel_mss
            )));
        }
        if self.start_vel_ms < 0.0 || self.end_vel_ms < 0.0 {
            return Err(TrajGenError::InvalidConfig(
                "start and end velocities cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Generate a path from `start` through each of the `interior` positions to `end`.
pub fn generate(
    start: Pose,
    interior: &[Vector2<f64>],
    end: Pose,
    config: &TrajConfig,
) -> Result<Path, TrajGenError> {
    config.validate()?;

    let segments = spline::fit(start, interior, end)?;
    let points = spline::sample(&segments)?;

    debug!(
        "Spline fitted with {} segments, sampled at {} points",
        segments.len(),
        points.len()
    );

    let path = parameteriser::parameterise(&points, config)?;

    debug!(
        "Path generated: {} samples lasting {:.3} s",
        path.samples().len(),
        path.total_time()
    );

    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;

    fn voltage_config() -> TrajConfig {
        TrajConfig::new(3.0, 5.0).with_constraint(DiffDriveVoltageConstraint::new(
            SimpleMotorFeedforward::new(0.25, 2.8, 0.4),
            crate::kinematics::DiffDriveKinematics::new(0.7),
            9.0,
        ))
    }

    #[test]
    fn test_straight_path() {
        let path = generate(
            Pose::new(0.0, 5.0, 0.0),
            &[Vector2::new(1.0, 5.0)],
            Pose::new(2.0, 5.0, 0.0),
            &voltage_config(),
        )
        .unwrap();

        let samples = path.samples();
        assert_eq!(samples[0].time_s, 0.0);
        for pair in samples.windows(2) {
            assert!(pair[1].time_s > pair[0].time_s);
            assert!((pair[1].pose.distance_to(&pair[0].pose)) <= spline::MAX_SAMPLE_SEP_M + 1e-9);
        }

        // Starts and ends at rest, never exceeds the limits
        assert_eq!(samples[0].vel_ms, 0.0);
        assert!(samples.last().unwrap().vel_ms.abs() < 1e-9);
        for s in samples {
            assert!(s.vel_ms <= 3.0 + 1e-9);
            assert!(s.accel_mss.abs() <= 5.0 + 1e-6);
            assert!((s.pose.y() - 5.0).abs() < 1e-9);
            assert!(s.curvature_m.abs() < 1e-9);
        }

        // Ends on the end pose
        let last = samples.last().unwrap();
        assert!((last.pose.x() - 2.0).abs() < 1e-9);

        // 2 m at 5 m/s^2 cannot be covered faster than a pure accel/decel profile
        assert!(path.total_time() >= 2.0 * (1.0f64 / 5.0 * 2.0).sqrt() - 1e-9);
    }

    #[test]
    fn test_curved_path() {
        let path = generate(
            Pose::new(0.0, 0.0, 0.0),
            &[Vector2::new(1.0, 0.5)],
            Pose::new(2.0, 1.0, std::f64::consts::FRAC_PI_2),
            &voltage_config(),
        )
        .unwrap();

        let samples = path.samples();
        for pair in samples.windows(2) {
            assert!(pair[1].time_s > pair[0].time_s);
        }
        assert!(samples.iter().any(|s| s.curvature_m.abs() > 0.1));

        let last = samples.last().unwrap();
        assert!((last.pose.heading_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config() {
        let res = generate(
            Pose::new(0.0, 0.0, 0.0),
            &[],
            Pose::new(1.0, 0.0, 0.0),
            &TrajConfig::new(0.0, 1.0),
        );
        assert!(matches!(res, Err(TrajGenError::InvalidConfig(_))));
    }

    #[test]
    fn test_coincident_points() {
        let res = generate(
            Pose::new(0.0, 0.0, 0.0),
            &[Vector2::new(0.0, 0.0)],
            Pose::new(1.0, 0.0, 0.0),
            &TrajConfig::new(1.0, 1.0),
        );
        assert!(matches!(res, Err(TrajGenError::CoincidentPoints(0, 1))));
    }

    #[test]
    fn test_unreachable_voltage() {
        // With no voltage available the robot can never start moving
        let config = TrajConfig::new(3.0, 5.0).with_constraint(DiffDriveVoltageConstraint::new(
            SimpleMotorFeedforward::new(0.25, 2.8, 0.4),
            crate::kinematics::DiffDriveKinematics::new(0.7),
            0.0,
        ));

        let res = generate(
            Pose::new(0.0, 0.0, 0.0),
            &[],
            Pose::new(1.0, 0.0, 0.0),
            &config,
        );
        assert!(matches!(res, Err(TrajGenError::PathInfeasible(_))));
    }

    #[test]
    fn test_hairpin_infeasible() {
        // Gains from drivetrain.toml. The turn is too tight to brake through on 9 V.
        let config = TrajConfig::new(3.0, 5.0).with_constraint(DiffDriveVoltageConstraint::new(
            SimpleMotorFeedforward::new(0.22, 2.6, 0.42),
            crate::kinematics::DiffDriveKinematics::new(0.69),
            9.0,
        ));

        let res = generate(
            Pose::new(0.0, 0.0, 0.0),
            &[Vector2::new(0.2, 0.3)],
            Pose::new(0.0, 0.4, 3.0),
            &config,
        );
        assert!(matches!(res, Err(TrajGenError::PathInfeasible(_))));
    }
}
