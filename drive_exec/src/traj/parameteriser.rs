//! Time parameterisation of sampled splines
//!
//! A forward pass limits each sample's velocity by how fast the robot can accelerate into it, a
//! backward pass by how fast it can decelerate out of it. Times are then integrated assuming
//! constant acceleration between samples.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{spline::SplinePoint, Path, PathSample, TrajConfig, TrajGenError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct ConstrainedState {
    point: SplinePoint,

    /// Distance along the path.
    ///
    /// Units: meters
    distance_m: f64,

    max_vel_ms: f64,

    min_accel_mss: f64,

    max_accel_mss: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Assign velocities, accelerations and times to the sampled points.
pub(crate) fn parameterise(
    points: &[SplinePoint],
    config: &TrajConfig,
) -> Result<Path, TrajGenError> {
    let first = match points.first() {
        Some(p) => *p,
        None => {
            return Err(TrajGenError::PathInfeasible(
                "the spline produced no points".into(),
            ))
        }
    };

    let mut states: Vec<ConstrainedState> = Vec::with_capacity(points.len());

    // ---- FORWARD PASS ----

    let start = ConstrainedState {
        point: first,
        distance_m: 0.0,
        max_vel_ms: config.start_vel_ms,
        min_accel_mss: -config.max_accel_mss,
        max_accel_mss: config.max_accel_mss,
    };

    for (i, point) in points.iter().enumerate() {
        let pred = match i {
            0 => start,
            _ => states[i - 1],
        };

        let ds = point.pose.distance_to(&pred.point.pose);

        let mut state = ConstrainedState {
            point: *point,
            distance_m: pred.distance_m + ds,
            max_vel_ms: 0.0,
            min_accel_mss: 0.0,
            max_accel_mss: 0.0,
        };

        // The predecessor's max acceleration may be lowered while iterating, so keep a local copy
        let mut pred_max_accel = pred.max_accel_mss;

        loop {
            // v^2 = u^2 + 2as
            state.max_vel_ms = config
                .max_vel_ms
                .min((pred.max_vel_ms.powi(2) + 2.0 * pred_max_accel * ds).max(0.0).sqrt());
            state.min_accel_mss = -config.max_accel_mss;
            state.max_accel_mss = config.max_accel_mss;

            for c in config.constraints.iter() {
                state.max_vel_ms = state.max_vel_ms.min(c.max_velocity(
                    &state.point.pose,
                    state.point.curvature_m,
                    state.max_vel_ms,
                ));
            }

            enforce_accel_limits(&mut state, config)?;

            if ds < EPSILON {
                break;
            }

            let actual_accel = (state.max_vel_ms.powi(2) - pred.max_vel_ms.powi(2)) / (2.0 * ds);

            if state.max_accel_mss < actual_accel - EPSILON {
                // This state cannot support the acceleration into it, retry with a lower
                // predecessor acceleration
                pred_max_accel = state.max_accel_mss;
            } else {
                if actual_accel > pred.min_accel_mss {
                    pred_max_accel = actual_accel;
                }
                break;
            }
        }

        if i > 0 {
            states[i - 1].max_accel_mss = pred_max_accel;
        }

        states.push(state);
    }

    // ---- BACKWARD PASS ----

    let last = states.len() - 1;
    let end = ConstrainedState {
        point: states[last].point,
        distance_m: states[last].distance_m,
        max_vel_ms: config.end_vel_ms,
        min_accel_mss: -config.max_accel_mss,
        max_accel_mss: config.max_accel_mss,
    };

    for i in (0..states.len()).rev() {
        let succ = if i == last { end } else { states[i + 1] };

        // Negative, the successor is further along
        let ds = states[i].distance_m - succ.distance_m;
        let mut succ_min_accel = succ.min_accel_mss;

        loop {
            let new_max_vel = (succ.max_vel_ms.powi(2) + 2.0 * succ_min_accel * ds)
                .max(0.0)
                .sqrt();

            // Only ever lower velocities on the way back
            if !(new_max_vel < states[i].max_vel_ms) {
                break;
            }

            states[i].max_vel_ms = new_max_vel;
            enforce_accel_limits(&mut states[i], config)?;

            if ds > -EPSILON {
                break;
            }

            let actual_accel =
                (states[i].max_vel_ms.powi(2) - succ.max_vel_ms.powi(2)) / (2.0 * ds);

            if states[i].min_accel_mss > actual_accel + EPSILON {
                succ_min_accel = states[i].min_accel_mss;
            } else {
                succ_min_accel = actual_accel;
                break;
            }
        }

        if i != last {
            states[i + 1].min_accel_mss = succ_min_accel;
        }
    }

    // ---- TIME INTEGRATION ----

    let mut samples: Vec<PathSample> = Vec::with_capacity(states.len());
    let mut time_s: f64 = 0.0;
    let mut distance_m: f64 = 0.0;
    let mut vel_ms: f64 = 0.0;

    for (i, state) in states.iter().enumerate() {
        let ds = state.distance_m - distance_m;

        if i > 0 {
            let accel = (state.max_vel_ms.powi(2) - vel_ms.powi(2)) / (2.0 * ds);

            let dt = if accel.abs() > EPSILON {
                (state.max_vel_ms - vel_ms) / accel
            } else if vel_ms.abs() > EPSILON {
                ds / vel_ms
            } else {
                return Err(TrajGenError::PathInfeasible(format!(
                    "the robot stalls {:.3} m along the path",
                    state.distance_m
                )));
            };

            if !(dt > 0.0) || !dt.is_finite() {
                return Err(TrajGenError::PathInfeasible(format!(
                    "invalid time step {} s {:.3} m along the path",
                    dt, state.distance_m
                )));
            }

            samples[i - 1].accel_mss = accel;
            time_s += dt;
        }

        vel_ms = state.max_vel_ms;
        distance_m = state.distance_m;

        samples.push(PathSample {
            time_s,
            pose: state.point.pose,
            vel_ms,
            accel_mss: 0.0,
            curvature_m: state.point.curvature_m,
        });
    }

    Path::from_samples(samples)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Tighten the state's acceleration bounds with every constraint in the config.
fn enforce_accel_limits(
    state: &mut ConstrainedState,
    config: &TrajConfig,
) -> Result<(), TrajGenError> {
    for c in config.constraints.iter() {
        let mm = c.min_max_accel(
            &state.point.pose,
            state.point.curvature_m,
            state.max_vel_ms,
        );

        if mm.min_mss > mm.max_mss {
            return Err(TrajGenError::PathInfeasible(format!(
                "a constraint's minimum acceleration ({:.3} m/s^2) exceeds its maximum \
                 ({:.3} m/s^2) {:.3} m along the path",
                mm.min_mss, mm.max_mss, state.distance_m
            )));
        }

        state.min_accel_mss = state.min_accel_mss.max(mm.min_mss);
        state.max_accel_mss = state.max_accel_mss.min(mm.max_mss);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        loc::Pose,
        traj::{MinMaxAccel, TrajConstraint},
    };

    fn straight_points(length_m: f64, n: usize) -> Vec<SplinePoint> {
        (0..=n)
            .map(|i| SplinePoint {
                pose: Pose::new(length_m * i as f64 / n as f64, 0.0, 0.0),
                curvature_m: 0.0,
            })
            .collect()
    }

    /// Caps speed in the second half of the path.
    struct SlowZone;

    impl TrajConstraint for SlowZone {
        fn max_velocity(&self, pose: &Pose, _curvature_m: f64, _vel_ms: f64) -> f64 {
            if pose.x() > 5.0 {
                0.5
            } else {
                std::f64::INFINITY
            }
        }

        fn min_max_accel(&self, _pose: &Pose, _curvature_m: f64, _vel_ms: f64) -> MinMaxAccel {
            MinMaxAccel {
                min_mss: std::f64::NEG_INFINITY,
                max_mss: std::f64::INFINITY,
            }
        }
    }

    /// Has no valid acceleration anywhere.
    struct Contradiction;

    impl TrajConstraint for Contradiction {
        fn max_velocity(&self, _pose: &Pose, _curvature_m: f64, _vel_ms: f64) -> f64 {
            std::f64::INFINITY
        }

        fn min_max_accel(&self, _pose: &Pose, _curvature_m: f64, _vel_ms: f64) -> MinMaxAccel {
            MinMaxAccel {
                min_mss: 1.0,
                max_mss: -1.0,
            }
        }
    }

    #[test]
    fn test_trapezoid() {
        let config = TrajConfig::new(1.0, 1.0);
        let path = parameterise(&straight_points(4.0, 400), &config).unwrap();

        // 1 s to accelerate over 0.5 m, 3 m of cruise, 1 s to decelerate
        assert!((path.total_time() - 5.0).abs() < 0.01);
        assert!((path.sample(2.5).vel_ms - 1.0).abs() < 1e-6);

        let samples = path.samples();
        assert_eq!(samples[0].vel_ms, 0.0);
        assert_eq!(samples[samples.len() - 1].vel_ms, 0.0);

        assert_eq!(samples[0].time_s, 0.0);
        for pair in samples.windows(2) {
            assert!(pair[1].time_s > pair[0].time_s);
            assert!(pair[1].accel_mss.abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_constraint_limits_speed() {
        let config = TrajConfig::new(2.0, 1.0).with_constraint(SlowZone);
        let path = parameterise(&straight_points(10.0, 500), &config).unwrap();

        for s in path.samples() {
            if s.pose.x() > 5.0 {
                assert!(s.vel_ms <= 0.5 + 1e-9);
            }
            assert!(s.accel_mss.abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_infeasible_constraint() {
        let config = TrajConfig::new(1.0, 1.0).with_constraint(Contradiction);
        let res = parameterise(&straight_points(1.0, 10), &config);

        match res {
            Err(TrajGenError::PathInfeasible(msg)) => assert!(msg.contains("minimum acceleration")),
            _ => panic!("expected PathInfeasible"),
        }
    }
}
