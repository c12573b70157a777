//! Path tracking control unit

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info, trace};
use std::sync::Arc;

use super::RamseteController;
use crate::{
    control::{ControlUnit, CycleContext},
    kinematics::DiffDriveKinematics,
    traj::Path,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Follows a path by time, sending closed-loop wheel velocities.
///
/// Finishes once the path's duration has elapsed. Ending the tracker sends nothing to the
/// drivetrain, the last wheel velocities remain commanded.
pub struct PathTracker {
    path: Arc<Path>,

    controller: RamseteController,

    kinematics: DiffDriveKinematics,

    /// Units: meters/second
    top_speed_ms: f64,

    /// Time along the path of the next reference.
    ///
    /// Units: seconds
    path_time_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathTracker {
    pub fn new(
        path: Arc<Path>,
        controller: RamseteController,
        kinematics: DiffDriveKinematics,
        top_speed_ms: f64,
    ) -> Self {
        Self {
            path,
            controller,
            kinematics,
            top_speed_ms,
            path_time_s: 0.0,
        }
    }

    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    /// Units: seconds
    pub fn path_time_s(&self) -> f64 {
        self.path_time_s
    }
}

impl ControlUnit for PathTracker {
    fn name(&self) -> &str {
        "PathTracker"
    }

    fn initialise(&mut self) {
        self.path_time_s = 0.0;

        info!(
            "Following path of {} samples lasting {:.3} s",
            self.path.samples().len(),
            self.path.total_time()
        );
    }

    fn execute(&mut self, ctx: &mut CycleContext) {
        let reference = self.path.sample(self.path_time_s);
        let vel = self.controller.calculate(&ctx.pose, &reference);

        let wheels = self
            .kinematics
            .to_wheel_vels(vel)
            .desaturate(self.top_speed_ms);

        ctx.drivetrain.set_closed_loop(wheels.left, wheels.right);

        let (err_m, err_heading_rad) = ctx.pose.to_body_frame(&reference.pose);
        ctx.telemetry.put_number("traj/path_time_s", self.path_time_s);
        ctx.telemetry.put_number("traj/long_err_m", err_m[0]);
        ctx.telemetry.put_number("traj/lat_err_m", err_m[1]);
        ctx.telemetry.put_number("traj/head_err_rad", err_heading_rad);
        ctx.telemetry.put_number("traj/l_vel_ms", wheels.left);
        ctx.telemetry.put_number("traj/r_vel_ms", wheels.right);

        trace!(
            "PathTracker t = {:.3} s, ref {:?}, demand {:?}",
            self.path_time_s,
            reference.pose,
            wheels
        );

        self.path_time_s += ctx.cycle_period_s;
    }

    fn is_finished(&self) -> bool {
        self.path_time_s > self.path.total_time()
    }

    fn end(&mut self, interrupted: bool, _ctx: &mut CycleContext) {
        debug!(
            "PathTracker ended at t = {:.3} s (interrupted: {})",
            self.path_time_s, interrupted
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        drivetrain::{DrivetrainCmd, DrivetrainParams, SimDrivetrain},
        input::OperatorInput,
        loc::Pose,
        telemetry::MapTelemetry,
        traj::{generate, TrajConfig},
    };
    use nalgebra::Vector2;

    fn drivetrain_params() -> DrivetrainParams {
        DrivetrainParams {
            track_width_m: 0.7,
            top_speed_ms: 3.5,
            ks_v: 0.25,
            kv_vspm: 2.8,
            ka_vsspm: 0.4,
        }
    }

    #[test]
    fn test_follow_straight_path() {
        let dp = drivetrain_params();
        let path = Arc::new(
            generate(
                Pose::new(0.0, 5.0, 0.0),
                &[Vector2::new(1.0, 5.0)],
                Pose::new(2.0, 5.0, 0.0),
                &TrajConfig::new(3.0, 5.0),
            )
            .unwrap(),
        );

        let mut tracker = PathTracker::new(
            path.clone(),
            RamseteController::default(),
            dp.kinematics(),
            dp.top_speed_ms,
        );
        let mut sim = SimDrivetrain::new(&dp, Pose::new(0.0, 5.0, 0.0));
        let mut tm = MapTelemetry::new();

        tracker.initialise();
        let mut cycles = 0;
        while !tracker.is_finished() {
            let pose = sim.pose();
            let mut ctx = CycleContext {
                input: OperatorInput::default(),
                pose,
                cycle_period_s: 0.02,
                drivetrain: &mut sim,
                telemetry: &mut tm,
            };
            tracker.execute(&mut ctx);
            sim.step(0.02);

            cycles += 1;
            assert!(cycles < 1000);
        }

        let end = sim.pose();
        assert!((end.x() - 2.0).abs() < 0.1);
        assert!((end.y() - 5.0).abs() < 1e-6);

        // Every command is a closed-loop one within top speed
        for cmd in sim.history() {
            match cmd {
                DrivetrainCmd::ClosedLoop { left_ms, right_ms } => {
                    assert!(left_ms.abs() <= dp.top_speed_ms + 1e-12);
                    assert!(right_ms.abs() <= dp.top_speed_ms + 1e-12);
                }
                other => panic!("Unexpected command {:?}", other),
            }
        }
    }

    #[test]
    fn test_end_commands_nothing() {
        let dp = drivetrain_params();
        let path = Arc::new(
            generate(
                Pose::new(0.0, 0.0, 0.0),
                &[],
                Pose::new(1.0, 0.0, 0.0),
                &TrajConfig::new(1.0, 1.0),
            )
            .unwrap(),
        );
        let mut tracker =
            PathTracker::new(path, RamseteController::default(), dp.kinematics(), 3.5);
        let mut sim = SimDrivetrain::new(&dp, Pose::default());
        let mut tm = MapTelemetry::new();
        let mut ctx = CycleContext {
            input: OperatorInput::default(),
            pose: Pose::default(),
            cycle_period_s: 0.02,
            drivetrain: &mut sim,
            telemetry: &mut tm,
        };

        tracker.initialise();
        tracker.execute(&mut ctx);
        tracker.end(true, &mut ctx);

        assert_eq!(sim.history().len(), 1);
    }
}
