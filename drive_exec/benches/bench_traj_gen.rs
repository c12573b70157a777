//! # Trajectory Generation Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drive_lib::{
    kinematics::DiffDriveKinematics,
    loc::Pose,
    traj::{generate, DiffDriveVoltageConstraint, SimpleMotorFeedforward, TrajConfig},
};
use nalgebra::Vector2;

fn traj_gen_benchmark(c: &mut Criterion) {
    // ---- Config matching the autonomous path ----

    let config = TrajConfig::new(3.0, 5.0).with_constraint(DiffDriveVoltageConstraint::new(
        SimpleMotorFeedforward::new(0.22, 2.6, 0.42),
        DiffDriveKinematics::new(0.69),
        9.0,
    ));

    c.bench_function("autonomous path", |b| {
        b.iter(|| {
            generate(
                black_box(Pose::new(0.0, 5.0, 0.0)),
                black_box(&[Vector2::new(1.0, 5.0)]),
                black_box(Pose::new(2.0, 5.0, 0.0)),
                &config,
            )
        })
    });

    // ---- A longer curved path ----

    let interior = [
        Vector2::new(2.0, 1.0),
        Vector2::new(4.0, -1.0),
        Vector2::new(6.0, 0.5),
    ];

    c.bench_function("curved path", |b| {
        b.iter(|| {
            generate(
                black_box(Pose::new(0.0, 0.0, 0.0)),
                black_box(&interior),
                black_box(Pose::new(8.0, 2.0, std::f64::consts::FRAC_PI_2)),
                &config,
            )
        })
    });
}

criterion_group!(benches, traj_gen_benchmark);
criterion_main!(benches);
