//! Time parameterised path

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::TrajGenError;
use crate::loc::Pose;
use util::maths::wrap_angle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path through the field with a time, velocity and acceleration at every sample.
///
/// The first sample is at time zero and sample times strictly increase. Paths are immutable once
/// built.
#[derive(Debug, Clone, Serialize)]
pub struct Path {
    samples: Vec<PathSample>,
}

/// A single point of a path.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PathSample {
    /// Time since the start of the path.
    ///
    /// Units: seconds
    pub time_s: f64,

    pub pose: Pose,

    /// Units: meters/second
    pub vel_ms: f64,

    /// Acceleration held from this sample until the next.
    ///
    /// Units: meters/second^2
    pub accel_mss: f64,

    /// Units: 1/meters
    pub curvature_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Build a path from samples, checking the timing invariants.
    pub(crate) fn from_samples(samples: Vec<PathSample>) -> Result<Self, TrajGenError> {
        match samples.first() {
            None => {
                return Err(TrajGenError::PathInfeasible(
                    "the path contains no samples".into(),
                ))
            }
            Some(first) if first.time_s != 0.0 => {
                return Err(TrajGenError::PathInfeasible(format!(
                    "the first sample is at {} s rather than 0 s",
                    first.time_s
                )))
            }
            _ => (),
        }

        for (i, pair) in samples.windows(2).enumerate() {
            if !(pair[1].time_s > pair[0].time_s) {
                return Err(TrajGenError::PathInfeasible(format!(
                    "sample {} is not later than sample {}",
                    i + 1,
                    i
                )));
            }
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    /// Duration of the path.
    ///
    /// Units: seconds
    pub fn total_time(&self) -> f64 {
        self.samples.last().map(|s| s.time_s).unwrap_or(0.0)
    }

    pub fn start(&self) -> Option<&PathSample> {
        self.samples.first()
    }

    pub fn end(&self) -> Option<&PathSample> {
        self.samples.last()
    }

    /// Sample the path at `time_s` seconds from its start.
    ///
    /// Times before the start or after the end are clamped to the first or last sample.
    pub fn sample(&self, time_s: f64) -> PathSample {
        let first = self.samples[0];
        let last = self.samples[self.samples.len() - 1];

        if time_s <= first.time_s {
            return first;
        }
        if time_s >= last.time_s {
            return last;
        }

        // Index of the first sample later than time_s, always in 1..len
        let idx = self.samples.partition_point(|s| s.time_s <= time_s);
        let prev = &self.samples[idx - 1];
        let next = &self.samples[idx];

        let dt = time_s - prev.time_s;
        let frac = dt / (next.time_s - prev.time_s);

        let position_m = prev.pose.position_m + (next.pose.position_m - prev.pose.position_m) * frac;
        let heading_rad =
            prev.pose.heading_rad + wrap_angle(next.pose.heading_rad - prev.pose.heading_rad) * frac;

        PathSample {
            time_s,
            pose: Pose {
                position_m,
                heading_rad: wrap_angle(heading_rad),
            },
            vel_ms: prev.vel_ms + prev.accel_mss * dt,
            accel_mss: prev.accel_mss,
            curvature_m: prev.curvature_m + (next.curvature_m - prev.curvature_m) * frac,
        }
    }
}
