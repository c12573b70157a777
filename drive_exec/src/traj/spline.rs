//! Cubic Hermite spline fitting and sampling

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use super::TrajGenError;
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum distance between consecutive samples.
///
/// Units: meters
pub(crate) const MAX_SAMPLE_SEP_M: f64 = 0.05;

/// Maximum heading change between consecutive samples.
///
/// Units: radians
const MAX_SAMPLE_DHEADING_RAD: f64 = 0.0872;

/// End tangents are this multiple of the distance to the neighbouring point.
const END_TANGENT_SCALE: f64 = 1.2;

/// Limit on subdivisions per segment, beyond which the segment is assumed to be malformed.
const MAX_SUBDIVISIONS: usize = 5000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One cubic Hermite segment between two points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HermiteSegment {
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    t0: Vector2<f64>,
    t1: Vector2<f64>,
}

/// A point sampled from a spline.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplinePoint {
    pub pose: Pose,

    /// Signed curvature, positive turning anticlockwise.
    ///
    /// Units: 1/meters
    pub curvature_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HermiteSegment {
    fn position(&self, s: f64) -> Vector2<f64> {
        let s2 = s * s;
        let s3 = s2 * s;

        self.p0 * (2.0 * s3 - 3.0 * s2 + 1.0)
            + self.t0 * (s3 - 2.0 * s2 + s)
            + self.p1 * (-2.0 * s3 + 3.0 * s2)
            + self.t1 * (s3 - s2)
    }

    fn first_deriv(&self, s: f64) -> Vector2<f64> {
        let s2 = s * s;

        self.p0 * (6.0 * s2 - 6.0 * s)
            + self.t0 * (3.0 * s2 - 4.0 * s + 1.0)
            + self.p1 * (-6.0 * s2 + 6.0 * s)
            + self.t1 * (3.0 * s2 - 2.0 * s)
    }

    fn second_deriv(&self, s: f64) -> Vector2<f64> {
        self.p0 * (12.0 * s - 6.0)
            + self.t0 * (6.0 * s - 4.0)
            + self.p1 * (-12.0 * s + 6.0)
            + self.t1 * (6.0 * s - 2.0)
    }

    /// Pose and curvature at parameter `s` in `[0, 1]`.
    fn point(&self, s: f64) -> Result<SplinePoint, TrajGenError> {
        let pos = self.position(s);
        let d1 = self.first_deriv(s);
        let d2 = self.second_deriv(s);

        let speed_sq = d1.norm_squared();
        if speed_sq < 1e-18 {
            return Err(TrajGenError::MalformedSpline);
        }

        Ok(SplinePoint {
            pose: Pose::new(pos[0], pos[1], d1[1].atan2(d1[0])),
            curvature_m: (d1[0] * d2[1] - d1[1] * d2[0]) / speed_sq.powf(1.5),
        })
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Fit a spline through the start pose, interior points and end pose.
///
/// The end tangents follow the start and end headings. Interior tangents are parallel to the line
/// joining the neighbouring points.
pub(crate) fn fit(
    start: Pose,
    interior: &[Vector2<f64>],
    end: Pose,
) -> Result<Vec<HermiteSegment>, TrajGenError> {
    let mut points = Vec::with_capacity(interior.len() + 2);
    points.push(start.position_m);
    points.extend_from_slice(interior);
    points.push(end.position_m);

    for (i, pair) in points.windows(2).enumerate() {
        if (pair[1] - pair[0]).norm() < 1e-9 {
            return Err(TrajGenError::CoincidentPoints(i, i + 1));
        }
    }

    let n = points.len();
    let mut tangents = Vec::with_capacity(n);

    let start_scale = END_TANGENT_SCALE * (points[1] - points[0]).norm();
    tangents.push(heading_vector(start.heading_rad) * start_scale);

    for i in 1..(n - 1) {
        tangents.push((points[i + 1] - points[i - 1]) / 2.0);
    }

    let end_scale = END_TANGENT_SCALE * (points[n - 1] - points[n - 2]).norm();
    tangents.push(heading_vector(end.heading_rad) * end_scale);

    Ok((0..(n - 1))
        .map(|i| HermiteSegment {
            p0: points[i],
            p1: points[i + 1],
            t0: tangents[i],
            t1: tangents[i + 1],
        })
        .collect())
}

/// Sample the segments so consecutive points are no more than [`MAX_SAMPLE_SEP_M`] apart and
/// turn by no more than a few degrees.
pub(crate) fn sample(segments: &[HermiteSegment]) -> Result<Vec<SplinePoint>, TrajGenError> {
    let mut points = Vec::new();

    if let Some(first) = segments.first() {
        points.push(first.point(0.0)?);
    }

    for seg in segments {
        // Intervals still to check, popped from the back so they are emitted in order
        let mut stack = vec![(0.0f64, 1.0f64)];
        let mut iterations = 0;

        while let Some((s0, s1)) = stack.pop() {
            iterations += 1;
            if iterations > MAX_SUBDIVISIONS {
                return Err(TrajGenError::MalformedSpline);
            }

            let start = seg.point(s0)?;
            let end = seg.point(s1)?;

            let sep_m = start.pose.distance_to(&end.pose);
            let dheading = util::maths::wrap_angle(end.pose.heading_rad - start.pose.heading_rad);

            if sep_m > MAX_SAMPLE_SEP_M || dheading.abs() > MAX_SAMPLE_DHEADING_RAD {
                let mid = (s0 + s1) / 2.0;
                stack.push((mid, s1));
                stack.push((s0, mid));
            } else {
                points.push(end);
            }
        }
    }

    Ok(points)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn heading_vector(heading_rad: f64) -> Vector2<f64> {
    Vector2::new(heading_rad.cos(), heading_rad.sin())
}
