//! Simple DC motor feedforward model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::maths::signum_or_zero;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Feedforward model of one side of the drivetrain, `V = ks sgn(v) + kv v + ka a`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleMotorFeedforward {
    /// Units: volts
    pub ks: f64,

    /// Units: volts/(meters/second)
    pub kv: f64,

    /// Units: volts/(meters/second^2)
    pub ka: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimpleMotorFeedforward {
    pub fn new(ks: f64, kv: f64, ka: f64) -> Self {
        Self { ks, kv, ka }
    }

    /// Voltage needed to hold velocity `vel_ms` while accelerating at `accel_mss`.
    pub fn calculate(&self, vel_ms: f64, accel_mss: f64) -> f64 {
        self.ks * signum_or_zero(vel_ms) + self.kv * vel_ms + self.ka * accel_mss
    }

    /// Largest acceleration reachable at `vel_ms` with at most `max_voltage_v` applied.
    pub fn max_achievable_accel(&self, max_voltage_v: f64, vel_ms: f64) -> f64 {
        (max_voltage_v - self.ks * signum_or_zero(vel_ms) - self.kv * vel_ms) / self.ka
    }

    /// Smallest (most negative) acceleration reachable at `vel_ms` with at most `max_voltage_v`
    /// applied.
    pub fn min_achievable_accel(&self, max_voltage_v: f64, vel_ms: f64) -> f64 {
        self.max_achievable_accel(-max_voltage_v, vel_ms)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FF: SimpleMotorFeedforward = SimpleMotorFeedforward {
        ks: 0.25,
        kv: 2.8,
        ka: 0.4,
    };

    #[test]
    fn test_calculate() {
        assert_eq!(FF.calculate(0.0, 0.0), 0.0);
        assert!((FF.calculate(1.0, 2.0) - (0.25 + 2.8 + 0.8)).abs() < 1e-12);
        assert!((FF.calculate(-1.0, 0.0) + 0.25 + 2.8).abs() < 1e-12);
    }

    #[test]
    fn test_achievable_accel() {
        // At rest the static term is not applied
        assert!((FF.max_achievable_accel(9.0, 0.0) - 22.5).abs() < 1e-12);
        assert!((FF.min_achievable_accel(9.0, 0.0) + 22.5).abs() < 1e-12);

        assert!((FF.max_achievable_accel(9.0, 1.0) - (9.0 - 0.25 - 2.8) / 0.4).abs() < 1e-12);
        assert!((FF.min_achievable_accel(9.0, 1.0) - (-9.0 - 0.25 - 2.8) / 0.4).abs() < 1e-12);

        // The voltage for the max acceleration is exactly the cap
        let a = FF.max_achievable_accel(9.0, 1.5);
        assert!((FF.calculate(1.5, a) - 9.0).abs() < 1e-9);
    }
}
