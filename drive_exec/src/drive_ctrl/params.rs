//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::CurvatureDrive;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    // ---- SENSITIVITIES ----
    /// Scale applied to the turn demand while driving with throttle.
    pub turn_sens: f64,

    /// Scale applied to the turn demand while turning in place.
    pub turn_in_place_sens: f64,

    // ---- CAPABILITIES ----
    /// Turn rate demanded by a full turn input in cheesy open loop.
    ///
    /// Units: radians/second
    pub max_turn_rate_rads: f64,

    // ---- CHEESY OPEN LOOP ----
    /// How wheel speeds above top speed are normalised in cheesy open loop.
    #[serde(default)]
    pub cheesy_norm: CheesyNorm,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Normalisation strategy for cheesy open loop efforts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheesyNorm {
    /// Divide both wheels by the same factor when either exceeds top speed, keeping the ratio
    /// between them and bounding efforts to `[-1, 1]`.
    Ratio,

    /// Divide each wheel by top speed only. The normalisation factor is computed (from the
    /// signed speeds) and logged but never applied, so efforts may exceed one and the ratio is
    /// distorted once the drivetrain saturates.
    Legacy,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CheesyNorm {
    fn default() -> Self {
        CheesyNorm::Ratio
    }
}

impl Params {
    pub fn curvature_drive(&self) -> CurvatureDrive {
        CurvatureDrive {
            turn_sens: self.turn_sens,
            turn_in_place_sens: self.turn_in_place_sens,
        }
    }
}
