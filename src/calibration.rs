//! Reference-frame calibration
//!
//! The calibrator stores the inverse of a captured "zero" orientation and
//! right-multiplies every raw orientation by it, so the captured orientation
//! maps to identity:
//!
//! ```text
//! calibrated = raw * reference⁻¹
//! ```
//!
//! Rotations are orthonormal, so the inverse is the transpose. Any mirror or
//! axis remap used for display is applied by the viewer and never stored here.

use nalgebra::Rotation3;

use crate::types::Attitude;

/// The stored "zero" orientation.
///
/// Holds the inverse of the captured attitude. Replaced wholesale on every
/// calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    inverse: Rotation3<f64>,
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl ReferenceFrame {
    pub fn identity() -> Self {
        Self {
            inverse: Rotation3::identity(),
        }
    }

    /// Reference frame that maps `attitude` to identity
    pub fn from_attitude(attitude: &Attitude) -> Self {
        Self {
            inverse: attitude.to_rotation().transpose(),
        }
    }

    /// The correction right-multiplied onto raw orientations
    pub fn inverse(&self) -> &Rotation3<f64> {
        &self.inverse
    }

    pub fn is_identity(&self) -> bool {
        self.inverse == Rotation3::identity()
    }
}

/// Projects raw sensor orientation into the calibrated frame
#[derive(Debug, Clone, Default)]
pub struct FrameCalibrator {
    reference: ReferenceFrame,
}

impl FrameCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(&self) -> &ReferenceFrame {
        &self.reference
    }

    /// Apply the reference correction to a raw attitude.
    ///
    /// With the default identity reference the raw angles pass through
    /// untouched, so uncalibrated sessions record exactly what the sensor
    /// reported.
    pub fn calibrate(&self, raw: &Attitude) -> Attitude {
        if self.reference.is_identity() {
            return *raw;
        }
        let corrected = raw.to_rotation() * self.reference.inverse;
        Attitude::from_rotation(&corrected)
    }

    /// Capture `current` as the new zero orientation.
    ///
    /// Returns `false` and leaves the reference unchanged when no raw
    /// attitude is available yet.
    pub fn set_reference(&mut self, current: Option<&Attitude>) -> bool {
        let Some(current) = current else {
            tracing::debug!("Calibration requested without a sensor reading, ignoring");
            return false;
        };
        self.reference = ReferenceFrame::from_attitude(current);
        tracing::info!(
            "Reference frame set (pitch={:.4}, roll={:.4}, yaw={:.4})",
            current.pitch,
            current.roll,
            current.yaw
        );
        true
    }

    /// Return to the identity reference
    pub fn reset(&mut self) {
        self.reference = ReferenceFrame::identity();
    }
}
