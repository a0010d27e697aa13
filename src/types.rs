//! Core data types for motioncap-rs
//!
//! This module contains the records that flow through the capture pipeline.
//!
//! # Main Types
//!
//! - [`Vector3`] - A plain x/y/z triple (acceleration, rotation rate)
//! - [`Attitude`] - Euler orientation as pitch/roll/yaw in radians
//! - [`RawMotion`] - One uncalibrated reading as delivered by the sensor
//! - [`MotionSample`] - One calibrated, timestamped record stored in a session
//!
//! # Euler Convention
//!
//! `pitch` is the rotation about the device X axis, `roll` about Y and `yaw`
//! about Z. The rotation matrix of an attitude is `Rz(yaw) * Ry(roll) * Rx(pitch)`.

use nalgebra::Rotation3;

/// A three-component vector in the device frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Orientation expressed as Euler angles (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl Attitude {
    pub const IDENTITY: Attitude = Attitude {
        pitch: 0.0,
        roll: 0.0,
        yaw: 0.0,
    };

    pub fn new(pitch: f64, roll: f64, yaw: f64) -> Self {
        Self { pitch, roll, yaw }
    }

    /// Rotation matrix for this attitude
    pub fn to_rotation(&self) -> Rotation3<f64> {
        Rotation3::from_euler_angles(self.pitch, self.roll, self.yaw)
    }

    /// Recover Euler angles from a rotation matrix
    pub fn from_rotation(rotation: &Rotation3<f64>) -> Self {
        let (pitch, roll, yaw) = rotation.euler_angles();
        Self { pitch, roll, yaw }
    }

    /// Check whether every angle is within `epsilon` of `other`
    pub fn approx_eq(&self, other: &Attitude, epsilon: f64) -> bool {
        (self.pitch - other.pitch).abs() <= epsilon
            && (self.roll - other.roll).abs() <= epsilon
            && (self.yaw - other.yaw).abs() <= epsilon
    }
}

/// One reading from the motion sensor before calibration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawMotion {
    /// Orientation as reported by the sensor
    pub attitude: Attitude,
    /// Gravity-removed linear acceleration
    pub acceleration: Vector3,
    /// Angular velocity
    pub rotation_rate: Vector3,
}

impl RawMotion {
    pub fn new(attitude: Attitude, acceleration: Vector3, rotation_rate: Vector3) -> Self {
        Self {
            attitude,
            acceleration,
            rotation_rate,
        }
    }

    /// Reading with only an orientation, zero acceleration and rotation rate
    pub fn from_attitude(attitude: Attitude) -> Self {
        Self {
            attitude,
            ..Default::default()
        }
    }
}

/// A single recorded sample.
///
/// Samples are immutable once they reach a buffer; the label is empty at
/// capture and only applied when the session is written out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionSample {
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    pub acceleration: Vector3,
    pub rotation_rate: Vector3,
    /// Calibrated orientation
    pub attitude: Attitude,
    pub label: String,
}

impl MotionSample {
    /// Build an unlabeled sample from a raw reading and its calibrated attitude
    pub fn capture(timestamp: f64, raw: &RawMotion, attitude: Attitude) -> Self {
        Self {
            timestamp,
            acceleration: raw.acceleration,
            rotation_rate: raw.rotation_rate,
            attitude,
            label: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attitude_rotation_roundtrip() {
        let attitude = Attitude::new(0.3, -0.2, 1.1);
        let back = Attitude::from_rotation(&attitude.to_rotation());
        assert!(back.approx_eq(&attitude, 1e-12), "{:?}", back);
    }

    #[test]
    fn test_pitch_is_rotation_about_x() {
        let rotation = Attitude::new(0.5, 0.0, 0.0).to_rotation();
        let axis = rotation.axis().expect("non-trivial rotation has an axis");
        assert!((axis.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_capture_leaves_label_empty() {
        let raw = RawMotion::new(
            Attitude::new(0.1, 0.2, 0.3),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-1.0, -2.0, -3.0),
        );
        let sample = MotionSample::capture(12.5, &raw, Attitude::IDENTITY);
        assert_eq!(sample.timestamp, 12.5);
        assert_eq!(sample.acceleration, raw.acceleration);
        assert_eq!(sample.rotation_rate, raw.rotation_rate);
        assert_eq!(sample.attitude, Attitude::IDENTITY);
        assert!(sample.label.is_empty());
    }
}
