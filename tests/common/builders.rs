//! Test data builders for creating sensor readings

use motioncap_rs::{Attitude, RawMotion, Vector3};

/// Builder for creating test RawMotion readings
pub struct RawMotionBuilder {
    attitude: Attitude,
    acceleration: Vector3,
    rotation_rate: Vector3,
}

impl RawMotionBuilder {
    pub fn new() -> Self {
        Self {
            attitude: Attitude::IDENTITY,
            acceleration: Vector3::ZERO,
            rotation_rate: Vector3::ZERO,
        }
    }

    pub fn attitude(mut self, pitch: f64, roll: f64, yaw: f64) -> Self {
        self.attitude = Attitude::new(pitch, roll, yaw);
        self
    }

    pub fn acceleration(mut self, x: f64, y: f64, z: f64) -> Self {
        self.acceleration = Vector3::new(x, y, z);
        self
    }

    pub fn rotation_rate(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation_rate = Vector3::new(x, y, z);
        self
    }

    pub fn build(self) -> RawMotion {
        RawMotion::new(self.attitude, self.acceleration, self.rotation_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_motion_builder() {
        let raw = RawMotionBuilder::new()
            .attitude(0.1, 0.2, 0.3)
            .acceleration(1.0, 0.0, -1.0)
            .build();

        assert_eq!(raw.attitude, Attitude::new(0.1, 0.2, 0.3));
        assert_eq!(raw.acceleration, Vector3::new(1.0, 0.0, -1.0));
        assert_eq!(raw.rotation_rate, Vector3::ZERO);
    }
}
