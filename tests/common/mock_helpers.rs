//! Mock construction helpers

use motioncap_rs::clock::ManualClock;
use motioncap_rs::{MotionRecorder, RawMotion, RecorderConfig};
use std::sync::Arc;
use std::time::Duration;

use super::builders::RawMotionBuilder;

/// Start of the manual test clock (2024-06-10 06:13:20 UTC)
pub const TEST_EPOCH_SECS: u64 = 1_718_000_000;

/// Recorder backed by a temporary directory and a manual clock.
///
/// Keep the returned `TempDir` alive for as long as the recorder is used.
pub fn create_test_recorder() -> (tempfile::TempDir, Arc<MotionRecorder>, Arc<ManualClock>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let clock = Arc::new(ManualClock::new(Duration::from_secs(TEST_EPOCH_SECS)));
    let config = RecorderConfig::with_storage_dir(dir.path());
    let recorder = MotionRecorder::from_config_with_clock(&config, clock.clone())
        .expect("open recorder");
    (dir, Arc::new(recorder), clock)
}

/// Readings of a head slowly nodding: pitch follows a sine wave
pub fn nodding_readings(count: usize) -> Vec<RawMotion> {
    (0..count)
        .map(|i| {
            let t = i as f64 * 0.01;
            RawMotionBuilder::new()
                .attitude(0.3 * (t * std::f64::consts::TAU).sin(), 0.0, 0.1)
                .acceleration(0.0, 0.01 * i as f64, 0.0)
                .rotation_rate(0.3 * std::f64::consts::TAU * (t * std::f64::consts::TAU).cos(), 0.0, 0.0)
                .build()
        })
        .collect()
}
