//! The pipeline facade
//!
//! [`MotionRecorder`] ties the calibrator, the recording session and the
//! session store together and exposes the command set a host UI drives:
//! start, stop, calibrate, save, list, delete, delete all and export.
//!
//! It is meant to be shared in an `Arc` between the sensor callback, a
//! display timer and the UI thread. Sensor events arrive through the
//! [`MotionEventHandler`] implementation.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use crate::calibration::FrameCalibrator;
use crate::clock::{Clock, SystemClock};
use crate::config::{RecorderConfig, DEFAULT_TICK_INTERVAL_MS};
use crate::control::ControlState;
use crate::error::{DeleteAllReport, Result, ResultExt};
use crate::feed::MotionEventHandler;
use crate::session::{RecordingSession, RecordingState};
use crate::storage::{CsvSerializer, LoadedSession, SessionFile, SessionStore};
use crate::types::{Attitude, RawMotion};

/// Motion capture pipeline shared by the sensor, timer and UI contexts
#[derive(Debug)]
pub struct MotionRecorder {
    session: RecordingSession,
    calibrator: RwLock<FrameCalibrator>,
    /// Most recent raw attitude while the sensor is delivering
    latest_raw: Mutex<Option<Attitude>>,
    sensor_available: AtomicBool,
    store: SessionStore,
    /// Display refresh interval for [`crate::feed::spawn_ticker`]
    tick_interval: Duration,
}

impl MotionRecorder {
    /// Create a recorder around an opened store, on the system clock
    pub fn new(store: SessionStore) -> Self {
        Self::with_session(store, RecordingSession::new())
    }

    /// Create a recorder with an explicit session (custom clock, capacity)
    pub fn with_session(store: SessionStore, session: RecordingSession) -> Self {
        Self {
            session,
            calibrator: RwLock::new(FrameCalibrator::new()),
            latest_raw: Mutex::new(None),
            sensor_available: AtomicBool::new(false),
            store,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        }
    }

    /// Use a different display refresh interval
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Build a recorder from configuration
    pub fn from_config(config: &RecorderConfig) -> Result<Self> {
        Self::from_config_with_clock(config, Arc::new(SystemClock::default()))
    }

    /// Build a recorder from configuration on a specific clock
    pub fn from_config_with_clock(config: &RecorderConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let dir = config.resolved_storage_dir();
        let store = SessionStore::open(&dir)
            .context("Failed to open session store")?
            .with_extension(config.file_extension.clone())
            .with_clock(clock.clone());
        let session =
            RecordingSession::with_clock(clock).with_buffer_capacity(config.buffer_capacity);
        Ok(Self::with_session(store, session).with_tick_interval(config.tick_interval()))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn state(&self) -> RecordingState {
        self.session.state()
    }

    pub fn elapsed(&self) -> Duration {
        self.session.elapsed()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn sample_count(&self) -> usize {
        self.session.sample_count()
    }

    pub fn sensor_available(&self) -> bool {
        self.sensor_available.load(Ordering::Acquire)
    }

    /// Tell the pipeline whether the sensor can currently deliver
    pub fn set_sensor_available(&self, available: bool) {
        self.sensor_available.store(available, Ordering::Release);
        if !available {
            self.clear_latest_raw();
        }
    }

    /// Derived UI state
    pub fn control_state(&self) -> ControlState {
        ControlState::derive(self.sensor_available(), self.state(), self.elapsed())
    }

    fn clear_latest_raw(&self) {
        *self.latest_raw.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Start a new recording.
    ///
    /// The label is not attached to samples at capture; pass it to
    /// [`MotionRecorder::save`] when the session is written out.
    pub fn start(&self, label: &str) -> Result<()> {
        self.session.start()?;
        tracing::debug!("Recording labelled {:?}", label);
        Ok(())
    }

    /// Stop the current recording and return its final elapsed time
    pub fn stop(&self) -> Duration {
        let elapsed = self.session.stop();
        // The sensor stops delivering with the session; a stale reading must
        // not be captured as a reference later.
        self.clear_latest_raw();
        elapsed
    }

    /// Use the latest raw orientation as the new reference frame.
    ///
    /// Does nothing if no reading has arrived since the sensor started.
    pub fn calibrate(&self) -> bool {
        let latest = *self.latest_raw.lock().unwrap_or_else(PoisonError::into_inner);
        self.calibrator
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_reference(latest.as_ref())
    }

    /// Feed one raw reading into the pipeline; returns whether it was recorded
    pub fn ingest(&self, raw: &RawMotion) -> bool {
        *self.latest_raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw.attitude);
        let calibrator = self.calibrator.read().unwrap_or_else(PoisonError::into_inner);
        self.session.ingest(raw, &calibrator)
    }

    /// Serialize the stopped session under `label` and persist it
    pub fn save(&self, label: &str) -> Result<SessionFile> {
        let bytes = self
            .session
            .with_buffer(|buffer| CsvSerializer::serialize(buffer, label))?;
        self.store.save(&bytes, label)
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    /// Session files with their paths and capture times
    pub fn files(&self) -> Result<Vec<SessionFile>> {
        self.store.files()
    }

    pub fn delete(&self, file_name: &str) -> Result<()> {
        self.store.delete(file_name)
    }

    pub fn delete_all(&self) -> Result<DeleteAllReport> {
        self.store.delete_all()
    }

    pub fn export_targets(&self) -> Result<Vec<PathBuf>> {
        self.store.export_targets()
    }

    pub fn load(&self, file_name: &str) -> Result<LoadedSession> {
        self.store.load(file_name)
    }
}

impl MotionEventHandler for MotionRecorder {
    // Availability changes only on connect, disconnect and failure
    fn on_motion(&self, raw: &RawMotion) {
        self.ingest(raw);
    }

    fn on_connect(&self) {
        tracing::info!("Motion sensor connected");
        self.set_sensor_available(true);
    }

    fn on_disconnect(&self) {
        tracing::info!("Motion sensor disconnected");
        self.set_sensor_available(false);
    }

    fn on_failure(&self, error: &str) {
        tracing::warn!("Motion sensor failed: {}", error);
        self.set_sensor_available(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::RecorderError;

    fn recorder() -> (tempfile::TempDir, MotionRecorder, Arc<ManualClock>) {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(Duration::from_secs(1_718_000_000)));
        let config = RecorderConfig::with_storage_dir(dir.path());
        let recorder = MotionRecorder::from_config_with_clock(&config, clock.clone()).unwrap();
        (dir, recorder, clock)
    }

    fn raw(pitch: f64, roll: f64, yaw: f64) -> RawMotion {
        RawMotion::from_attitude(Attitude::new(pitch, roll, yaw))
    }

    #[test]
    fn test_calibrate_without_reading_is_noop() {
        let (_dir, recorder, _clock) = recorder();
        assert!(!recorder.calibrate());
    }

    #[test]
    fn test_calibrate_then_ingest_same_attitude_is_identity() {
        let (_dir, recorder, _clock) = recorder();
        recorder.start("nod").unwrap();
        let reading = raw(0.3, -0.2, 1.0);
        recorder.ingest(&reading);
        assert!(recorder.calibrate());
        recorder.ingest(&reading);
        recorder.stop();

        let file = recorder.save("nod").unwrap();
        let parsed = recorder.load(&file.file_name).unwrap();
        assert_eq!(parsed.samples.len(), 2);
        assert!(parsed.samples[1]
            .attitude
            .approx_eq(&Attitude::IDENTITY, 1e-9));
    }

    #[test]
    fn test_stop_forgets_latest_reading() {
        let (_dir, recorder, _clock) = recorder();
        recorder.start("x").unwrap();
        recorder.ingest(&raw(0.1, 0.0, 0.0));
        recorder.stop();
        assert!(!recorder.calibrate());
    }

    #[test]
    fn test_save_while_active_is_rejected() {
        let (_dir, recorder, _clock) = recorder();
        recorder.start("x").unwrap();
        let err = recorder.save("x").unwrap_err();
        assert!(matches!(err, RecorderError::InvalidStateTransition { .. }));
        assert!(recorder.list().unwrap().is_empty());
    }

    #[test]
    fn test_sensor_events_drive_availability() {
        let (_dir, recorder, _clock) = recorder();
        assert!(!recorder.control_state().motion_button_enabled);

        recorder.on_connect();
        assert!(recorder.control_state().motion_button_enabled);

        recorder.on_motion(&raw(0.1, 0.0, 0.0));
        recorder.on_failure("bluetooth reset");
        assert!(!recorder.sensor_available());
        assert!(!recorder.calibrate());
    }

    #[test]
    fn test_motion_after_failure_keeps_sensor_unavailable() {
        let (_dir, recorder, _clock) = recorder();
        recorder.on_connect();
        recorder.on_failure("bluetooth reset");
        recorder.on_motion(&raw(0.2, 0.0, 0.0));

        assert!(!recorder.sensor_available());
        assert!(!recorder.control_state().motion_button_enabled);
    }

    #[test]
    fn test_config_reaches_recorder() {
        let dir = tempfile::tempdir().unwrap();
        let config = RecorderConfig {
            tick_interval_ms: 16,
            ..RecorderConfig::with_storage_dir(dir.path())
        };
        let recorder = MotionRecorder::from_config(&config).unwrap();
        assert_eq!(recorder.tick_interval(), Duration::from_millis(16));
        assert!(recorder.files().unwrap().is_empty());
    }

    #[test]
    fn test_control_state_follows_session() {
        let (_dir, recorder, clock) = recorder();
        recorder.set_sensor_available(true);
        recorder.start("x").unwrap();
        clock.advance(Duration::from_millis(750));

        let state = recorder.control_state();
        assert_eq!(state.motion_button_title, crate::control::STOP_TITLE);
        assert_eq!(state.duration, "00:00:750");

        recorder.stop();
        clock.advance(Duration::from_secs(5));
        assert_eq!(recorder.control_state().duration, "00:00:750");
    }
}
