//! Recording session state machine
//!
//! The session is shared between the sensor callback (ingest), the display
//! timer (elapsed) and user commands (start/stop/save), so all of its state
//! sits behind one mutex. Every method takes `&self`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::buffer::SampleBuffer;
use crate::calibration::FrameCalibrator;
use crate::clock::{Clock, SystemClock};
use crate::error::{RecorderError, Result};
use crate::types::{MotionSample, RawMotion};

use super::types::RecordingState;

/// Default pre-allocation for a new session buffer (one minute at 100 Hz)
pub const DEFAULT_BUFFER_CAPACITY: usize = 6_000;

#[derive(Debug, Default)]
struct SessionInner {
    state: RecordingState,
    /// Clock reading at the last transition to Active
    started_at: Option<Duration>,
    /// Elapsed value frozen at the last stop
    frozen_elapsed: Duration,
    buffer: SampleBuffer,
    /// Samples dropped while idle since the last start
    dropped: u64,
}

/// One start-to-stop capture interval and its buffer
pub struct RecordingSession {
    inner: Mutex<SessionInner>,
    clock: Arc<dyn Clock>,
    buffer_capacity: usize,
}

impl std::fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("inner", &self.inner)
            .field("buffer_capacity", &self.buffer_capacity)
            .finish_non_exhaustive()
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    /// Create an idle session on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::default()))
    }

    /// Create an idle session on a specific clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(SessionInner::default()),
            clock,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Set the pre-allocation used for each new buffer
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // SessionInner has no invariant a panicking holder could break halfway
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get current state
    pub fn state(&self) -> RecordingState {
        self.lock().state
    }

    /// Check if recording
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Begin a new recording.
    ///
    /// The previous buffer is dropped and replaced with a fresh one.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.state.is_active() {
            return Err(RecorderError::InvalidStateTransition {
                from: inner.state,
                action: "start",
            });
        }

        inner.buffer = SampleBuffer::with_capacity(self.buffer_capacity);
        inner.started_at = Some(self.clock.now());
        inner.frozen_elapsed = Duration::ZERO;
        inner.dropped = 0;
        inner.state = RecordingState::Active;
        tracing::info!("Recording started");
        Ok(())
    }

    /// Stop recording; the buffer stays available for saving.
    ///
    /// Returns the final elapsed time. Stopping an idle session does nothing.
    pub fn stop(&self) -> Duration {
        let mut inner = self.lock();
        if !inner.state.is_active() {
            return inner.frozen_elapsed;
        }

        let elapsed = inner
            .started_at
            .map(|start| self.clock.now().saturating_sub(start))
            .unwrap_or_default();
        inner.frozen_elapsed = elapsed;
        inner.state = RecordingState::Idle;
        tracing::info!(
            "Recording stopped after {:?} with {} samples",
            elapsed,
            inner.buffer.len()
        );
        elapsed
    }

    /// Calibrate and append a raw reading.
    ///
    /// Returns `true` if the sample was stored. Readings that arrive while
    /// idle are dropped without error.
    pub fn ingest(&self, raw: &RawMotion, calibrator: &FrameCalibrator) -> bool {
        let mut inner = self.lock();
        if !inner.state.is_active() {
            inner.dropped += 1;
            tracing::trace!("Dropping sample received while idle");
            return false;
        }

        let timestamp = self.clock.now().as_secs_f64();
        let attitude = calibrator.calibrate(&raw.attitude);
        inner
            .buffer
            .push(MotionSample::capture(timestamp, raw, attitude));
        true
    }

    /// Time since start while active, or the value frozen at the last stop
    pub fn elapsed(&self) -> Duration {
        let inner = self.lock();
        match (inner.state, inner.started_at) {
            (RecordingState::Active, Some(start)) => self.clock.now().saturating_sub(start),
            _ => inner.frozen_elapsed,
        }
    }

    /// Get number of buffered samples
    pub fn sample_count(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Samples dropped while idle since the last start
    pub fn dropped_count(&self) -> u64 {
        self.lock().dropped
    }

    /// Run `f` over the finished buffer.
    ///
    /// Fails while a recording is active, so a reader can never observe a
    /// buffer that is still being appended to.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&SampleBuffer) -> R) -> Result<R> {
        let inner = self.lock();
        if inner.state.is_active() {
            return Err(RecorderError::InvalidStateTransition {
                from: inner.state,
                action: "read the buffer",
            });
        }
        Ok(f(&inner.buffer))
    }

    /// Take the finished buffer, leaving an empty one behind
    pub fn take_buffer(&self) -> Result<SampleBuffer> {
        let mut inner = self.lock();
        if inner.state.is_active() {
            return Err(RecorderError::InvalidStateTransition {
                from: inner.state,
                action: "take the buffer",
            });
        }
        Ok(std::mem::take(&mut inner.buffer))
    }
}
