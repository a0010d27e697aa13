//! # motioncap-rs: Motion Sensor Capture Pipeline
//!
//! Captures a live stream of orientation, acceleration and rotation-rate
//! readings from a motion sensor (e.g. head-tracking headphones), corrects
//! orientation against a user-settable reference frame, buffers a timed
//! recording session and writes it to a labelled CSV file that can later be
//! listed, deleted or exported.
//!
//! ## Architecture
//!
//! - **Buffer**: append-only, ordered sample storage for one session
//! - **Calibration**: reference-frame correction of raw orientation
//! - **Session**: Idle/Active state machine gating what gets recorded
//! - **Storage**: CSV serialization and the directory of session files
//! - **Feed**: crossbeam channels carrying sensor events and UI ticks
//!
//! ## Configuration
//!
//! Session files are stored in the platform-appropriate data directory under
//! `dev.motioncap.motioncap-rs/sessions` unless configured otherwise, see
//! [`config::RecorderConfig`].
//!
//! ## Example
//!
//! ```ignore
//! use motioncap_rs::{config::RecorderConfig, feed, MotionRecorder};
//! use std::sync::{atomic::AtomicBool, Arc};
//!
//! let config = RecorderConfig::load_or_default("motioncap.json");
//! motioncap_rs::logging::init(&config.log_filter);
//!
//! let recorder = Arc::new(MotionRecorder::from_config(&config)?);
//! let running = Arc::new(AtomicBool::new(true));
//! let (sensor, events) = feed::SensorFeed::new();
//! feed::spawn_feed_worker(recorder.clone(), events, running.clone())?;
//! let (control, _ticker) =
//!     feed::spawn_ticker(recorder.clone(), recorder.tick_interval(), running.clone())?;
//!
//! // hand `sensor` to the sensor callback, then drive from the UI:
//! recorder.start("walk")?;
//! // ...
//! recorder.stop();
//! let file = recorder.save("walk")?;
//! println!("saved {}", file.file_name);
//! ```

pub mod buffer;
pub mod calibration;
pub mod clock;
pub mod config;
pub mod control;
pub mod error;
pub mod feed;
pub mod logging;
pub mod recorder;
pub mod session;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use buffer::SampleBuffer;
pub use calibration::{FrameCalibrator, ReferenceFrame};
pub use config::RecorderConfig;
pub use control::ControlState;
pub use error::{DeleteAllReport, RecorderError, Result};
pub use feed::{MotionEventHandler, SensorEvent, SensorFeed};
pub use recorder::MotionRecorder;
pub use session::{RecordingSession, RecordingState};
pub use storage::{CsvSerializer, SessionFile, SessionStore};
pub use types::{Attitude, MotionSample, RawMotion, Vector3};
