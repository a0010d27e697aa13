//! Recording session module
//!
//! This module owns the capture lifecycle: a session moves between
//! [`RecordingState::Idle`] and [`RecordingState::Active`], stamps and
//! calibrates incoming sensor readings while active, and keeps the finished
//! buffer around after stop so it can be written to disk.
//!
//! # Features
//!
//! - Start/stop state machine with misuse reported as an error
//! - Late samples after stop are dropped silently
//! - Elapsed time, live while active and frozen after stop
//! - A fresh buffer on every start, never shared across sessions

pub mod recorder;
pub mod types;

pub use recorder::{RecordingSession, DEFAULT_BUFFER_CAPACITY};
pub use types::{format_elapsed, RecordingState};
