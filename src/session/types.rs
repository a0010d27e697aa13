//! Session state and elapsed-time formatting

use std::time::Duration;

/// State of the recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// No capture in progress
    #[default]
    Idle,
    /// Samples are being captured
    Active,
}

impl RecordingState {
    /// Check if currently recording
    pub fn is_active(&self) -> bool {
        matches!(self, RecordingState::Active)
    }

    /// Display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordingState::Idle => "Idle",
            RecordingState::Active => "Active",
        }
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Format a duration as `MM:SS:mmm`.
///
/// Minutes are not wrapped, so an hour-long session reads `60:00:000`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;
    format!("{:02}:{:02}:{:03}", minutes, seconds, millis)
}
