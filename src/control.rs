//! Control state shown by the host UI
//!
//! Button titles, enablement and the duration readout are a pure function of
//! sensor availability and the session state, recomputed on demand instead
//! of being kept as separate mutable flags.

use std::time::Duration;

use crate::session::{format_elapsed, RecordingState};

pub const START_TITLE: &str = "Start Tracking";
pub const STOP_TITLE: &str = "Stop Tracking";

/// Snapshot of everything the UI renders from the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub state: RecordingState,
    pub sensor_available: bool,
    /// Title of the start/stop button
    pub motion_button_title: &'static str,
    pub motion_button_enabled: bool,
    /// Whether the "set reference" button should be shown
    pub reference_button_visible: bool,
    /// Saving is only possible once the recording has stopped
    pub save_enabled: bool,
    /// Elapsed recording time as `MM:SS:mmm`
    pub duration: String,
}

impl ControlState {
    pub fn derive(sensor_available: bool, state: RecordingState, elapsed: Duration) -> Self {
        let active = state.is_active();
        Self {
            state,
            sensor_available,
            motion_button_title: if active { STOP_TITLE } else { START_TITLE },
            // Stopping must stay possible even if the sensor dropped out mid-session
            motion_button_enabled: sensor_available || active,
            reference_button_visible: active,
            save_enabled: !active,
            duration: format_elapsed(elapsed),
        }
    }
}
