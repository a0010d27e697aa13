//! Sensor event delivery
//!
//! The sensor side pushes [`SensorEvent`]s into a [`SensorFeed`]; a worker
//! thread drains the channel and dispatches each event to a
//! [`MotionEventHandler`] (normally the [`MotionRecorder`]). A second thread,
//! the ticker, publishes [`ControlState`] snapshots at the display refresh
//! rate so a UI can redraw the duration readout without polling.
//!
//! Both loops exit when their running flag is cleared or the other end of
//! their channel goes away.
//!
//! [`MotionRecorder`]: crate::recorder::MotionRecorder

use crossbeam_channel::{bounded, tick, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::control::ControlState;
use crate::recorder::MotionRecorder;
use crate::types::RawMotion;

/// How often the worker re-checks its running flag while the feed is quiet
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Receiver of sensor callbacks, one method per event kind
pub trait MotionEventHandler: Send + Sync {
    /// A new orientation/acceleration reading
    fn on_motion(&self, raw: &RawMotion);
    /// The sensor became available
    fn on_connect(&self);
    /// The sensor went away
    fn on_disconnect(&self);
    /// The sensor reported an error and stopped delivering
    fn on_failure(&self, error: &str);
}

/// Events delivered by the sensor
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    Motion(RawMotion),
    Connected,
    Disconnected,
    Failed(String),
}

impl SensorEvent {
    /// Route this event to the matching handler method
    pub fn dispatch(&self, handler: &dyn MotionEventHandler) {
        match self {
            SensorEvent::Motion(raw) => handler.on_motion(raw),
            SensorEvent::Connected => handler.on_connect(),
            SensorEvent::Disconnected => handler.on_disconnect(),
            SensorEvent::Failed(error) => handler.on_failure(error),
        }
    }
}

/// Sending half of the sensor channel, cloneable into sensor callbacks
#[derive(Debug, Clone)]
pub struct SensorFeed {
    tx: Sender<SensorEvent>,
}

impl SensorFeed {
    /// Create an unbounded feed and its receiving end
    pub fn new() -> (Self, Receiver<SensorEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    /// Queue an event; returns `false` once the worker is gone
    pub fn send(&self, event: SensorEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn motion(&self, raw: RawMotion) -> bool {
        self.send(SensorEvent::Motion(raw))
    }

    pub fn connected(&self) -> bool {
        self.send(SensorEvent::Connected)
    }

    pub fn disconnected(&self) -> bool {
        self.send(SensorEvent::Disconnected)
    }

    pub fn failed(&self, error: impl Into<String>) -> bool {
        self.send(SensorEvent::Failed(error.into()))
    }
}

/// Spawn the thread that drains `rx` into `handler`.
///
/// Returns the number of events dispatched when the thread exits.
pub fn spawn_feed_worker<H>(
    handler: Arc<H>,
    rx: Receiver<SensorEvent>,
    running: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<u64>>
where
    H: MotionEventHandler + 'static,
{
    std::thread::Builder::new()
        .name("motion-feed".to_string())
        .spawn(move || {
            tracing::debug!("Feed worker started");
            let mut dispatched = 0u64;
            while running.load(Ordering::Acquire) {
                match rx.recv_timeout(IDLE_POLL_INTERVAL) {
                    Ok(event) => {
                        event.dispatch(handler.as_ref());
                        dispatched += 1;
                    }
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::debug!("Feed worker exiting after {} events", dispatched);
            dispatched
        })
}

/// Spawn the display ticker.
///
/// Publishes a [`ControlState`] every `interval`. Snapshots are dropped
/// rather than queued when the receiver falls behind, so the UI only ever
/// sees the newest one.
pub fn spawn_ticker(
    recorder: Arc<MotionRecorder>,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> std::io::Result<(Receiver<ControlState>, JoinHandle<()>)> {
    let (tx, rx) = bounded(1);
    let handle = std::thread::Builder::new()
        .name("motion-ticker".to_string())
        .spawn(move || {
            let ticker = tick(interval);
            while running.load(Ordering::Acquire) {
                if ticker.recv().is_err() {
                    break;
                }
                match tx.try_send(recorder.control_state()) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
        })?;
    Ok((rx, handle))
}
