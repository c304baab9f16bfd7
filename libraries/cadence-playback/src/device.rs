//! Playback device abstraction
//!
//! The sequencer never decodes audio. It drives an opaque device through
//! [`PlaybackDevice`] and hears back from it over a channel of
//! [`DeviceMessage`]s. Platforms implement the trait (and a
//! [`DeviceFactory`] to construct it on first use).
//!
//! Every load carries a generation number. Devices tag each event they emit
//! with the generation of the load it belongs to, so the sequencer can drop
//! notifications from a source it has already replaced.

use crate::error::Result;
use crossbeam_channel::{Receiver, Sender};

/// What the device should load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Source locator (URI)
    pub source: String,

    /// Nominal duration in seconds, as recorded in the track metadata
    pub duration_secs: u32,

    /// Load generation; echo it back in every [`DeviceMessage`]
    pub generation: u64,
}

/// Notification from the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    /// Playback position moved (seconds)
    TimeUpdate(f64),

    /// The loaded source played to its end
    Ended,

    /// The loaded source is ready; position is back at zero
    LoadedData,
}

/// A [`DeviceEvent`] tagged with the load it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceMessage {
    pub generation: u64,
    pub event: DeviceEvent,
}

/// Sending half of the device event channel, handed to the device on open
#[derive(Debug, Clone)]
pub struct DeviceEventSender {
    tx: Sender<DeviceMessage>,
}

impl DeviceEventSender {
    /// Send an event for `generation`
    ///
    /// Returns `false` once the sequencer has gone away.
    pub fn send(&self, generation: u64, event: DeviceEvent) -> bool {
        self.tx.send(DeviceMessage { generation, event }).is_ok()
    }
}

/// Create an unbounded device event channel
pub fn event_channel() -> (DeviceEventSender, Receiver<DeviceMessage>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (DeviceEventSender { tx }, rx)
}

/// Audio output collaborator
///
/// Calls are made from the thread that owns the sequencer. Implementations
/// that do real work on another thread report back through the
/// [`DeviceEventSender`] they were opened with.
pub trait PlaybackDevice {
    /// Replace the current source
    fn load(&mut self, request: &LoadRequest) -> Result<()>;

    /// Start or resume output
    fn play(&mut self) -> Result<()>;

    /// Pause output
    fn pause(&mut self) -> Result<()>;

    /// Move the playhead (seconds)
    fn set_position(&mut self, secs: f64) -> Result<()>;

    /// Set output level (0.0-1.0)
    fn set_volume(&mut self, level: f32) -> Result<()>;

    /// Silence or restore output
    fn set_muted(&mut self, muted: bool) -> Result<()>;
}

/// Constructs the playback device on first use
pub trait DeviceFactory {
    /// Open a device that reports through `events`
    fn open(&mut self, events: DeviceEventSender) -> Result<Box<dyn PlaybackDevice>>;
}

impl<F> DeviceFactory for F
where
    F: FnMut(DeviceEventSender) -> Result<Box<dyn PlaybackDevice>>,
{
    fn open(&mut self, events: DeviceEventSender) -> Result<Box<dyn PlaybackDevice>> {
        self(events)
    }
}

/// Device that accepts every call and never emits events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDevice;

impl NullDevice {
    /// Factory that always opens a [`NullDevice`]
    pub fn factory() -> impl DeviceFactory {
        |_events: DeviceEventSender| -> Result<Box<dyn PlaybackDevice>> { Ok(Box::new(NullDevice)) }
    }
}

impl PlaybackDevice for NullDevice {
    fn load(&mut self, _request: &LoadRequest) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_position(&mut self, _secs: f64) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _level: f32) -> Result<()> {
        Ok(())
    }

    fn set_muted(&mut self, _muted: bool) -> Result<()> {
        Ok(())
    }
}
