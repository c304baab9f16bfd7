//! Cadence Player - Playback Sequencing
//!
//! Platform-agnostic transport control for Cadence Player.
//!
//! This crate provides:
//! - The [`Sequencer`]: current track, active list, play/pause/seek
//! - Next/previous selection under shuffle and repeat (Off, One, All)
//! - Volume and mute (zero volume forces mute)
//! - A device abstraction with a generation-tagged event channel
//! - Injectable randomness for shuffled navigation
//! - Queued [`PlaybackEvent`]s for UI synchronization
//!
//! # Architecture
//!
//! `cadence-playback` never touches audio hardware or storage. The host
//! supplies a [`DeviceFactory`]; the sequencer opens the device the first
//! time a track is started and owns it from then on. Device notifications
//! (position, end of track) arrive on a channel and are applied by
//! [`Sequencer::pump_device_events`] on the owning thread.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::sample_library;
//! use cadence_playback::{NullDevice, PlaybackConfig, PlaybackState, RepeatMode, Sequencer};
//!
//! let library = sample_library();
//! let mut seq = Sequencer::new(PlaybackConfig::default(), NullDevice::factory());
//!
//! seq.start(&library[0], &library);
//! assert_eq!(seq.current_index(), Some(0));
//!
//! seq.next();
//! assert_eq!(seq.current_index(), Some(1));
//!
//! seq.cycle_repeat_mode();
//! assert_eq!(seq.repeat_mode(), RepeatMode::One);
//! seq.next();
//! assert_eq!(seq.current_index(), Some(1));
//!
//! seq.pause();
//! assert_eq!(seq.state(), PlaybackState::Paused);
//! ```

pub mod device;
pub mod error;
pub mod events;
pub mod random;
pub mod sequencer;
pub mod types;
pub mod volume;

pub use device::{
    event_channel, DeviceEvent, DeviceEventSender, DeviceFactory, DeviceMessage, LoadRequest,
    NullDevice, PlaybackDevice,
};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use random::{IndexPicker, SeededPicker, ThreadRngPicker};
pub use sequencer::Sequencer;
pub use types::{Direction, PlaybackConfig, PlaybackState, RepeatMode, TransportSnapshot};
pub use volume::Volume;
