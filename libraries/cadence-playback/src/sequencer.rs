//! Playback sequencer - transport orchestration
//!
//! Owns the transport state, the active track list, and the playback device.
//! Decides which track plays on next/previous under the shuffle and repeat
//! policies, and turns device notifications back into state changes.

use crate::{
    device::{
        event_channel, DeviceEvent, DeviceEventSender, DeviceFactory, DeviceMessage, LoadRequest,
        PlaybackDevice,
    },
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    random::{IndexPicker, ThreadRngPicker},
    types::{Direction, PlaybackConfig, PlaybackState, RepeatMode, TransportSnapshot},
    volume::Volume,
};
use cadence_core::{position_of, Track};
use crossbeam_channel::Receiver;

/// Playback sequencer
///
/// Single-owner: every method is called from the thread that owns the
/// sequencer. Device notifications queue up on a channel until
/// [`Sequencer::pump_device_events`] applies them.
pub struct Sequencer {
    // Transport
    state: PlaybackState,
    current_track: Option<Track>,
    position: f64,
    volume: Volume,
    shuffled: bool,
    repeat: RepeatMode,

    // Sequencing
    active_list: Vec<Track>,
    current_index: Option<usize>,
    picker: Box<dyn IndexPicker>,

    // Device, opened lazily on the first start
    factory: Box<dyn DeviceFactory>,
    device: Option<Box<dyn PlaybackDevice>>,
    device_tx: DeviceEventSender,
    device_rx: Receiver<DeviceMessage>,
    generation: u64,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl Sequencer {
    /// Create a sequencer that opens its device through `factory`
    pub fn new(config: PlaybackConfig, factory: impl DeviceFactory + 'static) -> Self {
        let (device_tx, device_rx) = event_channel();
        Self {
            state: PlaybackState::Idle,
            current_track: None,
            position: 0.0,
            volume: Volume::new(config.volume, config.muted),
            shuffled: config.shuffled,
            repeat: config.repeat,
            active_list: Vec::new(),
            current_index: None,
            picker: Box::new(ThreadRngPicker),
            factory: Box::new(factory),
            device: None,
            device_tx,
            device_rx,
            generation: 0,
            pending_events: Vec::new(),
        }
    }

    /// Replace the random source used for shuffled navigation
    pub fn with_picker(mut self, picker: impl IndexPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    // ===== Playback Control =====

    /// Play `track`, making `context` the active list when it is non-empty
    ///
    /// With a non-empty context the current index becomes the position of
    /// `track` in it (`None` when absent). An empty context keeps the
    /// active list and index as they were.
    ///
    /// If no device can be opened or the source fails to load, nothing
    /// changes. If the device refuses to play, the track becomes current
    /// but the transport stays paused.
    pub fn start(&mut self, track: &Track, context: &[Track]) {
        if !self.load_and_play(track) {
            return;
        }

        if !context.is_empty() {
            self.active_list = context.to_vec();
            self.current_index = position_of(context, &track.id);
        }
    }

    /// Pause playback
    ///
    /// Idempotent. The device is told to pause even when the transport
    /// already believes it is paused.
    pub fn pause(&mut self) {
        if let Some(device) = self.device.as_mut() {
            if let Err(e) = device.pause() {
                tracing::warn!(error = %e, "device refused to pause");
            }
        }

        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Pause when playing, otherwise resume the current track
    ///
    /// No-op when there is no current track.
    pub fn toggle_play_pause(&mut self) {
        if self.is_playing() {
            self.pause();
            return;
        }

        if self.current_track.is_none() {
            return;
        }

        let Some(device) = self.device.as_mut() else {
            return;
        };
        match device.play() {
            Ok(()) => self.set_state(PlaybackState::Playing),
            Err(e) => self.report(&e),
        }
    }

    /// Seek the device to `secs`
    ///
    /// Not clamped. Position follows once the device reports the new time.
    pub fn seek(&mut self, secs: f64) {
        let Some(device) = self.device.as_mut() else {
            return;
        };
        if let Err(e) = device.set_position(secs) {
            self.report(&e);
        }
    }

    /// Move through the active list
    ///
    /// `Next` honors the repeat policy: repeat-one replays the current
    /// index, shuffle picks any index, and running off the end either wraps
    /// (repeat-all) or stops on the last track (repeat-off). `Previous`
    /// ignores repeat and always wraps. With an empty active list this does
    /// nothing.
    pub fn advance(&mut self, direction: Direction) {
        let len = self.active_list.len();
        if len == 0 {
            return;
        }

        let target = match direction {
            Direction::Next => self.next_index(len),
            Direction::Previous => Some(self.previous_index(len)),
        };

        match target {
            Some(index) => self.play_index(index),
            None => self.finish_list(),
        }
    }

    /// Skip to the next track
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.advance(Direction::Next);
    }

    /// Go to the previous track
    pub fn previous(&mut self) {
        self.advance(Direction::Previous);
    }

    // ===== Volume Control =====

    /// Set volume (0.0-1.0)
    ///
    /// Zero also mutes; any other level leaves mute alone.
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.sync_device_volume();
        self.emit_volume_changed();
    }

    /// Flip mute; the level is untouched
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        if let Some(device) = self.device.as_mut() {
            if let Err(e) = device.set_muted(self.volume.is_muted()) {
                tracing::warn!(error = %e, "device refused mute change");
            }
        }
        self.emit_volume_changed();
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle; the active list is not reordered
    pub fn toggle_shuffle(&mut self) {
        self.shuffled = !self.shuffled;
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            shuffled: self.shuffled,
        });
    }

    /// Step the repeat policy: off → one → all → off
    pub fn cycle_repeat_mode(&mut self) {
        self.repeat = self.repeat.cycled();
        tracing::debug!(mode = ?self.repeat, "repeat mode changed");
        self.pending_events
            .push(PlaybackEvent::RepeatChanged { mode: self.repeat });
    }

    // ===== Device Events =====

    /// Apply every queued device notification, in arrival order
    ///
    /// Returns how many messages were applied (stale ones excluded).
    pub fn pump_device_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.device_rx.try_recv() {
            if self.handle_device_message(message) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one device notification
    ///
    /// Messages from a load that has since been replaced are dropped and
    /// `false` is returned.
    pub fn handle_device_message(&mut self, message: DeviceMessage) -> bool {
        if message.generation != self.generation {
            tracing::trace!(
                stale = message.generation,
                current = self.generation,
                "dropping stale device event"
            );
            return false;
        }

        match message.event {
            DeviceEvent::TimeUpdate(secs) => {
                self.position = secs;
                self.emit_position();
            }
            DeviceEvent::LoadedData => {
                self.position = 0.0;
                self.emit_position();
            }
            DeviceEvent::Ended => {
                tracing::debug!("track ended");
                self.advance(Direction::Next);
            }
        }
        true
    }

    /// Receiving side of the device channel, for hosts that want to block
    /// on it (e.g. with `crossbeam_channel::select!`)
    pub fn device_events(&self) -> &Receiver<DeviceMessage> {
        &self.device_rx
    }

    // ===== Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Ordered list governing next/previous
    pub fn active_list(&self) -> &[Track] {
        &self.active_list
    }

    /// Last position reported by the device (seconds)
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether the device has been opened
    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Copy of the transport for rendering
    pub fn transport(&self) -> TransportSnapshot {
        TransportSnapshot {
            state: self.state,
            current_track: self.current_track.clone(),
            current_index: self.current_index,
            position: self.position,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            shuffled: self.shuffled,
            repeat: self.repeat,
        }
    }

    // ===== Events =====

    /// Get and clear pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn next_index(&mut self, len: usize) -> Option<usize> {
        if self.repeat == RepeatMode::One {
            if let Some(index) = self.current_index {
                return Some(index);
            }
        }

        if self.shuffled {
            return Some(self.picker.pick(len));
        }

        let candidate = self.current_index.map_or(0, |i| i + 1);
        if candidate < len {
            Some(candidate)
        } else if self.repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    fn previous_index(&mut self, len: usize) -> usize {
        if self.shuffled {
            return self.picker.pick(len);
        }

        match self.current_index {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        }
    }

    fn play_index(&mut self, index: usize) {
        let Some(track) = self.active_list.get(index).cloned() else {
            return;
        };
        if self.load_and_play(&track) {
            self.current_index = Some(index);
        }
    }

    fn finish_list(&mut self) {
        tracing::debug!("active list exhausted");
        if let Some(device) = self.device.as_mut() {
            if let Err(e) = device.pause() {
                tracing::warn!(error = %e, "device refused to pause");
            }
        }
        self.set_state(PlaybackState::Ended);
        self.pending_events.push(PlaybackEvent::ListExhausted);
    }

    /// Load `track` and start it; returns whether the load went through
    fn load_and_play(&mut self, track: &Track) -> bool {
        if let Err(e) = self.ensure_device() {
            self.report(&e);
            return false;
        }

        let generation = self.generation.wrapping_add(1);
        if let Err(e) = self.load(track, generation) {
            self.report(&e);
            return false;
        }

        self.generation = generation;
        self.position = 0.0;
        let previous_track_id = self
            .current_track
            .replace(track.clone())
            .map(|t| t.id.to_string());
        tracing::debug!(track = %track.id, generation, "track loaded");
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: track.id.to_string(),
            previous_track_id,
        });

        let played = match self.device.as_mut() {
            Some(device) => device.play(),
            None => Err(PlaybackError::DeviceUnavailable("device not open".into())),
        };
        match played {
            Ok(()) => self.set_state(PlaybackState::Playing),
            Err(e) => {
                self.report(&e);
                self.set_state(PlaybackState::Paused);
            }
        }
        true
    }

    fn ensure_device(&mut self) -> Result<()> {
        if self.device.is_none() {
            let device = self.factory.open(self.device_tx.clone())?;
            tracing::debug!("playback device opened");
            self.device = Some(device);
        }
        Ok(())
    }

    fn load(&mut self, track: &Track, generation: u64) -> Result<()> {
        let device = self
            .device
            .as_mut()
            .ok_or_else(|| PlaybackError::DeviceUnavailable("device not open".into()))?;

        device.load(&LoadRequest {
            source: track.source.clone(),
            duration_secs: track.duration,
            generation,
        })?;
        device.set_volume(self.volume.level())?;
        device.set_muted(self.volume.is_muted())?;
        Ok(())
    }

    fn sync_device_volume(&mut self) {
        let Some(device) = self.device.as_mut() else {
            return;
        };
        let level = self.volume.level();
        let muted = self.volume.is_muted();
        if let Err(e) = device.set_volume(level).and_then(|()| device.set_muted(muted)) {
            tracing::warn!(error = %e, "device refused volume change");
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }

    fn report(&mut self, error: &PlaybackError) {
        tracing::warn!(error = %error, "playback device error");
        self.pending_events.push(PlaybackEvent::Error {
            message: error.to_string(),
        });
    }

    fn emit_volume_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn emit_position(&mut self) {
        let duration_secs = self.current_track.as_ref().map_or(0, |t| t.duration);
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_secs: self.position,
            duration_secs,
        });
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("state", &self.state)
            .field("current_index", &self.current_index)
            .field("active_len", &self.active_list.len())
            .field("shuffled", &self.shuffled)
            .field("repeat", &self.repeat)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
