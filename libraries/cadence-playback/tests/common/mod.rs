//! Shared helpers for sequencer tests

#![allow(dead_code)]

use cadence_core::{Track, TrackId};
use cadence_playback::{
    DeviceEventSender, DeviceFactory, IndexPicker, LoadRequest, PlaybackConfig, PlaybackDevice,
    PlaybackError, Result, Sequencer,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// One call made on the mock device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Load { source: String, generation: u64 },
    Play,
    Pause,
    SetPosition(f64),
    SetVolume(f32),
    SetMuted(bool),
}

/// Shared view into what the mock device saw
#[derive(Debug, Default)]
pub struct DeviceProbe {
    pub calls: Vec<DeviceCall>,
    pub opened: usize,
    pub sender: Option<DeviceEventSender>,
    pub reject_play: bool,
    pub fail_load: bool,
}

pub type Probe = Rc<RefCell<DeviceProbe>>;

struct MockDevice {
    probe: Probe,
}

impl PlaybackDevice for MockDevice {
    fn load(&mut self, request: &LoadRequest) -> Result<()> {
        let mut probe = self.probe.borrow_mut();
        if probe.fail_load {
            return Err(PlaybackError::Load {
                source_uri: request.source.clone(),
                reason: "unsupported format".into(),
            });
        }
        probe.calls.push(DeviceCall::Load {
            source: request.source.clone(),
            generation: request.generation,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut probe = self.probe.borrow_mut();
        if probe.reject_play {
            return Err(PlaybackError::PlayRejected("autoplay blocked".into()));
        }
        probe.calls.push(DeviceCall::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.probe.borrow_mut().calls.push(DeviceCall::Pause);
        Ok(())
    }

    fn set_position(&mut self, secs: f64) -> Result<()> {
        self.probe.borrow_mut().calls.push(DeviceCall::SetPosition(secs));
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<()> {
        self.probe.borrow_mut().calls.push(DeviceCall::SetVolume(level));
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.probe.borrow_mut().calls.push(DeviceCall::SetMuted(muted));
        Ok(())
    }
}

/// Factory producing mock devices that record into `probe`
pub fn mock_factory(probe: Probe) -> impl DeviceFactory {
    move |events: DeviceEventSender| -> Result<Box<dyn PlaybackDevice>> {
        {
            let mut p = probe.borrow_mut();
            p.opened += 1;
            p.sender = Some(events);
        }
        Ok(Box::new(MockDevice {
            probe: Rc::clone(&probe),
        }))
    }
}

/// Factory that can never open a device
pub fn unavailable_factory() -> impl DeviceFactory {
    |_events: DeviceEventSender| -> Result<Box<dyn PlaybackDevice>> {
        Err(PlaybackError::DeviceUnavailable("no audio output".into()))
    }
}

/// Picker that replays a fixed script of indices
pub struct ScriptedPicker {
    script: VecDeque<usize>,
}

impl ScriptedPicker {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl IndexPicker for ScriptedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.script.pop_front().unwrap_or(0) % len
    }
}

pub fn create_test_track(id: &str, duration: u32) -> Track {
    Track::new(
        TrackId::new(id),
        format!("Track {id}"),
        "Test Artist",
        "Test Album",
        duration,
        format!("https://example.test/{id}.mp3"),
    )
}

pub fn create_test_tracks(count: usize) -> Vec<Track> {
    (1..=count)
        .map(|i| create_test_track(&i.to_string(), 60))
        .collect()
}

/// Sequencer wired to a fresh mock device
pub fn mock_sequencer() -> (Sequencer, Probe) {
    mock_sequencer_with(PlaybackConfig::default())
}

pub fn mock_sequencer_with(config: PlaybackConfig) -> (Sequencer, Probe) {
    let probe: Probe = Rc::default();
    let seq = Sequencer::new(config, mock_factory(Rc::clone(&probe)));
    (seq, probe)
}

/// Load generation of the most recent `Load` call
pub fn last_generation(probe: &Probe) -> u64 {
    probe
        .borrow()
        .calls
        .iter()
        .rev()
        .find_map(|call| match call {
            DeviceCall::Load { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("no load recorded")
}
