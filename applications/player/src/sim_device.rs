/// Simulated playback device
///
/// Stands in for real audio output. A dedicated thread owns a virtual
/// playhead, advances it on a crossbeam ticker while playing, and reports
/// position and end-of-track through the device event channel. The
/// sequencer side talks to the thread over a bounded command channel.
use cadence_playback::{
    DeviceEvent, DeviceEventSender, DeviceFactory, LoadRequest, PlaybackDevice, PlaybackError,
    Result,
};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Commands sent to the device thread
#[derive(Debug)]
enum DeviceCommand {
    Load { generation: u64, duration_secs: f64 },
    Play,
    Pause,
    Seek(f64),
    Shutdown,
}

/// Timing for the simulated device
#[derive(Debug, Clone, Copy)]
pub struct SimulationSettings {
    /// Wall-clock interval between position reports
    pub tick: Duration,

    /// Virtual seconds per wall-clock second
    pub speed: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            speed: 1.0,
        }
    }
}

/// Playhead owned by the device thread
struct Playhead {
    generation: u64,
    duration: f64,
    position: f64,
    playing: bool,
    loaded: bool,
}

impl Playhead {
    fn ended(&self) -> bool {
        self.position >= self.duration
    }
}

pub struct SimulatedDevice {
    command_tx: Sender<DeviceCommand>,
    volume: f32,
    muted: bool,
    _device_thread: Option<JoinHandle<()>>,
}

impl SimulatedDevice {
    /// Start the device thread
    pub fn open(events: DeviceEventSender, settings: SimulationSettings) -> Result<Self> {
        if settings.tick.is_zero() {
            return Err(PlaybackError::DeviceUnavailable(
                "simulation tick must be non-zero".to_string(),
            ));
        }

        let (command_tx, command_rx) = bounded::<DeviceCommand>(32);
        let device_thread = thread::Builder::new()
            .name("cadence-sim-device".to_string())
            .spawn(move || Self::device_thread_run(&command_rx, &events, settings))
            .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;

        tracing::debug!(?settings, "simulated device started");
        Ok(Self {
            command_tx,
            volume: 1.0,
            muted: false,
            _device_thread: Some(device_thread),
        })
    }

    /// Factory opening a simulated device on first use
    pub fn factory(settings: SimulationSettings) -> impl DeviceFactory {
        move |events: DeviceEventSender| -> Result<Box<dyn PlaybackDevice>> {
            Ok(Box::new(SimulatedDevice::open(events, settings)?))
        }
    }

    /// Last volume applied
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn device_thread_run(
        command_rx: &Receiver<DeviceCommand>,
        events: &DeviceEventSender,
        settings: SimulationSettings,
    ) {
        let ticker = tick(settings.tick);
        let step = settings.tick.as_secs_f64() * settings.speed;
        let mut head = Playhead {
            generation: 0,
            duration: 0.0,
            position: 0.0,
            playing: false,
            loaded: false,
        };

        loop {
            let running = select! {
                recv(command_rx) -> cmd => match cmd {
                    Ok(cmd) => Self::apply(&mut head, cmd, events),
                    Err(_) => false,
                },
                recv(ticker) -> _ => {
                    Self::advance(&mut head, step, events);
                    true
                },
            };
            if !running {
                break;
            }
        }

        tracing::debug!("simulated device stopped");
    }

    /// Apply one command; returns `false` on shutdown
    fn apply(head: &mut Playhead, cmd: DeviceCommand, events: &DeviceEventSender) -> bool {
        match cmd {
            DeviceCommand::Load {
                generation,
                duration_secs,
            } => {
                *head = Playhead {
                    generation,
                    duration: duration_secs,
                    position: 0.0,
                    playing: false,
                    loaded: true,
                };
                events.send(generation, DeviceEvent::LoadedData);
            }
            DeviceCommand::Play => {
                if head.loaded {
                    if head.ended() {
                        head.position = 0.0;
                    }
                    head.playing = true;
                }
            }
            DeviceCommand::Pause => head.playing = false,
            DeviceCommand::Seek(secs) => {
                if head.loaded {
                    head.position = secs.clamp(0.0, head.duration);
                    events.send(head.generation, DeviceEvent::TimeUpdate(head.position));
                }
            }
            DeviceCommand::Shutdown => return false,
        }
        true
    }

    fn advance(head: &mut Playhead, step: f64, events: &DeviceEventSender) {
        if !head.playing {
            return;
        }
        head.position = (head.position + step).min(head.duration);
        events.send(head.generation, DeviceEvent::TimeUpdate(head.position));
        if head.ended() {
            head.playing = false;
            events.send(head.generation, DeviceEvent::Ended);
        }
    }

    fn send(&self, cmd: DeviceCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| PlaybackError::Device(format!("device thread gone: {e}")))
    }
}

impl PlaybackDevice for SimulatedDevice {
    fn load(&mut self, request: &LoadRequest) -> Result<()> {
        if request.source.trim().is_empty() {
            return Err(PlaybackError::Load {
                source_uri: request.source.clone(),
                reason: "empty source".to_string(),
            });
        }
        tracing::debug!(source = %request.source, generation = request.generation, "loading");
        self.send(DeviceCommand::Load {
            generation: request.generation,
            duration_secs: f64::from(request.duration_secs),
        })
    }

    fn play(&mut self) -> Result<()> {
        self.send(DeviceCommand::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.send(DeviceCommand::Pause)
    }

    fn set_position(&mut self, secs: f64) -> Result<()> {
        self.send(DeviceCommand::Seek(secs))
    }

    fn set_volume(&mut self, level: f32) -> Result<()> {
        self.volume = level;
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.muted = muted;
        Ok(())
    }
}

impl Drop for SimulatedDevice {
    fn drop(&mut self) {
        let _ = self.command_tx.send(DeviceCommand::Shutdown);
    }
}

impl std::fmt::Debug for SimulatedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedDevice")
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}
