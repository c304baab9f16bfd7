/// Cadence - command-line music player
use anyhow::Context;
use cadence_core::{PlaylistId, Track, TrackId};
use cadence_player::{PlayerApp, PlayerConfig, SimulatedDevice, SimulationSettings};
use cadence_playback::{PlaybackState, RepeatMode, Sequencer};
use cadence_search::{DebouncedSearch, MockCatalog, SearchService};
use cadence_storage::PersistentStore;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence music player", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./cadence.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Do not touch the on-disk store
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the track library
    Library {
        /// Only show tracks whose title, artist or album contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Search the online catalog
    Search {
        query: String,
        /// Add every result to the library
        #[arg(long)]
        add: bool,
    },
    /// Manage playlists
    Playlist {
        #[command(subcommand)]
        action: PlaylistCommand,
    },
    /// Play a track on the simulated device
    Play {
        /// Library track id
        track_id: String,
        /// Play from this playlist instead of the library
        #[arg(short, long)]
        playlist: Option<String>,
        /// Turn shuffle on
        #[arg(long)]
        shuffle: bool,
        /// Repeat policy
        #[arg(long, value_enum, default_value_t = RepeatArg::None)]
        repeat: RepeatArg,
        /// Wall-clock seconds to keep playing
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        /// Virtual seconds per wall-clock second
        #[arg(long)]
        speed: Option<f64>,
    },
    /// Set and persist the output volume (0.0-1.0)
    Volume { level: f32 },
    /// Toggle and persist mute
    Mute,
}

#[derive(Subcommand)]
enum PlaylistCommand {
    /// Create an empty playlist
    Create { name: String },
    /// List playlists
    List,
    /// Show a playlist's tracks
    Show { id: String },
    /// Append a library track
    Add { id: String, track_id: String },
    /// Remove a track
    Remove { id: String, track_id: String },
    /// Rename a playlist
    Rename { id: String, name: String },
    /// Remove every track
    Clear { id: String },
    /// Delete a playlist
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    None,
    One,
    All,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::None => RepeatMode::Off,
            RepeatArg::One => RepeatMode::One,
            RepeatArg::All => RepeatMode::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => PlayerConfig::load_from(Some(path), None)?,
        None => PlayerConfig::load()?,
    };
    if cli.in_memory {
        config.storage.in_memory = true;
    }

    match cli.command {
        Commands::Library { filter } => list_library(&config, filter.as_deref())?,
        Commands::Search { query, add } => search(&config, &query, add).await?,
        Commands::Playlist { action } => playlist(&config, action)?,
        Commands::Play {
            track_id,
            playlist,
            shuffle,
            repeat,
            seconds,
            speed,
        } => {
            if let Some(speed) = speed {
                config.playback.simulation_speed = speed;
                config.validate()?;
            }
            let request = PlayRequest {
                track_id: TrackId::new(track_id),
                playlist: playlist.map(PlaylistId::new),
                shuffle,
                repeat: repeat.into(),
                duration: Duration::from_secs(seconds),
            };
            // the sequencer and its device stay on one blocking thread
            tokio::task::spawn_blocking(move || play(&config, &request)).await??;
        }
        Commands::Volume { level } => {
            let mut app = open_app(&config)?;
            app.set_volume(level);
            let transport = app.transport();
            println!("Volume {:.2} (muted: {})", transport.volume, transport.muted);
        }
        Commands::Mute => {
            let mut app = open_app(&config)?;
            app.toggle_mute();
            println!("Muted: {}", app.transport().muted);
        }
    }

    Ok(())
}

fn open_store(config: &PlayerConfig) -> anyhow::Result<PersistentStore> {
    if config.storage.in_memory {
        return Ok(PersistentStore::in_memory());
    }
    PersistentStore::open(&config.storage.path)
        .with_context(|| format!("opening store at {}", config.storage.path.display()))
}

fn open_app(config: &PlayerConfig) -> anyhow::Result<PlayerApp> {
    let store = open_store(config)?;
    let settings = SimulationSettings {
        tick: config.tick(),
        speed: config.playback.simulation_speed,
    };
    let sequencer = Sequencer::new(config.playback_config(), SimulatedDevice::factory(settings));
    Ok(PlayerApp::new(store, sequencer, config.added_ttl()))
}

fn print_track(track: &Track) {
    println!(
        "  {} - {} / {} ({}) [{}:{:02}]",
        track.id,
        track.title,
        track.artist,
        track.album,
        track.duration / 60,
        track.duration % 60
    );
}

fn list_library(config: &PlayerConfig, filter: Option<&str>) -> anyhow::Result<()> {
    let app = open_app(config)?;
    let tracks = app.library().filter(filter.unwrap_or(""));

    println!("Library ({} tracks):", tracks.len());
    for track in tracks {
        print_track(track);
    }
    Ok(())
}

async fn search(config: &PlayerConfig, query: &str, add: bool) -> anyhow::Result<()> {
    let catalog: Arc<dyn SearchService> =
        Arc::new(MockCatalog::with_latency(config.search_latency()));
    let mut search = DebouncedSearch::with_delay(catalog, config.debounce());

    search.set_query(query);
    let results = search.settled().await;

    println!("Results for {:?}:", results.query);
    for track in &results.tracks {
        print_track(track);
    }

    if add && !results.tracks.is_empty() {
        let mut app = open_app(config)?;
        for track in results.tracks {
            let title = track.title.clone();
            if app.add_to_library(track) {
                println!("Added! {title}");
            }
        }
    }
    Ok(())
}

fn playlist(config: &PlayerConfig, action: PlaylistCommand) -> anyhow::Result<()> {
    let mut app = open_app(config)?;

    match action {
        PlaylistCommand::Create { name } => {
            let playlist = app.create_playlist(name);
            println!("Created {} ({})", playlist.name, playlist.id);
        }
        PlaylistCommand::List => {
            println!("Playlists:");
            for playlist in app.playlists() {
                println!("  {} - {} ({} tracks)", playlist.id, playlist.name, playlist.len());
            }
        }
        PlaylistCommand::Show { id } => {
            let id = PlaylistId::new(id);
            let playlist = app
                .playlist(&id)
                .with_context(|| format!("playlist {id} not found"))?;
            println!("{} (created {}):", playlist.name, playlist.created_at.to_rfc3339());
            for track in playlist.tracks() {
                print_track(track);
            }
        }
        PlaylistCommand::Add { id, track_id } => {
            let track_id = TrackId::new(track_id);
            let track = app
                .library()
                .get(&track_id)
                .cloned()
                .with_context(|| format!("track {track_id} not in library"))?;
            report(app.add_to_playlist(&PlaylistId::new(id), track), "added");
        }
        PlaylistCommand::Remove { id, track_id } => {
            let changed = app.remove_from_playlist(&PlaylistId::new(id), &TrackId::new(track_id));
            report(changed, "removed");
        }
        PlaylistCommand::Rename { id, name } => {
            report(app.rename_playlist(&PlaylistId::new(id), name), "renamed");
        }
        PlaylistCommand::Clear { id } => report(app.clear_playlist(&PlaylistId::new(id)), "cleared"),
        PlaylistCommand::Delete { id } => report(app.delete_playlist(&PlaylistId::new(id)), "deleted"),
    }
    Ok(())
}

fn report(changed: bool, action: &str) {
    if changed {
        println!("Playlist {action}");
    } else {
        println!("Nothing changed");
    }
}

struct PlayRequest {
    track_id: TrackId,
    playlist: Option<PlaylistId>,
    shuffle: bool,
    repeat: RepeatMode,
    duration: Duration,
}

fn play(config: &PlayerConfig, request: &PlayRequest) -> anyhow::Result<()> {
    let mut app = open_app(config)?;

    if app.transport().shuffled != request.shuffle {
        app.toggle_shuffle();
    }
    while app.transport().repeat != request.repeat {
        app.cycle_repeat_mode();
    }

    match &request.playlist {
        Some(playlist) => app.play_from_playlist(playlist, &request.track_id)?,
        None => app.play_from_library(&request.track_id)?,
    }

    let deadline = Instant::now() + request.duration;
    let poll = config.tick().max(Duration::from_millis(50));
    loop {
        for event in app.drain_events() {
            tracing::info!(?event, "playback");
        }
        if app.transport().state == PlaybackState::Ended {
            break;
        }
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        app.pump_blocking(poll.min(deadline - now));
    }

    let transport = app.transport();
    match transport.current_track {
        Some(track) => println!(
            "{:?}: {} at {:.1}s",
            transport.state, track.title, transport.position
        ),
        None => println!("{:?}: nothing playing", transport.state),
    }
    Ok(())
}
