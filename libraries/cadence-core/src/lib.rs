//! Cadence Player Core
//!
//! Platform-agnostic domain types and error handling for Cadence Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist` and their identifiers
//! - **Library helpers**: the starter library and text filtering
//! - **Error Handling**: unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Playlist, Track, TrackId};
//!
//! let track = Track::new(
//!     TrackId::new("1"),
//!     "Sunset Dreams",
//!     "Aurora Waves",
//!     "Electronic Horizons",
//!     245,
//!     "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
//! );
//!
//! let mut playlist = Playlist::new("Chill Vibes");
//! assert!(playlist.push(track.clone()));
//! assert!(!playlist.push(track)); // duplicates by id are ignored
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod library;
pub mod types;

pub use error::{CadenceError, Result};
pub use library::{filter_tracks, sample_library};
pub use types::{position_of, Playlist, PlaylistId, Track, TrackId};
