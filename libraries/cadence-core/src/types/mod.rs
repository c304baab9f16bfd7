mod ids;
mod playlist;
mod track;

pub use ids::{PlaylistId, TrackId};
pub use playlist::Playlist;
pub use track::{position_of, Track};
