//! Cadence Player application layer
//!
//! Composition root, configuration and the simulated playback device used
//! by the `cadence` command-line host.

pub mod app;
pub mod config;
pub mod error;
pub mod feedback;
pub mod sim_device;

pub use app::PlayerApp;
pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use feedback::RecentlyAdded;
pub use sim_device::{SimulatedDevice, SimulationSettings};
