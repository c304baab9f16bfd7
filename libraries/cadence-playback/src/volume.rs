//! Volume and mute state
//!
//! Level and mute are independent, with one coupling: setting the level to
//! exactly zero forces mute on. Toggling mute never touches the level.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create a volume controller
    pub fn new(level: f32, muted: bool) -> Self {
        let mut volume = Self {
            level: 1.0,
            muted,
        };
        volume.set_level(level);
        volume
    }

    /// Set volume level (0.0-1.0)
    ///
    /// A level of exactly zero also mutes. Any other level leaves the mute
    /// flag alone.
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
        if self.level == 0.0 {
            self.muted = true;
        }
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}
