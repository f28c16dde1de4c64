// Volume control
// Shared level and mute, broadcast to every handle as one effective level

use serde::Serialize;

use crate::audio::AudioHandle;
use crate::error::{Result, SoundboardError};

/// Stored volume plus mute flag.
///
/// Muting keeps the stored volume so unmuting restores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Volume {
    level: f32,
    muted: bool,
}

impl Volume {
    pub fn new(level: f32) -> Result<Self> {
        let mut volume = Self {
            level: 0.0,
            muted: false,
        };
        volume.set_level(level)?;
        Ok(volume)
    }

    /// Store a new level, clamped to 0.0..=1.0
    pub fn set_level(&mut self, level: f32) -> Result<()> {
        if !level.is_finite() {
            return Err(SoundboardError::InvalidVolume(level));
        }
        self.level = level.clamp(0.0, 1.0);
        Ok(())
    }

    /// Store a level reported by a 0-100 volume widget
    pub fn set_percent(&mut self, percent: f32) -> Result<()> {
        if !percent.is_finite() {
            return Err(SoundboardError::InvalidVolume(percent));
        }
        self.set_level(percent / 100.0)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Stored level as a widget percentage
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Level actually applied to playback
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            level: 0.5,
            muted: false,
        }
    }
}

/// Apply `level` to every handle, playing or not
pub fn broadcast<'a, H, I>(handles: I, level: f32)
where
    H: AudioHandle + 'a,
    I: IntoIterator<Item = &'a mut H>,
{
    for handle in handles {
        handle.set_volume(level);
    }
}
