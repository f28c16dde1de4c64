// Mood presets
// Built-in moods and the ordered registry that holds them

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, SoundboardError};

/// Background theme shown while no mood is playing
pub const IDLE_BACKGROUND: &str = "bg-gradient-to-br from-gray-100 to-gray-300";

/// A named, themed audio option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodPreset {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub background: String,
    pub sound_file: PathBuf,
}

impl MoodPreset {
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        background: impl Into<String>,
        sound_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            background: background.into(),
            sound_file: sound_file.into(),
        }
    }

    /// Resolve a relative sound file against `base`
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        if self.sound_file.is_relative() {
            self.sound_file = base.join(&self.sound_file);
        }
        self
    }
}

/// Fixed ordered list of presets, constant for the life of the soundboard
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<MoodPreset>,
}

impl PresetRegistry {
    /// Build a registry, rejecting an empty list and duplicate names
    pub fn new(presets: Vec<MoodPreset>) -> Result<Self> {
        if presets.is_empty() {
            return Err(SoundboardError::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        for preset in &presets {
            if !seen.insert(preset.name.as_str()) {
                return Err(SoundboardError::DuplicatePreset(preset.name.clone()));
            }
        }

        Ok(Self { presets })
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoodPreset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MoodPreset> {
        self.presets.get(index)
    }

    /// Position of the preset named `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&MoodPreset> {
        self.index_of(name).map(|i| &self.presets[i])
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self {
            presets: default_presets(),
        }
    }
}

/// The six built-in moods, in display order
pub fn default_presets() -> Vec<MoodPreset> {
    vec![
        MoodPreset::new(
            "Thunder",
            "cloud-lightning",
            "bg-purple-500",
            "bg-gradient-to-br from-slate-900 to-purple-900",
            "sounds/thunder.mp3",
        ),
        MoodPreset::new(
            "Ocean",
            "waves",
            "bg-blue-500",
            "bg-gradient-to-br from-blue-400 to-blue-800",
            "sounds/ocean.mp3",
        ),
        MoodPreset::new(
            "Rain",
            "droplets",
            "bg-sky-500",
            "bg-gradient-to-br from-gray-400 to-sky-700",
            "sounds/rain.mp3",
        ),
        MoodPreset::new(
            "Forest",
            "leaf",
            "bg-green-500",
            "bg-gradient-to-br from-green-300 to-green-800",
            "sounds/forest.mp3",
        ),
        MoodPreset::new(
            "Fireplace",
            "flame",
            "bg-orange-500",
            "bg-gradient-to-br from-orange-300 to-red-800",
            "sounds/fireplace.mp3",
        ),
        MoodPreset::new(
            "Meditation",
            "cloud",
            "bg-indigo-500",
            "bg-gradient-to-br from-indigo-300 to-indigo-900",
            "sounds/meditation.mp3",
        ),
    ]
}
