// Startup configuration
// Read once at launch; the soundboard never writes it back
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SoundboardError};
use crate::presets::{default_presets, MoodPreset, PresetRegistry};

/// Default settings file name
pub const SETTINGS_FILE: &str = "moodboard.json";

/// One configured mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSettings {
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_background")]
    pub background: String,
    pub sound_file: PathBuf,
}

fn default_icon() -> String {
    "cloud".to_string()
}

fn default_color() -> String {
    "bg-slate-500".to_string()
}

fn default_background() -> String {
    "bg-gradient-to-br from-slate-400 to-slate-800".to_string()
}

impl From<MoodPreset> for PresetSettings {
    fn from(preset: MoodPreset) -> Self {
        Self {
            name: preset.name,
            icon: preset.icon,
            color: preset.color,
            background: preset.background,
            sound_file: preset.sound_file,
        }
    }
}

impl From<PresetSettings> for MoodPreset {
    fn from(settings: PresetSettings) -> Self {
        MoodPreset::new(
            settings.name,
            settings.icon,
            settings.color,
            settings.background,
            settings.sound_file,
        )
    }
}

/// Output format used when no audio device can be opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub sample_rate: u32,
    pub channels: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
        }
    }
}

/// Main soundboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundboardSettings {
    pub version: i32, // Settings schema version
    /// Base directory for relative sound files.
    /// Unset means the directory holding the settings file.
    pub sounds_dir: Option<PathBuf>,
    pub initial_volume: f32, // 0.0-1.0
    pub presets: Vec<PresetSettings>,
    pub output: OutputSettings,
}

impl Default for SoundboardSettings {
    fn default() -> Self {
        Self {
            version: 1,
            sounds_dir: None,
            initial_volume: 0.5,
            presets: default_presets().into_iter().map(PresetSettings::from).collect(),
            output: OutputSettings::default(),
        }
    }
}

impl SoundboardSettings {
    /// Load settings from file, or return defaults if the file doesn't exist.
    /// Either way sound files resolve against the settings file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            let content = fs::read_to_string(path)?;
            let settings: SoundboardSettings = serde_json::from_str(&content)?;
            tracing::info!("Loaded settings from {:?}", path);
            settings
        } else {
            tracing::info!("No settings file at {:?}, using defaults", path);
            Self::default()
        };

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        settings.sounds_dir = Some(match settings.sounds_dir.take() {
            Some(dir) if dir.is_relative() => base.join(dir),
            Some(dir) => dir,
            None => base.to_path_buf(),
        });

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.initial_volume.is_finite() || !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(SoundboardError::Settings(format!(
                "initial_volume must be within 0.0-1.0, got {}",
                self.initial_volume
            )));
        }
        if self.output.sample_rate == 0 || self.output.channels == 0 {
            return Err(SoundboardError::Settings(
                "output sample_rate and channels must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the preset registry, resolving sound files against `sounds_dir`
    pub fn registry(&self) -> Result<PresetRegistry> {
        let presets = self
            .presets
            .iter()
            .cloned()
            .map(MoodPreset::from)
            .map(|preset| match &self.sounds_dir {
                Some(dir) => preset.with_base_dir(dir),
                None => preset,
            })
            .collect();
        PresetRegistry::new(presets)
    }
}
