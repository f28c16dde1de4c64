// Settings module
// Startup configuration loaded from JSON

#[allow(clippy::module_inception)]
pub mod settings;

pub use settings::{OutputSettings, PresetSettings, SoundboardSettings, SETTINGS_FILE};
