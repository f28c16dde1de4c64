// Render snapshot handed to the UI surfaces

use rand::Rng;
use serde::Serialize;

use crate::playback::PlaybackState;
use crate::presets::{PresetRegistry, IDLE_BACKGROUND};
use crate::waveform::Waveform;

pub const STOP_HINT: &str = "Click the same mood again to stop the sound";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetView {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLine {
    pub headline: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundboardView {
    pub presets: Vec<PresetView>,
    pub active_mood: Option<String>,
    pub muted: bool,
    pub volume_percent: u8,
    pub background: String,
    pub waveform: Option<Waveform>,
    pub status: Option<StatusLine>,
}

impl SoundboardView {
    pub fn build<R: Rng>(
        registry: &PresetRegistry,
        state: &PlaybackState,
        rng: &mut R,
    ) -> Self {
        let active = state.active_mood().and_then(|name| registry.find(name));

        let presets = registry
            .iter()
            .map(|preset| PresetView {
                name: preset.name.clone(),
                icon: preset.icon.clone(),
                color: preset.color.clone(),
                active: active.map_or(false, |a| a.name == preset.name),
            })
            .collect();

        Self {
            presets,
            active_mood: active.map(|p| p.name.clone()),
            muted: state.is_muted(),
            volume_percent: state.volume().percent(),
            background: active
                .map(|p| p.background.clone())
                .unwrap_or_else(|| IDLE_BACKGROUND.to_string()),
            waveform: active.map(|_| Waveform::generate(rng)),
            status: active.map(|p| StatusLine {
                headline: format!("Currently playing: {}", p.name),
                hint: STOP_HINT.to_string(),
            }),
        }
    }
}
