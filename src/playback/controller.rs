// Soundboard controller
// Owns one handle per preset: at most one plays, and all carry the effective level

use std::time::Duration;

use tokio::runtime::Handle;

use crate::audio::{AudioHandle, HandleFactory, PlayOutcome, PlayRequest};
use crate::error::{PlaybackRejected, Result, SoundboardError};
use crate::playback::state::{PlaybackState, Transition};
use crate::playback::volume::{broadcast, Volume};
use crate::presets::{MoodPreset, PresetRegistry};
use crate::task::spawn_detached;
use crate::view::SoundboardView;

pub struct SoundboardController<H: AudioHandle> {
    registry: PresetRegistry,
    // Index-aligned with `registry`
    handles: Vec<H>,
    state: PlaybackState,
    mounted: bool,
}

impl<H: AudioHandle> SoundboardController<H> {
    /// Create a looping handle for every preset and apply the initial level
    pub fn mount<F>(registry: PresetRegistry, factory: &F, volume: Volume) -> Self
    where
        F: HandleFactory<Handle = H>,
    {
        let mut handles: Vec<H> = registry
            .iter()
            .map(|preset| {
                let mut handle = factory.create(&preset.sound_file);
                handle.set_looping(true);
                handle
            })
            .collect();

        broadcast(handles.iter_mut(), volume.effective());
        tracing::info!("Soundboard mounted with {} moods", handles.len());

        Self {
            registry,
            handles,
            state: PlaybackState::new(volume),
            mounted: true,
        }
    }

    /// Toggle `mood`: start it, stop it if it is already active, or switch to it
    pub fn select(&mut self, mood: &str) -> Result<Transition> {
        if !self.mounted {
            return Err(SoundboardError::Unmounted);
        }
        let target = self
            .registry
            .index_of(mood)
            .ok_or_else(|| SoundboardError::UnknownMood(mood.to_string()))?;

        for (index, handle) in self.handles.iter_mut().enumerate() {
            if index != target {
                stop_and_rewind(handle);
            }
        }

        let transition = self.state.select(mood);
        let handle = &mut self.handles[target];

        match &transition {
            Transition::Stopped { .. } => stop_and_rewind(handle),
            Transition::Started { .. } | Transition::Switched { .. } => {
                handle.set_volume(self.state.effective_level());
                watch_play_request(mood.to_string(), handle.play());
            }
        }

        tracing::info!("Mood transition: {:?}", transition);
        Ok(transition)
    }

    /// Store a 0.0-1.0 volume and push the effective level to every handle
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.state.volume_mut().set_level(volume)?;
        self.broadcast_level();
        Ok(())
    }

    /// Same as [`set_volume`](Self::set_volume) for a 0-100 slider value
    pub fn set_volume_percent(&mut self, percent: f32) -> Result<()> {
        self.state.volume_mut().set_percent(percent)?;
        self.broadcast_level();
        Ok(())
    }

    /// Flip mute and push the effective level to every handle. Returns the new mute state.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.state.volume_mut().toggle_mute();
        self.broadcast_level();
        tracing::debug!("Muted: {}", muted);
        muted
    }

    fn broadcast_level(&mut self) {
        if self.mounted {
            broadcast(self.handles.iter_mut(), self.state.effective_level());
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    pub fn active_mood(&self) -> Option<&MoodPreset> {
        self.state
            .active_mood()
            .and_then(|name| self.registry.find(name))
    }

    pub fn handle(&self, mood: &str) -> Option<&H> {
        self.registry.index_of(mood).map(|i| &self.handles[i])
    }

    /// Presets paired with their handles, in registry order
    pub fn handles(&self) -> impl Iterator<Item = (&MoodPreset, &H)> {
        self.registry.iter().zip(self.handles.iter())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Render snapshot for the UI
    pub fn view(&self) -> SoundboardView {
        SoundboardView::build(&self.registry, &self.state, &mut rand::thread_rng())
    }

    /// Stop and release every handle. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for handle in &mut self.handles {
            handle.release();
        }
        self.mounted = false;
        tracing::info!("Soundboard unmounted");
    }
}

impl<H: AudioHandle> Drop for SoundboardController<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn stop_and_rewind<H: AudioHandle>(handle: &mut H) {
    handle.pause();
    handle.set_position(Duration::ZERO);
}

/// Log the play outcome whenever it arrives; never block the caller
fn watch_play_request(mood: String, mut request: PlayRequest) {
    if let Some(outcome) = request.try_outcome() {
        log_play_outcome(&mood, outcome);
        return;
    }

    match Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(async move {
                let outcome = request.await;
                log_play_outcome(&mood, outcome);
            });
        }
        Err(_) => spawn_detached("moodboard-play", move || {
            let outcome = request.wait();
            log_play_outcome(&mood, outcome);
        }),
    }
}

fn log_play_outcome(mood: &str, outcome: PlayOutcome) {
    match outcome {
        Ok(()) => tracing::debug!("Playback started for {}", mood),
        Err(PlaybackRejected::Interrupted) => {
            tracing::debug!("Play request for {} superseded by a pause", mood)
        }
        Err(e) => tracing::error!("Audio playback error for {}: {}", mood, e),
    }
}
