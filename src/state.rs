// Application state management
use parking_lot::Mutex;

use crate::audio::{AudioEngine, TrackPlayer};
use crate::playback::SoundboardController;

pub struct AppState {
    pub controller: Mutex<SoundboardController<TrackPlayer>>,
    // Keeps the output stream alive for as long as the app runs
    pub engine: AudioEngine,
}

impl AppState {
    pub fn new(controller: SoundboardController<TrackPlayer>, engine: AudioEngine) -> Self {
        Self {
            controller: Mutex::new(controller),
            engine,
        }
    }
}
