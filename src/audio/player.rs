// Audio player implementation
// One TrackPlayer per preset, decoding its source lazily on first play

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::audio::mixer::Voice;
use crate::audio::track::{duration_to_frames, frames_to_duration, LoopTrack};
use crate::audio::{AudioHandle, PlayRequest};
use crate::error::PlaybackRejected;
use crate::task::spawn_detached;

const RELEASED: u64 = u64::MAX;

pub struct TrackPlayer {
    source: PathBuf,
    voice: Arc<Voice>,
    sample_rate: u32,
    // Bumped by every pause; a load finishing under an older value must not start output.
    // Held while output is switched on or off.
    generation: Arc<Mutex<u64>>,
    volume: f32,
    released: bool,
}

impl TrackPlayer {
    pub(crate) fn new(source: &Path, voice: Arc<Voice>, sample_rate: u32) -> Self {
        Self {
            source: source.to_path_buf(),
            voice,
            sample_rate,
            generation: Arc::new(Mutex::new(0)),
            volume: 1.0,
            released: false,
        }
    }

    /// Whether the source has been decoded
    pub fn is_loaded(&self) -> bool {
        self.voice.has_track()
    }

    /// Length of the decoded source, once loaded
    pub fn duration(&self) -> Option<Duration> {
        self.voice.track().map(|t| t.duration())
    }
}

impl AudioHandle for TrackPlayer {
    fn source(&self) -> &Path {
        &self.source
    }

    fn set_looping(&mut self, looping: bool) {
        self.voice.set_looping(looping);
    }

    fn is_looping(&self) -> bool {
        self.voice.is_looping()
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        self.voice.set_gain(self.volume);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn play(&mut self) -> PlayRequest {
        if self.released {
            return PlayRequest::resolved(Err(PlaybackRejected::Released));
        }

        if let Some(track) = self.voice.track() {
            // Restart a one-shot that ran off the end
            if self.voice.cursor() >= track.frames() {
                self.voice.seek(0);
            }
            let _generation = self.generation.lock();
            self.voice.set_playing(true);
            return PlayRequest::resolved(Ok(()));
        }

        let (resolver, request) = PlayRequest::pending();
        let requested_at = *self.generation.lock();
        let generation = Arc::clone(&self.generation);
        let voice = Arc::clone(&self.voice);
        let source = self.source.clone();
        let sample_rate = self.sample_rate;

        spawn_detached("moodboard-loader", move || {
            let track = match LoopTrack::load(&source, sample_rate) {
                Ok(track) => track,
                Err(e) => {
                    resolver.resolve(Err(e));
                    return;
                }
            };

            let outcome = {
                let current = generation.lock();
                if *current == RELEASED {
                    Err(PlaybackRejected::Released)
                } else {
                    // An earlier request for the same handle may have loaded it already
                    if !voice.has_track() {
                        voice.set_track(Some(Arc::new(track)));
                    }
                    if *current == requested_at {
                        voice.set_playing(true);
                        Ok(())
                    } else {
                        Err(PlaybackRejected::Interrupted)
                    }
                }
            };
            resolver.resolve(outcome);
        });

        request
    }

    fn pause(&mut self) {
        let mut generation = self.generation.lock();
        if !self.released {
            *generation += 1;
        }
        self.voice.set_playing(false);
    }

    fn is_playing(&self) -> bool {
        self.voice.is_playing()
    }

    fn position(&self) -> Duration {
        frames_to_duration(self.voice.cursor(), self.sample_rate)
    }

    fn set_position(&mut self, position: Duration) {
        let mut frame = duration_to_frames(position, self.sample_rate);
        if let Some(track) = self.voice.track() {
            frame = frame.min(track.frames());
        }
        self.voice.seek(frame);
    }

    fn release(&mut self) {
        self.released = true;
        *self.generation.lock() = RELEASED;
        self.voice.set_playing(false);
        self.voice.seek(0);
        self.voice.set_track(None);
    }
}
