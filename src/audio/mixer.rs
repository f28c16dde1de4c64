// Voice mixer
// Each handle owns one voice; the output callback sums every playing voice

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::audio::track::LoopTrack;

/// Read position plus a count of explicit seeks.
/// The callback only publishes its advance if no seek landed while it rendered.
#[derive(Debug, Default, Clone, Copy)]
struct Cursor {
    frame: usize,
    seeks: u64,
}

/// Playback state shared between a handle and the output callback
#[derive(Debug)]
pub struct Voice {
    track: Mutex<Option<Arc<LoopTrack>>>,
    cursor: Mutex<Cursor>,
    playing: AtomicBool,
    looping: AtomicBool,
    gain: AtomicU32,
}

impl Voice {
    fn new() -> Self {
        Self {
            track: Mutex::new(None),
            cursor: Mutex::new(Cursor::default()),
            playing: AtomicBool::new(false),
            looping: AtomicBool::new(false),
            gain: AtomicU32::new(1.0f32.to_bits()),
        }
    }

    pub fn track(&self) -> Option<Arc<LoopTrack>> {
        self.track.lock().clone()
    }

    pub fn set_track(&self, track: Option<Arc<LoopTrack>>) {
        *self.track.lock() = track;
    }

    pub fn has_track(&self) -> bool {
        self.track.lock().is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
    }

    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Relaxed)
    }

    pub fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::Relaxed);
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain.load(Ordering::Relaxed))
    }

    pub fn set_gain(&self, gain: f32) {
        self.gain.store(gain.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    /// Current frame
    pub fn cursor(&self) -> usize {
        self.cursor.lock().frame
    }

    pub fn seek(&self, frame: usize) {
        let mut cursor = self.cursor.lock();
        cursor.frame = frame;
        cursor.seeks = cursor.seeks.wrapping_add(1);
    }

    /// Add this voice into `out` (interleaved, `channels` wide)
    fn mix_into(&self, out: &mut [f32], channels: usize) {
        if !self.is_playing() {
            return;
        }

        let track = match self.track.lock().as_ref() {
            Some(track) => Arc::clone(track),
            None => return,
        };
        let frames = track.frames();
        if frames == 0 {
            self.set_playing(false);
            return;
        }

        let gain = self.gain();
        let looping = self.is_looping();
        let start = *self.cursor.lock();
        let mut cursor = start.frame;

        for frame in out.chunks_exact_mut(channels) {
            if cursor >= frames {
                if looping {
                    cursor = 0;
                } else {
                    // Ended: stays at the end until someone seeks
                    self.set_playing(false);
                    break;
                }
            }
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample += track.sample(cursor, ch) * gain;
            }
            cursor += 1;
        }

        let mut shared = self.cursor.lock();
        // A seek during this block wins over the block's advance
        if shared.seeks == start.seeks {
            shared.frame = cursor;
        }
    }
}

/// Sums voices into the output format
pub struct Mixer {
    voices: Mutex<Vec<Weak<Voice>>>,
    sample_rate: u32,
    channels: usize,
}

impl Mixer {
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            voices: Mutex::new(Vec::new()),
            sample_rate,
            channels: channels.max(1),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Register a new voice. It is dropped from the mix once its owner lets go.
    pub fn add_voice(&self) -> Arc<Voice> {
        let voice = Arc::new(Voice::new());
        self.voices.lock().push(Arc::downgrade(&voice));
        voice
    }

    pub fn voice_count(&self) -> usize {
        self.voices.lock().iter().filter(|v| v.strong_count() > 0).count()
    }

    /// Fill `out` with the next block of interleaved output
    pub fn render(&self, out: &mut [f32]) {
        out.fill(0.0);

        let mut voices = self.voices.lock();
        voices.retain(|voice| match voice.upgrade() {
            Some(voice) => {
                voice.mix_into(out, self.channels);
                true
            }
            None => false,
        });

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}
