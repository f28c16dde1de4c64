//! Controller tests
//!
//! Drive the soundboard with recording handles and check what every
//! handle was told to do.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use proptest::prelude::*;

use moodboard_lib::{
    AudioHandle, HandleFactory, PlayRequest, PlaybackRejected, PresetRegistry,
    SoundboardController, SoundboardError, Transition, Volume,
};

// ===== Test Helpers =====

#[derive(Debug, Default)]
struct Probe {
    playing: bool,
    looping: bool,
    volume: f32,
    position: Duration,
    play_calls: usize,
    pause_calls: usize,
    released: bool,
}

/// Handle that records every command it receives
struct RecordingHandle {
    source: PathBuf,
    probe: Arc<Mutex<Probe>>,
    reject: Option<PlaybackRejected>,
}

impl AudioHandle for RecordingHandle {
    fn source(&self) -> &Path {
        &self.source
    }

    fn set_looping(&mut self, looping: bool) {
        self.probe.lock().looping = looping;
    }

    fn is_looping(&self) -> bool {
        self.probe.lock().looping
    }

    fn set_volume(&mut self, level: f32) {
        self.probe.lock().volume = level;
    }

    fn volume(&self) -> f32 {
        self.probe.lock().volume
    }

    fn play(&mut self) -> PlayRequest {
        let mut probe = self.probe.lock();
        probe.play_calls += 1;
        match &self.reject {
            Some(reason) => PlayRequest::resolved(Err(reason.clone())),
            None => {
                probe.playing = true;
                PlayRequest::resolved(Ok(()))
            }
        }
    }

    fn pause(&mut self) {
        let mut probe = self.probe.lock();
        probe.pause_calls += 1;
        probe.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.probe.lock().playing
    }

    fn position(&self) -> Duration {
        self.probe.lock().position
    }

    fn set_position(&mut self, position: Duration) {
        self.probe.lock().position = position;
    }

    fn release(&mut self) {
        let mut probe = self.probe.lock();
        probe.playing = false;
        probe.released = true;
    }
}

#[derive(Default)]
struct RecordingFactory {
    probes: Mutex<HashMap<PathBuf, Arc<Mutex<Probe>>>>,
    rejected: Vec<PathBuf>,
}

impl RecordingFactory {
    fn rejecting(source: &str) -> Self {
        Self {
            rejected: vec![PathBuf::from(source)],
            ..Self::default()
        }
    }

    fn probe(&self, source: &str) -> Arc<Mutex<Probe>> {
        Arc::clone(&self.probes.lock()[&PathBuf::from(source)])
    }

    fn all_probes(&self) -> Vec<Arc<Mutex<Probe>>> {
        self.probes.lock().values().cloned().collect()
    }

    fn playing_count(&self) -> usize {
        self.all_probes().iter().filter(|p| p.lock().playing).count()
    }
}

impl HandleFactory for RecordingFactory {
    type Handle = RecordingHandle;

    fn create(&self, source: &Path) -> RecordingHandle {
        let probe = Arc::new(Mutex::new(Probe::default()));
        self.probes
            .lock()
            .insert(source.to_path_buf(), Arc::clone(&probe));

        let reject = self
            .rejected
            .iter()
            .any(|p| p == source)
            .then(|| PlaybackRejected::Unavailable {
                path: source.to_path_buf(),
                reason: "autoplay blocked".to_string(),
            });

        RecordingHandle {
            source: source.to_path_buf(),
            probe,
            reject,
        }
    }
}

const RAIN: &str = "sounds/rain.mp3";
const OCEAN: &str = "sounds/ocean.mp3";

fn mount(factory: &RecordingFactory) -> SoundboardController<RecordingHandle> {
    SoundboardController::mount(PresetRegistry::default(), factory, Volume::default())
}

// ===== Mount =====

#[test]
fn mount_creates_looping_handles_at_the_initial_level() {
    let factory = RecordingFactory::default();
    let controller = mount(&factory);

    assert_eq!(factory.all_probes().len(), 6);
    for probe in factory.all_probes() {
        let probe = probe.lock();
        assert!(probe.looping);
        assert_eq!(probe.volume, 0.5);
        assert!(!probe.playing);
    }
    assert!(controller.state().is_idle());
}

// ===== Selection =====

#[test]
fn selecting_twice_starts_then_stops() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);

    let transition = controller.select("Rain").unwrap();
    assert_eq!(transition, Transition::Started { mood: "Rain".into() });
    assert_eq!(controller.state().active_mood(), Some("Rain"));
    assert!(factory.probe(RAIN).lock().playing);
    assert_eq!(factory.playing_count(), 1);

    factory.probe(RAIN).lock().position = Duration::from_secs(12);

    let transition = controller.select("Rain").unwrap();
    assert_eq!(transition, Transition::Stopped { mood: "Rain".into() });
    assert!(controller.state().is_idle());

    let rain = factory.probe(RAIN);
    assert!(!rain.lock().playing);
    assert_eq!(rain.lock().position, Duration::ZERO);
    assert_eq!(factory.playing_count(), 0);
}

#[test]
fn switching_rewinds_the_previous_mood() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);

    controller.select("Rain").unwrap();
    factory.probe(RAIN).lock().position = Duration::from_secs(30);

    let transition = controller.select("Ocean").unwrap();
    assert_eq!(
        transition,
        Transition::Switched {
            from: "Rain".into(),
            to: "Ocean".into()
        }
    );
    assert_eq!(controller.state().active_mood(), Some("Ocean"));

    let rain = factory.probe(RAIN);
    assert!(!rain.lock().playing);
    assert_eq!(rain.lock().position, Duration::ZERO);
    assert!(factory.probe(OCEAN).lock().playing);
    assert_eq!(factory.playing_count(), 1);
}

#[test]
fn selection_pauses_every_other_handle() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);

    controller.select("Thunder").unwrap();
    for probe in factory.all_probes() {
        let pauses = probe.lock().pause_calls;
        let plays = probe.lock().play_calls;
        // Thunder got played, everyone else got paused
        assert!(plays == 1 || pauses == 1);
    }
}

#[test]
fn unknown_mood_touches_nothing() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);
    controller.select("Rain").unwrap();

    match controller.select("Lava") {
        Err(SoundboardError::UnknownMood(name)) => assert_eq!(name, "Lava"),
        other => panic!("expected unknown mood, got {:?}", other),
    }
    assert_eq!(controller.state().active_mood(), Some("Rain"));
    assert!(factory.probe(RAIN).lock().playing);
    assert_eq!(factory.probe(OCEAN).lock().pause_calls, 1);
}

#[test]
fn rejected_play_keeps_the_mood_active() {
    let factory = RecordingFactory::rejecting(RAIN);
    let mut controller = mount(&factory);

    controller.select("Rain").unwrap();
    assert_eq!(controller.state().active_mood(), Some("Rain"));
    assert_eq!(factory.probe(RAIN).lock().play_calls, 1);
    assert!(!factory.probe(RAIN).lock().playing);

    // Selecting again still stops it
    controller.select("Rain").unwrap();
    assert!(controller.state().is_idle());
}

// ===== Volume =====

#[test]
fn volume_reaches_every_handle() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);
    controller.select("Rain").unwrap();

    controller.set_volume(0.8).unwrap();
    assert!(factory.all_probes().iter().all(|p| p.lock().volume == 0.8));
    assert_eq!(controller.state().active_mood(), Some("Rain"));
}

#[test]
fn mute_round_trip_restores_the_stored_level() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);

    controller.set_volume(0.3).unwrap();
    assert!(controller.toggle_mute());
    assert!(factory.all_probes().iter().all(|p| p.lock().volume == 0.0));

    assert!(!controller.toggle_mute());
    assert!(factory.all_probes().iter().all(|p| p.lock().volume == 0.3));
}

#[test]
fn muted_start_plays_at_zero() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);

    controller.toggle_mute();
    controller.select("Ocean").unwrap();
    assert_eq!(factory.probe(OCEAN).lock().volume, 0.0);
    assert!(factory.probe(OCEAN).lock().playing);
}

#[test]
fn slider_percent_is_normalized() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);

    controller.set_volume_percent(25.0).unwrap();
    assert_eq!(controller.state().volume().level(), 0.25);
    assert!(factory.all_probes().iter().all(|p| p.lock().volume == 0.25));

    assert!(controller.set_volume(f32::NAN).is_err());
    assert_eq!(controller.state().volume().level(), 0.25);
}

// ===== Unmount =====

#[test]
fn unmount_releases_every_handle_once() {
    let factory = RecordingFactory::default();
    let mut controller = mount(&factory);
    controller.select("Rain").unwrap();

    controller.unmount();
    controller.unmount();
    assert!(!controller.is_mounted());
    assert!(factory.all_probes().iter().all(|p| p.lock().released));
    assert_eq!(factory.playing_count(), 0);
    assert!(matches!(
        controller.select("Rain"),
        Err(SoundboardError::Unmounted)
    ));
}

#[test]
fn drop_releases_handles() {
    let factory = RecordingFactory::default();
    {
        let mut controller = mount(&factory);
        controller.select("Forest").unwrap();
    }
    assert!(factory.all_probes().iter().all(|p| p.lock().released));
}

// ===== Properties =====

proptest! {
    #[test]
    fn at_most_one_handle_plays(picks in proptest::collection::vec(0usize..6, 1..40)) {
        let factory = RecordingFactory::default();
        let mut controller = mount(&factory);
        let names: Vec<String> = controller.registry().iter().map(|p| p.name.clone()).collect();

        for pick in picks {
            controller.select(&names[pick]).unwrap();

            prop_assert!(factory.playing_count() <= 1);
            for (preset, handle) in controller.handles() {
                let active = controller.state().active_mood() == Some(preset.name.as_str());
                prop_assert_eq!(handle.is_playing(), active);
                if !active {
                    prop_assert_eq!(handle.position(), Duration::ZERO);
                }
            }
        }
    }

    #[test]
    fn effective_level_tracks_mute(level in 0.0f32..=1.0, toggles in 0usize..5) {
        let factory = RecordingFactory::default();
        let mut controller = mount(&factory);
        controller.set_volume(level).unwrap();
        for _ in 0..toggles {
            controller.toggle_mute();
        }

        let expected = if toggles % 2 == 1 { 0.0 } else { level };
        for (_, handle) in controller.handles() {
            prop_assert_eq!(handle.volume(), expected);
        }
    }
}
