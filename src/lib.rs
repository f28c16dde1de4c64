// Moodboard - Ambient Mood Soundboard
// Module declarations
pub mod audio;
#[cfg(feature = "desktop")]
mod commands;
pub mod error;
pub mod playback;
pub mod presets;
pub mod settings;
pub mod shell;
#[cfg(feature = "desktop")]
mod state;
mod task;
pub mod view;
pub mod waveform;

pub use audio::{AudioEngine, AudioHandle, HandleFactory, PlayRequest, TrackPlayer};
pub use error::{PlaybackRejected, Result, SoundboardError};
pub use playback::{Activity, PlaybackState, SoundboardController, Transition, Volume};
pub use presets::{MoodPreset, PresetRegistry};
pub use settings::SoundboardSettings;
pub use view::SoundboardView;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("moodboard_lib=info,moodboard=info"));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use state::AppState;
    use tauri::{Manager, RunEvent};

    init_logging();

    let app = tauri::Builder::default()
        .setup(|app| {
            // Settings and the default sounds/ folder live in the app config dir
            let config_dir = app.path().app_config_dir()?;
            let settings = SoundboardSettings::load(&config_dir.join(settings::SETTINGS_FILE))?;

            let registry = settings.registry()?;
            let volume = Volume::new(settings.initial_volume)?;
            let engine = AudioEngine::start(&settings.output);
            let controller = SoundboardController::mount(registry, &engine, volume);

            app.manage(AppState::new(controller, engine));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_soundboard,
            commands::select_mood,
            commands::set_volume,
            commands::toggle_mute,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|handle, event| {
        if let RunEvent::Exit = event {
            if let Some(state) = handle.try_state::<AppState>() {
                state.controller.lock().unmount();
            }
        }
    });
}
