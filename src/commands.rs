// Tauri command handlers
use tauri::{AppHandle, Emitter, State};

use crate::state::AppState;
use crate::view::SoundboardView;

/// Event emitted after every state change
pub const CHANGED_EVENT: &str = "soundboard:changed";

fn publish(app: &AppHandle, view: SoundboardView) -> SoundboardView {
    if let Err(e) = app.emit(CHANGED_EVENT, &view) {
        tracing::warn!("Failed to emit {}: {}", CHANGED_EVENT, e);
    }
    view
}

#[tauri::command]
pub fn get_soundboard(state: State<'_, AppState>) -> Result<SoundboardView, String> {
    Ok(state.controller.lock().view())
}

#[tauri::command]
pub fn select_mood(
    name: String,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<SoundboardView, String> {
    let view = {
        let mut controller = state.controller.lock();
        controller
            .select(&name)
            .map_err(|e| format!("Failed to select mood: {}", e))?;
        controller.view()
    };
    Ok(publish(&app, view))
}

/// `volume` is the slider value, 0-100
#[tauri::command]
pub fn set_volume(
    volume: f32,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<SoundboardView, String> {
    let view = {
        let mut controller = state.controller.lock();
        controller
            .set_volume_percent(volume)
            .map_err(|e| format!("Failed to set volume: {}", e))?;
        controller.view()
    };
    Ok(publish(&app, view))
}

#[tauri::command]
pub fn toggle_mute(state: State<'_, AppState>, app: AppHandle) -> Result<SoundboardView, String> {
    let view = {
        let mut controller = state.controller.lock();
        controller.toggle_mute();
        controller.view()
    };
    Ok(publish(&app, view))
}
