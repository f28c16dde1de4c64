// Error types
// Play rejections and soundboard errors

use std::path::PathBuf;

use thiserror::Error;

/// Why a play request did not produce output.
///
/// Rejections are logged by the controller and never change the playback
/// state: a mood can be active while its handle stays silent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackRejected {
    /// A pause reached the handle before the request resolved
    #[error("play request interrupted by a pause")]
    Interrupted,

    /// The audio source could not be opened
    #[error("audio source unavailable: {path:?}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// The audio source was opened but holds no playable audio
    #[error("audio source could not be decoded: {path:?}: {reason}")]
    Undecodable { path: PathBuf, reason: String },

    /// The handle was released before playback was requested
    #[error("audio handle has been released")]
    Released,
}

/// Soundboard errors
#[derive(Debug, Error)]
pub enum SoundboardError {
    /// No preset carries this name
    #[error("unknown mood: {0}")]
    UnknownMood(String),

    /// Two presets share a name
    #[error("duplicate mood preset: {0}")]
    DuplicatePreset(String),

    /// A registry needs at least one preset
    #[error("no mood presets configured")]
    EmptyRegistry,

    /// Volume must be a finite number
    #[error("invalid volume: {0}")]
    InvalidVolume(f32),

    /// The controller has released its handles
    #[error("soundboard has been unmounted")]
    Unmounted,

    /// Settings file is structurally valid JSON but semantically wrong
    #[error("settings error: {0}")]
    Settings(String),

    /// Audio device could not be opened
    #[error("audio output error: {0}")]
    Output(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for soundboard operations
pub type Result<T> = std::result::Result<T, SoundboardError>;
