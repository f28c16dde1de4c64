// Playback module
// State machine, shared volume, and the controller that drives the handles

pub mod controller;
pub mod state;
pub mod volume;

pub use controller::SoundboardController;
pub use state::{Activity, PlaybackState, Transition};
pub use volume::Volume;
