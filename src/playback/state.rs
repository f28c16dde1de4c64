// Playback state
// Which mood is active, plus the shared volume

use serde::Serialize;

use crate::playback::volume::Volume;

/// What the soundboard is doing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "mood", rename_all = "snake_case")]
pub enum Activity {
    #[default]
    Idle,
    Playing(String),
}

/// Result of a `select`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// Idle -> Playing
    Started { mood: String },
    /// Playing -> Idle, same mood selected again
    Stopped { mood: String },
    /// Playing -> Playing another mood
    Switched { from: String, to: String },
}

impl Transition {
    /// Mood that is active after the transition
    pub fn active_mood(&self) -> Option<&str> {
        match self {
            Transition::Started { mood } => Some(mood),
            Transition::Stopped { .. } => None,
            Transition::Switched { to, .. } => Some(to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlaybackState {
    activity: Activity,
    volume: Volume,
}

impl PlaybackState {
    pub fn new(volume: Volume) -> Self {
        Self {
            activity: Activity::Idle,
            volume,
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn active_mood(&self) -> Option<&str> {
        match &self.activity {
            Activity::Idle => None,
            Activity::Playing(mood) => Some(mood),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.activity, Activity::Idle)
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn volume_mut(&mut self) -> &mut Volume {
        &mut self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn effective_level(&self) -> f32 {
        self.volume.effective()
    }

    /// Work out the transition for selecting `mood` and apply it to the state
    pub(crate) fn select(&mut self, mood: &str) -> Transition {
        let transition = match &self.activity {
            Activity::Idle => Transition::Started {
                mood: mood.to_string(),
            },
            Activity::Playing(current) if current == mood => Transition::Stopped {
                mood: mood.to_string(),
            },
            Activity::Playing(current) => Transition::Switched {
                from: current.clone(),
                to: mood.to_string(),
            },
        };

        self.activity = match transition.active_mood() {
            Some(active) => Activity::Playing(active.to_string()),
            None => Activity::Idle,
        };
        transition
    }
}
