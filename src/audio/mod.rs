// Audio playback module
// Per-preset handles backed by Symphonia decoding, a shared mixer and cpal output

pub mod decoder;
pub mod engine;
pub mod mixer;
#[cfg(feature = "output")]
pub mod output;
pub mod player;
pub mod resample;
pub mod track;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::error::PlaybackRejected;

pub use engine::AudioEngine;
pub use player::TrackPlayer;

/// Outcome of a play request
pub type PlayOutcome = Result<(), PlaybackRejected>;

/// A playable, loopable media resource bound to one audio source.
///
/// Every command returns immediately. `play` hands back a [`PlayRequest`]
/// that resolves once output has actually started (or failed to).
pub trait AudioHandle: Send {
    /// Audio source this handle was created for
    fn source(&self) -> &Path;

    fn set_looping(&mut self, looping: bool);

    fn is_looping(&self) -> bool;

    /// Output level, clamped to 0.0..=1.0
    fn set_volume(&mut self, level: f32);

    fn volume(&self) -> f32;

    fn play(&mut self) -> PlayRequest;

    /// Halt output. Also cancels the effect of any unresolved play request.
    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    fn position(&self) -> Duration;

    fn set_position(&mut self, position: Duration);

    /// Stop playback and drop the source. The handle stays inert afterwards.
    fn release(&mut self);
}

/// Constructs handles for audio sources
pub trait HandleFactory {
    type Handle: AudioHandle;

    /// Construction never fails; an unusable source surfaces as a rejected play request
    fn create(&self, source: &Path) -> Self::Handle;
}

/// Pending result of [`AudioHandle::play`].
///
/// Await it inside a runtime, or call [`PlayRequest::wait`] from a plain thread.
/// A resolver dropped without answering counts as [`PlaybackRejected::Interrupted`].
#[derive(Debug)]
pub struct PlayRequest {
    rx: oneshot::Receiver<PlayOutcome>,
}

/// Sending half of a [`PlayRequest`]
#[derive(Debug)]
pub struct PlayResolver {
    tx: oneshot::Sender<PlayOutcome>,
}

impl PlayRequest {
    pub fn pending() -> (PlayResolver, PlayRequest) {
        let (tx, rx) = oneshot::channel();
        (PlayResolver { tx }, PlayRequest { rx })
    }

    /// A request that has already resolved
    pub fn resolved(outcome: PlayOutcome) -> Self {
        let (resolver, request) = Self::pending();
        resolver.resolve(outcome);
        request
    }

    /// Outcome if the request has resolved, without blocking
    pub fn try_outcome(&mut self) -> Option<PlayOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(PlaybackRejected::Interrupted)),
        }
    }

    /// Block until resolved. Must not be called from inside an async runtime.
    pub fn wait(self) -> PlayOutcome {
        self.rx
            .blocking_recv()
            .unwrap_or(Err(PlaybackRejected::Interrupted))
    }
}

impl Future for PlayRequest {
    type Output = PlayOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(PlaybackRejected::Interrupted)))
    }
}

impl PlayResolver {
    pub fn resolve(self, outcome: PlayOutcome) {
        // Nobody listening is fine; the watcher may already be gone
        let _ = self.tx.send(outcome);
    }
}
