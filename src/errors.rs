// errors.rs
use thiserror::Error;

/// Playback failures are local to the controller: logged, surfaced to the
/// UI as a transient status, never fatal to the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Audio source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Could not prepare audio: {0}")]
    PrepareFailed(String),

    #[error("Playback interrupted: {0}")]
    PlaybackInterrupted(String),
}
