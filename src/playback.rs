// src/playback.rs
use crate::audio::AudioBackend;
use crate::errors::PlayerError;
use crate::podcast::{EntryKey, PodcastEntry};
use log::{debug, info, warn};

/// Externally observable playback state. At most one entry is bound while
/// the status is in {Preparing, Playing, Paused}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Preparing,
    Playing,
    Paused,
    Stopped,
    Failed(PlayerError),
}

/// Serializes every playback request against the single underlying audio
/// resource. The backend handle is owned exclusively here; callers only see
/// request-level operations and a derived view of the state.
///
/// A new request always settles the previous binding before touching the
/// backend again, so transitions are strictly ordered and no locking is
/// needed.
pub struct PlaybackController {
    backend: Box<dyn AudioBackend>,
    active: Option<EntryKey>,
    status: PlaybackStatus,
    released: bool,
}

impl PlaybackController {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self { backend, active: None, status: PlaybackStatus::Idle, released: false }
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    /// The entry currently bound to the playback resource, if any.
    pub fn active_key(&self) -> Option<&EntryKey> {
        match self.status {
            PlaybackStatus::Preparing | PlaybackStatus::Playing | PlaybackStatus::Paused => {
                self.active.as_ref()
            }
            _ => None,
        }
    }

    pub fn is_active(&self, key: &EntryKey) -> bool {
        self.active_key() == Some(key)
    }

    pub fn is_playing(&self, key: &EntryKey) -> bool {
        self.status == PlaybackStatus::Playing && self.active.as_ref() == Some(key)
    }

    pub fn is_paused(&self, key: &EntryKey) -> bool {
        self.status == PlaybackStatus::Paused && self.active.as_ref() == Some(key)
    }

    fn transition(&mut self, next: PlaybackStatus) {
        debug!("playback: {:?} -> {:?}", self.status, next);
        self.status = next;
    }

    /// Force whatever is currently bound to Stopped and clear the binding.
    /// Also the cancellation path for an in-flight preparation.
    fn halt_active(&mut self) {
        if self.active.is_some() {
            match self.status {
                PlaybackStatus::Preparing | PlaybackStatus::Playing | PlaybackStatus::Paused => {
                    self.backend.stop();
                }
                _ => {}
            }
            self.transition(PlaybackStatus::Stopped);
            self.active = None;
            self.transition(PlaybackStatus::Idle);
        }
    }

    /// Start playback of `entry`, stopping whatever was active first.
    /// Replaying the already-active entry restarts it from the beginning.
    ///
    /// On failure the partial binding is released, the status becomes
    /// `Failed(reason)` (cleared to Idle by `take_failure` or the next
    /// request), and the error is returned so the caller can surface it.
    pub async fn request_play(&mut self, entry: &PodcastEntry) -> Result<(), PlayerError> {
        let key = entry.key();
        info!("request_play: {}", entry.title());
        self.halt_active();

        self.active = Some(key);
        self.transition(PlaybackStatus::Preparing);

        match self.bind_and_start(entry).await {
            Ok(()) => {
                self.transition(PlaybackStatus::Playing);
                Ok(())
            }
            Err(err) => {
                warn!("request_play: {} failed: {}", entry.title(), err);
                self.backend.stop();
                self.active = None;
                self.transition(PlaybackStatus::Failed(err.clone()));
                Err(err)
            }
        }
    }

    async fn bind_and_start(&mut self, entry: &PodcastEntry) -> Result<(), PlayerError> {
        self.backend.set_source(entry.audio_url().as_str())?;
        self.backend.prepare().await?;
        self.backend.start()
    }

    /// Stop the given entry. A no-op (not an error) when `key` is not the
    /// active item.
    pub fn request_stop(&mut self, key: &EntryKey) {
        if self.is_active(key) {
            info!("request_stop: {}", key);
            self.halt_active();
        }
    }

    /// Pause the given entry if it is the one playing.
    pub fn request_pause(&mut self, key: &EntryKey) {
        if self.is_playing(key) {
            if let Err(err) = self.backend.pause() {
                warn!("request_pause: {} failed: {}", key, err);
                self.backend.stop();
                self.active = None;
                self.transition(PlaybackStatus::Failed(err));
                return;
            }
            self.transition(PlaybackStatus::Paused);
        }
    }

    /// Resume the given entry if it is the one paused.
    pub fn request_resume(&mut self, key: &EntryKey) {
        if self.is_paused(key) {
            if let Err(err) = self.backend.start() {
                warn!("request_resume: {} failed: {}", key, err);
                self.backend.stop();
                self.active = None;
                self.transition(PlaybackStatus::Failed(err));
                return;
            }
            self.transition(PlaybackStatus::Playing);
        }
    }

    /// Pause/resume toggle. Falls back to a fresh play when the entry is not
    /// the active item. Stop-semantics consumers compose `request_play` and
    /// `request_stop` instead.
    pub async fn request_toggle(&mut self, entry: &PodcastEntry) -> Result<(), PlayerError> {
        let key = entry.key();
        if self.is_playing(&key) {
            self.request_pause(&key);
            Ok(())
        } else if self.is_paused(&key) {
            self.request_resume(&key);
            Ok(())
        } else {
            self.request_play(entry).await
        }
    }

    /// Surface and clear a failure so the user can retry. Returns the reason
    /// when the controller was in the Failed state, resetting it to Idle.
    pub fn take_failure(&mut self) -> Option<PlayerError> {
        if let PlaybackStatus::Failed(err) = self.status.clone() {
            self.transition(PlaybackStatus::Idle);
            Some(err)
        } else {
            None
        }
    }

    /// Stop and release the underlying resource. Idempotent; must run on
    /// every exit path, which the `Drop` impl backstops.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        info!("playback controller shutting down");
        match self.status {
            PlaybackStatus::Preparing | PlaybackStatus::Playing | PlaybackStatus::Paused => {
                self.backend.stop();
            }
            _ => {}
        }
        self.backend.release();
        self.released = true;
        self.active = None;
        self.transition(PlaybackStatus::Idle);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
