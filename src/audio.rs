// src/audio.rs
use crate::errors::PlayerError;
use async_trait::async_trait;
use log::{debug, info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use url::Url;

// ===== audio backend seam
//
// The playback controller talks to the platform audio facility only through
// this contract. `prepare` is the network-bound step and may suspend; the
// remaining operations act on an already-bound source.
#[async_trait]
pub trait AudioBackend: Send {
    /// Bind the backend to a new source URL, dropping any previous binding.
    fn set_source(&mut self, url: &str) -> Result<(), PlayerError>;

    /// Fetch and decode the bound source so it is ready to start.
    async fn prepare(&mut self) -> Result<(), PlayerError>;

    /// Start or resume output of the prepared source.
    fn start(&mut self) -> Result<(), PlayerError>;

    /// Pause output, keeping the binding so `start` can resume it.
    fn pause(&mut self) -> Result<(), PlayerError>;

    /// Stop output and drop the source binding.
    fn stop(&mut self);

    /// Tear down the output device. Terminal; the backend is unusable after.
    fn release(&mut self);
}

// ===== Live streaming backend
//
// Downloads the remote audio into memory during `prepare`, then feeds it to a
// rodio sink. Good enough for the short episode clips in the catalog; the
// app does no caching or partial streaming.
pub struct StreamingBackend {
    client: reqwest::Client,
    handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    source: Option<Url>,
}

impl StreamingBackend {
    pub fn new() -> Self {
        const APP_USER_AGENT: &str = "castdeck/0.1 (terminal podcast client)";

        let client: reqwest::Client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create request client.");

        Self { client, handle: None, sink: None, source: None }
    }

    fn output_handle(&mut self) -> Result<OutputStreamHandle, PlayerError> {
        if let Some(handle) = &self.handle {
            return Ok(handle.clone());
        }
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            PlayerError::PlaybackInterrupted(format!("no audio output device: {}", e))
        })?;
        // The stream itself is !Send and must outlive every sink built on
        // its handle, so it is leaked once for the process lifetime.
        std::mem::forget(stream);
        self.handle = Some(handle.clone());
        Ok(handle)
    }
}

impl Default for StreamingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioBackend for StreamingBackend {
    fn set_source(&mut self, url: &str) -> Result<(), PlayerError> {
        self.stop();
        let parsed = Url::parse(url)
            .map_err(|e| PlayerError::SourceUnavailable(format!("{}: {}", url, e)))?;
        debug!("StreamingBackend: source bound to {}", parsed);
        self.source = Some(parsed);
        Ok(())
    }

    async fn prepare(&mut self) -> Result<(), PlayerError> {
        let url = self
            .source
            .clone()
            .ok_or_else(|| PlayerError::PrepareFailed("no source bound".to_string()))?;

        info!("StreamingBackend: fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PlayerError::SourceUnavailable(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlayerError::SourceUnavailable(e.to_string()))?;
        info!("StreamingBackend: fetched {} bytes", bytes.len());

        let decoder = Decoder::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| PlayerError::PrepareFailed(e.to_string()))?;

        let handle = self.output_handle()?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| PlayerError::PlaybackInterrupted(e.to_string()))?;
        sink.pause();
        sink.append(decoder);
        self.sink = Some(sink);
        Ok(())
    }

    fn start(&mut self) -> Result<(), PlayerError> {
        match &self.sink {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(PlayerError::PlaybackInterrupted("no prepared source".to_string())),
        }
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        match &self.sink {
            Some(sink) => {
                sink.pause();
                Ok(())
            }
            None => Err(PlayerError::PlaybackInterrupted("no prepared source".to_string())),
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.source = None;
    }

    fn release(&mut self) {
        self.stop();
        self.handle = None;
        debug!("StreamingBackend: released");
    }
}

// ===== Silent backend for --mute / headless runs
pub struct NullBackend {
    source: Option<String>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self { source: None }
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioBackend for NullBackend {
    fn set_source(&mut self, url: &str) -> Result<(), PlayerError> {
        Url::parse(url).map_err(|e| PlayerError::SourceUnavailable(format!("{}: {}", url, e)))?;
        self.source = Some(url.to_string());
        Ok(())
    }

    async fn prepare(&mut self) -> Result<(), PlayerError> {
        if self.source.is_none() {
            return Err(PlayerError::PrepareFailed("no source bound".to_string()));
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), PlayerError> {
        warn!("NullBackend: audio muted, not starting {:?}", self.source);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn stop(&mut self) {
        self.source = None;
    }

    fn release(&mut self) {}
}

// ===== Fake backend for testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    SetSource(String),
    Prepare,
    Start,
    Pause,
    Stop,
    Release,
}

/// Records every call it receives; failures can be scripted per operation.
/// The call log is shared so tests can inspect it after the backend (or the
/// controller owning it) has been dropped.
pub struct FakeBackend {
    pub calls: Arc<Mutex<Vec<BackendCall>>>,
    pub fail_set_source: Option<PlayerError>,
    pub fail_prepare: Option<PlayerError>,
    pub fail_start: Option<PlayerError>,
}

impl FakeBackend {
    pub fn new() -> (Self, Arc<Mutex<Vec<BackendCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let backend = Self {
            calls: calls.clone(),
            fail_set_source: None,
            fail_prepare: None,
            fail_start: None,
        };
        (backend, calls)
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().expect("call log poisoned").push(call);
    }
}

#[async_trait]
impl AudioBackend for FakeBackend {
    fn set_source(&mut self, url: &str) -> Result<(), PlayerError> {
        self.record(BackendCall::SetSource(url.to_string()));
        match &self.fail_set_source {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn prepare(&mut self) -> Result<(), PlayerError> {
        self.record(BackendCall::Prepare);
        match &self.fail_prepare {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn start(&mut self) -> Result<(), PlayerError> {
        self.record(BackendCall::Start);
        match &self.fail_start {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.record(BackendCall::Pause);
        Ok(())
    }

    fn stop(&mut self) {
        self.record(BackendCall::Stop);
    }

    fn release(&mut self) {
        self.record(BackendCall::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_source_rejects_malformed_url() {
        let mut backend = NullBackend::new();
        let result = backend.set_source("not a url");
        assert!(matches!(result, Err(PlayerError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_prepare_without_source_fails() {
        let mut backend = NullBackend::new();
        let result = backend.prepare().await;
        assert!(matches!(result, Err(PlayerError::PrepareFailed(_))));
    }

    #[tokio::test]
    async fn test_fake_backend_records_call_order() {
        let (mut backend, calls) = FakeBackend::new();
        backend.set_source("http://example.com/a.mp3").unwrap();
        backend.prepare().await.unwrap();
        backend.start().unwrap();
        backend.stop();
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                BackendCall::SetSource("http://example.com/a.mp3".to_string()),
                BackendCall::Prepare,
                BackendCall::Start,
                BackendCall::Stop,
            ]
        );
    }
}
