use super::device::{DeviceConfig, DeviceGrant, MediaDevices};
use super::media::{Answer, MediaBlob, MediaChunk};
use super::recognizer::{RecognitionEvent, SpeechRecognizer};
use super::transcript::TranscriptBuffer;
use crate::error::CaptureError;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Configuration for a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Devices to request when the session opens
    pub devices: DeviceConfig,

    /// How long `stop` waits for the recognizer and recorder to flush
    pub drain_timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            devices: DeviceConfig::default(),
            drain_timeout: Duration::from_secs(2),
        }
    }
}

/// Statistics about the current capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Whether capture is currently active
    pub is_capturing: bool,

    /// When the current (or last) capture started
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds since the capture started
    pub duration_secs: f64,

    /// Number of final transcript segments received
    pub transcript_segments_count: usize,

    /// Number of media chunks buffered
    pub media_chunks_count: usize,

    /// Final text plus the current interim hypothesis
    pub live_transcript: String,
}

/// Device access and per-question capture for one interview
///
/// Devices are acquired by [`CaptureSession::open`] and held until
/// [`CaptureSession::shutdown`] or drop. Each question runs one
/// `start`/`stop` cycle that yields an [`Answer`].
pub struct CaptureSession {
    session_id: String,
    config: CaptureConfig,
    grant: Option<DeviceGrant>,
    recognizer: Box<dyn SpeechRecognizer>,

    /// Whether capture is currently active
    is_capturing: Arc<AtomicBool>,

    started_at: Option<DateTime<Utc>>,

    /// Recognition results for the current answer
    transcript: Arc<Mutex<TranscriptBuffer>>,

    /// Live transcript for observers
    live_tx: watch::Sender<String>,

    /// Encoded media for the current answer
    media_chunks: Arc<Mutex<Vec<MediaChunk>>>,

    transcript_task: Option<JoinHandle<()>>,
    media_task: Option<JoinHandle<()>>,
}

impl CaptureSession {
    /// Request devices and prepare the recognizer
    pub async fn open(
        session_id: impl Into<String>,
        devices: &dyn MediaDevices,
        recognizer: Box<dyn SpeechRecognizer>,
        config: CaptureConfig,
    ) -> Result<Self, CaptureError> {
        let session_id = session_id.into();
        info!(
            "Requesting devices for {} (audio={}, video={})",
            session_id, config.devices.audio, config.devices.video
        );

        let grant = devices.request(config.devices).await.map_err(|e| {
            error!("Device request failed for {}: {}", session_id, e);
            e
        })?;

        let (live_tx, _) = watch::channel(String::new());

        Ok(Self {
            session_id,
            config,
            grant: Some(grant),
            recognizer,
            is_capturing: Arc::new(AtomicBool::new(false)),
            started_at: None,
            transcript: Arc::new(Mutex::new(TranscriptBuffer::new())),
            live_tx,
            media_chunks: Arc::new(Mutex::new(Vec::new())),
            transcript_task: None,
            media_task: None,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    /// Start transcription and, when a camera was granted, recording
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.is_capturing() {
            warn!("Capture already started");
            return Ok(());
        }

        let grant = self.grant.as_mut().ok_or(CaptureError::NoDevices)?;

        info!("Starting capture: {}", self.session_id);

        self.transcript.lock().await.clear();
        self.media_chunks.lock().await.clear();
        self.live_tx.send_replace(String::new());

        if let Some(audio) = grant.audio.as_mut() {
            let audio_rx = audio
                .start()
                .await
                .context("Failed to start audio capture")?;

            let mut events = match self.recognizer.start(audio_rx).await {
                Ok(events) => events,
                Err(e) => {
                    if let Err(stop_err) = audio.stop().await {
                        error!("Failed to stop {}: {}", audio.name(), stop_err);
                    }
                    return Err(CaptureError::Device(
                        e.context("Failed to start speech recognition"),
                    ));
                }
            };

            let transcript = Arc::clone(&self.transcript);
            let live_tx = self.live_tx.clone();
            let recognizer_name = self.recognizer.name().to_string();

            self.transcript_task = Some(tokio::spawn(async move {
                info!("Transcript task started ({})", recognizer_name);

                while let Some(event) = events.recv().await {
                    let mut buffer = transcript.lock().await;
                    match event {
                        RecognitionEvent::Partial(segment) => buffer.push_partial(segment),
                        RecognitionEvent::Final(segment) => buffer.push_final(segment),
                        RecognitionEvent::Ended => {
                            info!("{} ended on its own", recognizer_name);
                            break;
                        }
                    }
                    live_tx.send_replace(buffer.live_text());
                }

                info!("Transcript task stopped");
            }));
        }

        let video_start = match grant.video.as_mut() {
            Some(video) => Some(video.start().await),
            None => None,
        };

        if let Some(started) = video_start {
            let mut video_rx = match started {
                Ok(rx) => rx,
                Err(e) => {
                    self.halt().await;
                    return Err(CaptureError::Device(e.context("Failed to start video capture")));
                }
            };

            let media_chunks = Arc::clone(&self.media_chunks);
            self.media_task = Some(tokio::spawn(async move {
                while let Some(chunk) = video_rx.recv().await {
                    media_chunks.lock().await.push(chunk);
                }
            }));
        }

        self.started_at = Some(Utc::now());
        self.is_capturing.store(true, Ordering::SeqCst);

        info!("Capture started successfully");

        Ok(())
    }

    /// Stop capture and assemble the answer
    ///
    /// Safe to call after the recognizer ended on its own. Calling it while
    /// idle yields an empty answer.
    pub async fn stop(&mut self) -> Result<Answer, CaptureError> {
        if !self.is_capturing() {
            warn!("Capture not active");
            return Ok(Answer::default());
        }

        info!("Stopping capture: {}", self.session_id);

        self.is_capturing.store(false, Ordering::SeqCst);
        self.halt().await;

        let transcript = self.transcript.lock().await.final_text();
        let chunks = std::mem::take(&mut *self.media_chunks.lock().await);
        let mime_type = self
            .grant
            .as_ref()
            .and_then(|g| g.video.as_ref())
            .map(|v| v.mime_type().to_string());
        let media = mime_type.and_then(|mime| MediaBlob::assemble(&mime, chunks));

        info!(
            "Capture stopped: {} chars transcribed, {} media bytes",
            transcript.len(),
            media.as_ref().map_or(0, MediaBlob::len)
        );

        Ok(Answer { transcript, media })
    }

    /// Halt recognizer and backends, then wait for the collector tasks
    async fn halt(&mut self) {
        if let Err(e) = self.recognizer.stop().await {
            error!("Failed to stop {}: {}", self.recognizer.name(), e);
        }

        if let Some(grant) = self.grant.as_mut() {
            if let Some(audio) = grant.audio.as_mut() {
                if let Err(e) = audio.stop().await {
                    error!("Failed to stop {}: {}", audio.name(), e);
                }
            }
            if let Some(video) = grant.video.as_mut() {
                if let Err(e) = video.stop().await {
                    error!("Failed to stop {}: {}", video.name(), e);
                }
            }
        }

        for (name, task) in [
            ("Transcript", self.transcript_task.take()),
            ("Media", self.media_task.take()),
        ] {
            let Some(mut task) = task else { continue };
            match tokio::time::timeout(self.config.drain_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("{} task panicked: {}", name, e),
                Err(_) => {
                    warn!("{} task did not drain in time, aborting", name);
                    task.abort();
                }
            }
        }
    }

    /// Current capture statistics
    pub async fn stats(&self) -> CaptureStats {
        let duration_secs = self.started_at.map_or(0.0, |started| {
            Utc::now().signed_duration_since(started).num_milliseconds() as f64 / 1000.0
        });

        CaptureStats {
            is_capturing: self.is_capturing(),
            started_at: self.started_at,
            duration_secs,
            transcript_segments_count: self.transcript.lock().await.segments().len(),
            media_chunks_count: self.media_chunks.lock().await.len(),
            live_transcript: self.live_transcript(),
        }
    }

    /// Final text plus the current interim hypothesis
    pub fn live_transcript(&self) -> String {
        self.live_tx.borrow().clone()
    }

    /// Follow the live transcript as it changes
    pub fn subscribe_transcript(&self) -> watch::Receiver<String> {
        self.live_tx.subscribe()
    }

    /// Stop any capture in progress and release all devices
    pub async fn shutdown(mut self) {
        info!("Shutting down capture: {}", self.session_id);

        if self.is_capturing() {
            self.is_capturing.store(false, Ordering::SeqCst);
            self.halt().await;
        }

        if let Some(grant) = self.grant.take() {
            grant.release().await;
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        for task in [self.transcript_task.take(), self.media_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }

        if self.grant.take().is_some() {
            info!("Released devices for {}", self.session_id);
        }
    }
}
