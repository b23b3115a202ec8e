//! File-backed capture devices
//!
//! Stands in for a microphone and camera by replaying a WAV file and a
//! recorded media file. Used for batch rehearsal and tests.

use super::device::{AudioBackend, AudioFrame, DeviceConfig, DeviceGrant, MediaDevices, VideoBackend};
use super::media::MediaChunk;
use crate::error::CaptureError;
use anyhow::{Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const VIDEO_CHUNK_BYTES: usize = 64 * 1024;

/// A decoded WAV file
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Split into frames of `frame_ms` milliseconds
    pub fn frames(&self, frame_ms: u64) -> Vec<AudioFrame> {
        let per_frame =
            (self.sample_rate as u64 * self.channels as u64 * frame_ms.max(1) / 1000).max(1)
                as usize;

        self.samples
            .chunks(per_frame)
            .enumerate()
            .map(|(i, chunk)| AudioFrame {
                samples: chunk.to_vec(),
                sample_rate: self.sample_rate,
                channels: self.channels,
                timestamp_ms: i as u64 * frame_ms,
            })
            .collect()
    }
}

/// Guess a media MIME type from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("webm") => "video/webm",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// Replays a WAV file as microphone input
pub struct FileAudioBackend {
    file: Arc<AudioFile>,
    frame_ms: u64,
    realtime: bool,
    task: Option<JoinHandle<()>>,
    name: String,
}

impl FileAudioBackend {
    pub fn new(file: AudioFile, frame_ms: u64, realtime: bool) -> Self {
        let name = format!("file microphone ({})", file.path);
        Self {
            file: Arc::new(file),
            frame_ms,
            realtime,
            task: None,
            name,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for FileAudioBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.is_capturing() {
            anyhow::bail!("{} is already capturing", self.name);
        }

        let (tx, rx) = mpsc::channel(100);
        let frames = self.file.frames(self.frame_ms);
        let pace = self.realtime.then(|| Duration::from_millis(self.frame_ms));

        self.task = Some(tokio::spawn(async move {
            for frame in frames {
                if tx.send(frame).await.is_err() {
                    break;
                }
                if let Some(pace) = pace {
                    tokio::time::sleep(pace).await;
                }
            }
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileAudioBackend {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Replays a recorded media file as camera output
pub struct FileVideoBackend {
    path: PathBuf,
    mime_type: &'static str,
    task: Option<JoinHandle<()>>,
    name: String,
}

impl FileVideoBackend {
    pub fn new(path: PathBuf) -> Self {
        let name = format!("file camera ({})", path.display());
        Self {
            mime_type: mime_type_for(&path),
            path,
            task: None,
            name,
        }
    }
}

#[async_trait::async_trait]
impl VideoBackend for FileVideoBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<MediaChunk>> {
        if self.is_capturing() {
            anyhow::bail!("{} is already capturing", self.name);
        }

        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let (tx, rx) = mpsc::channel(100);

        self.task = Some(tokio::spawn(async move {
            for (i, chunk) in data.chunks(VIDEO_CHUNK_BYTES).enumerate() {
                let chunk = MediaChunk {
                    data: chunk.to_vec(),
                    timestamp_ms: i as u64 * 100,
                };
                if tx.send(chunk).await.is_err() {
                    break;
                }
            }
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn mime_type(&self) -> &str {
        self.mime_type
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileVideoBackend {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Devices backed by files on disk
///
/// A device without a configured file is treated as refused.
#[derive(Debug, Clone, Default)]
pub struct FileDevices {
    pub audio_file: Option<PathBuf>,
    pub video_file: Option<PathBuf>,
    pub frame_ms: u64,
    pub realtime: bool,
}

#[async_trait::async_trait]
impl MediaDevices for FileDevices {
    async fn request(&self, config: DeviceConfig) -> Result<DeviceGrant, CaptureError> {
        let mut grant = DeviceGrant::default();

        if config.audio {
            let path = self
                .audio_file
                .as_ref()
                .ok_or_else(|| CaptureError::PermissionDenied("Microphone".to_string()))?;
            let file = AudioFile::open(path)?;
            grant.audio = Some(Box::new(FileAudioBackend::new(
                file,
                self.frame_ms.max(10),
                self.realtime,
            )));
        }

        if config.video {
            let path = self
                .video_file
                .as_ref()
                .ok_or_else(|| CaptureError::PermissionDenied("Camera".to_string()))?;
            if !path.exists() {
                warn!("Video file not found: {}", path.display());
                return Err(CaptureError::PermissionDenied("Camera".to_string()));
            }
            grant.video = Some(Box::new(FileVideoBackend::new(path.clone())));
        }

        Ok(grant)
    }
}
