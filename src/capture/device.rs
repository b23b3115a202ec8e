use super::media::MediaChunk;
use crate::error::CaptureError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

impl AudioFrame {
    /// Little-endian PCM bytes
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Which devices an interview wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub audio: bool,
    pub video: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }
}

/// Microphone backend
///
/// Implementations release the underlying device when dropped.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio; the frame channel closes afterwards
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Camera backend producing encoded media chunks
///
/// Implementations release the underlying device when dropped.
#[async_trait::async_trait]
pub trait VideoBackend: Send + Sync {
    async fn start(&mut self) -> Result<mpsc::Receiver<MediaChunk>>;

    async fn stop(&mut self) -> Result<()>;

    fn is_capturing(&self) -> bool;

    /// MIME type of the assembled recording (e.g., "video/webm")
    fn mime_type(&self) -> &str;

    fn name(&self) -> &str;
}

/// Grants access to capture devices
#[async_trait::async_trait]
pub trait MediaDevices: Send + Sync {
    /// Ask for the configured devices
    ///
    /// Fails with [`CaptureError::PermissionDenied`] when access is refused.
    async fn request(&self, config: DeviceConfig) -> Result<DeviceGrant, CaptureError>;
}

/// Devices granted to one interview
///
/// Dropping the grant drops the backends, which releases the devices.
#[derive(Default)]
pub struct DeviceGrant {
    pub audio: Option<Box<dyn AudioBackend>>,
    pub video: Option<Box<dyn VideoBackend>>,
}

impl DeviceGrant {
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.video.is_none()
    }

    /// Stop any running backend and release every device
    pub async fn release(mut self) {
        if let Some(audio) = self.audio.as_mut() {
            if audio.is_capturing() {
                if let Err(e) = audio.stop().await {
                    error!("Failed to stop {}: {}", audio.name(), e);
                }
            }
            info!("Released {}", audio.name());
        }

        if let Some(video) = self.video.as_mut() {
            if video.is_capturing() {
                if let Err(e) = video.stop().await {
                    error!("Failed to stop {}: {}", video.name(), e);
                }
            }
            info!("Released {}", video.name());
        }
    }
}
