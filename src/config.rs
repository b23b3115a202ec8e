use crate::ai::ChatCompletionsConfig;
use crate::capture::{CaptureConfig, DeviceConfig, FileDevices};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `INTERVIEW_COACH__AI__MODEL`
pub const ENV_PREFIX: &str = "INTERVIEW_COACH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub ai: AiConfig,
    pub capture: CaptureSettings,
    pub questions: QuestionsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "interview-coach".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            temperature: 0.7,
        }
    }
}

impl AiConfig {
    /// Client settings, reading the API key from the environment
    pub fn client_config(&self) -> Result<ChatCompletionsConfig> {
        let api_key = std::env::var(&self.api_key_env)
            .with_context(|| format!("API key variable {} is not set", self.api_key_env))?;

        Ok(ChatCompletionsConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
            temperature: self.temperature,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Request a microphone for each interview
    pub audio: bool,
    /// Request a camera for each interview
    pub video: bool,
    pub nats_url: String,
    pub drain_timeout_ms: u64,
    /// WAV file standing in for the microphone
    pub audio_file: Option<PathBuf>,
    /// Recorded media file standing in for the camera
    pub video_file: Option<PathBuf>,
    pub frame_ms: u64,
    /// Pace file playback at real time
    pub realtime: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            audio: true,
            video: false,
            nats_url: "nats://localhost:4222".to_string(),
            drain_timeout_ms: 2000,
            audio_file: None,
            video_file: None,
            frame_ms: 100,
            realtime: true,
        }
    }
}

impl CaptureSettings {
    pub fn devices(&self) -> DeviceConfig {
        DeviceConfig {
            audio: self.audio,
            video: self.video,
        }
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            devices: self.devices(),
            drain_timeout: Duration::from_millis(self.drain_timeout_ms),
        }
    }

    pub fn file_devices(&self) -> FileDevices {
        FileDevices {
            audio_file: self.audio_file.clone(),
            video_file: self.video_file.clone(),
            frame_ms: self.frame_ms,
            realtime: self.realtime,
        }
    }
}

/// Where interview questions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSourceKind {
    #[default]
    Ai,
    Bank,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestionsConfig {
    pub source: QuestionSourceKind,
}

impl Config {
    /// Load `path` (extension optional), then apply environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }
}
