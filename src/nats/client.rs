use super::messages::AudioFrameMessage;
use anyhow::{Context, Result};
use async_nats::Client;
use base64::Engine;
use tracing::{debug, info};

/// Subjects the STT service publishes partial and final transcripts on
pub const TRANSCRIPT_SUBJECT: &str = "stt.text.>";

pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Subject audio frames for this session are published on
    pub fn audio_subject(&self) -> String {
        format!("audio.frame.interview-{}", self.session_id)
    }

    /// Publish audio frame to NATS
    pub async fn publish_audio_frame(
        &self,
        pcm_bytes: &[u8],
        sample_rate: u32,
        channels: u16,
        sequence: u32,
        is_final: bool,
    ) -> Result<()> {
        let subject = self.audio_subject();

        let message = AudioFrameMessage {
            session_id: self.session_id.clone(),
            sequence,
            pcm: base64::engine::general_purpose::STANDARD.encode(pcm_bytes),
            sample_rate,
            channels,
            timestamp: chrono::Utc::now().to_rfc3339(),
            final_frame: is_final,
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish audio frame")?;

        debug!(
            "Published audio frame to {} (sequence={}, bytes={}, final={})",
            subject,
            sequence,
            pcm_bytes.len(),
            is_final
        );

        Ok(())
    }

    /// Subscribe to transcript messages
    ///
    /// Partial and final results arrive on `stt.text.partial` and
    /// `stt.text.final`; callers filter by session_id in the payload.
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        info!("Subscribing to transcripts on {}", TRANSCRIPT_SUBJECT);

        let subscriber = self
            .client
            .subscribe(TRANSCRIPT_SUBJECT)
            .await
            .context("Failed to subscribe to transcripts")?;

        Ok(subscriber)
    }
}
