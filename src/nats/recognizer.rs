use super::client::NatsClient;
use super::messages::TranscriptMessage;
use crate::capture::{
    AudioFrame, RecognitionEvent, RecognizerFactory, SpeechRecognizer, TranscriptSegment,
};
use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Speech recognition through the NATS speech-to-text service
///
/// PCM frames are published for the session; partial and final transcripts
/// for the same session are forwarded as recognition events.
pub struct NatsRecognizer {
    client: Arc<NatsClient>,
    name: String,
    stop_tx: Option<oneshot::Sender<()>>,
    publish_task: Option<JoinHandle<()>>,
    transcript_task: Option<JoinHandle<()>>,
}

impl NatsRecognizer {
    pub fn new(client: NatsClient) -> Self {
        let name = format!("NATS recognizer ({})", client.session_id());
        Self {
            client: Arc::new(client),
            name,
            stop_tx: None,
            publish_task: None,
            transcript_task: None,
        }
    }

    fn to_event(transcript: TranscriptMessage) -> RecognitionEvent {
        let segment = TranscriptSegment {
            text: transcript.text,
            timestamp: Utc::now(),
            confidence: transcript.confidence,
        };

        if transcript.partial {
            RecognitionEvent::Partial(segment)
        } else {
            RecognitionEvent::Final(segment)
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for NatsRecognizer {
    async fn start(
        &mut self,
        mut audio: mpsc::Receiver<AudioFrame>,
    ) -> Result<mpsc::Receiver<RecognitionEvent>> {
        if self.publish_task.is_some() {
            warn!("{} already started", self.name);
            self.stop().await?;
        }

        let mut transcript_sub = self
            .client
            .subscribe_transcripts()
            .await
            .context("Failed to subscribe to transcripts")?;

        let (event_tx, event_rx) = mpsc::channel(100);
        let (stop_tx, mut stop_rx) = oneshot::channel();

        // Audio publishing task
        let client = Arc::clone(&self.client);
        let publish_task = tokio::spawn(async move {
            info!("Audio publishing task started");
            let mut sequence: u32 = 0;
            let mut last_format = (16000, 1);

            loop {
                let frame = tokio::select! {
                    _ = &mut stop_rx => break,
                    frame = audio.recv() => match frame {
                        Some(frame) => frame,
                        None => break,
                    },
                };

                last_format = (frame.sample_rate, frame.channels);
                if let Err(e) = client
                    .publish_audio_frame(
                        &frame.pcm_bytes(),
                        frame.sample_rate,
                        frame.channels,
                        sequence,
                        false,
                    )
                    .await
                {
                    error!("Failed to publish audio frame: {}", e);
                }
                sequence = sequence.wrapping_add(1);
            }

            // Send final frame marker
            if let Err(e) = client
                .publish_audio_frame(&[], last_format.0, last_format.1, sequence, true)
                .await
            {
                error!("Failed to publish final frame marker: {}", e);
            }

            info!("Audio publishing task stopped");
        });

        // Transcript receiving task
        let session_id = self.client.session_id().to_string();
        let transcript_task = tokio::spawn(async move {
            info!("Transcript receiving task started");

            while let Some(msg) = transcript_sub.next().await {
                match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                    Ok(transcript) => {
                        if transcript.session_id != session_id {
                            continue;
                        }
                        if event_tx.send(NatsRecognizer::to_event(transcript)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse transcript message: {}", e);
                    }
                }
            }

            let _ = event_tx.send(RecognitionEvent::Ended).await;
            info!("Transcript receiving task stopped");
        });

        self.stop_tx = Some(stop_tx);
        self.publish_task = Some(publish_task);
        self.transcript_task = Some(transcript_task);

        Ok(event_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(mut task) = self.publish_task.take() {
            match tokio::time::timeout(Duration::from_secs(1), &mut task).await {
                Ok(Err(e)) => error!("Audio publishing task panicked: {}", e),
                Err(_) => {
                    warn!("Audio publishing task did not stop in time");
                    task.abort();
                }
                Ok(Ok(())) => {}
            }
        }

        // Dropping the event sender closes the caller's channel
        if let Some(task) = self.transcript_task.take() {
            task.abort();
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for NatsRecognizer {
    fn drop(&mut self) {
        for task in [self.publish_task.take(), self.transcript_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}

/// Connects a [`NatsRecognizer`] for each interview session
#[derive(Debug, Clone)]
pub struct NatsRecognizerFactory {
    pub url: String,
}

impl NatsRecognizerFactory {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait::async_trait]
impl RecognizerFactory for NatsRecognizerFactory {
    async fn create(&self, session_id: &str) -> Result<Box<dyn SpeechRecognizer>> {
        let client = NatsClient::connect(&self.url, session_id.to_string()).await?;
        Ok(Box::new(NatsRecognizer::new(client)))
    }
}
