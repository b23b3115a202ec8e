use super::device::AudioFrame;
use super::transcript::TranscriptSegment;
use anyhow::Result;
use tokio::sync::mpsc;

/// Event delivered by a speech recognizer
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    /// Interim hypothesis, replaced by later results
    Partial(TranscriptSegment),
    /// Settled text for one utterance
    Final(TranscriptSegment),
    /// The engine stopped on its own (silence timeout, stream end)
    Ended,
}

/// Continuous speech-to-text engine
///
/// The event channel closes after `stop` returns or once the engine ends on
/// its own.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Start recognizing the given audio stream
    async fn start(
        &mut self,
        audio: mpsc::Receiver<AudioFrame>,
    ) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Halt recognition immediately
    async fn stop(&mut self) -> Result<()>;

    /// Get recognizer name for logging
    fn name(&self) -> &str;
}

/// Builds one recognizer per interview session
#[async_trait::async_trait]
pub trait RecognizerFactory: Send + Sync {
    async fn create(&self, session_id: &str) -> Result<Box<dyn SpeechRecognizer>>;
}
