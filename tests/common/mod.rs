// Test doubles shared by the integration tests
//
// - MockAi: scripted AI collaborator with per-question failures
// - ScriptedRecognizer: replays recognition events for each capture
// - MockDevices: in-memory microphone and camera that count releases

#![allow(dead_code)]

use anyhow::Result;
use interview_coach::ai::{
    AiError, AnswerFeedback, BodyLanguageAnalysis, BodyLanguageInput, FeedbackInput,
    GeneratedQuestions, InterviewAi, QuestionsInput, ScoredFeedback,
};
use interview_coach::capture::{
    AudioBackend, AudioFrame, DeviceConfig, DeviceGrant, MediaChunk, MediaDevices,
    RecognitionEvent, RecognizerFactory, SpeechRecognizer, TranscriptSegment, VideoBackend,
};
use interview_coach::error::CaptureError;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// AI collaborator
// ============================================================================

pub fn feedback(score: f64) -> AnswerFeedback {
    let scored = |score| ScoredFeedback {
        score,
        feedback: "solid".to_string(),
    };
    AnswerFeedback {
        overall_score: score,
        clarity_and_conciseness: scored(score),
        content_relevance: scored(score),
        star_method_usage: scored(score),
        impact_and_results: scored(score),
        recommendations: "Quantify the outcome.".to_string(),
    }
}

pub fn body_language(summary: &str) -> BodyLanguageAnalysis {
    BodyLanguageAnalysis {
        confidence_score: 70.0,
        confidence_feedback: "steady".to_string(),
        posture_score: 65.0,
        posture_feedback: "upright".to_string(),
        eye_contact_score: 80.0,
        eye_contact_feedback: "good".to_string(),
        overall_analysis: summary.to_string(),
    }
}

#[derive(Default)]
pub struct MockAi {
    pub questions: Vec<String>,
    pub fail_questions: bool,
    /// Questions whose feedback call fails
    pub failing: HashSet<String>,
    pub score: f64,
    pub delay: Duration,

    pub feedback_calls: Mutex<Vec<FeedbackInput>>,
    pub body_language_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockAi {
    pub fn new(questions: &[&str]) -> Self {
        Self {
            questions: questions.iter().map(|q| q.to_string()).collect(),
            score: 80.0,
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, question: &str) -> Self {
        self.failing.insert(question.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn feedback_inputs(&self) -> Vec<FeedbackInput> {
        self.feedback_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl InterviewAi for MockAi {
    async fn generate_questions(
        &self,
        _input: &QuestionsInput,
    ) -> Result<GeneratedQuestions, AiError> {
        if self.fail_questions {
            return Err(AiError::Other("model unavailable".to_string()));
        }
        Ok(GeneratedQuestions {
            questions: self.questions.clone(),
        })
    }

    async fn provide_feedback(&self, input: &FeedbackInput) -> Result<AnswerFeedback, AiError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.feedback_calls.lock().unwrap().push(input.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&input.question) {
            return Err(AiError::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(feedback(self.score))
    }

    async fn analyze_body_language(
        &self,
        input: &BodyLanguageInput,
    ) -> Result<BodyLanguageAnalysis, AiError> {
        self.body_language_calls.fetch_add(1, Ordering::SeqCst);
        assert!(input.video_data_uri.starts_with("data:"));
        Ok(body_language("Calm and engaged."))
    }
}

// ============================================================================
// Speech recognition
// ============================================================================

pub fn final_event(text: &str) -> RecognitionEvent {
    RecognitionEvent::Final(TranscriptSegment::new(text))
}

pub fn partial_event(text: &str) -> RecognitionEvent {
    RecognitionEvent::Partial(TranscriptSegment::new(text))
}

/// Scripts consumed one per capture, shared across recognizers
pub type Scripts = Arc<Mutex<VecDeque<Vec<RecognitionEvent>>>>;

pub fn scripts(answers: Vec<Vec<RecognitionEvent>>) -> Scripts {
    Arc::new(Mutex::new(answers.into_iter().collect()))
}

/// Emits the next script on start and closes its channel on stop
pub struct ScriptedRecognizer {
    scripts: Scripts,
    events: Option<mpsc::Sender<RecognitionEvent>>,
    pub audio_frames: Arc<AtomicUsize>,
}

impl ScriptedRecognizer {
    pub fn new(scripts: Scripts) -> Self {
        Self {
            scripts,
            events: None,
            audio_frames: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn start(
        &mut self,
        mut audio: mpsc::Receiver<AudioFrame>,
    ) -> Result<mpsc::Receiver<RecognitionEvent>> {
        let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        let (tx, rx) = mpsc::channel(script.len() + 1);
        for event in script {
            tx.try_send(event)?;
        }

        let frames = Arc::clone(&self.audio_frames);
        tokio::spawn(async move {
            while audio.recv().await.is_some() {
                frames.fetch_add(1, Ordering::SeqCst);
            }
        });

        self.events = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.events = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted recognizer"
    }
}

pub struct ScriptedRecognizerFactory {
    pub scripts: Scripts,
    pub created: AtomicUsize,
}

impl ScriptedRecognizerFactory {
    pub fn new(scripts: Scripts) -> Self {
        Self {
            scripts,
            created: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl RecognizerFactory for ScriptedRecognizerFactory {
    async fn create(&self, _session_id: &str) -> Result<Box<dyn SpeechRecognizer>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedRecognizer::new(Arc::clone(&self.scripts))))
    }
}

// ============================================================================
// Devices
// ============================================================================

/// Counts acquisitions and releases of every mock device
#[derive(Default)]
pub struct DeviceLedger {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
}

impl DeviceLedger {
    pub fn held(&self) -> usize {
        self.acquired.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst)
    }
}

pub struct MockMicrophone {
    ledger: Arc<DeviceLedger>,
    frames: Option<mpsc::Sender<AudioFrame>>,
}

#[async_trait::async_trait]
impl AudioBackend for MockMicrophone {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(16);
        for i in 0..3 {
            tx.try_send(AudioFrame {
                samples: vec![0; 160],
                sample_rate: 16000,
                channels: 1,
                timestamp_ms: i * 10,
            })?;
        }
        self.frames = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        // Dropping the sender closes the frame channel
        self.frames = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.frames.is_some()
    }

    fn name(&self) -> &str {
        "mock microphone"
    }
}

impl Drop for MockMicrophone {
    fn drop(&mut self) {
        self.ledger.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockCamera {
    ledger: Arc<DeviceLedger>,
    chunks: Vec<Vec<u8>>,
    sender: Option<mpsc::Sender<MediaChunk>>,
}

#[async_trait::async_trait]
impl VideoBackend for MockCamera {
    async fn start(&mut self) -> Result<mpsc::Receiver<MediaChunk>> {
        let (tx, rx) = mpsc::channel(self.chunks.len() + 1);
        for (i, data) in self.chunks.iter().enumerate() {
            tx.try_send(MediaChunk {
                data: data.clone(),
                timestamp_ms: i as u64 * 100,
            })?;
        }
        self.sender = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.sender = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.sender.is_some()
    }

    fn mime_type(&self) -> &str {
        "video/webm"
    }

    fn name(&self) -> &str {
        "mock camera"
    }
}

impl Drop for MockCamera {
    fn drop(&mut self) {
        self.ledger.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockDevices {
    pub ledger: Arc<DeviceLedger>,
    /// Device name refused on request (e.g., "Microphone")
    pub deny: Option<String>,
    pub video_chunks: Vec<Vec<u8>>,
}

impl MockDevices {
    pub fn new() -> Self {
        Self {
            video_chunks: vec![b"frame-1".to_vec(), b"frame-2".to_vec()],
            ..Default::default()
        }
    }

    pub fn denying(device: &str) -> Self {
        Self {
            deny: Some(device.to_string()),
            ..Self::new()
        }
    }
}

#[async_trait::async_trait]
impl MediaDevices for MockDevices {
    async fn request(&self, config: DeviceConfig) -> Result<DeviceGrant, CaptureError> {
        let mut grant = DeviceGrant::default();

        if config.audio {
            if self.deny.as_deref() == Some("Microphone") {
                return Err(CaptureError::PermissionDenied("Microphone".to_string()));
            }
            self.ledger.acquired.fetch_add(1, Ordering::SeqCst);
            grant.audio = Some(Box::new(MockMicrophone {
                ledger: Arc::clone(&self.ledger),
                frames: None,
            }));
        }

        if config.video {
            if self.deny.as_deref() == Some("Camera") {
                return Err(CaptureError::PermissionDenied("Camera".to_string()));
            }
            self.ledger.acquired.fetch_add(1, Ordering::SeqCst);
            grant.video = Some(Box::new(MockCamera {
                ledger: Arc::clone(&self.ledger),
                chunks: self.video_chunks.clone(),
                sender: None,
            }));
        }

        Ok(grant)
    }
}
