//! Capture subsystem
//!
//! This module provides the `CaptureSession` abstraction that manages:
//! - Scoped acquisition of microphone and camera backends
//! - Continuous transcription through a pluggable `SpeechRecognizer`
//! - Buffering of recorded media into a single blob per answer
//! - Release of every device on shutdown or drop

mod device;
mod file;
mod media;
mod recognizer;
mod session;
mod transcript;

pub use device::{AudioBackend, AudioFrame, DeviceConfig, DeviceGrant, MediaDevices, VideoBackend};
pub use file::{mime_type_for, AudioFile, FileAudioBackend, FileDevices, FileVideoBackend};
pub use media::{Answer, AnswerSummary, MediaBlob, MediaChunk};
pub use recognizer::{RecognitionEvent, RecognizerFactory, SpeechRecognizer};
pub use session::{CaptureConfig, CaptureSession, CaptureStats};
pub use transcript::{TranscriptBuffer, TranscriptSegment};
