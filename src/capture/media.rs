use base64::Engine;
use serde::{Deserialize, Serialize};

/// One encoded chunk emitted by a video backend
#[derive(Debug, Clone)]
pub struct MediaChunk {
    /// Encoded media bytes (container fragment)
    pub data: Vec<u8>,
    /// Milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Recorded media for one answer, assembled from buffered chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaBlob {
    /// Concatenate chunks in arrival order; `None` when nothing was recorded
    pub fn assemble(mime_type: &str, chunks: Vec<MediaChunk>) -> Option<Self> {
        let data: Vec<u8> = chunks.into_iter().flat_map(|c| c.data).collect();
        if data.is_empty() {
            return None;
        }

        Some(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Encode as `data:<mime>;base64,<data>`
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The user's answer to one question
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    /// Concatenated final recognition segments, or typed text
    pub transcript: String,
    pub media: Option<MediaBlob>,
}

impl Answer {
    pub fn typed(text: impl Into<String>) -> Self {
        Self {
            transcript: text.into(),
            media: None,
        }
    }

    /// Typed text replaces the spoken transcript when it is not blank
    pub fn with_typed_text(mut self, typed: Option<&str>) -> Self {
        if let Some(text) = typed.map(str::trim).filter(|t| !t.is_empty()) {
            self.transcript = text.to_string();
        }
        self
    }

    /// No transcript text and no recorded media
    pub fn is_empty(&self) -> bool {
        self.transcript.trim().is_empty() && self.media.is_none()
    }

    pub fn summary(&self) -> AnswerSummary {
        AnswerSummary {
            transcript: self.transcript.clone(),
            media_type: self.media.as_ref().map(|m| m.mime_type.clone()),
            media_bytes: self.media.as_ref().map_or(0, MediaBlob::len),
        }
    }
}

/// Serializable view of an [`Answer`] without the media payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSummary {
    pub transcript: String,
    pub media_type: Option<String>,
    pub media_bytes: usize,
}
