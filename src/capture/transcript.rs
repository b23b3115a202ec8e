use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single transcript segment from the STT service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Transcribed text
    pub text: String,

    /// When this segment was received
    pub timestamp: DateTime<Utc>,

    /// Confidence score (0.0 to 1.0), if available
    pub confidence: Option<f32>,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            confidence: None,
        }
    }
}

/// Accumulates recognition results for one answer
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuffer {
    finals: Vec<TranscriptSegment>,
    interim: Option<TranscriptSegment>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_partial(&mut self, segment: TranscriptSegment) {
        self.interim = Some(segment);
    }

    /// A final segment settles the pending interim text
    pub fn push_final(&mut self, segment: TranscriptSegment) {
        self.interim = None;
        if !segment.text.trim().is_empty() {
            self.finals.push(segment);
        }
    }

    /// Concatenation of final segments only
    pub fn final_text(&self) -> String {
        self.finals
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Final text followed by the current interim hypothesis
    pub fn live_text(&self) -> String {
        let finals = self.final_text();
        match self.interim.as_ref().map(|s| s.text.trim()) {
            Some(interim) if !interim.is_empty() => {
                if finals.is_empty() {
                    interim.to_string()
                } else {
                    format!("{} {}", finals, interim)
                }
            }
            _ => finals,
        }
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.finals
    }

    pub fn clear(&mut self) {
        self.finals.clear();
        self.interim = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_text_ignores_interim() {
        let mut buffer = TranscriptBuffer::new();
        buffer.push_partial(TranscriptSegment::new("I led"));
        buffer.push_final(TranscriptSegment::new("I led the migration."));
        buffer.push_partial(TranscriptSegment::new("It took"));

        assert_eq!(buffer.final_text(), "I led the migration.");
        assert_eq!(buffer.live_text(), "I led the migration. It took");
    }

    #[test]
    fn test_finals_are_joined_with_spaces() {
        let mut buffer = TranscriptBuffer::new();
        buffer.push_final(TranscriptSegment::new(" First part. "));
        buffer.push_final(TranscriptSegment::new("Second part."));

        assert_eq!(buffer.final_text(), "First part. Second part.");
        assert_eq!(buffer.segments().len(), 2);
    }

    #[test]
    fn test_blank_finals_are_dropped() {
        let mut buffer = TranscriptBuffer::new();
        buffer.push_final(TranscriptSegment::new("   "));

        assert!(buffer.segments().is_empty());
        assert_eq!(buffer.final_text(), "");
        assert_eq!(buffer.live_text(), "");
    }

    #[test]
    fn test_live_text_with_only_interim() {
        let mut buffer = TranscriptBuffer::new();
        buffer.push_partial(TranscriptSegment::new("hello"));
        assert_eq!(buffer.live_text(), "hello");

        buffer.clear();
        assert_eq!(buffer.live_text(), "");
    }
}
