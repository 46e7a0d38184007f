use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub duration_seconds: Option<f64>,
}

/// One recognized word with its position in the recording, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub words: Vec<WordTimestamp>,
}

/// A single word-level discrepancy between the recited and expected text.
/// Position is the zero-based index in the word-aligned sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecitationError {
    Omission {
        expected_word: String,
        position: usize,
    },
    Insertion {
        transcribed_word: String,
        position: usize,
    },
    Substitution {
        transcribed_word: String,
        expected_word: String,
        position: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingMetrics {
    pub average_pause_seconds: f64,
    pub long_pauses: u32,
    pub words_per_minute: f64,
    pub timing_score: u8,
    pub fluency_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasanatAward {
    pub letter_count: u32,
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecitationFeedback {
    pub overall_score: u8,
    pub accuracy: u8,
    pub timing_score: u8,
    pub fluency_score: u8,
    pub errors: Vec<RecitationError>,
    pub message: String,
}

/// Everything the scoring core derives from one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecitationAssessment {
    pub feedback: RecitationFeedback,
    pub timing: TimingMetrics,
    pub award: HasanatAward,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineContext {
    pub session_id: String,
    pub expected_text: String,
    pub ayah_id: Option<String>,
    pub audio: AudioPayload,
    pub transcription: Option<TranscriptionResult>,
    pub assessment: Option<RecitationAssessment>,
    pub events: Vec<DomainEvent>,
    pub extensions: HashMap<String, Value>,
}

impl PipelineContext {
    pub fn new(session_id: impl Into<String>, expected_text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            expected_text: expected_text.into(),
            ayah_id: None,
            audio: AudioPayload::default(),
            transcription: None,
            assessment: None,
            events: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    pub fn set_extension(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.extensions.insert(key.into(), value)
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    TranscriptReady { transcription: TranscriptionResult },
    AssessmentReady { feedback: RecitationFeedback },
}

#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub session_id: String,
    pub audio: AudioPayload,
    pub expected_text: String,
    pub ayah_id: Option<String>,
}
