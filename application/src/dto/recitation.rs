use serde::{Deserialize, Serialize};
use validator::Validate;

use recitation_domain::{
    HasanatAward, RecitationFeedback, TimingMetrics, WordTimestamp,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScoreRecitationRequest {
    #[validate(length(min = 1))]
    pub audio: Vec<u8>,
    #[validate(length(min = 1, max = 255))]
    pub mime_type: Option<String>,
    #[validate(length(min = 1))]
    pub expected_text: String,
    #[validate(length(min = 1, max = 64))]
    pub ayah_id: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub session_id: Option<String>,
    #[validate(range(min = 0.0))]
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecitationResponse {
    pub session_id: String,
    pub ayah_id: Option<String>,
    pub transcription: String,
    pub expected_text: String,
    pub feedback: RecitationFeedback,
    pub timing: TimingMetrics,
    pub hasanat: HasanatAward,
    pub words: Vec<WordTimestamp>,
    pub audio_duration_seconds: Option<f64>,
}
