use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use recitation_domain::{AudioPayload, PipelineContext};

use crate::{ApplicationError, PipelineEngine, ScoreRecitationRequest, ScoreRecitationResponse};

const DEFAULT_AUDIO_MIME: &str = "audio/wav";

#[async_trait]
pub trait ScoreRecitationUseCase: Send + Sync {
    async fn score(
        &self,
        request: ScoreRecitationRequest,
    ) -> Result<ScoreRecitationResponse, ApplicationError>;
}

pub struct ScoreRecitationUseCaseImpl {
    pipeline: PipelineEngine,
}

impl ScoreRecitationUseCaseImpl {
    pub fn new(pipeline: PipelineEngine) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl ScoreRecitationUseCase for ScoreRecitationUseCaseImpl {
    async fn score(
        &self,
        request: ScoreRecitationRequest,
    ) -> Result<ScoreRecitationResponse, ApplicationError> {
        request
            .validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;

        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::debug!(
            session_id = %session_id,
            audio_byte_count = request.audio.len(),
            ayah_id = request.ayah_id.as_deref().unwrap_or("-"),
            "starting recitation scoring pipeline"
        );

        let mut context = PipelineContext::new(session_id, request.expected_text.clone());
        context.ayah_id = request.ayah_id.clone();
        context.audio = AudioPayload {
            bytes: request.audio,
            mime_type: request
                .mime_type
                .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string()),
            duration_seconds: request.duration_seconds,
        };
        context.set_extension(
            "request.expected_char_count",
            json!(request.expected_text.chars().count()),
        );

        self.pipeline.run(&mut context).await?;

        let transcription = context.transcription.clone().unwrap_or_default();
        let assessment = context.assessment.clone().ok_or_else(|| {
            ApplicationError::Internal("scoring pipeline returned no assessment".to_string())
        })?;

        let audio_duration_seconds = context.audio.duration_seconds.or_else(|| {
            let first = transcription.words.first()?;
            let last = transcription.words.last()?;
            Some(last.end - first.start)
        });

        tracing::debug!(
            session_id = %context.session_id,
            overall_score = assessment.feedback.overall_score,
            error_count = assessment.feedback.errors.len(),
            "recitation scoring pipeline completed"
        );

        Ok(ScoreRecitationResponse {
            session_id: context.session_id,
            ayah_id: context.ayah_id,
            transcription: transcription.text,
            expected_text: context.expected_text,
            feedback: assessment.feedback,
            timing: assessment.timing,
            hasanat: assessment.award,
            words: transcription.words,
            audio_duration_seconds,
        })
    }
}
