use async_trait::async_trait;
use serde_json::json;

use recitation_domain::{
    scoring, DomainError, DomainEvent, PipelineContext, PipelineStage,
};

/// In-process stage running the pure scoring core over whatever the
/// transcription stage left in the context.
#[derive(Default)]
pub struct AnalysisStage;

impl AnalysisStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineStage for AnalysisStage {
    fn name(&self) -> &'static str {
        "recitation_analysis"
    }

    async fn execute(&self, context: &mut PipelineContext) -> Result<(), DomainError> {
        // A missing transcript scores as an empty one; the stage never
        // fails on recognizer silence.
        let transcription = context.transcription.clone().unwrap_or_default();
        let assessment = scoring::score_recitation(
            &transcription.text,
            &context.expected_text,
            &transcription.words,
        );

        tracing::debug!(
            session_id = %context.session_id,
            overall_score = assessment.feedback.overall_score,
            accuracy = assessment.feedback.accuracy,
            error_count = assessment.feedback.errors.len(),
            "recitation analysis completed"
        );

        context.set_extension(
            "analysis.overall_score",
            json!(assessment.feedback.overall_score),
        );
        context.events.push(DomainEvent::AssessmentReady {
            feedback: assessment.feedback.clone(),
        });
        context.assessment = Some(assessment);
        Ok(())
    }
}
