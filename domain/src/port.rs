use async_trait::async_trait;

use crate::{DomainError, PipelineContext, TranscriptionRequest, TranscriptionResult};

#[async_trait]
pub trait PipelineStage: Send + Sync {
    fn name(&self) -> &'static str;
    async fn execute(&self, context: &mut PipelineContext) -> Result<(), DomainError>;
}

#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResult, DomainError>;
}
