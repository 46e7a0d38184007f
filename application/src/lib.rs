mod dto;
mod error;
mod pipeline;
mod usecase;

pub use dto::{ScoreRecitationRequest, ScoreRecitationResponse};
pub use error::ApplicationError;
pub use pipeline::{PipelineDefinition, PipelineEngine, PipelineStepLoader, PipelineStepSpec};
pub use usecase::{ScoreRecitationUseCase, ScoreRecitationUseCaseImpl};
