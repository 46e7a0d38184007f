mod recitation;

pub use recitation::{ScoreRecitationUseCase, ScoreRecitationUseCaseImpl};
