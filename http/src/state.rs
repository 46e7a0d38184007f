use std::sync::Arc;

use recitation_application::ScoreRecitationUseCase;

#[derive(Clone)]
pub struct AppState {
    pub usecase: Arc<dyn ScoreRecitationUseCase>,
    pub max_audio_bytes: usize,
}

impl AppState {
    pub fn new(usecase: Arc<dyn ScoreRecitationUseCase>, max_audio_bytes: usize) -> Self {
        Self {
            usecase,
            max_audio_bytes,
        }
    }
}
