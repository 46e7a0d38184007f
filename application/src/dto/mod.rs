mod recitation;

pub use recitation::{ScoreRecitationRequest, ScoreRecitationResponse};
