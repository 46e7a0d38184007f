mod distance;
mod feedback;
mod mistakes;
mod score;
mod text;
mod timing;

pub use distance::{accuracy_score, edit_distance};
pub use feedback::generate_feedback;
pub use mistakes::classify_errors;
pub use score::{hasanat_award, overall_score};
pub use text::{count_arabic_letters, is_countable_letter, normalize};
pub use timing::analyze_timing;

use crate::entity::{RecitationAssessment, RecitationFeedback, WordTimestamp};

/// Scores one submitted recitation against its expected verse text.
///
/// Pure and total: empty transcripts and missing timing data degrade to
/// the documented fallbacks instead of failing.
pub fn score_recitation(
    transcribed_text: &str,
    expected_text: &str,
    words: &[WordTimestamp],
) -> RecitationAssessment {
    let normalized_transcribed = normalize(transcribed_text);
    let normalized_expected = normalize(expected_text);

    let accuracy = accuracy_score(&normalized_transcribed, &normalized_expected);
    let errors = classify_errors(&normalized_transcribed, &normalized_expected);
    let timing = analyze_timing(words);

    let overall = overall_score(accuracy, timing.timing_score, timing.fluency_score);
    let award = hasanat_award(expected_text, overall);
    let message = generate_feedback(accuracy, &timing, &errors);

    RecitationAssessment {
        feedback: RecitationFeedback {
            overall_score: overall,
            accuracy: accuracy.round() as u8,
            timing_score: timing.timing_score,
            fluency_score: timing.fluency_score,
            errors,
            message,
        },
        timing,
        award,
    }
}
