//! Human-readable feedback assembled from the computed scores.

use crate::entity::{RecitationError, TimingMetrics};

const SMOOTH_FLUENCY_THRESHOLD: u8 = 80;
const EXCESSIVE_LONG_PAUSES: u32 = 3;

/// Deterministic rule cascade; identical inputs always produce the same
/// message.
pub fn generate_feedback(
    accuracy: f64,
    timing: &TimingMetrics,
    errors: &[RecitationError],
) -> String {
    let mut parts: Vec<&str> = Vec::new();

    parts.push(if accuracy >= 90.0 {
        "Excellent recitation! Your pronunciation closely matches the verse."
    } else if accuracy >= 75.0 {
        "Good recitation. A few words need more attention."
    } else if accuracy >= 60.0 {
        "Fair recitation. Review the verse and try again slowly."
    } else {
        "Keep practicing. Listen to the verse again and repeat it word by word."
    });

    if timing.fluency_score >= SMOOTH_FLUENCY_THRESHOLD {
        parts.push("Your recitation flows smoothly.");
    } else if timing.long_pauses > EXCESSIVE_LONG_PAUSES {
        parts.push("Try to reduce the long pauses between words.");
    }

    let mut has_omission = false;
    let mut has_substitution = false;
    for error in errors {
        match error {
            RecitationError::Omission { .. } => has_omission = true,
            RecitationError::Substitution { .. } => has_substitution = true,
            RecitationError::Insertion { .. } => {}
        }
    }
    if has_omission {
        parts.push("Pay attention to the words you skipped.");
    }
    if has_substitution {
        parts.push("Double-check the pronunciation of the words that were misheard.");
    }

    parts.join(" ")
}
