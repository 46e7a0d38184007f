//! Word-level error classification.

use crate::entity::RecitationError;

/// Positional word-by-word diff over two normalized strings.
///
/// Words are compared strictly by index: once an insertion or omission
/// shifts the sequences out of phase, every later pair reads as a
/// substitution. That mirrors the shipped scoring behavior and is kept
/// deliberately; a minimum-edit alignment would change observable scores.
pub fn classify_errors(
    normalized_transcribed: &str,
    normalized_expected: &str,
) -> Vec<RecitationError> {
    let transcribed: Vec<&str> = normalized_transcribed.split_whitespace().collect();
    let expected: Vec<&str> = normalized_expected.split_whitespace().collect();

    let mut errors = Vec::new();
    for position in 0..transcribed.len().max(expected.len()) {
        match (transcribed.get(position), expected.get(position)) {
            (None, Some(word)) => errors.push(RecitationError::Omission {
                expected_word: (*word).to_string(),
                position,
            }),
            (Some(word), None) => errors.push(RecitationError::Insertion {
                transcribed_word: (*word).to_string(),
                position,
            }),
            (Some(transcribed_word), Some(expected_word))
                if transcribed_word != expected_word =>
            {
                errors.push(RecitationError::Substitution {
                    transcribed_word: (*transcribed_word).to_string(),
                    expected_word: (*expected_word).to_string(),
                    position,
                });
            }
            _ => {}
        }
    }
    errors
}
