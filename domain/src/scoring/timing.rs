//! Pause and pacing analysis over word-level timestamps.

use crate::entity::{TimingMetrics, WordTimestamp};

/// Gap between consecutive words above which a pause counts as long.
const LONG_PAUSE_SECONDS: f64 = 1.0;
/// Ideal measured pace for Qur'anic recitation.
const IDEAL_WORDS_PER_MINUTE: f64 = 100.0;
/// Neutral sub-score used when the engine returned no timing data.
const NEUTRAL_SCORE: u8 = 70;

pub fn analyze_timing(words: &[WordTimestamp]) -> TimingMetrics {
    if words.is_empty() {
        return TimingMetrics {
            average_pause_seconds: 0.0,
            long_pauses: 0,
            words_per_minute: 0.0,
            timing_score: NEUTRAL_SCORE,
            fluency_score: NEUTRAL_SCORE,
        };
    }

    let pauses: Vec<f64> = words
        .windows(2)
        .map(|pair| pair[1].start - pair[0].end)
        .collect();
    let average_pause = if pauses.is_empty() {
        0.0
    } else {
        pauses.iter().sum::<f64>() / pauses.len() as f64
    };
    let long_pauses = pauses
        .iter()
        .filter(|pause| **pause > LONG_PAUSE_SECONDS)
        .count() as u32;

    let spanned = words[words.len() - 1].end - words[0].start;
    let total_duration = if spanned == 0.0 { 1.0 } else { spanned };
    let words_per_minute = words.len() as f64 / total_duration * 60.0;

    let pace_score = (100.0 - (words_per_minute - IDEAL_WORDS_PER_MINUTE).abs() * 2.0).max(0.0);
    let timing_score = (100.0 - f64::from(long_pauses) * 10.0).max(0.0);
    let fluency_score = (pace_score + timing_score) / 2.0;

    TimingMetrics {
        average_pause_seconds: round_places(average_pause, 3),
        long_pauses,
        words_per_minute,
        timing_score: timing_score.round() as u8,
        fluency_score: fluency_score.round() as u8,
    }
}

fn round_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn word(text: &str, start: f64, end: f64) -> WordTimestamp {
        WordTimestamp {
            word: text.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn empty_input_falls_back_to_neutral_scores() {
        let metrics = analyze_timing(&[]);
        assert_eq!(metrics.timing_score, 70);
        assert_eq!(metrics.fluency_score, 70);
        assert_relative_eq!(metrics.average_pause_seconds, 0.0);
        assert_eq!(metrics.long_pauses, 0);
    }

    #[test]
    fn single_word_has_no_pauses() {
        let metrics = analyze_timing(&[word("بسم", 0.0, 0.5)]);
        assert_relative_eq!(metrics.average_pause_seconds, 0.0);
        assert_eq!(metrics.long_pauses, 0);
        assert_eq!(metrics.timing_score, 100);
    }

    #[test]
    fn steady_recitation_scores_well() {
        let words = [
            word("a", 0.0, 0.5),
            word("b", 0.7, 1.2),
            word("c", 1.4, 1.9),
        ];
        let metrics = analyze_timing(&words);

        assert_relative_eq!(metrics.average_pause_seconds, 0.2);
        assert_eq!(metrics.long_pauses, 0);
        // 3 words over 1.9 s is ~94.7 wpm.
        assert_relative_eq!(metrics.words_per_minute, 3.0 / 1.9 * 60.0);
        assert_eq!(metrics.timing_score, 100);
        assert_eq!(metrics.fluency_score, 95);
    }

    #[test]
    fn long_pauses_reduce_the_timing_score() {
        let words = [
            word("a", 0.0, 0.5),
            word("b", 2.0, 2.5),
            word("c", 4.1, 4.6),
        ];
        let metrics = analyze_timing(&words);

        assert_eq!(metrics.long_pauses, 2);
        assert_eq!(metrics.timing_score, 80);
    }

    #[test]
    fn zero_span_duration_does_not_divide_by_zero() {
        let words = [word("a", 1.0, 1.0)];
        let metrics = analyze_timing(&words);
        // Fallback duration of one second: a single word reads as 60 wpm.
        assert_relative_eq!(metrics.words_per_minute, 60.0);
    }

    #[test]
    fn rushed_recitation_is_penalized_through_fluency() {
        // 10 words in two seconds is 300 wpm; the pace score bottoms out.
        let words: Vec<WordTimestamp> = (0..10)
            .map(|i| word("w", f64::from(i) * 0.2, f64::from(i) * 0.2 + 0.1))
            .collect();
        let metrics = analyze_timing(&words);

        assert!(metrics.words_per_minute > 200.0);
        assert_eq!(metrics.timing_score, 100);
        assert_eq!(metrics.fluency_score, 50);
    }
}
