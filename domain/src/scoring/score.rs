//! Weighted aggregation and the hasanat reward.

use crate::entity::HasanatAward;
use crate::scoring::text::count_arabic_letters;

const ACCURACY_WEIGHT: f64 = 0.6;
const TIMING_WEIGHT: f64 = 0.2;
const FLUENCY_WEIGHT: f64 = 0.2;
/// Canonical ten hasanat per letter recited.
const POINTS_PER_LETTER: f64 = 10.0;

pub fn overall_score(accuracy: f64, timing_score: u8, fluency_score: u8) -> u8 {
    let weighted = accuracy * ACCURACY_WEIGHT
        + f64::from(timing_score) * TIMING_WEIGHT
        + f64::from(fluency_score) * FLUENCY_WEIGHT;
    weighted.round().clamp(0.0, 100.0) as u8
}

pub fn hasanat_award(expected_text: &str, overall_score: u8) -> HasanatAward {
    let letter_count = count_arabic_letters(expected_text);
    let points = (f64::from(letter_count) * POINTS_PER_LETTER * f64::from(overall_score) / 100.0)
        .round() as u64;
    HasanatAward {
        letter_count,
        points,
    }
}
