//! Body-condition-score labels.

/// Label for a 1-9 body condition score.
///
/// Out-of-range scores clamp to the nearest valid score instead of being
/// rejected.
pub fn body_condition_label(score: i32) -> &'static str {
    match score.clamp(1, 9) {
        1 | 2 => "Emaciated",
        3 => "Thin",
        4 => "Underweight",
        5 => "Ideal",
        6 => "Overweight",
        7 | 8 => "Obese",
        _ => "Severely Obese",
    }
}
