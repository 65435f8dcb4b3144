//! Breakdown aggregation: the authoritative score whenever enough categories resolve.

use crate::scoring::category::{Category, CategoryValues};

/// Highest score a report can carry.
pub const MAX_SCORE: u32 = 100;

/// Categories that must resolve before a breakdown sum is trusted.
/// Tolerates the evaluator omitting one field.
pub const MIN_RESOLVED_CATEGORIES: usize = 3;

/// Clamps each category to its cap, sums, and clamps the sum to `[0, MAX_SCORE]`.
pub fn breakdown_sum(skills: u32, experience: u32, education: u32, extras: u32) -> u32 {
    let sum = Category::Skills.clamp(skills)
        + Category::Experience.clamp(experience)
        + Category::Education.clamp(education)
        + Category::Extras.clamp(extras);
    sum.min(MAX_SCORE)
}

/// Sum of clamped values with unresolved categories counted as zero.
pub fn total_with_defaults(values: &CategoryValues) -> u32 {
    breakdown_sum(
        values.skills.unwrap_or(0),
        values.experience.unwrap_or(0),
        values.education.unwrap_or(0),
        values.extras.unwrap_or(0),
    )
}

/// Breakdown sum, or `None` when fewer than `MIN_RESOLVED_CATEGORIES` resolved.
pub fn aggregate(values: &CategoryValues) -> Option<u32> {
    if values.resolved_count() < MIN_RESOLVED_CATEGORIES {
        return None;
    }
    Some(total_with_defaults(values))
}
