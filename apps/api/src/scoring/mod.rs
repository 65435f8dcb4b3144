//! Score extraction and normalization for free-text evaluation reports.
//!
//! Pure, synchronous and stateless: every function here is a deterministic
//! function of its input text and is safe to call concurrently.
//!
//! Flow: report → normalizer → category resolver (x4) → breakdown aggregate →
//! (if fewer than three categories resolved) fallback total parser on the raw
//! report → score. The normalizer output is also the corrected display text.

pub mod breakdown;
pub mod category;
pub mod extract;
pub mod fallback;
pub mod normalize;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use normalize::normalize_report;

/// How a score was recovered from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStrategy {
    /// Clamped sum of at least three category values.
    Breakdown,
    /// `Total Score ...: N`
    ExplicitTotal,
    /// `N/100` anywhere in the text.
    OverHundred,
    /// `N out of 100` anywhere in the text.
    OutOfHundred,
    /// Largest plausible standalone number. Best effort only.
    LargestPlausible,
}

/// A score in `[0, 100]` and the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedScore {
    pub value: u32,
    pub strategy: ScoreStrategy,
}

/// Derives a score from a report, or `None` when no confident score exists.
///
/// A breakdown sum always wins over any stated total. Categories are read from
/// the normalized report, so the score matches the text shown to recruiters and
/// re-scoring a normalized report is a no-op. Stated totals are read from the
/// raw report because normalization rewrites the total line.
pub fn derive(report: &str) -> Option<DerivedScore> {
    let values = category::resolve(&normalize_report(report));
    if let Some(value) = breakdown::aggregate(&values) {
        debug!(
            "Breakdown score {value} from {} categories",
            values.resolved_count()
        );
        return Some(DerivedScore {
            value,
            strategy: ScoreStrategy::Breakdown,
        });
    }

    let derived = fallback::parse_total(report)
        .map(|(value, strategy)| DerivedScore { value, strategy });
    match derived {
        Some(d) => debug!("Fallback score {} via {:?}", d.value, d.strategy),
        None => debug!("No score derivable from report"),
    }
    derived
}

/// Score in `[0, 100]`, or `None` (absent, never a stand-in zero).
pub fn derive_score(report: &str) -> Option<u32> {
    derive(report).map(|d| d.value)
}

/// Scores many reports in parallel. Output order matches input order.
pub fn derive_scores<S: AsRef<str> + Sync>(reports: &[S]) -> Vec<Option<u32>> {
    reports
        .par_iter()
        .map(|report| derive_score(report.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPORT: &str = "\
1. **Total Score: 78/100**
2. **Score Breakdown**
   - Skills: 24/30
   - Experience: 36/50
   - Education: 10/10
   - Extras: 8/10
3. **Summary**: Solid Python and ML background, 3 relevant internships.
4. ❌ I do not recommend this candidate for this specific job.";

    #[test]
    fn test_caps_applied_to_breakdown() {
        let report = "Skills: 45\nExperience: 60\nEducation: 5\nExtras: 3";
        assert_eq!(derive_score(report), Some(88));
    }

    #[test]
    fn test_breakdown_preferred_over_stated_total() {
        let derived = derive(FULL_REPORT).unwrap();
        assert_eq!(derived.value, 24 + 36 + 10 + 8);
        assert_eq!(derived.strategy, ScoreStrategy::Breakdown);
    }

    #[test]
    fn test_total_only_report() {
        assert_eq!(derive_score("Total Score: 92/100"), Some(92));
    }

    #[test]
    fn test_explicit_total_beats_heuristic() {
        let report = "Years of experience: 7. Total Score: 85 out of 100. Max possible: 100.";
        let derived = derive(report).unwrap();
        assert_eq!(derived.value, 85);
        assert_eq!(derived.strategy, ScoreStrategy::ExplicitTotal);
    }

    #[test]
    fn test_small_numbers_alone_are_absent() {
        assert_eq!(derive_score("2 years, 3 projects"), None);
    }

    #[test]
    fn test_empty_and_error_text_are_absent() {
        assert_eq!(derive_score(""), None);
        assert_eq!(derive_score("Error in evaluation: connection refused"), None);
    }

    #[test]
    fn test_normalizer_caps_parenthesized_points() {
        assert_eq!(
            normalize_report("Skills Match (45 points)"),
            "Skills Match (30 points)"
        );
    }

    #[test]
    fn test_breakdown_score_survives_normalization() {
        let reports = [
            FULL_REPORT,
            "Skills: 45\nExperience: 60\nEducation: 5\nExtras: 3",
            "Skills Match: 34/30\nExperience Match: 55/50\nEducation: 4/10\nTotal Score: 99/100",
            "Skills: 22 points\nExperience: 61 points\nCertifications: 12 points",
            "Skills: 28/25\nExperience: 40/50\nEducation: 8/10\nExtras: 5/10\nTotal Score: 81/100",
            "Skills (incl. certifications): 28/30\nExperience: 40/50\nEducation: 8/10\nExtras: 5/10",
        ];
        for report in reports {
            let raw = derive(report).unwrap();
            assert_eq!(raw.strategy, ScoreStrategy::Breakdown);
            assert_eq!(
                derive_score(&normalize_report(report)),
                Some(raw.value),
                "score changed after normalizing: {report:?}"
            );
        }
    }

    #[test]
    fn test_fraction_below_cap_scores_as_displayed() {
        let report =
            "Skills: 28/25\nExperience: 40/50\nEducation: 8/10\nExtras: 5/10\nTotal Score: 81/100";
        let normalized = normalize_report(report);

        assert!(normalized.contains("Skills: 25/25"));
        assert!(normalized.contains("Total Score: 78/100"));
        assert_eq!(derive_score(report), Some(25 + 40 + 8 + 5));
        assert_eq!(derive_score(&normalized), Some(78));
    }

    #[test]
    fn test_line_with_second_label_scores_as_displayed() {
        let report =
            "Skills (incl. certifications): 28/30\nExperience: 40/50\nEducation: 8/10\nExtras: 5/10";
        let normalized = normalize_report(report);

        assert!(normalized.contains("Skills (incl. certifications): 10/30"));
        assert_eq!(derive_score(report), Some(10 + 40 + 8 + 5));
        assert_eq!(derive_score(&normalized), Some(63));
    }

    #[test]
    fn test_normalizer_is_idempotent_on_full_report() {
        let once = normalize_report(FULL_REPORT);
        assert_eq!(normalize_report(&once), once);
    }

    #[test]
    fn test_derive_scores_preserves_order() {
        let reports = vec![
            "Total Score: 40".to_string(),
            "nothing here".to_string(),
            "Skills: 30\nExperience: 50\nEducation: 10".to_string(),
        ];
        assert_eq!(derive_scores(&reports), vec![Some(40), None, Some(90)]);
    }
}
