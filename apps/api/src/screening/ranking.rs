//! Ranking: filters scored candidates and orders them best first.

use serde::Serialize;

use crate::errors::AppError;
use crate::screening::pipeline::CandidateResult;

pub const MAX_TOP_N: usize = 1000;

/// Validated ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankingFilter {
    pub min_score: u32,
    pub top_n: usize,
}

impl RankingFilter {
    pub fn new(min_score: u32, top_n: usize) -> Result<Self, AppError> {
        if min_score > 100 {
            return Err(AppError::Validation(format!(
                "min_score must be between 0 and 100, got {min_score}"
            )));
        }
        if top_n == 0 || top_n > MAX_TOP_N {
            return Err(AppError::Validation(format!(
                "top_n must be between 1 and {MAX_TOP_N}, got {top_n}"
            )));
        }
        Ok(Self { min_score, top_n })
    }
}

/// Scored/unscored tallies for one screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreeningCounts {
    pub total: usize,
    pub scored: usize,
    pub unscored: usize,
}

impl ScreeningCounts {
    pub fn of(results: &[CandidateResult]) -> Self {
        let scored = results.iter().filter(|r| r.score.is_some()).count();
        Self {
            total: results.len(),
            scored,
            unscored: results.len() - scored,
        }
    }
}

/// Top candidates: unscored and below-threshold results dropped, highest score
/// first (ties keep input order), at most `top_n`, blank names removed.
pub fn rank(results: &[CandidateResult], filter: &RankingFilter) -> Vec<CandidateResult> {
    let mut ranked: Vec<&CandidateResult> = results
        .iter()
        .filter(|r| r.score.is_some_and(|s| s >= filter.min_score))
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
        .into_iter()
        .take(filter.top_n)
        .filter(|r| !r.resume_name.trim().is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, score: Option<u32>) -> CandidateResult {
        CandidateResult {
            resume_name: name.to_string(),
            storage_key: None,
            score,
            details: vec![],
        }
    }

    fn names(results: &[CandidateResult]) -> Vec<&str> {
        results.iter().map(|r| r.resume_name.as_str()).collect()
    }

    #[test]
    fn test_filter_rejects_out_of_range_values() {
        assert!(RankingFilter::new(101, 10).is_err());
        assert!(RankingFilter::new(50, 0).is_err());
        assert!(RankingFilter::new(50, MAX_TOP_N + 1).is_err());
        assert!(RankingFilter::new(0, 1).is_ok());
        assert!(RankingFilter::new(100, MAX_TOP_N).is_ok());
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let results = vec![
            result("mid.pdf", Some(86)),
            result("top.pdf", Some(95)),
            result("low.pdf", Some(40)),
        ];
        let filter = RankingFilter::new(85, 20).unwrap();
        assert_eq!(names(&rank(&results, &filter)), vec!["top.pdf", "mid.pdf"]);
    }

    #[test]
    fn test_rank_excludes_unscored_but_keeps_scored_zero() {
        let results = vec![result("none.pdf", None), result("zero.pdf", Some(0))];
        let filter = RankingFilter::new(0, 20).unwrap();
        assert_eq!(names(&rank(&results, &filter)), vec!["zero.pdf"]);
    }

    #[test]
    fn test_rank_truncates_and_keeps_tie_order() {
        let results = vec![
            result("a.pdf", Some(90)),
            result("b.pdf", Some(90)),
            result("c.pdf", Some(90)),
        ];
        let filter = RankingFilter::new(0, 2).unwrap();
        assert_eq!(names(&rank(&results, &filter)), vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_rank_drops_blank_names() {
        let results = vec![result("  ", Some(99)), result("ok.pdf", Some(90))];
        let filter = RankingFilter::new(0, 5).unwrap();
        assert_eq!(names(&rank(&results, &filter)), vec!["ok.pdf"]);
    }

    #[test]
    fn test_counts() {
        let results = vec![
            result("a.pdf", Some(10)),
            result("b.pdf", None),
            result("c.pdf", Some(0)),
        ];
        assert_eq!(
            ScreeningCounts::of(&results),
            ScreeningCounts {
                total: 3,
                scored: 2,
                unscored: 1
            }
        );
    }
}
