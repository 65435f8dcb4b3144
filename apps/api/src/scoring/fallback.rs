//! Fallback total parsing: used only when a breakdown sum cannot be formed.
//!
//! Strategies run in strict priority order and stop at the first one that
//! yields a value in `[0, 100]`. Only the first match of each explicit
//! pattern is considered.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scoring::breakdown::MAX_SCORE;
use crate::scoring::extract::extract_first_int;
use crate::scoring::ScoreStrategy;

static EXPLICIT_TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Total\s*Score[^\n:]*:\s*(\d{1,3})(?:\s*/\s*\d{1,3})?").unwrap()
});
static OVER_HUNDRED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,3})\s*/\s*100").unwrap());
static OUT_OF_HUNDRED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,3})\s*out\s*of\s*100").unwrap());
static STANDALONE_INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,3})\b").unwrap());

/// Characters inspected on each side of a heuristic candidate.
const CONTEXT_WINDOW: usize = 20;

/// Recovers a total from a report with no usable breakdown.
pub fn parse_total(text: &str) -> Option<(u32, ScoreStrategy)> {
    let explicit = [
        (&*EXPLICIT_TOTAL_RE, ScoreStrategy::ExplicitTotal),
        (&*OVER_HUNDRED_RE, ScoreStrategy::OverHundred),
        (&*OUT_OF_HUNDRED_RE, ScoreStrategy::OutOfHundred),
    ];
    for (pattern, strategy) in explicit {
        if let Some(value) = extract_first_int(pattern, text).filter(|v| *v <= MAX_SCORE) {
            return Some((value, strategy));
        }
    }
    largest_plausible(text).map(|value| (value, ScoreStrategy::LargestPlausible))
}

/// Best-effort guess: the largest standalone integer that is not a denominator.
///
/// Scoring prose tends to mention smaller sub-numbers (years, caps) around the
/// real total. Only runs when the text talks about a score at all, so incidental
/// counts in unrelated prose never become a fabricated score.
fn largest_plausible(text: &str) -> Option<u32> {
    if !text.to_lowercase().contains("score") {
        return None;
    }

    STANDALONE_INT_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            let value = m.as_str().parse::<u32>().ok()?;
            if value > MAX_SCORE {
                return None;
            }
            let context = surrounding(text, m.start(), m.end()).to_lowercase();
            if context.contains("out of") || context.contains("/100") {
                return None;
            }
            // A bare 100 is almost always a cap or denominator.
            if value == MAX_SCORE && !(context.contains("total score") || context.contains("score:"))
            {
                return None;
            }
            Some(value)
        })
        .max()
}

/// Slice of `text` spanning `CONTEXT_WINDOW` characters either side of `start..end`.
fn surrounding(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_WINDOW)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}
