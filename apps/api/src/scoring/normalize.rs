//! Report normalization: rewrites category values and the total line in place
//! so the displayed report is self-consistent with the category caps.
//!
//! Idempotent: normalizing an already-normalized report returns it unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::scoring::breakdown::total_with_defaults;
use crate::scoring::category::{resolve, Category};

/// Rewriters for one literal label, in the order they are applied.
struct LabelRewriter {
    cap: u32,
    /// `<label> ... (N points)`
    in_parens: Regex,
    /// `<label> ...: N points`
    colon_points: Regex,
    /// `<label> ... N/D`
    fraction: Regex,
}

impl LabelRewriter {
    fn new(label: &str, cap: u32) -> Self {
        let label = regex::escape(label);
        let compile = |pattern: String| {
            Regex::new(&pattern).expect("label rewriters are built from escaped literals")
        };
        Self {
            cap,
            in_parens: compile(format!(r"(?i)({label}[^\n]*?\()(\d{{1,3}})(\s*points?\))")),
            colon_points: compile(format!(r"(?i)({label}[^\n:]*:\s*)(\d{{1,3}})(\s*points?)")),
            // The number must start on a word boundary so a longer literal is never split.
            fraction: compile(format!(r"(?i)({label}[^\n]*?)\b(\d{{1,3}})\s*/\s*(\d{{1,3}})")),
        }
    }

    fn apply(&self, text: &str) -> String {
        let cap = self.cap;
        let text = self.in_parens.replace_all(text, |caps: &Captures| {
            match caps[2].parse::<u32>() {
                Ok(n) => format!("{}{}{}", &caps[1], n.min(cap), &caps[3]),
                Err(_) => caps[0].to_string(),
            }
        });
        let text = self.colon_points.replace_all(&text, |caps: &Captures| {
            match caps[2].parse::<u32>() {
                Ok(n) => format!("{}{}{}", &caps[1], n.min(cap), &caps[3]),
                Err(_) => caps[0].to_string(),
            }
        });
        let text = self.fraction.replace_all(&text, |caps: &Captures| {
            match (caps[2].parse::<u32>(), caps[3].parse::<u32>()) {
                (Ok(n), Ok(den)) => format!("{}{}/{}", &caps[1], n.min(cap).min(den), &caps[3]),
                _ => caps[0].to_string(),
            }
        });
        text.into_owned()
    }
}

static LABEL_REWRITERS: Lazy<Vec<LabelRewriter>> = Lazy::new(|| {
    Category::ALL
        .iter()
        .flat_map(|category| {
            category
                .display_labels()
                .iter()
                .map(move |label| LabelRewriter::new(label, category.cap()))
        })
        .collect()
});

static TOTAL_OVER_HUNDRED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Total\s*Score[^\n:]*:\s*)(\d{1,3})(\s*/\s*100)").unwrap()
});
static TOTAL_OUT_OF_HUNDRED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Total\s*Score[^\n:]*:\s*)(\d{1,3})(\s*out\s*of\s*100)").unwrap()
});
static TOTAL_BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Total\s*Score[^\n:]*:\s*)(\d{1,3})").unwrap());
static DENOMINATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/\s*100|out\s*of\s*100").unwrap());

/// Returns a corrected copy of `report` for display.
///
/// Every category value is capped in place, then the total is recomputed from
/// the capped values (unresolved categories count as zero) and written into the
/// first `Total Score` phrasing that matches: `: N/100`, `: N out of 100`, then
/// bare `: N`. Reports without a total line only get category corrections.
pub fn normalize_report(report: &str) -> String {
    let mut normalized = report.to_string();
    for rewriter in LABEL_REWRITERS.iter() {
        normalized = rewriter.apply(&normalized);
    }

    let total = total_with_defaults(&resolve(&normalized));
    rewrite_total(&normalized, total)
}

fn rewrite_total(text: &str, total: u32) -> String {
    let with_suffix = |caps: &Captures| format!("{}{}{}", &caps[1], total, &caps[3]);

    if TOTAL_OVER_HUNDRED_RE.is_match(text) {
        return TOTAL_OVER_HUNDRED_RE
            .replace_all(text, with_suffix)
            .into_owned();
    }
    if TOTAL_OUT_OF_HUNDRED_RE.is_match(text) {
        return TOTAL_OUT_OF_HUNDRED_RE
            .replace_all(text, with_suffix)
            .into_owned();
    }

    let bare_matches = TOTAL_BARE_RE
        .find_iter(text)
        .any(|m| !denominator_follows(text, m.end()));
    if bare_matches {
        return TOTAL_BARE_RE
            .replace_all(text, |caps: &Captures| {
                let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
                if denominator_follows(text, whole) {
                    caps[0].to_string()
                } else {
                    format!("{}{}", &caps[1], total)
                }
            })
            .into_owned();
    }

    text.to_string()
}

/// True when the rest of the line after `at` carries a `/100` or `out of 100` denominator.
fn denominator_follows(text: &str, at: usize) -> bool {
    let rest = text[at..].split('\n').next().unwrap_or("");
    DENOMINATOR_RE.is_match(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERSCORED_REPORT: &str = "\
**Total Score: 112/100**

Score breakdown:
- Skills Match: 34/30
- Experience Match: 55/50
- Education Match: 10/10
- Extras (Certifications, Awards, Side Projects): 13/10

Summary: Strong backend engineer with 6 years of Rust.
✅ I recommend this candidate for the job.";

    #[test]
    fn test_caps_points_in_parens() {
        let out = normalize_report("Skills Match (45 points)");
        assert_eq!(out, "Skills Match (30 points)");
    }

    #[test]
    fn test_caps_colon_points() {
        let out = normalize_report("Experience: 62 points");
        assert_eq!(out, "Experience: 50 points");
    }

    #[test]
    fn test_caps_fraction_against_cap_and_denominator() {
        assert_eq!(normalize_report("Education: 15/10"), "Education: 10/10");
        assert_eq!(normalize_report("Skills: 28/25"), "Skills: 25/25");
        assert_eq!(normalize_report("Skills: 24 / 30"), "Skills: 24/30");
    }

    #[test]
    fn test_leaves_in_range_values_alone() {
        let text = "Skills: 24/30\nExperience: 32/50";
        assert_eq!(normalize_report(text), text);
    }

    #[test]
    fn test_rewrites_total_over_hundred_from_capped_breakdown() {
        let out = normalize_report(OVERSCORED_REPORT);
        assert!(out.contains("Skills Match: 30/30"));
        assert!(out.contains("Experience Match: 50/50"));
        assert!(out.contains("Extras (Certifications, Awards, Side Projects): 10/10"));
        assert!(out.contains("**Total Score: 100/100**"));
        assert!(out.contains("6 years of Rust"));
    }

    #[test]
    fn test_rewrites_total_out_of_hundred() {
        let text = "Skills: 20\nExperience: 30\nEducation: 5\nExtras: 5\nTotal Score: 72 out of 100";
        let out = normalize_report(text);
        assert!(out.ends_with("Total Score: 60 out of 100"), "got: {out}");
    }

    #[test]
    fn test_rewrites_bare_total() {
        let text = "Skills: 20\nExperience: 30\nEducation: 5\nExtras: 5\nTotal score: 99";
        let out = normalize_report(text);
        assert!(out.ends_with("Total score: 60"), "got: {out}");
    }

    #[test]
    fn test_only_first_matching_total_form_is_rewritten() {
        let text = "Skills: 10\nExperience: 10\nEducation: 5\nExtras: 5\n\
                    Total Score: 50/100\nTotal Score: 48";
        let out = normalize_report(text);
        assert!(out.contains("Total Score: 30/100"));
        assert!(out.contains("Total Score: 48"));
    }

    #[test]
    fn test_bare_total_with_trailing_denominator_is_untouched() {
        let text = "Skills: 10\nTotal Score: 85 (out of 100)";
        assert_eq!(normalize_report(text), text);
    }

    #[test]
    fn test_missing_categories_count_as_zero_in_total() {
        let text = "Skills: 25\nExperience: 40\nTotal Score: 90/100";
        let out = normalize_report(text);
        assert!(out.contains("Total Score: 65/100"));
    }

    #[test]
    fn test_report_without_total_only_gets_category_fixes() {
        let text = "Skills: 45/30\nNotes: solid candidate";
        assert_eq!(normalize_report(text), "Skills: 30/30\nNotes: solid candidate");
    }

    #[test]
    fn test_is_idempotent() {
        let samples = [
            OVERSCORED_REPORT,
            "Skills Match (45 points)\nExperience Match (70 points)\nTotal Score: 115",
            "Skills: 1234/50\nEducation: 15/10",
            "Skills: 20\nExperience: 30\nTotal Score: 85 out of 100",
            "",
        ];
        for sample in samples {
            let once = normalize_report(sample);
            let twice = normalize_report(&once);
            assert_eq!(once, twice, "not idempotent for: {sample:?}");
        }
    }

    #[test]
    fn test_empty_report_is_returned_as_is() {
        assert_eq!(normalize_report(""), "");
    }
}
