//! Pattern extraction: pulls the first integer that follows a labeled field.

use regex::Regex;

/// Compiles the `<label> ... : N` matcher for a label fragment.
///
/// The label is a regex fragment (e.g. `Skills\s*Match`). Anything except a
/// newline or a colon may sit between the label and its colon, which absorbs
/// qualifiers like `Skills Match (max 30):`. Matching is case-insensitive.
pub fn labeled_field(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){label}[^\n:]*:\s*(\d{{1,3}})"))
        .expect("label fragments are static and must compile")
}

/// Returns the first capture group of the first match, parsed as an integer.
/// A capture that does not parse is treated as no match.
pub fn extract_first_int(pattern: &Regex, text: &str) -> Option<u32> {
    let caps = pattern.captures(text)?;
    caps.get(1)?.as_str().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_value_after_label() {
        let pattern = labeled_field("Skills");
        assert_eq!(extract_first_int(&pattern, "Skills: 24"), Some(24));
    }

    #[test]
    fn test_is_case_insensitive() {
        let pattern = labeled_field("Education");
        assert_eq!(extract_first_int(&pattern, "EDUCATION: 7"), Some(7));
    }

    #[test]
    fn test_absorbs_parenthetical_qualifier() {
        let pattern = labeled_field(r"Skills\s*Match");
        let text = "Skills Match (max 30): 24/30";
        assert_eq!(extract_first_int(&pattern, text), Some(24));
    }

    #[test]
    fn test_label_and_colon_must_share_a_line() {
        let pattern = labeled_field("Skills");
        assert_eq!(extract_first_int(&pattern, "Skills are strong\nOverall: 40"), None);
    }

    #[test]
    fn test_takes_first_match_only() {
        let pattern = labeled_field("Experience");
        let text = "Experience: 32/50\nExperience (internships): 10";
        assert_eq!(extract_first_int(&pattern, text), Some(32));
    }

    #[test]
    fn test_captures_at_most_three_digits() {
        let pattern = labeled_field("Skills");
        assert_eq!(extract_first_int(&pattern, "Skills: 1234"), Some(123));
    }

    #[test]
    fn test_non_ascii_digits_are_treated_as_not_found() {
        let pattern = labeled_field("Skills");
        // Arabic-Indic digits match `\d` but are not a valid u32 literal.
        assert_eq!(extract_first_int(&pattern, "Skills: ٢٤"), None);
    }

    #[test]
    fn test_missing_label_is_none() {
        let pattern = labeled_field("Awards");
        assert_eq!(extract_first_int(&pattern, "Skills: 20"), None);
    }
}
