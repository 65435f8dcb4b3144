//! Scoring categories, their caps, and the label synonyms the evaluator uses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scoring::extract::{extract_first_int, labeled_field};

/// One of the four fixed scoring dimensions of an evaluation report.
///
/// Caps are a fixed contract and sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Skills,
    Experience,
    Education,
    Extras,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Skills,
        Category::Experience,
        Category::Education,
        Category::Extras,
    ];

    /// Maximum points awardable in this category.
    pub const fn cap(self) -> u32 {
        match self {
            Category::Skills => 30,
            Category::Experience => 50,
            Category::Education => 10,
            Category::Extras => 10,
        }
    }

    /// Clamps a raw value into `[0, cap]`.
    pub fn clamp(self, value: u32) -> u32 {
        value.min(self.cap())
    }

    /// Label fragments tried in order when reading this category's value.
    fn label_patterns(self) -> &'static [&'static str] {
        match self {
            Category::Skills => &["Skills", r"Skills\s*Match"],
            Category::Experience => &["Experience", r"Experience\s*Match"],
            Category::Education => &["Education", r"Education\s*Match"],
            Category::Extras => &[
                "Extras",
                "Certifications",
                r"Certifications\s*Match",
                "Awards",
                r"Side\s*Projects",
            ],
        }
    }

    /// Literal labels whose printed numbers get capped when a report is normalized.
    pub fn display_labels(self) -> &'static [&'static str] {
        match self {
            Category::Skills => &["Skills", "Skills Match"],
            Category::Experience => &["Experience", "Experience Match"],
            Category::Education => &["Education", "Education Match"],
            Category::Extras => &[
                "Extras",
                "Certifications",
                "Certifications Match",
                "Awards",
                "Side Projects",
            ],
        }
    }

    fn index(self) -> usize {
        match self {
            Category::Skills => 0,
            Category::Experience => 1,
            Category::Education => 2,
            Category::Extras => 3,
        }
    }
}

static FIELD_PATTERNS: Lazy<[Vec<Regex>; 4]> = Lazy::new(|| {
    Category::ALL.map(|category| {
        category
            .label_patterns()
            .iter()
            .map(|label| labeled_field(label))
            .collect()
    })
});

/// Raw (unclamped) per-category values read from one report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryValues {
    pub skills: Option<u32>,
    pub experience: Option<u32>,
    pub education: Option<u32>,
    pub extras: Option<u32>,
}

impl CategoryValues {
    pub fn get(&self, category: Category) -> Option<u32> {
        match category {
            Category::Skills => self.skills,
            Category::Experience => self.experience,
            Category::Education => self.education,
            Category::Extras => self.extras,
        }
    }

    pub fn set(&mut self, category: Category, value: Option<u32>) {
        let slot = match category {
            Category::Skills => &mut self.skills,
            Category::Experience => &mut self.experience,
            Category::Education => &mut self.education,
            Category::Extras => &mut self.extras,
        };
        *slot = value;
    }

    /// Number of categories that produced a value.
    pub fn resolved_count(&self) -> usize {
        Category::ALL
            .iter()
            .filter(|c| self.get(**c).is_some())
            .count()
    }
}

/// Reads one category, short-circuiting on the first label spelling that yields a value.
pub fn resolve_category(text: &str, category: Category) -> Option<u32> {
    FIELD_PATTERNS[category.index()]
        .iter()
        .find_map(|pattern| extract_first_int(pattern, text))
}

/// Reads all four categories independently.
pub fn resolve(text: &str) -> CategoryValues {
    let mut values = CategoryValues::default();
    for category in Category::ALL {
        values.set(category, resolve_category(text, category));
    }
    values
}
