//! Seniority from title and description, as an ordered rule cascade.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::{ExperienceLevel, NormalizedJobRecord};

static INTERN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(intern|interns|internship|internships)\b").unwrap());
static LEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(lead|principal|staff)\b").unwrap());
static SENIOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(senior|sr)\b").unwrap());
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(junior|jr|entry[ -]level)\b").unwrap());
/// "5 years", "5+ years", "3-5 yrs", "2 to 4 years". Ranges report their lower bound.
static YEARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})\s*\+?\s*(?:(?:-|–|to)\s*\d{1,2}\s*\+?\s*)?(?:years?|yrs?)\b").unwrap()
});

/// Lowercased text a rule looks at.
pub struct ClassifierInput {
    text: String,
    years: Vec<u32>,
}

impl ClassifierInput {
    pub fn new(record: &NormalizedJobRecord) -> Self {
        Self::from_text(&format!(
            "{} \n {}",
            record.title_matching_copy(),
            record.matching_copy()
        ))
    }

    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        let years = YEARS_RE
            .captures_iter(&text)
            .filter_map(|c| c[1].parse().ok())
            .collect();
        ClassifierInput { text, years }
    }

    fn any_years(&self, f: impl Fn(u32) -> bool) -> bool {
        self.years.iter().any(|&n| f(n))
    }
}

pub struct Rule {
    pub name: &'static str,
    pub level: ExperienceLevel,
    pub matches: fn(&ClassifierInput) -> bool,
}

/// Evaluated top to bottom; first match wins. More specific framing comes
/// first, so "senior intern" is an intern.
pub static RULES: &[Rule] = &[
    Rule {
        name: "internship",
        level: ExperienceLevel::Intern,
        matches: is_internship,
    },
    Rule {
        name: "lead_keywords",
        level: ExperienceLevel::Lead,
        matches: is_lead,
    },
    Rule {
        name: "senior_keywords_or_5_plus_years",
        level: ExperienceLevel::Senior,
        matches: is_senior,
    },
    Rule {
        name: "entry_keywords_or_at_most_1_year",
        level: ExperienceLevel::Entry,
        matches: is_entry,
    },
    Rule {
        name: "2_to_4_years",
        level: ExperienceLevel::Mid,
        matches: is_mid,
    },
];

fn is_internship(input: &ClassifierInput) -> bool {
    INTERN_RE.is_match(&input.text)
}

fn is_lead(input: &ClassifierInput) -> bool {
    LEAD_RE.is_match(&input.text)
}

fn is_senior(input: &ClassifierInput) -> bool {
    SENIOR_RE.is_match(&input.text) || input.any_years(|n| n >= 5)
}

fn is_entry(input: &ClassifierInput) -> bool {
    ENTRY_RE.is_match(&input.text) || input.any_years(|n| n <= 1)
}

fn is_mid(input: &ClassifierInput) -> bool {
    input.any_years(|n| (2..=4).contains(&n))
}

pub fn classify(record: &NormalizedJobRecord) -> ExperienceLevel {
    classify_input(&ClassifierInput::new(record))
}

pub fn classify_input(input: &ClassifierInput) -> ExperienceLevel {
    RULES
        .iter()
        .find(|rule| (rule.matches)(input))
        .map(|rule| rule.level)
        .unwrap_or(ExperienceLevel::NotSpecified)
}
