//! Bulletin line classification.
//!
//! A bulletin line reads like `"Fifteen Tampa students who live off
//! campus"`. The leading token is the case count; the remaining words
//! decide the location and occupation by keyword membership.
//!
//! Rules live in [`RULES`] and are evaluated top to bottom; the first rule
//! whose location keywords and occupation keywords both appear wins. Order
//! matters: `"Tampa student-employee:"` must resolve to a student before the
//! employee rule gets a chance.

use usf_covid_case_models::{Location, Occupation};

use crate::quantity::quantity_or_one;

/// One keyword rule mapping a line to a (location, occupation) pair.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    /// At least one of these tokens must appear.
    pub location_keywords: &'static [&'static str],
    /// At least one of these tokens must appear.
    pub occupation_keywords: &'static [&'static str],
    /// Location assigned on match.
    pub location: Location,
    /// Occupation assigned on match.
    pub occupation: Occupation,
}

impl ClassificationRule {
    fn matches(&self, tokens: &[&str]) -> bool {
        let has_any = |keywords: &[&str]| keywords.iter().any(|k| tokens.contains(k));
        has_any(self.location_keywords) && has_any(self.occupation_keywords)
    }
}

const STUDENT: &[&str] = &["student", "students"];
const EMPLOYEE: &[&str] = &["employee", "employees"];

/// Classification rules in priority order.
pub const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        location_keywords: &["tampa"],
        occupation_keywords: &["student", "students", "student-employee:"],
        location: Location::Tampa,
        occupation: Occupation::Student,
    },
    ClassificationRule {
        location_keywords: &["tampa"],
        occupation_keywords: EMPLOYEE,
        location: Location::Tampa,
        occupation: Occupation::Employee,
    },
    ClassificationRule {
        location_keywords: &["st.", "st"],
        occupation_keywords: STUDENT,
        location: Location::StPete,
        occupation: Occupation::Student,
    },
    ClassificationRule {
        location_keywords: &["st.", "st"],
        occupation_keywords: EMPLOYEE,
        location: Location::StPete,
        occupation: Occupation::Employee,
    },
    ClassificationRule {
        location_keywords: &["health", "medical"],
        occupation_keywords: &["employee", "employees", "resident", "residents"],
        location: Location::Health,
        occupation: Occupation::Employee,
    },
    ClassificationRule {
        location_keywords: &["health", "medical"],
        occupation_keywords: STUDENT,
        location: Location::Health,
        occupation: Occupation::Student,
    },
    ClassificationRule {
        location_keywords: &["sarasota-manatee"],
        occupation_keywords: STUDENT,
        location: Location::SarasotaManatee,
        occupation: Occupation::Student,
    },
    ClassificationRule {
        location_keywords: &["sarasota-manatee"],
        occupation_keywords: EMPLOYEE,
        location: Location::SarasotaManatee,
        occupation: Occupation::Employee,
    },
];

/// A successfully classified bulletin line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub location: Location,
    pub occupation: Occupation,
    pub cases: u64,
}

/// A bulletin line that matched none of the [`RULES`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unclassified bulletin line: '{line}'")]
pub struct UnclassifiedLine {
    /// The original line text.
    pub line: String,
}

/// Classifies a bulletin line using [`RULES`].
///
/// # Errors
///
/// Returns [`UnclassifiedLine`] if the line is empty or no rule matches.
pub fn classify(line: &str) -> Result<Classification, UnclassifiedLine> {
    classify_with(RULES, line)
}

/// Classifies a bulletin line against a custom rule table.
///
/// # Errors
///
/// Returns [`UnclassifiedLine`] if the line is empty or no rule matches.
pub fn classify_with(
    rules: &[ClassificationRule],
    line: &str,
) -> Result<Classification, UnclassifiedLine> {
    let lowered = line.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let unclassified = || UnclassifiedLine {
        line: line.to_string(),
    };

    let first = tokens.first().ok_or_else(unclassified)?;
    let rule = rules
        .iter()
        .find(|rule| rule.matches(&tokens))
        .ok_or_else(unclassified)?;

    Ok(Classification {
        location: rule.location,
        occupation: rule.occupation,
        cases: quantity_or_one(first),
    })
}
