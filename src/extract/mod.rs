//! Pattern-based entity and due-date extraction.
//!
//! Scans raw task text with fixed regex families and returns the dates,
//! people, locations, and action verbs it mentions. Extraction is
//! deterministic first-match-wins keyword work, not language understanding:
//! evaluation order and duplicate suppression are part of the contract
//! because they decide which spelling of a repeated entity survives.

use chrono::{DateTime, Datelike, Duration, Utc};
use mockable::Clock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Entities extracted from one piece of task text.
///
/// All four lists are always present; text with no recognised entities
/// yields empty lists rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// Date mentions, case-folded to lowercase, in pattern-family order.
    pub dates: Vec<String>,
    /// People mentions with original casing preserved.
    pub people: Vec<String>,
    /// Location mentions with original casing preserved.
    pub locations: Vec<String>,
    /// Recognised action verbs, in vocabulary order rather than text order.
    pub actions: Vec<String>,
}

/// Fixed action-verb vocabulary. Output order follows this list.
const ACTION_VERBS: &[&str] = &[
    "schedule",
    "call",
    "email",
    "send",
    "review",
    "complete",
    "fix",
    "update",
    "check",
    "prepare",
    "submit",
    "approve",
    "contact",
    "coordinate",
    "arrange",
    "book",
    "reserve",
    "install",
    "repair",
    "maintain",
    "inspect",
    "verify",
    "process",
    "generate",
    "create",
    "delete",
    "modify",
];

#[expect(
    clippy::expect_used,
    reason = "patterns are compile-time literals exercised by every extractor test"
)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("invalid extraction pattern")
}

/// Date pattern families in fixed evaluation order: relative day words,
/// numeric slash dates, abbreviated and full month-day forms, weekday names,
/// then "this ..." and "next ..." phrases.
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\b(?:today|tomorrow|yesterday)\b"),
        pattern(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
        pattern(r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]* \d{1,2}(?:st|nd|rd|th)?\b"),
        pattern(
            r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december) \d{1,2}(?:st|nd|rd|th)?\b",
        ),
        pattern(r"(?i)\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b"),
        pattern(r"(?i)\bthis (?:week|month|year|quarter)\b"),
        pattern(
            r"(?i)\bnext (?:week|month|year|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        ),
    ]
});

/// People patterns: a capitalized multi-word name after a trigger word, then
/// a capitalized name after an "@" mark. Triggers fold case; names must stay
/// capitalized.
static PEOPLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i:with|by|assign to|contact|meet|call)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)"),
        pattern(r"@([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)"),
    ]
});

/// Capitalized word sequence after "at"/"in"/"to", optionally preceded by
/// "the" and suffixed by a venue word.
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?:at|in|to)\s+(?:the\s+)?([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*(?:\s+(?:Office|Building|Room|Hall|Center|Site|Location))?)",
    )
});

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| pattern(r"[^\w\s]"));

/// Extracts dates, people, locations, and action verbs from task text.
///
/// Pure function of its input: empty text returns all-empty lists and
/// identical text always yields identical output.
#[must_use]
pub fn extract_entities(text: &str) -> ExtractedEntities {
    if text.is_empty() {
        return ExtractedEntities::default();
    }

    let mut entities = ExtractedEntities::default();

    for date_pattern in DATE_PATTERNS.iter() {
        for found in date_pattern.find_iter(text) {
            let date = found.as_str().to_lowercase();
            if !entities.dates.contains(&date) {
                entities.dates.push(date);
            }
        }
    }

    for people_pattern in PEOPLE_PATTERNS.iter() {
        for captures in people_pattern.captures_iter(text) {
            if let Some(name) = captures.get(1) {
                let person = name.as_str().trim().to_owned();
                if !entities.people.contains(&person) {
                    entities.people.push(person);
                }
            }
        }
    }

    for captures in LOCATION_PATTERN.captures_iter(text) {
        if let Some(place) = captures.get(1) {
            let location = place.as_str().trim().to_owned();
            if !entities.locations.contains(&location) {
                entities.locations.push(location);
            }
        }
    }

    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    let words: Vec<&str> = stripped.split_whitespace().collect();
    for verb in ACTION_VERBS {
        if words.contains(verb) && !entities.actions.iter().any(|a| a == verb) {
            entities.actions.push((*verb).to_owned());
        }
    }

    entities
}

/// Derives a due date from relative phrases in task text.
///
/// Rules are checked in fixed priority order and only the first match
/// applies: "today" means the current moment, "tomorrow" adds one day,
/// "this week" resolves to the current week's Friday via
/// `now + (5 - weekday)` days and "next week" to the following week's Friday
/// via `now + (12 - weekday)` days, with weekdays numbered Sunday = 0. The
/// week arithmetic can land in the past on a Saturday; that quirk is kept
/// as-is.
#[must_use]
pub fn extract_due_date(text: &str, clock: &impl Clock) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    let lower = text.to_lowercase();
    let now = clock.utc();

    if lower.contains("today") {
        return Some(now);
    }
    if lower.contains("tomorrow") {
        return Some(now + Duration::days(1));
    }

    let weekday = i64::from(now.weekday().num_days_from_sunday());
    if lower.contains("this week") {
        return Some(now + Duration::days(5 - weekday));
    }
    if lower.contains("next week") {
        return Some(now + Duration::days(12 - weekday));
    }

    None
}
