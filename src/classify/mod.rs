//! Keyword-driven task classification.
//!
//! Scores free text against fixed per-category keyword tables, derives a
//! priority from keyword precedence, and maps each category to a fixed list
//! of suggested next actions. All functions here are pure and infallible:
//! empty or keyword-free input degrades to [`Category::General`] and
//! [`Priority::Low`] rather than erroring.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Task category assigned by keyword scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Meetings, appointments, and calendar work.
    Scheduling,
    /// Payments, invoices, and budget work.
    Finance,
    /// Bugs, maintenance, and infrastructure work.
    Technical,
    /// Hazards, inspections, and compliance work.
    Safety,
    /// Fallback when no category scores strictly highest.
    General,
}

impl Category {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduling => "scheduling",
            Self::Finance => "finance",
            Self::Technical => "technical",
            Self::Safety => "safety",
            Self::General => "general",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = ParseCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "scheduling" => Ok(Self::Scheduling),
            "finance" => Ok(Self::Finance),
            "technical" => Ok(Self::Technical),
            "safety" => Ok(Self::Safety),
            "general" => Ok(Self::General),
            _ => Err(ParseCategoryError(value.to_owned())),
        }
    }
}

/// Task priority derived from keyword precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Urgent work that should be handled first.
    High,
    /// Work due soon.
    Medium,
    /// Everything else.
    Low,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Error returned while parsing categories from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

/// Error returned while parsing priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Combined classification result for one piece of task text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Winning category.
    pub category: Category,
    /// Derived priority.
    pub priority: Priority,
    /// Suggested actions for the winning category.
    pub suggested_actions: Vec<String>,
}

/// Per-category keyword tables in fixed evaluation order. Scoring requires a
/// strictly greater count to take the lead, so when two tables tie the one
/// evaluated earlier keeps the win.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::Scheduling,
        &[
            "meeting",
            "schedule",
            "call",
            "appointment",
            "deadline",
            "calendar",
            "book",
            "reserve",
            "plan",
            "arrange",
            "coordinate",
        ],
    ),
    (
        Category::Finance,
        &[
            "payment",
            "invoice",
            "bill",
            "budget",
            "cost",
            "expense",
            "purchase",
            "vendor",
            "payroll",
            "reimbursement",
            "quote",
            "price",
        ],
    ),
    (
        Category::Technical,
        &[
            "bug", "fix", "error", "install", "repair", "maintain", "update", "server", "system",
            "network", "software", "hardware", "deploy", "patch", "upgrade", "debug",
        ],
    ),
    (
        Category::Safety,
        &[
            "safety",
            "hazard",
            "inspection",
            "compliance",
            "ppe",
            "incident",
            "risk",
            "accident",
            "injury",
            "emergency",
            "protocol",
            "violation",
            "audit",
        ],
    ),
];

/// Keywords that force [`Priority::High`], checked before the medium set.
const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "today",
    "critical",
    "emergency",
    "now",
    "blocker",
    "high priority",
    "crucial",
];

/// Keywords that yield [`Priority::Medium`] when no high keyword matched.
const MEDIUM_PRIORITY_KEYWORDS: &[&str] = &[
    "soon",
    "this week",
    "important",
    "priority",
    "tomorrow",
    "upcoming",
    "moderate",
];

const SCHEDULING_ACTIONS: &[&str] = &[
    "Block calendar",
    "Send invite",
    "Prepare agenda",
    "Set reminder",
    "Confirm attendance",
    "Book meeting room",
];

const FINANCE_ACTIONS: &[&str] = &[
    "Check budget",
    "Get approval",
    "Generate invoice",
    "Update records",
    "Verify amount",
    "Process payment",
];

const TECHNICAL_ACTIONS: &[&str] = &[
    "Diagnose issue",
    "Check resources",
    "Assign technician",
    "Document fix",
    "Test solution",
    "Deploy changes",
];

const SAFETY_ACTIONS: &[&str] = &[
    "Conduct inspection",
    "File report",
    "Notify supervisor",
    "Update checklist",
    "Review procedures",
    "Train staff",
];

const GENERAL_ACTIONS: &[&str] = &[
    "Review task",
    "Assign owner",
    "Set deadline",
    "Add details",
    "Track progress",
    "Document outcome",
];

/// Classifies text into a [`Category`] by keyword scoring.
///
/// Counts case-insensitive substring matches per category and returns the
/// category with the strictly highest count. An all-zero result resolves to
/// [`Category::General`]; a tie between two keyword tables keeps the one
/// evaluated first.
#[must_use]
pub fn classify_category(text: &str) -> Category {
    if text.is_empty() {
        return Category::General;
    }

    let lower = text.to_lowercase();
    let mut best = Category::General;
    let mut max_score = 0;

    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = keywords
            .iter()
            .filter(|keyword| lower.contains(*keyword))
            .count();
        if score > max_score {
            max_score = score;
            best = category;
        }
    }

    best
}

/// Derives a [`Priority`] from keyword precedence.
///
/// High keywords are checked before medium ones, so text containing both
/// yields [`Priority::High`]. Text matching neither set yields
/// [`Priority::Low`].
#[must_use]
pub fn determine_priority(text: &str) -> Priority {
    if text.is_empty() {
        return Priority::Low;
    }

    let lower = text.to_lowercase();

    if HIGH_PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Priority::High;
    }
    if MEDIUM_PRIORITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Priority::Medium;
    }
    Priority::Low
}

/// Returns the fixed suggested-action list for a category.
#[must_use]
pub const fn suggested_actions(category: Category) -> &'static [&'static str] {
    match category {
        Category::Scheduling => SCHEDULING_ACTIONS,
        Category::Finance => FINANCE_ACTIONS,
        Category::Technical => TECHNICAL_ACTIONS,
        Category::Safety => SAFETY_ACTIONS,
        Category::General => GENERAL_ACTIONS,
    }
}

/// Classifies a task from its title and description.
///
/// The two inputs are space-joined and fed to [`classify_category`] and
/// [`determine_priority`]; suggested actions follow the inferred category.
#[must_use]
pub fn classify_task(title: &str, description: &str) -> Classification {
    let combined = format!("{title} {description}");

    let category = classify_category(&combined);
    let priority = determine_priority(&combined);
    let actions = suggested_actions(category)
        .iter()
        .map(|action| (*action).to_owned())
        .collect();

    Classification {
        category,
        priority,
        suggested_actions: actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Schedule a meeting with the team", Category::Scheduling)]
    #[case("Pay the invoice bill on the budget", Category::Finance)]
    #[case("Fix the server bug in the payroll system", Category::Technical)]
    #[case("Safety inspection for compliance audit", Category::Safety)]
    #[case("Buy milk", Category::General)]
    #[case("", Category::General)]
    fn classify_category_picks_highest_scoring_table(
        #[case] text: &str,
        #[case] expected: Category,
    ) {
        assert_eq!(classify_category(text), expected);
    }

    #[rstest]
    fn classify_category_requires_strictly_greater_score_to_unseat_general() {
        // One scheduling keyword and one finance keyword tie at 1; neither
        // beats the other strictly, but each beats the zero-seeded default,
        // so the first table evaluated wins.
        assert_eq!(classify_category("schedule the payment"), Category::Scheduling);
        // Same shape with the keywords swapped between tables: "invoice" and
        // "deadline" tie, and scheduling still wins on evaluation order.
        assert_eq!(
            classify_category("Pay the invoice before the deadline expires"),
            Category::Scheduling
        );
    }

    #[rstest]
    fn classify_category_is_case_insensitive() {
        assert_eq!(classify_category("URGENT MEETING CALENDAR"), Category::Scheduling);
    }

    #[rstest]
    #[case("urgent: server down", Priority::High)]
    #[case("do this soon please", Priority::Medium)]
    #[case("water the plants", Priority::Low)]
    #[case("", Priority::Low)]
    fn determine_priority_follows_keyword_precedence(#[case] text: &str, #[case] expected: Priority) {
        assert_eq!(determine_priority(text), expected);
    }

    #[rstest]
    fn high_keywords_win_even_when_medium_keywords_also_match() {
        assert_eq!(determine_priority("important and urgent"), Priority::High);
    }

    #[rstest]
    fn suggested_actions_map_to_fixed_lists() {
        assert_eq!(
            suggested_actions(Category::Scheduling).first().copied(),
            Some("Block calendar")
        );
        assert_eq!(
            suggested_actions(Category::General).first().copied(),
            Some("Review task")
        );
    }

    #[rstest]
    fn classify_task_combines_title_and_description() {
        let result = classify_task(
            "Schedule urgent meeting today",
            "Need to discuss budget allocation with team",
        );

        assert_eq!(result.category, Category::Scheduling);
        assert_eq!(result.priority, Priority::High);
        assert!(result.suggested_actions.contains(&"Block calendar".to_owned()));
    }

    #[rstest]
    fn category_round_trips_through_storage_form() {
        for category in [
            Category::Scheduling,
            Category::Finance,
            Category::Technical,
            Category::Safety,
            Category::General,
        ] {
            assert_eq!(Category::try_from(category.as_str()), Ok(category));
        }
    }

    #[rstest]
    fn priority_round_trips_through_storage_form() {
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            assert_eq!(Priority::try_from(priority.as_str()), Ok(priority));
        }
    }
}
