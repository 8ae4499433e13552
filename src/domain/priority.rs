use crate::domain::task::Priority;
use chrono::NaiveDate;

const URGENT_KEYWORDS: [&str; 5] = ["urgent", "asap", "immediately", "critical", "emergency"];
const IMPORTANT_KEYWORDS: [&str; 5] = ["important", "significant", "essential", "key", "major"];

/// Suggests a priority for a task being written, from how soon it is due
/// and keywords in its title.
///
/// Returns `None` when there is no due date to reason about.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use taskboard_core::domain::{suggest_priority, Priority};
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let due = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
///
/// assert_eq!(suggest_priority("Tidy docs", Some(due), today), Some(Priority::Low));
/// assert_eq!(suggest_priority("URGENT: tidy docs", Some(due), today), Some(Priority::High));
/// assert_eq!(suggest_priority("Tidy docs", None, today), None);
/// ```
pub fn suggest_priority(title: &str, due_date: Option<NaiveDate>, today: NaiveDate) -> Option<Priority> {
    let due_date = due_date?;
    let days_until_due = (due_date - today).num_days();

    let by_date = if days_until_due <= 2 {
        Priority::High
    } else if days_until_due <= 7 {
        Priority::Medium
    } else {
        Priority::Low
    };

    let title = title.to_lowercase();
    let suggestion = if URGENT_KEYWORDS.iter().any(|word| title.contains(word)) {
        Priority::High
    } else if IMPORTANT_KEYWORDS.iter().any(|word| title.contains(word)) {
        by_date.max(Priority::Medium)
    } else {
        by_date
    };

    Some(suggestion)
}
