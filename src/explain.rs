//! Explanation Synthesizer: derives a rationale string for a task when the
//! scorer did not supply one.
//!
//! Pure and deterministic in `(due_date, importance, estimated_hours, today)`.
//! `today` is captured once per analysis run and reused for every task in the
//! batch, so a run that straddles midnight stays internally consistent.

use chrono::NaiveDate;

use crate::task::TaskRecord;

/// Synthesize a short rationale for `task`.
///
/// Rules fire in fixed order, each appending its phrase:
/// 1. overdue → "Overdue!", else due today → "Due today!"
/// 2. importance >= 8 → "High importance."
/// 3. estimated_hours < 2 → "Quick win."
///
/// No match yields exactly "Standard priority.".
pub fn synthesize(task: &TaskRecord, today: NaiveDate) -> String {
    let mut reasons: Vec<&str> = Vec::new();

    if task.due_date() < today {
        reasons.push("Overdue!");
    } else if task.due_date() == today {
        reasons.push("Due today!");
    }

    if task.importance() >= 8 {
        reasons.push("High importance.");
    }

    if task.estimated_hours() < 2.0 {
        reasons.push("Quick win.");
    }

    if reasons.is_empty() {
        "Standard priority.".to_string()
    } else {
        reasons.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(due: &str, hours: f64, importance: u8) -> TaskRecord {
        TaskRecord::new("t", date(due), hours, importance, vec![]).unwrap()
    }

    const TODAY: &str = "2025-06-15";

    #[test]
    fn test_overdue_and_important() {
        let t = task("2025-06-14", 4.0, 10);
        assert_eq!(synthesize(&t, date(TODAY)), "Overdue! High importance.");
    }

    #[test]
    fn test_due_today() {
        let t = task("2025-06-15", 5.0, 5);
        assert_eq!(synthesize(&t, date(TODAY)), "Due today!");
    }

    #[test]
    fn test_quick_win_only() {
        let t = task("2025-06-22", 1.0, 4);
        assert_eq!(synthesize(&t, date(TODAY)), "Quick win.");
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let t = task("2025-06-01", 0.5, 9);
        assert_eq!(
            synthesize(&t, date(TODAY)),
            "Overdue! High importance. Quick win."
        );
    }

    #[test]
    fn test_no_match_is_standard_priority() {
        let t = task("2025-07-01", 3.0, 5);
        assert_eq!(synthesize(&t, date(TODAY)), "Standard priority.");
    }

    #[test]
    fn test_future_due_date_contributes_nothing() {
        let t = task("2025-06-16", 0.5, 9);
        assert_eq!(synthesize(&t, date(TODAY)), "High importance. Quick win.");
    }
}
