//! Priority Classifier: maps a numeric score to a presentation tier.
//!
//! Tiers style the rendered card; they never influence ordering.

use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;
use crate::task::TaskRecord;

/// Presentation tier derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::High => write!(f, "high"),
            Tier::Medium => write!(f, "medium"),
            Tier::Low => write!(f, "low"),
        }
    }
}

/// Classify a raw score. Lower bounds are inclusive: 100 is High, 50 is
/// Medium.
pub fn classify(score: f64) -> Tier {
    if score >= 100.0 {
        Tier::High
    } else if score >= 50.0 {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// Classify a task, failing if scoring has not run on it yet.
pub fn classify_task(task: &TaskRecord) -> Result<Tier, AnalyzeError> {
    let score = task
        .score()
        .ok_or_else(|| AnalyzeError::MissingScore(task.title().to_string()))?;
    Ok(classify(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(99.9), Tier::Medium);
        assert_eq!(classify(100.0), Tier::High);
        assert_eq!(classify(49.99), Tier::Low);
        assert_eq!(classify(50.0), Tier::Medium);
        assert_eq!(classify(0.0), Tier::Low);
        assert_eq!(classify(250.0), Tier::High);
    }

    #[test]
    fn test_unscored_task_is_an_error() {
        let due = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let task = TaskRecord::new("Unscored", due, 1.0, 5, vec![]).unwrap();
        let err = classify_task(&task).unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingScore(t) if t == "Unscored"));
    }

    #[test]
    fn test_scored_task_classifies() {
        let due = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let mut task = TaskRecord::new("Scored", due, 1.0, 5, vec![]).unwrap();
        task.attach_score(125.0, None);
        assert_eq!(classify_task(&task).unwrap(), Tier::High);
    }
}
