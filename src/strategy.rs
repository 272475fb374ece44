//! Strategy Sorter: reorders a scored batch for display.
//!
//! The four strategies form a closed set; the selector token coming from the
//! UI is rejected at this boundary if it is not one of them, never defaulted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;
use crate::task::TaskRecord;

/// Ordering applied to a scored batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep the scorer's returned order (it already ranks by score).
    Smart,
    /// Smallest effort first.
    Fastest,
    /// Highest importance first.
    Impact,
    /// Earliest due date first.
    Deadline,
}

impl FromStr for Strategy {
    type Err = AnalyzeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smart" => Ok(Strategy::Smart),
            "fastest" => Ok(Strategy::Fastest),
            "impact" => Ok(Strategy::Impact),
            "deadline" => Ok(Strategy::Deadline),
            other => Err(AnalyzeError::UnknownStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Strategy::Smart => "smart",
            Strategy::Fastest => "fastest",
            Strategy::Impact => "impact",
            Strategy::Deadline => "deadline",
        };
        write!(f, "{}", token)
    }
}

/// Produce the display ordering for `batch` under `strategy`.
///
/// The sort is stable: equal keys keep their relative input order, so
/// re-running a strategy on its own output is a no-op. Record fields are
/// never mutated.
pub fn sort_batch(mut batch: Vec<TaskRecord>, strategy: Strategy) -> Vec<TaskRecord> {
    match strategy {
        Strategy::Smart => {}
        Strategy::Fastest => {
            // estimated_hours is validated finite, so total_cmp is a plain
            // numeric order here.
            batch.sort_by(|a, b| a.estimated_hours().total_cmp(&b.estimated_hours()));
        }
        Strategy::Impact => {
            batch.sort_by(|a, b| b.importance().cmp(&a.importance()));
        }
        Strategy::Deadline => {
            batch.sort_by(|a, b| a.due_date().cmp(&b.due_date()));
        }
    }
    batch
}
