//! Scoring Collaborator boundary.
//!
//! The external scorer owns score computation; this module only transports a
//! validated batch to it and merges the returned scores back onto the
//! records. The trait seam lets the pipeline run against an in-process
//! scorer in tests.

use std::collections::HashMap;
use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AnalyzeError;
use crate::task::TaskRecord;

mod client;

pub use client::HttpScorer;

/// Computes scores for a batch of tasks.
///
/// The returned batch contains the same records, each with `score`
/// populated, in the scorer's own ranking order. That order is the baseline
/// the `smart` strategy preserves.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Score the whole batch in one round trip.
    ///
    /// All-or-nothing: either every record comes back scored or the call
    /// fails. No retries happen here; retry policy belongs to the caller.
    async fn score_batch(&self, batch: &[TaskRecord]) -> Result<Vec<TaskRecord>, AnalyzeError>;
}

/// One record of the scorer's response.
///
/// The scorer echoes each task's input fields back alongside `score`; the
/// echo is what lets [`merge_scores`] attach a score to the right record
/// when two tasks share a title. A record missing any of these fields fails
/// deserialization and thus the whole call. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoredRecord {
    pub title: String,
    pub due_date: NaiveDate,
    pub estimated_hours: f64,
    pub importance: u8,
    pub score: f64,
    pub explanation: Option<String>,
}

impl ScoredRecord {
    /// Whether this response record is the verbatim echo of `record`.
    ///
    /// Fields pass through JSON unchanged, so exact equality (including the
    /// `f64` hours) is the contract.
    fn echoes(&self, record: &TaskRecord) -> bool {
        self.due_date == record.due_date()
            && self.estimated_hours == record.estimated_hours()
            && self.importance == record.importance()
    }
}

/// Merge the scorer's response onto the validated input records.
///
/// Output order follows the response. Every field other than `score` and
/// `explanation` is taken from the input record, so the scorer cannot alter
/// them. Records are matched as a multiset on their full input identity
/// (title plus the echoed due date, hours, and importance); equal-titled
/// records with different fields therefore each receive their own score.
pub(crate) fn merge_scores(
    batch: &[TaskRecord],
    response: Vec<ScoredRecord>,
) -> Result<Vec<TaskRecord>, AnalyzeError> {
    if response.len() != batch.len() {
        return Err(AnalyzeError::ScoringProtocol(format!(
            "sent {} tasks, scorer returned {}",
            batch.len(),
            response.len()
        )));
    }

    let mut pool: HashMap<&str, VecDeque<&TaskRecord>> = HashMap::new();
    for record in batch {
        pool.entry(record.title()).or_default().push_back(record);
    }

    response
        .into_iter()
        .map(|scored| {
            let record = pool
                .get_mut(scored.title.as_str())
                .and_then(|candidates| {
                    let pos = candidates.iter().position(|r| scored.echoes(r))?;
                    candidates.remove(pos)
                })
                .ok_or_else(|| {
                    AnalyzeError::ScoringProtocol(format!(
                        "response contains task `{}` that does not match any request task",
                        scored.title
                    ))
                })?;
            let mut record = record.clone();
            record.attach_score(scored.score, scored.explanation);
            Ok(record)
        })
        .collect()
}
