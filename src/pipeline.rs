//! Analysis pipeline: one run = validate → score → sort → explain/classify.
//!
//! Runs are owned by an [`AnalysisSession`], the explicit replacement for
//! ambient "current input / current results" UI state. Each run gets a
//! monotonically increasing sequence number at issuance; a run that finishes
//! after a newer one was issued is discarded, so a slow scoring response can
//! never overwrite a fresher result set (last-write-wins by issuance, not by
//! response arrival).

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{classify, Tier};
use crate::error::AnalyzeError;
use crate::explain;
use crate::scoring::Scorer;
use crate::strategy::{sort_batch, Strategy};
use crate::task::{parse_batch, TaskRecord};

/// How many tasks [`suggest`] returns by default ("top 3 to work on today").
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// One task as the presentation layer renders it, in final sorted order.
///
/// This is the full contract the renderer depends on; raw dependency data is
/// deliberately not part of it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedTask {
    pub title: String,
    pub score: f64,
    pub tier: Tier,
    pub due_date: NaiveDate,
    pub estimated_hours: f64,
    pub importance: u8,
    pub explanation: String,
}

impl AnalyzedTask {
    /// Build the presentation view of a scored record.
    ///
    /// A scorer-supplied explanation wins, even an empty one; only a missing
    /// explanation is synthesized. Fails with `MissingScore` on an unscored
    /// record.
    pub fn from_record(record: TaskRecord, today: NaiveDate) -> Result<Self, AnalyzeError> {
        let score = record
            .score()
            .ok_or_else(|| AnalyzeError::MissingScore(record.title().to_string()))?;
        let tier = classify(score);
        let explanation = match record.explanation() {
            Some(supplied) => supplied.to_string(),
            None => explain::synthesize(&record, today),
        };
        Ok(Self {
            title: record.title().to_string(),
            score,
            tier,
            due_date: record.due_date(),
            estimated_hours: record.estimated_hours(),
            importance: record.importance(),
            explanation,
        })
    }
}

/// Run the full pipeline on one input buffer.
///
/// Pure chain apart from the scoring round trip: parse the buffer, score the
/// batch remotely, order it under `strategy`, then derive tier and
/// explanation per task. `today` is passed in so one date serves the whole
/// batch. Any failure returns `Err` and produces no partial result set.
pub async fn analyze(
    scorer: &dyn Scorer,
    input: &str,
    strategy: Strategy,
    today: NaiveDate,
) -> Result<Vec<AnalyzedTask>, AnalyzeError> {
    let batch = parse_batch(input)?;
    debug!("Parsed {} tasks, strategy {}", batch.len(), strategy);

    let scored = scorer.score_batch(&batch).await?;
    let ordered = sort_batch(scored, strategy);

    ordered
        .into_iter()
        .map(|record| AnalyzedTask::from_record(record, today))
        .collect()
}

/// Top slice of an analyzed batch: "what should I work on next".
pub fn suggest(tasks: &[AnalyzedTask], limit: usize) -> Vec<AnalyzedTask> {
    tasks.iter().take(limit).cloned().collect()
}

/// Opaque handle for one issued run.
#[derive(Debug)]
pub struct RunToken {
    seq: u64,
}

impl RunToken {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Caller-owned run context serializing analyses from one input buffer.
///
/// `run` results are only surfaced while their token is still the latest
/// issued; anything else — results and errors alike — is stale and dropped.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    issued: AtomicU64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next run sequence number. Every later `begin` supersedes
    /// this token.
    pub fn begin(&self) -> RunToken {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Issued analysis run {}", seq);
        RunToken { seq }
    }

    /// Whether `token` is still the latest issued run.
    pub fn is_current(&self, token: &RunToken) -> bool {
        token.seq == self.issued.load(Ordering::SeqCst)
    }

    /// Run one analysis under this session.
    ///
    /// Reads "today" once at issuance and uses it for the whole batch.
    /// Returns `Ok(None)` when the run was superseded while its scoring
    /// round trip was outstanding; a stale outcome (even a stale error) is
    /// never handed to the caller.
    pub async fn run(
        &self,
        scorer: &dyn Scorer,
        input: &str,
        strategy: Strategy,
    ) -> Result<Option<Vec<AnalyzedTask>>, AnalyzeError> {
        let token = self.begin();
        let today = Local::now().date_naive();

        let outcome = analyze(scorer, input, strategy, today).await;

        if !self.is_current(&token) {
            info!("Discarding superseded analysis run {}", token.seq());
            return Ok(None);
        }
        outcome.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Scores importance * 15 and returns the batch ranked by score
    /// descending, the way the real scorer ranks.
    struct RankByImportance;

    #[async_trait]
    impl Scorer for RankByImportance {
        async fn score_batch(
            &self,
            batch: &[TaskRecord],
        ) -> Result<Vec<TaskRecord>, AnalyzeError> {
            let mut scored: Vec<TaskRecord> = batch.to_vec();
            for task in &mut scored {
                let score = f64::from(task.importance()) * 15.0;
                task.attach_score(score, None);
            }
            scored.sort_by(|a, b| b.score().unwrap().total_cmp(&a.score().unwrap()));
            Ok(scored)
        }
    }

    /// Echoes the batch in place with a fixed score and explanation.
    struct FixedScorer {
        score: f64,
        explanation: Option<String>,
    }

    #[async_trait]
    impl Scorer for FixedScorer {
        async fn score_batch(
            &self,
            batch: &[TaskRecord],
        ) -> Result<Vec<TaskRecord>, AnalyzeError> {
            let mut scored: Vec<TaskRecord> = batch.to_vec();
            for task in &mut scored {
                task.attach_score(self.score, self.explanation.clone());
            }
            Ok(scored)
        }
    }

    struct FailingScorer;

    #[async_trait]
    impl Scorer for FailingScorer {
        async fn score_batch(&self, _: &[TaskRecord]) -> Result<Vec<TaskRecord>, AnalyzeError> {
            Err(AnalyzeError::ScoringUnavailable("scorer offline".to_string()))
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const INPUT: &str = r#"[
        {"title": "Low effort chore", "due_date": "2025-06-20", "estimated_hours": 1, "importance": 3},
        {"title": "Ship release", "due_date": "2025-06-10", "estimated_hours": 6, "importance": 9}
    ]"#;

    #[tokio::test]
    async fn test_analyze_end_to_end() {
        let tasks = analyze(&RankByImportance, INPUT, Strategy::Smart, date("2025-06-15"))
            .await
            .unwrap();

        // Scorer ranked by importance descending; smart keeps that order.
        assert_eq!(tasks[0].title, "Ship release");
        assert_eq!(tasks[0].score, 135.0);
        assert_eq!(tasks[0].tier, Tier::High);
        assert_eq!(tasks[0].explanation, "Overdue! High importance.");

        assert_eq!(tasks[1].title, "Low effort chore");
        assert_eq!(tasks[1].tier, Tier::Low);
        assert_eq!(tasks[1].explanation, "Quick win.");
    }

    #[tokio::test]
    async fn test_analyze_applies_strategy_over_scorer_order() {
        let tasks = analyze(
            &RankByImportance,
            INPUT,
            Strategy::Fastest,
            date("2025-06-15"),
        )
        .await
        .unwrap();
        assert_eq!(tasks[0].title, "Low effort chore");
        assert_eq!(tasks[1].title, "Ship release");
    }

    #[tokio::test]
    async fn test_supplied_explanation_is_never_overridden() {
        let scorer = FixedScorer {
            score: 10.0,
            explanation: Some("Scorer said so.".to_string()),
        };
        let tasks = analyze(&scorer, INPUT, Strategy::Smart, date("2025-06-15"))
            .await
            .unwrap();
        assert!(tasks.iter().all(|t| t.explanation == "Scorer said so."));
    }

    #[tokio::test]
    async fn test_empty_supplied_explanation_counts_as_supplied() {
        let scorer = FixedScorer {
            score: 10.0,
            explanation: Some(String::new()),
        };
        let tasks = analyze(&scorer, INPUT, Strategy::Smart, date("2025-06-15"))
            .await
            .unwrap();
        assert!(tasks.iter().all(|t| t.explanation.is_empty()));
    }

    #[tokio::test]
    async fn test_scoring_failure_propagates() {
        let err = analyze(&FailingScorer, INPUT, Strategy::Smart, date("2025-06-15"))
            .await
            .unwrap_err();
        assert!(err.is_scoring_failure());
    }

    #[test]
    fn test_unscored_record_cannot_become_a_view() {
        let record = TaskRecord::new("raw", date("2025-06-20"), 1.0, 5, vec![]).unwrap();
        let err = AnalyzedTask::from_record(record, date("2025-06-15")).unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingScore(_)));
    }

    #[test]
    fn test_tokens_supersede_in_issue_order() {
        let session = AnalysisSession::new();
        let first = session.begin();
        assert!(session.is_current(&first));
        let second = session.begin();
        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
        assert!(second.seq() > first.seq());
    }

    /// Issues a competing run while the "network call" is outstanding.
    struct SupersedingScorer {
        session: Arc<AnalysisSession>,
    }

    #[async_trait]
    impl Scorer for SupersedingScorer {
        async fn score_batch(
            &self,
            batch: &[TaskRecord],
        ) -> Result<Vec<TaskRecord>, AnalyzeError> {
            self.session.begin();
            let mut scored: Vec<TaskRecord> = batch.to_vec();
            for task in &mut scored {
                task.attach_score(1.0, None);
            }
            Ok(scored)
        }
    }

    #[tokio::test]
    async fn test_superseded_run_is_discarded() {
        let session = Arc::new(AnalysisSession::new());
        let scorer = SupersedingScorer {
            session: Arc::clone(&session),
        };
        let outcome = session.run(&scorer, INPUT, Strategy::Smart).await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_current_run_returns_results() {
        let session = AnalysisSession::new();
        let scorer = FixedScorer {
            score: 60.0,
            explanation: None,
        };
        let outcome = session.run(&scorer, INPUT, Strategy::Smart).await.unwrap();
        let tasks = outcome.expect("latest run must surface its results");
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.tier == Tier::Medium));
    }

    #[tokio::test]
    async fn test_suggest_takes_top_slice() {
        let input = r#"[
            {"title": "a", "due_date": "2025-06-20", "estimated_hours": 3, "importance": 9},
            {"title": "b", "due_date": "2025-06-20", "estimated_hours": 3, "importance": 7},
            {"title": "c", "due_date": "2025-06-20", "estimated_hours": 3, "importance": 5},
            {"title": "d", "due_date": "2025-06-20", "estimated_hours": 3, "importance": 2}
        ]"#;
        let tasks = analyze(&RankByImportance, input, Strategy::Smart, date("2025-06-15"))
            .await
            .unwrap();
        let top = suggest(&tasks, DEFAULT_SUGGESTION_LIMIT);
        let titles: Vec<&str> = top.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }
}
