//! Core Task Record type and batch parsing.
//!
//! # Invariants
//! - `title` is non-empty
//! - `estimated_hours` is finite and `>= 0.0`
//! - `importance` is in `[0, 10]`
//! - the five input fields never change after parse; only `score` and
//!   `explanation` are attached later

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::AnalyzeError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One validated unit of work awaiting prioritization.
///
/// Input fields are private and read-only; enrichment after scoring goes
/// through [`TaskRecord::attach_score`], the only mutation path.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    title: String,
    due_date: NaiveDate,
    estimated_hours: f64,
    importance: u8,
    dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

impl TaskRecord {
    /// Build a record from already-structured fields, applying the same
    /// validation as [`parse_batch`].
    pub fn new(
        title: impl Into<String>,
        due_date: NaiveDate,
        estimated_hours: f64,
        importance: u8,
        dependencies: Vec<String>,
    ) -> Result<Self, AnalyzeError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(invalid(0, "title", "must be non-empty"));
        }
        if !estimated_hours.is_finite() || estimated_hours < 0.0 {
            return Err(invalid(0, "estimated_hours", "must be a non-negative number"));
        }
        if importance > 10 {
            return Err(invalid(0, "importance", "must be an integer in [0, 10]"));
        }
        Ok(Self {
            title,
            due_date,
            estimated_hours,
            importance,
            dependencies,
            score: None,
            explanation: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn estimated_hours(&self) -> f64 {
        self.estimated_hours
    }

    pub fn importance(&self) -> u8 {
        self.importance
    }

    /// Dependency titles, carried through opaquely. Resolution against the
    /// batch is not this crate's job.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// `Some("")` means the scorer supplied an (empty) explanation and is
    /// distinct from `None`.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Attach the scorer's output to this record.
    ///
    /// The only post-parse mutation; input fields are untouched.
    pub fn attach_score(&mut self, score: f64, explanation: Option<String>) {
        self.score = Some(score);
        self.explanation = explanation;
    }
}

fn invalid(index: usize, field: &'static str, reason: impl Into<String>) -> AnalyzeError {
    AnalyzeError::InvalidTask {
        index,
        field,
        reason: reason.into(),
    }
}

/// Parse a raw text buffer into a validated batch.
///
/// The buffer must be a JSON array of task objects. Structural problems
/// (not JSON, not an array, an element that is not an object) fail with
/// `MalformedInput`; a field-level violation fails the whole batch with
/// `InvalidTask` naming the first offending record and field.
pub fn parse_batch(input: &str) -> Result<Vec<TaskRecord>, AnalyzeError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| AnalyzeError::MalformedInput(format!("not valid JSON: {}", e)))?;

    let items = value
        .as_array()
        .ok_or_else(|| AnalyzeError::MalformedInput("expected a JSON array of tasks".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| record_from_value(index, item))
        .collect()
}

fn record_from_value(index: usize, item: &Value) -> Result<TaskRecord, AnalyzeError> {
    let obj = item.as_object().ok_or_else(|| {
        AnalyzeError::MalformedInput(format!("task at index {} is not a JSON object", index))
    })?;

    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(index, "title", "is missing or not a string"))?;
    if title.trim().is_empty() {
        return Err(invalid(index, "title", "must be non-empty"));
    }

    let due_date_raw = obj
        .get("due_date")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(index, "due_date", "is missing or not a string"))?;
    let due_date = NaiveDate::parse_from_str(due_date_raw, DATE_FORMAT).map_err(|_| {
        invalid(
            index,
            "due_date",
            format!("`{}` is not a YYYY-MM-DD calendar date", due_date_raw),
        )
    })?;

    let estimated_hours = obj
        .get("estimated_hours")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid(index, "estimated_hours", "is missing or not a number"))?;
    if estimated_hours < 0.0 {
        return Err(invalid(index, "estimated_hours", "must be non-negative"));
    }

    // `as_i64` is None for JSON floats, so 7.5 is rejected here, not rounded.
    let importance = obj
        .get("importance")
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid(index, "importance", "is missing or not an integer"))?;
    if !(0..=10).contains(&importance) {
        return Err(invalid(
            index,
            "importance",
            format!("{} is outside [0, 10]", importance),
        ));
    }

    let dependencies = match obj.get("dependencies") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(deps)) => deps
            .iter()
            .map(|d| {
                d.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(index, "dependencies", "must contain only strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(invalid(index, "dependencies", "must be an array of strings")),
    };

    Ok(TaskRecord {
        title: title.to_string(),
        due_date,
        estimated_hours,
        importance: importance as u8,
        dependencies,
        score: None,
        explanation: None,
    })
}
