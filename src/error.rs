//! Error taxonomy for the analysis pipeline.
//!
//! Every variant is a recoverable result for the caller: the UI redisplays
//! the message and lets the user retry. Nothing here is retried inside the
//! core, and no variant carries a fallback value — a failed run produces no
//! partial result set.

use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The input text is not a JSON array of objects.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A record in the batch violates a field invariant.
    ///
    /// Carries enough context to point the user at the exact record and
    /// field in their input buffer.
    #[error("Invalid task at index {index}: field `{field}` {reason}")]
    InvalidTask {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// The scoring service could not be reached, or answered with a
    /// non-success status. Transport-level failure.
    #[error("Scoring service unavailable: {0}")]
    ScoringUnavailable(String),

    /// The scoring service answered, but the response body does not honor
    /// the protocol (unparseable, wrong batch size, unknown tasks).
    #[error("Scoring protocol violation: {0}")]
    ScoringProtocol(String),

    /// The strategy selector is not one of the four known tokens.
    #[error("Unknown sort strategy `{0}` (expected smart, fastest, impact, or deadline)")]
    UnknownStrategy(String),

    /// Classification was attempted on a task that has no score attached.
    #[error("Task `{0}` has no score; run scoring before classification")]
    MissingScore(String),
}

impl AnalyzeError {
    /// `true` for failures originating at the scoring service boundary.
    ///
    /// The UI uses this to suggest "check the scorer endpoint" rather than
    /// "fix your input".
    pub fn is_scoring_failure(&self) -> bool {
        matches!(
            self,
            AnalyzeError::ScoringUnavailable(_) | AnalyzeError::ScoringProtocol(_)
        )
    }
}
