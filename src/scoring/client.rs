//! HTTP client for the external scoring service.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{merge_scores, Scorer, ScoredRecord};
use crate::config::Config;
use crate::error::AnalyzeError;
use crate::task::TaskRecord;

/// Scoring client that POSTs the batch as a JSON array and expects the same
/// array back with `score` (and optionally `explanation`) attached.
///
/// Exactly one round trip per call, no retries.
pub struct HttpScorer {
    client: Client,
    endpoint: String,
}

impl HttpScorer {
    /// Create a client for the given scoring endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from pipeline configuration (endpoint + timeout).
    pub fn from_config(config: &Config) -> Result<Self, AnalyzeError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                AnalyzeError::ScoringUnavailable(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            endpoint: config.scorer_url.clone(),
        })
    }
}

#[async_trait]
impl Scorer for HttpScorer {
    async fn score_batch(&self, batch: &[TaskRecord]) -> Result<Vec<TaskRecord>, AnalyzeError> {
        debug!(
            "Sending {} tasks to scorer at {}",
            batch.len(),
            self.endpoint
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(batch)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return Err(if e.is_timeout() {
                    AnalyzeError::ScoringUnavailable(format!("request timeout: {}", e))
                } else if e.is_connect() {
                    AnalyzeError::ScoringUnavailable(format!("connection failed: {}", e))
                } else {
                    AnalyzeError::ScoringUnavailable(format!("request failed: {}", e))
                });
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AnalyzeError::ScoringUnavailable(format!("failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            warn!("Scorer returned HTTP {}", status.as_u16());
            return Err(AnalyzeError::ScoringUnavailable(format!(
                "scorer returned HTTP {}: {}",
                status.as_u16(),
                excerpt(&body, 200)
            )));
        }

        let scored: Vec<ScoredRecord> = serde_json::from_str(&body).map_err(|e| {
            AnalyzeError::ScoringProtocol(format!(
                "failed to parse response: {}, body: {}",
                e,
                excerpt(&body, 200)
            ))
        })?;

        debug!("Scorer returned {} scored tasks", scored.len());
        merge_scores(batch, scored)
    }
}

/// First `limit` bytes of `body`, backed off to a char boundary so error
/// messages can carry arbitrary (non-ASCII) scorer output.
fn excerpt(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
