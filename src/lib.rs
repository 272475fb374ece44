//! # taskrank
//!
//! Task prioritization pipeline: submit a batch of work items, have an
//! external scoring service rank them, and get back an ordered, classified,
//! explained list ready for display.
//!
//! This library provides:
//! - A validated Task Record model parsed from raw JSON text
//! - An HTTP client for the external scoring collaborator
//! - Four selectable display orderings over a scored batch
//! - Local synthesis of per-task rationale strings
//! - Score-to-tier classification for presentation styling
//!
//! ## Pipeline
//!
//! ```text
//!   raw text ──► parse/validate ──► Scorer (HTTP) ──► sort ──► explain
//!                                                              classify
//!                                                                 │
//!                                                                 ▼
//!                                                          Vec<AnalyzedTask>
//! ```
//!
//! One analysis run is a single sequential chain with one in-flight network
//! call; [`pipeline::AnalysisSession`] serializes runs and discards any run
//! superseded while its scoring round trip was outstanding.
//!
//! ## Modules
//! - `task`: Task Record model and batch parsing
//! - `scoring`: the external scorer boundary (`Scorer` trait, `HttpScorer`)
//! - `strategy`: display orderings (`smart`, `fastest`, `impact`, `deadline`)
//! - `explain`: rationale synthesis
//! - `classify`: score → tier mapping
//! - `pipeline`: orchestration and the run context

pub mod classify;
pub mod config;
pub mod error;
pub mod explain;
pub mod pipeline;
pub mod scoring;
pub mod strategy;
pub mod task;

pub use classify::{classify, Tier};
pub use config::Config;
pub use error::AnalyzeError;
pub use pipeline::{analyze, suggest, AnalysisSession, AnalyzedTask, RunToken};
pub use scoring::{HttpScorer, Scorer};
pub use strategy::{sort_batch, Strategy};
pub use task::{parse_batch, TaskRecord};
