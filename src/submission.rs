// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission admission pipeline.
//!
//! Every write runs honeypot → guard → validation → render → persist, in
//! that order. The first failing stage ends the request and nothing reaches
//! the store. The guard is consulted once per request whatever happens
//! downstream.

use crate::error::SubmissionError;
use crate::guard::{AdmissionGuard, GuardDecision};
use crate::honeypot;
use crate::metrics::{self, Metrics};
use crate::models::{Node, RawSubmission};
use crate::store::ContentStore;
use crate::validator::{SubmissionValidator, ValidationErrors, ValidationResult};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Terminal, non-fatal outcome of a submission.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Honeypot tripped; reply as if it succeeded
    Discarded,
    /// Identity is cooling down; nothing was stored
    RateLimited {
        retry_after: Duration,
        form: RawSubmission,
    },
    /// Validation failed; `form` is the user's input, untouched
    Invalid {
        errors: ValidationErrors,
        form: RawSubmission,
    },
    /// Stored as node `node_id`
    Accepted { node_id: u64 },
}

impl SubmissionOutcome {
    fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Discarded => metrics::DISCARDED,
            SubmissionOutcome::RateLimited { .. } => metrics::RATE_LIMITED,
            SubmissionOutcome::Invalid { .. } => metrics::INVALID,
            SubmissionOutcome::Accepted { .. } => metrics::ACCEPTED,
        }
    }
}

/// Orchestrates admission of new lists, items and votes.
pub struct SubmissionPipeline {
    guard: Arc<AdmissionGuard>,
    validator: SubmissionValidator,
    store: Arc<dyn ContentStore>,
    metrics: Metrics,
}

impl SubmissionPipeline {
    pub fn new(
        guard: Arc<AdmissionGuard>,
        validator: SubmissionValidator,
        store: Arc<dyn ContentStore>,
        metrics: Metrics,
    ) -> Self {
        Self {
            guard,
            validator,
            store,
            metrics,
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run the pipeline for a submission from `identity`. `hidden` is the
    /// value of the honeypot field.
    pub async fn submit(
        &self,
        identity: &str,
        hidden: &str,
        raw: RawSubmission,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit_at(identity, hidden, raw, Instant::now()).await
    }

    /// Same as [`submit`](Self::submit) with the guard evaluated at `now`.
    pub async fn submit_at(
        &self,
        identity: &str,
        hidden: &str,
        raw: RawSubmission,
        now: Instant,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let result = self.run(identity, hidden, raw, now).await;
        match &result {
            Ok(outcome) => self.metrics.record(outcome.label()),
            Err(_) => self.metrics.record(metrics::PERSIST_FAILED),
        }
        self.metrics.set_guard_entries(self.guard.len().await);
        result
    }

    async fn run(
        &self,
        identity: &str,
        hidden: &str,
        raw: RawSubmission,
        now: Instant,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if honeypot::is_bot(hidden) {
            info!(identity = %identity, "Honeypot tripped, discarding submission");
            return Ok(SubmissionOutcome::Discarded);
        }

        if let GuardDecision::Blocked { retry_after } = self.guard.check_at(identity, now).await {
            info!(
                identity = %identity,
                retry_after_ms = retry_after.as_millis() as u64,
                "Submission rate limited"
            );
            return Ok(SubmissionOutcome::RateLimited {
                retry_after,
                form: raw,
            });
        }

        let content = match self.validator.validate(&raw) {
            ValidationResult::Valid(content) => content,
            ValidationResult::Invalid(errors) => {
                info!(
                    identity = %identity,
                    errors = ?errors.messages(),
                    "Submission failed validation"
                );
                return Ok(SubmissionOutcome::Invalid { errors, form: raw });
            }
        };

        debug!(identity = %identity, parent_id = content.parent_id(), "Persisting submission");
        let node = Node::from_content(content, Utc::now());
        match self.store.create_node(node).await {
            Ok(node_id) => {
                info!(identity = %identity, node_id, parent_id = raw.parent_id, "Submission accepted");
                Ok(SubmissionOutcome::Accepted { node_id })
            }
            Err(e) => {
                error!(identity = %identity, error = %e, "Failed to persist submission");
                Err(SubmissionError::Persistence(e))
            }
        }
    }
}
