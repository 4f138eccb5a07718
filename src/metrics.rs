// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for submission outcomes.

use crate::error::ConfigError;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Outcome label values.
pub const ACCEPTED: &str = "accepted";
pub const DISCARDED: &str = "discarded";
pub const RATE_LIMITED: &str = "rate_limited";
pub const INVALID: &str = "invalid";
pub const PERSIST_FAILED: &str = "persist_failed";

/// Service metrics, registered on a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    guard_entries: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, ConfigError> {
        let registry = Registry::new();
        let submissions = IntCounterVec::new(
            Opts::new(
                "listboard_submissions_total",
                "Submissions by terminal pipeline outcome",
            ),
            &["outcome"],
        )
        .map_err(|e| ConfigError::Metrics(e.to_string()))?;
        let guard_entries = IntGauge::new(
            "listboard_guard_entries",
            "Identities currently tracked by the admission guard",
        )
        .map_err(|e| ConfigError::Metrics(e.to_string()))?;

        registry
            .register(Box::new(submissions.clone()))
            .map_err(|e| ConfigError::Metrics(e.to_string()))?;
        registry
            .register(Box::new(guard_entries.clone()))
            .map_err(|e| ConfigError::Metrics(e.to_string()))?;

        Ok(Self {
            registry,
            submissions,
            guard_entries,
        })
    }

    pub fn record(&self, outcome: &str) {
        self.submissions.with_label_values(&[outcome]).inc();
    }

    pub fn count(&self, outcome: &str) -> u64 {
        self.submissions.with_label_values(&[outcome]).get()
    }

    pub fn set_guard_entries(&self, entries: usize) {
        self.guard_entries.set(entries as i64);
    }

    /// Render all metrics in the text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
