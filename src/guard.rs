// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Expiring admission guard.
//!
//! Maps a submitter identity to the instant its cool-down ends. The first
//! attempt inside a window opens it; later attempts inside the window are
//! blocked without moving the expiry. Expired entries are evicted lazily on
//! every check, so there is no background sweeper.

use crate::config::GuardConfig;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Submission may proceed; a new window was opened
    Permitted {
        /// Time until the new window closes
        expires_in: Duration,
    },
    /// Identity is still cooling down
    Blocked {
        /// Time until the identity may submit again
        retry_after: Duration,
    },
}

impl GuardDecision {
    pub fn is_permitted(&self) -> bool {
        matches!(self, GuardDecision::Permitted { .. })
    }
}

/// Thread-safe identity → expiry table.
pub struct AdmissionGuard {
    window: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl AdmissionGuard {
    /// Create a guard with an already parsed cool-down window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a guard from configuration, failing on a malformed duration
    /// or one too large to add to an instant.
    pub fn from_config(config: &GuardConfig) -> Result<Self, ConfigError> {
        let window = config.cooldown_duration()?;
        if Instant::now().checked_add(window).is_none() {
            return Err(ConfigError::InvalidDuration {
                value: config.cooldown.clone(),
                reason: "out of range".to_string(),
            });
        }
        Ok(Self::new(window))
    }

    /// The configured cool-down window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// May `identity` submit now?
    pub async fn permit(&self, identity: &str) -> bool {
        self.check_at(identity, Instant::now()).await.is_permitted()
    }

    /// May `identity` submit at `now`?
    pub async fn permit_at(&self, identity: &str, now: Instant) -> bool {
        self.check_at(identity, now).await.is_permitted()
    }

    /// Check `identity` at the current instant.
    pub async fn check(&self, identity: &str) -> GuardDecision {
        self.check_at(identity, Instant::now()).await
    }

    /// Check `identity` at `now`, opening a window if none is active, then
    /// evict every entry that expired before `now`.
    pub async fn check_at(&self, identity: &str, now: Instant) -> GuardDecision {
        let mut entries = self.entries.lock().await;

        let decision = match entries.get(identity) {
            Some(&expires) if expires > now => GuardDecision::Blocked {
                retry_after: expires - now,
            },
            _ => match now.checked_add(self.window) {
                Some(expires) => {
                    entries.insert(identity.to_string(), expires);
                    GuardDecision::Permitted {
                        expires_in: self.window,
                    }
                }
                // A window past the end of the clock never reopens.
                None => {
                    warn!(identity = %identity, "Cool-down window overflows the clock");
                    GuardDecision::Blocked {
                        retry_after: self.window,
                    }
                }
            },
        };

        let before = entries.len();
        entries.retain(|_, expires| *expires >= now);
        let evicted = before - entries.len();

        debug!(
            identity = %identity,
            permitted = decision.is_permitted(),
            evicted,
            tracked = entries.len(),
            "Admission check"
        );

        decision
    }

    /// Number of identities currently cooling down (including not yet
    /// evicted stale ones).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    #[cfg(test)]
    async fn expiry_of(&self, identity: &str) -> Option<Instant> {
        self.entries.lock().await.get(identity).copied()
    }
}
