// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Honeypot filter: a hidden form field humans never fill in.

use crate::config::HoneypotConfig;

/// Hidden-field bot trap.
#[derive(Debug, Clone)]
pub struct Honeypot {
    field: String,
}

impl Honeypot {
    pub fn new(config: &HoneypotConfig) -> Self {
        Self {
            field: config.field.clone(),
        }
    }

    /// Name of the hidden form field.
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// True when the hidden field carries anything at all.
pub fn is_bot(hidden_value: &str) -> bool {
    !hidden_value.is_empty()
}
