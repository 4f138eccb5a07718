// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission field validator.
//!
//! Every rule is checked and every failure collected, in field order (title
//! before body), so the same input always yields the same error list. The
//! body is rendered only when the list is empty.

use crate::models::{RawSubmission, ValidatedContent, Vote};
use crate::render::MarkdownRenderer;
use crate::signature;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Minimum title length in characters, after trimming.
pub const MIN_TITLE_CHARS: usize = 3;

/// Minimum body length in characters, untrimmed.
pub const MIN_BODY_CHARS: usize = 10;

/// Validation error types.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title must be at least 3 characters long")]
    TitleTooShort,

    #[error("Please, write something")]
    BodyTooShort,
}

/// Ordered, non-empty list of validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Human-readable messages, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(ToString::to_string))
    }
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Submission is acceptable and its body rendered
    Valid(ValidatedContent),
    /// Submission is invalid
    Invalid(ValidationErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }
}

/// Submission validator.
#[derive(Debug, Clone, Default)]
pub struct SubmissionValidator {
    renderer: MarkdownRenderer,
}

impl SubmissionValidator {
    /// Create a new validator rendering accepted bodies with `renderer`.
    pub fn new(renderer: MarkdownRenderer) -> Self {
        Self { renderer }
    }

    /// Validate a raw submission.
    pub fn validate(&self, raw: &RawSubmission) -> ValidationResult {
        let title = raw.title.trim();
        let mut errors = Vec::new();

        if title.chars().count() < MIN_TITLE_CHARS {
            errors.push(ValidationError::TitleTooShort);
        }
        if raw.body.chars().count() < MIN_BODY_CHARS {
            errors.push(ValidationError::BodyTooShort);
        }

        if !errors.is_empty() {
            debug!(parent_id = raw.parent_id, ?errors, "Submission invalid");
            return ValidationResult::Invalid(ValidationErrors(errors));
        }

        debug!(parent_id = raw.parent_id, "Submission valid");
        ValidationResult::Valid(ValidatedContent {
            parent_id: raw.parent_id,
            domain_id: raw.domain_id,
            title: title.to_string(),
            body: raw.body.clone(),
            vote: Vote::from_token(&raw.vote),
            signature: signature::derive_optional(raw.passphrase.as_deref()),
            rendered: self.renderer.render(&raw.body),
        })
    }
}
