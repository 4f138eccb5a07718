// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Listboard
//!
//! A community list and voting board. Every write (new list, new item, new
//! vote) passes the submission admission pipeline:
//!
//! - Honeypot field check (bots are discarded silently)
//! - Per-submitter cool-down with lazy eviction
//! - Title/body validation with accumulated error messages
//! - Markdown rendering through an allow-list HTML sanitizer
//! - Persistence through the [`store::ContentStore`] port

pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod honeypot;
pub mod metrics;
pub mod models;
pub mod render;
pub mod signature;
pub mod store;
pub mod submission;
pub mod validator;

pub use config::Config;
pub use guard::{AdmissionGuard, GuardDecision};
pub use store::{ContentStore, MemoryStore};
pub use submission::{SubmissionOutcome, SubmissionPipeline};
pub use validator::{SubmissionValidator, ValidationResult};
