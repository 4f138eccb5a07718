// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Data models for submissions and stored nodes.

use crate::render::SafeHtml;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parent id of top-level lists.
pub const ROOT_ID: u64 = 0;

/// Untrusted form input for a new list, item or vote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Vote token: "y", "n" or anything else
    #[serde(default)]
    pub vote: String,
    /// Never echoed back to the client
    #[serde(default, skip_serializing)]
    pub passphrase: Option<String>,
    #[serde(default)]
    pub parent_id: u64,
    #[serde(default)]
    pub domain_id: u64,
}

/// Direction of a vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
    #[default]
    None,
}

impl Vote {
    /// "y" is up, "n" is down, anything else abstains.
    pub fn from_token(token: &str) -> Self {
        match token {
            "y" => Vote::Up,
            "n" => Vote::Down,
            _ => Vote::None,
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
            Vote::None => 0,
        }
    }
}

/// A submission that passed validation, with its body rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContent {
    pub(crate) parent_id: u64,
    pub(crate) domain_id: u64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) vote: Vote,
    pub(crate) signature: Option<String>,
    pub(crate) rendered: SafeHtml,
}

impl ValidatedContent {
    pub fn parent_id(&self) -> u64 {
        self.parent_id
    }

    pub fn domain_id(&self) -> u64 {
        self.domain_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn vote(&self) -> Vote {
        self.vote
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn rendered(&self) -> &SafeHtml {
        &self.rendered
    }
}

/// A persisted list, item or vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Assigned by the store; 0 until persisted
    pub id: u64,
    pub parent_id: u64,
    pub domain_id: u64,
    pub title: String,
    pub body: String,
    pub rendered: SafeHtml,
    pub vote: i8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Sum of the votes of direct children
    pub votes: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Node {
    /// Build an unsaved node from accepted content.
    pub fn from_content(content: ValidatedContent, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            parent_id: content.parent_id,
            domain_id: content.domain_id,
            title: content.title,
            body: content.body,
            rendered: content.rendered,
            vote: content.vote.value(),
            signature: content.signature,
            votes: 0,
            created: now,
            updated: now,
        }
    }

    /// URL slug of the title, e.g. `best-pizza-places.html`.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

/// Lower-case the title and collapse runs of other characters into `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len() + 5);
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.push_str(".html");
    slug
}

/// Ordering for child listings; all orders are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Created,
    Updated,
    Votes,
}

/// Presentation settings of one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    pub domain_id: u64,
    pub title: String,
    pub description: String,
    pub css: String,
    pub author_name: String,
    pub author_email: String,
}

impl From<&crate::config::SiteSettings> for SiteConfig {
    fn from(settings: &crate::config::SiteSettings) -> Self {
        Self {
            domain_id: settings.domain_id,
            title: settings.title.clone(),
            description: settings.description.clone(),
            css: settings.css.clone(),
            author_name: settings.author_name.clone(),
            author_email: settings.author_email.clone(),
        }
    }
}
