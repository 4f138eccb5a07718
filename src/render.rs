// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Markdown rendering followed by allow-list sanitizing.
//!
//! Bodies are untrusted. They go through pulldown-cmark first and the
//! resulting HTML always goes through ammonia, so nothing that can run script
//! or load active content survives into storage, pages or feeds.

use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// Markup that has already been sanitized and must not be escaped again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Schemes allowed in `href` and `src`.
const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

const LINK_REL: &str = "nofollow noopener noreferrer";

/// Markdown to safe HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `body` to sanitized HTML.
    pub fn render(&self, body: &str) -> SafeHtml {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);

        let mut unsafe_html = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut unsafe_html, Parser::new_ext(body, options));

        SafeHtml(sanitizer().clean(&unsafe_html).to_string())
    }
}

/// User-generated content policy: formatting, lists, tables, images and
/// links with safe schemes. Links are marked nofollow. Built once per process.
fn sanitizer() -> &'static ammonia::Builder<'static> {
    static SANITIZER: OnceLock<ammonia::Builder<'static>> = OnceLock::new();
    SANITIZER.get_or_init(|| {
        let mut builder = ammonia::Builder::default();
        builder
            .url_schemes(URL_SCHEMES.iter().copied().collect::<HashSet<_>>())
            .link_rel(Some(LINK_REL));
        builder
    })
}
