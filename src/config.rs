// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the listboard service.
//!
//! Every value can be overridden from the environment (see [`Config::from_env`]),
//! so the honeypot field and the cool-down window never need a code change.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the listboard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Admission guard configuration
    #[serde(default)]
    pub guard: GuardConfig,

    /// Honeypot configuration
    #[serde(default)]
    pub honeypot: HoneypotConfig,

    /// Site presentation handed out by the content store
    #[serde(default)]
    pub site: SiteSettings,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Admission guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Cool-down window between permitted submissions, e.g. "10s" or "1m30s"
    #[serde(default = "default_cooldown")]
    pub cooldown: String,
}

/// Honeypot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoneypotConfig {
    /// Name of the hidden form field that must stay empty (default: "name")
    #[serde(default = "default_honeypot_field")]
    pub field: String,
}

/// Site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_domain_id")]
    pub domain_id: u64,
    #[serde(default = "default_site_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_cooldown() -> String {
    "10s".to_string()
}

fn default_honeypot_field() -> String {
    "name".to_string()
}

fn default_domain_id() -> u64 {
    1
}

fn default_site_title() -> String {
    "Listboard".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            guard: GuardConfig::default(),
            honeypot: HoneypotConfig::default(),
            site: SiteSettings::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cooldown: default_cooldown(),
        }
    }
}

impl Default for HoneypotConfig {
    fn default() -> Self {
        Self {
            field: default_honeypot_field(),
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            domain_id: default_domain_id(),
            title: default_site_title(),
            description: String::new(),
            css: String::new(),
            author_name: String::new(),
            author_email: String::new(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
    /// - `COOLDOWN`: Cool-down window per submitter (default: 10s)
    /// - `HONEYPOT_FIELD`: Hidden form field name (default: name)
    /// - `SITE_DOMAIN_ID`, `SITE_TITLE`, `SITE_DESCRIPTION`, `SITE_CSS`,
    ///   `SITE_AUTHOR_NAME`, `SITE_AUTHOR_EMAIL`: site settings
    /// - `METRICS_ENABLED`, `METRICS_PATH`: metrics endpoint
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_or("BIND_ADDR", defaults.bind_addr),
            guard: GuardConfig {
                cooldown: env_or("COOLDOWN", defaults.guard.cooldown),
            },
            honeypot: HoneypotConfig {
                field: env_or("HONEYPOT_FIELD", defaults.honeypot.field),
            },
            site: SiteSettings {
                domain_id: env_parsed("SITE_DOMAIN_ID", defaults.site.domain_id),
                title: env_or("SITE_TITLE", defaults.site.title),
                description: env_or("SITE_DESCRIPTION", defaults.site.description),
                css: env_or("SITE_CSS", defaults.site.css),
                author_name: env_or("SITE_AUTHOR_NAME", defaults.site.author_name),
                author_email: env_or("SITE_AUTHOR_EMAIL", defaults.site.author_email),
            },
            metrics: MetricsConfig {
                enabled: env_parsed("METRICS_ENABLED", defaults.metrics.enabled),
                path: env_or("METRICS_PATH", defaults.metrics.path),
            },
        }
    }
}

impl GuardConfig {
    /// Get the cool-down duration
    pub fn cooldown_duration(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.cooldown)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse a duration such as `10s`, `1m30s`, `1.5h` or `250ms`.
///
/// A bare integer is read as seconds.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let s = value.trim();
    if s.is_empty() {
        return Err(invalid("empty duration"));
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid("expected a number"));
        }
        let (number, tail) = rest.split_at(number_len);
        let amount: f64 = number.parse().map_err(|_| invalid("malformed number"))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = match unit {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid(&format!("unknown unit {unit:?}"))),
        };

        let term = Duration::try_from_secs_f64(amount * scale)
            .map_err(|_| invalid("out of range"))?;
        total = total
            .checked_add(term)
            .ok_or_else(|| invalid("out of range"))?;
        rest = tail;
    }

    Ok(total)
}
