// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Listboard Service
//!
//! Serves the list/item/vote board with an in-memory content store.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (and a `.env` file if
//! present):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `COOLDOWN`: Minimum time between submissions per client (default: 10s)
//! - `HONEYPOT_FIELD`: Hidden form field that must stay empty (default: name)
//! - `SITE_*`: Site title, description, css and author
//! - `METRICS_ENABLED`, `METRICS_PATH`: Prometheus endpoint

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use listboard::{
    config::Config,
    error::ConfigError,
    handlers::{router, AppState},
    models::SiteConfig,
    store::MemoryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        cooldown = %config.guard.cooldown,
        honeypot_field = %config.honeypot.field,
        metrics_enabled = config.metrics.enabled,
        "Starting listboard"
    );

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|_| ConfigError::InvalidBindAddr(config.bind_addr.clone()))?;

    let store = Arc::new(MemoryStore::new(SiteConfig::from(&config.site)));
    let state = Arc::new(AppState::new(config, store)?);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
