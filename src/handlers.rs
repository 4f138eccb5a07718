// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the listboard service.
//!
//! Writes go through the [`SubmissionPipeline`]; reads are thin JSON views
//! over the content store. Page layout is left to whatever renders them.

use crate::config::Config;
use crate::error::{AppError, ConfigError, Result};
use crate::guard::AdmissionGuard;
use crate::honeypot::Honeypot;
use crate::metrics::Metrics;
use crate::models::{Node, RawSubmission, SiteConfig, SortKey, ROOT_ID};
use crate::render::MarkdownRenderer;
use crate::store::ContentStore;
use crate::submission::{SubmissionOutcome, SubmissionPipeline};
use crate::validator::SubmissionValidator;
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Nodes per page in every listing.
pub const ITEMS_PER_PAGE: usize = 10;

/// Token passed to the store when asking for the site configuration.
const SITE_TOKEN: &str = "token";

/// Message shown when a submitter is cooling down.
pub const RATE_LIMITED_MESSAGE: &str = "You are posting too fast, please wait a moment";

/// Fixed routes the metrics endpoint must not shadow.
const RESERVED_PATHS: &[&str] = &["/", "/health", "/healthz", "/add"];

/// Shared application state.
pub struct AppState {
    pub pipeline: SubmissionPipeline,
    pub honeypot: Honeypot,
    pub config: Config,
}

impl AppState {
    /// Wire the pipeline for `config` on top of `store`. Fails if the
    /// cool-down window cannot be parsed or the metrics path cannot be routed.
    pub fn new(config: Config, store: Arc<dyn ContentStore>) -> std::result::Result<Self, ConfigError> {
        if config.metrics.enabled {
            check_metrics_path(&config.metrics.path)?;
        }
        let guard = Arc::new(AdmissionGuard::from_config(&config.guard)?);
        let pipeline = SubmissionPipeline::new(
            guard,
            SubmissionValidator::new(MarkdownRenderer::new()),
            store,
            Metrics::new()?,
        );

        Ok(Self {
            pipeline,
            honeypot: Honeypot::new(&config.honeypot),
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Rejected submission body: the errors plus the user's input.
#[derive(Debug, Serialize)]
pub struct FormErrorResponse {
    pub errors: Vec<String>,
    pub form: RawSubmission,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// A node together with its canonical URL.
#[derive(Debug, Serialize)]
pub struct NodeView {
    #[serde(flatten)]
    pub node: Node,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub site: SiteConfig,
    pub page: usize,
    pub lists: Vec<NodeView>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub site: SiteConfig,
    pub list: NodeView,
    pub items: Vec<Node>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub site: SiteConfig,
    pub list: NodeView,
    pub item: Node,
    pub votes: Vec<Node>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/", get(index))
        .route("/add", get(add_form).post(add_list))
        .route("/list/:list_id", get(view_list).post(add_item))
        .route("/list/:list_id/:key", get(view_list_slug).post(add_item_slug))
        .route("/list/:list_id/:key/vote", get(view_item).post(add_vote));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// A metrics path must be absolute, static and clear of every other route.
fn check_metrics_path(path: &str) -> std::result::Result<(), ConfigError> {
    let routable = path.starts_with('/')
        && !path.contains([':', '*'])
        && !RESERVED_PATHS.contains(&path)
        && !path.starts_with("/list/");
    if routable {
        Ok(())
    } else {
        Err(ConfigError::InvalidMetricsPath(path.to_string()))
    }
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "listboard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.pipeline.metrics().encode(),
    )
}

/// Top-level lists, most recently active first.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<IndexResponse>> {
    let page = match query.page.as_deref() {
        None | Some("") => 0,
        Some(raw) => raw.parse::<usize>().unwrap_or_else(|_| {
            debug!(page = %raw, "Not a valid page number");
            0
        }),
    };

    let store = state.pipeline.store();
    let site = store.site_config(SITE_TOKEN).await?;
    let lists = store
        .fetch_children(ROOT_ID, ITEMS_PER_PAGE, page, SortKey::Updated)
        .await?
        .into_iter()
        .map(list_view)
        .collect();

    Ok(Json(IndexResponse { site, page, lists }))
}

/// An empty form: no errors, no values.
pub async fn add_form() -> Json<FormErrorResponse> {
    Json(FormErrorResponse {
        errors: Vec::new(),
        form: RawSubmission::default(),
        retry_after_secs: None,
    })
}

/// Create a new list.
pub async fn add_list(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response> {
    submit(&state, addr, ROOT_ID, fields).await
}

/// A list and its items, best voted first.
pub async fn view_list(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<u64>,
) -> Result<Json<ListResponse>> {
    let store = state.pipeline.store();
    let list = fetch_list(&state, list_id).await?;
    let site = store.site_config(SITE_TOKEN).await?;
    let items = store
        .fetch_children(list_id, ITEMS_PER_PAGE, 0, SortKey::Votes)
        .await?;

    Ok(Json(ListResponse {
        site,
        list: list_view(list),
        items,
    }))
}

pub async fn view_list_slug(
    state: State<Arc<AppState>>,
    Path((list_id, _slug)): Path<(u64, String)>,
) -> Result<Json<ListResponse>> {
    view_list(state, Path(list_id)).await
}

/// Add an item to a list.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(list_id): Path<u64>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response> {
    fetch_list(&state, list_id).await?;
    submit(&state, addr, list_id, fields).await
}

pub async fn add_item_slug(
    state: State<Arc<AppState>>,
    addr: ConnectInfo<SocketAddr>,
    Path((list_id, _slug)): Path<(u64, String)>,
    fields: Form<HashMap<String, String>>,
) -> Result<Response> {
    add_item(state, addr, Path(list_id), fields).await
}

/// An item of a list and its votes, newest first.
pub async fn view_item(
    State(state): State<Arc<AppState>>,
    Path((list_id, item_id)): Path<(u64, u64)>,
) -> Result<Json<ItemResponse>> {
    let store = state.pipeline.store();
    let (list, item) = fetch_item(&state, list_id, item_id).await?;
    let site = store.site_config(SITE_TOKEN).await?;
    let votes = store
        .fetch_children(item_id, ITEMS_PER_PAGE, 0, SortKey::Created)
        .await?;

    Ok(Json(ItemResponse {
        site,
        list: list_view(list),
        item,
        votes,
    }))
}

/// Vote on an item.
pub async fn add_vote(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path((list_id, item_id)): Path<(u64, u64)>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response> {
    fetch_item(&state, list_id, item_id).await?;
    submit(&state, addr, item_id, fields).await
}

async fn fetch_list(state: &AppState, list_id: u64) -> Result<Node> {
    match state.pipeline.store().fetch_node(list_id).await? {
        Some(list) if list.parent_id == ROOT_ID => Ok(list),
        _ => {
            debug!(list_id, "List not found");
            Err(AppError::NotFound)
        }
    }
}

async fn fetch_item(state: &AppState, list_id: u64, item_id: u64) -> Result<(Node, Node)> {
    let list = fetch_list(state, list_id).await?;
    match state.pipeline.store().fetch_node(item_id).await? {
        Some(item) if item.parent_id == list_id => Ok((list, item)),
        _ => {
            debug!(list_id, item_id, "Item not found");
            Err(AppError::NotFound)
        }
    }
}

fn list_view(node: Node) -> NodeView {
    let url = format!("/list/{}/{}", node.id, node.slug());
    NodeView { node, url }
}

/// Map form fields onto a submission and run the pipeline.
async fn submit(
    state: &AppState,
    addr: SocketAddr,
    parent_id: u64,
    mut fields: HashMap<String, String>,
) -> Result<Response> {
    let site = state.pipeline.store().site_config(SITE_TOKEN).await?;
    let hidden = fields.remove(state.honeypot.field()).unwrap_or_default();
    let raw = RawSubmission {
        title: fields.remove("title").unwrap_or_default(),
        body: fields.remove("body").unwrap_or_default(),
        vote: fields.remove("vote").unwrap_or_default(),
        passphrase: fields.remove("password"),
        parent_id,
        domain_id: site.domain_id,
    };

    let identity = addr.ip().to_string();
    let outcome = state.pipeline.submit(&identity, &hidden, raw).await?;

    Ok(match outcome {
        SubmissionOutcome::Accepted { .. } | SubmissionOutcome::Discarded => {
            Redirect::to("/").into_response()
        }
        SubmissionOutcome::Invalid { errors, form } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(FormErrorResponse {
                errors: errors.messages(),
                form,
                retry_after_secs: None,
            }),
        )
            .into_response(),
        SubmissionOutcome::RateLimited { retry_after, form } => {
            let retry_secs = retry_after_secs(retry_after);
            debug!(identity = %identity, retry_secs, "Replying 429");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_secs.to_string())],
                Json(FormErrorResponse {
                    errors: vec![RATE_LIMITED_MESSAGE.to_string()],
                    form,
                    retry_after_secs: Some(retry_secs),
                }),
            )
                .into_response()
        }
    })
}

/// Whole seconds, rounded up, never zero.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}
