// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content store port and an in-memory adapter.

use crate::error::StoreError;
use crate::models::{Node, SiteConfig, SortKey, ROOT_ID};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

/// Persistence contract for lists, items and votes.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist a node and return its new id.
    async fn create_node(&self, node: Node) -> Result<u64, StoreError>;

    async fn fetch_node(&self, id: u64) -> Result<Option<Node>, StoreError>;

    /// Children of `parent_id`, `limit` per zero-based `page`.
    async fn fetch_children(
        &self,
        parent_id: u64,
        limit: usize,
        page: usize,
        sort: SortKey,
    ) -> Result<Vec<Node>, StoreError>;

    async fn site_config(&self, token: &str) -> Result<SiteConfig, StoreError>;
}

/// Process-local store. Nodes are lost on restart.
pub struct MemoryStore {
    site: SiteConfig,
    nodes: RwLock<Vec<Node>>,
}

impl MemoryStore {
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            nodes: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_node(&self, mut node: Node) -> Result<u64, StoreError> {
        let mut nodes = self.nodes.write().await;

        // Ids are 1-based positions in the table.
        if node.parent_id != ROOT_ID {
            let parent = nodes
                .get_mut((node.parent_id - 1) as usize)
                .ok_or(StoreError::NotFound(node.parent_id))?;
            parent.votes += i64::from(node.vote);
            parent.updated = Utc::now();
        }

        node.id = nodes.len() as u64 + 1;
        let id = node.id;
        nodes.push(node);

        debug!(id, "Node created");
        Ok(id)
    }

    async fn fetch_node(&self, id: u64) -> Result<Option<Node>, StoreError> {
        if id == ROOT_ID {
            return Ok(None);
        }
        Ok(self.nodes.read().await.get((id - 1) as usize).cloned())
    }

    async fn fetch_children(
        &self,
        parent_id: u64,
        limit: usize,
        page: usize,
        sort: SortKey,
    ) -> Result<Vec<Node>, StoreError> {
        let nodes = self.nodes.read().await;
        let mut children: Vec<&Node> = nodes.iter().filter(|n| n.parent_id == parent_id).collect();

        match sort {
            SortKey::Created => children.sort_by(|a, b| (b.created, b.id).cmp(&(a.created, a.id))),
            SortKey::Updated => children.sort_by(|a, b| (b.updated, b.id).cmp(&(a.updated, a.id))),
            SortKey::Votes => children.sort_by(|a, b| (b.votes, b.id).cmp(&(a.votes, a.id))),
        }

        Ok(children
            .into_iter()
            .skip(page.saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn site_config(&self, _token: &str) -> Result<SiteConfig, StoreError> {
        Ok(self.site.clone())
    }
}
