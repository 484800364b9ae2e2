//! Data Transfer Objects for the HTTP API.
//!
//! Entity payloads and views are serialized straight from `crate::models`;
//! only the request shapes that have no model counterpart live here.

use serde::{Deserialize, Serialize};

use crate::db::repository::ListWindow;
use crate::models::EntityId;

/// Body of a batch link or unlink request.
///
/// Accepts either a bare JSON array of ids or an object `{"ids": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    Bare(Vec<EntityId>),
    Wrapped { ids: Vec<EntityId> },
}

impl IdList {
    pub fn into_ids(self) -> Vec<EntityId> {
        match self {
            IdList::Bare(ids) | IdList::Wrapped { ids } => ids,
        }
    }
}

/// Query parameters for listing a collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Comma-separated ids; when present only these entities are returned.
    pub ids: Option<String>,
    /// Leading entries to skip.
    pub skip: Option<usize>,
    /// Maximum entries to return.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// The requested ids, or `None` for a full listing.
    pub fn requested_ids(&self) -> Option<Vec<EntityId>> {
        self.ids.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(EntityId::from)
                .collect()
        })
    }

    /// The pagination window; absent parameters leave the listing unbounded.
    pub fn window(&self) -> ListWindow {
        ListWindow::new(self.skip.unwrap_or(0), self.limit)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Store reachability
    pub store: String,
}
