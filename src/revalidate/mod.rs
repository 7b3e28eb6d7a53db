// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Batched cache-revalidation notices for published documents.
//!
//! A [`ChangeBatcher`] lives for one publishing pass: changes are recorded per node, reduced to
//! their enclosing documents, and delivered in a single request when the batch is flushed.
//! Delivery failures are logged and reported, never raised to the publishing caller.

pub mod http;


pub use http::HttpNotifier;

use std::collections::HashMap;
use std::mem;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::model::{ContextPath, Node, Workspace, WorkspaceName, DOCUMENT_NODE_TYPE};
use crate::tree::{closest_of_type, ContentTreeReader, Router, TreeReadError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevalidateDocument {
    pub route_path: String,
}

/// Request body sent to the revalidation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RevalidatePayload {
    pub documents: Vec<RevalidateDocument>,
}

impl RevalidatePayload {
    pub fn from_route_paths(route_paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            documents: route_paths
                .into_iter()
                .map(|route_path| RevalidateDocument { route_path })
                .collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("revalidate request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("revalidate request timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("revalidate endpoint answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// Outbound delivery of one batch.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_batch(
        &self,
        endpoint: &str,
        token: &str,
        payload: &RevalidatePayload,
    ) -> Result<(), NotifyError>;
}

/// Where batches are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidateTarget {
    pub endpoint: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Accumulating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// The enclosing document is already part of the batch.
    AlreadyRecorded,
    /// Changes to non-public workspaces need no revalidation.
    NotPublic,
    NoDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was recorded; no request was made.
    Empty,
    Delivered { route_paths: Vec<String> },
    Failed { route_paths: Vec<String>, error: String },
}

#[derive(Debug)]
struct PendingChange {
    document: ContextPath,
    /// Live route captured at record time for documents that are being removed.
    route_path: Option<String>,
}

/// Collects changed documents and sends them as one batch.
///
/// `flush` consumes the batcher, so a batch is delivered at most once.
pub struct ChangeBatcher<'a> {
    reader: &'a dyn ContentTreeReader,
    router: &'a dyn Router,
    notifier: &'a dyn Notifier,
    target: RevalidateTarget,
    pending: Vec<PendingChange>,
    /// Document key to its position in `pending`.
    recorded: HashMap<ContextPath, usize>,
}

impl<'a> ChangeBatcher<'a> {
    pub fn new(
        reader: &'a dyn ContentTreeReader,
        router: &'a dyn Router,
        notifier: &'a dyn Notifier,
        target: RevalidateTarget,
    ) -> Self {
        Self { reader, router, notifier, target, pending: Vec::new(), recorded: HashMap::new() }
    }

    pub fn state(&self) -> BatchState {
        if self.pending.is_empty() {
            BatchState::Idle
        } else {
            BatchState::Accumulating
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Records that `node` is being published into `target_workspace`.
    ///
    /// Only publications into a public workspace count. The change is reduced to the closest
    /// document ancestor-or-self; each document is recorded once per batch.
    pub fn record_change(
        &mut self,
        node: &Node,
        target_workspace: Option<&Workspace>,
    ) -> Result<RecordOutcome, TreeReadError> {
        debug!(
            context_path = %node.context_path(),
            target_workspace = ?target_workspace.map(|workspace| workspace.name().as_str()),
            "node change registered"
        );

        if !target_workspace.is_some_and(Workspace::is_public) {
            return Ok(RecordOutcome::NotPublic);
        }

        let Some(document) = closest_of_type(self.reader, node, DOCUMENT_NODE_TYPE)? else {
            warn!(context_path = %node.context_path(), "changed node has no enclosing document");
            return Ok(RecordOutcome::NoDocument);
        };

        let key = document.context_path();
        if let Some(&position) = self.recorded.get(&key) {
            // A document recorded while live may be removed later in the same pass.
            if document.is_removed() && self.pending[position].route_path.is_none() {
                let route_path = self.live_route_of_removed(&key);
                self.pending[position].route_path = route_path;
            }
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        // The live variant disappears once the removal is applied.
        let route_path =
            if document.is_removed() { self.live_route_of_removed(&key) } else { None };

        self.recorded.insert(key.clone(), self.pending.len());
        self.pending.push(PendingChange { document: key, route_path });
        Ok(RecordOutcome::Recorded)
    }

    fn live_route_of_removed(&self, key: &ContextPath) -> Option<String> {
        let live = key.with_workspace(WorkspaceName::live());
        let route_path = self.router.resolve_public_path(&live);
        if route_path.is_none() {
            debug!(context_path = %live, "removed document has no live route");
        }
        route_path
    }

    /// Resolves live routes for the batch and posts them in one request.
    ///
    /// Documents without a live route are left out. A failed delivery is logged and returned
    /// as [`FlushOutcome::Failed`].
    pub async fn flush(mut self) -> FlushOutcome {
        let pending = mem::take(&mut self.pending);
        self.recorded.clear();

        if pending.is_empty() {
            return FlushOutcome::Empty;
        }

        let mut route_paths = Vec::with_capacity(pending.len());
        for change in pending {
            let route_path = change.route_path.or_else(|| {
                let live = change.document.with_workspace(WorkspaceName::live());
                self.router.resolve_public_path(&live)
            });
            match route_path {
                Some(route_path) => route_paths.push(route_path),
                None => {
                    debug!(context_path = %change.document, "changed document has no live route");
                }
            }
        }

        let payload = RevalidatePayload::from_route_paths(route_paths.iter().cloned());
        debug!(
            endpoint = %self.target.endpoint,
            documents = payload.documents.len(),
            "sending revalidate batch"
        );

        match self.notifier.post_batch(&self.target.endpoint, &self.target.token, &payload).await {
            Ok(()) => {
                info!(documents = route_paths.len(), "revalidate batch delivered");
                FlushOutcome::Delivered { route_paths }
            }
            Err(err) => {
                error!(
                    endpoint = %self.target.endpoint,
                    error = %err,
                    detail = ?err,
                    "error notifying revalidate endpoint"
                );
                FlushOutcome::Failed { route_paths, error: err.to_string() }
            }
        }
    }
}

impl Drop for ChangeBatcher<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            warn!(documents = self.pending.len(), "revalidate batch dropped without flush");
        }
    }
}
