// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Publishing a workspace's pending variants into its base workspace.

use chrono::Utc;
use tracing::{debug, info};

use super::{materialize, ContentStore, StoredNode};
use crate::model::{ContextPath, WorkspaceName};
use crate::revalidate::ChangeBatcher;
use crate::tree::TreeReadError;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("unknown workspace {0:?}")]
    UnknownWorkspace(String),
    #[error("workspace {0:?} has no base workspace to publish into")]
    NoBaseWorkspace(String),
    #[error(transparent)]
    TreeRead(#[from] TreeReadError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Published variants as addressed in the source workspace, in path order.
    pub published: Vec<ContextPath>,
}

impl ContentStore {
    /// Variants stored directly in `workspace`, removal markers included.
    pub fn pending_changes(&self, workspace: &WorkspaceName) -> Vec<ContextPath> {
        self.read_variants()
            .values()
            .flatten()
            .filter(|variant| &variant.workspace == workspace)
            .map(|variant| {
                ContextPath::new(
                    variant.path.clone(),
                    workspace.clone(),
                    self.presets.context_for_values(&variant.dimension_values),
                )
            })
            .collect()
    }

    /// Publishes every pending variant of `source` into its base workspace.
    ///
    /// Each change is recorded on `batcher` before it is applied, so a removed document's
    /// route can still be computed from the target. Flushing the batcher is up to the caller.
    pub fn publish_workspace(
        &self,
        source: &WorkspaceName,
        batcher: &mut ChangeBatcher<'_>,
    ) -> Result<PublishReport, PublishError> {
        let workspace = self
            .workspace(source)
            .ok_or_else(|| PublishError::UnknownWorkspace(source.to_string()))?;
        let target_name = workspace
            .base_workspace()
            .ok_or_else(|| PublishError::NoBaseWorkspace(source.to_string()))?;
        let target = self
            .workspace(target_name)
            .ok_or_else(|| PublishError::UnknownWorkspace(target_name.to_string()))?;

        let pending = self
            .read_variants()
            .values()
            .flatten()
            .filter(|variant| &variant.workspace == source)
            .cloned()
            .collect::<Vec<_>>();

        let mut report = PublishReport::default();
        for variant in pending {
            let dimensions = self.presets.context_for_values(&variant.dimension_values);
            let node = materialize(&variant, source, &dimensions);

            let outcome = batcher.record_change(&node, Some(target))?;
            debug!(context_path = %node.context_path(), ?outcome, "publishing variant");

            self.apply_published(variant, target_name, target.base_workspace().is_some());
            report.published.push(node.context_path());
        }

        info!(
            source = %source,
            target = %target_name,
            count = report.published.len(),
            "workspace published"
        );
        Ok(report)
    }

    /// Replaces the matching target variant with `variant` and drops it from its source.
    ///
    /// Removal markers delete the target variant; a target with its own base keeps the
    /// marker so the removal still shadows that base.
    fn apply_published(&self, variant: StoredNode, target: &WorkspaceName, target_has_base: bool) {
        let mut variants = self.write_variants();
        let path = variant.path.clone();
        let Some(candidates) = variants.get_mut(&path) else {
            return;
        };

        candidates.retain(|candidate| {
            candidate.dimension_values != variant.dimension_values
                || (&candidate.workspace != target && candidate.workspace != variant.workspace)
        });

        if !variant.removed || target_has_base {
            let mut published = variant;
            published.workspace = target.clone();
            published.last_publication_date_time = Some(Utc::now().fixed_offset());
            candidates.push(published);
        }

        if candidates.is_empty() {
            variants.remove(&path);
        }
    }
}
