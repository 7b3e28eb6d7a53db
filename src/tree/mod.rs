// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read access to the content tree.
//!
//! The repository that stores nodes is an external collaborator; this module names the small
//! read surface the rest of the crate consumes and builds dimension-aware enumeration on it.

pub mod enumerate;

pub use enumerate::{DocumentsUnder, SiteRoots, TreeEnumerator};

use crate::model::{
    ContextPath, DimensionPresets, Dimensions, Node, NodeId, NodePath, SiteName, WorkspaceName,
};

#[derive(Debug, thiserror::Error)]
pub enum TreeReadError {
    #[error("unknown workspace {0:?}")]
    UnknownWorkspace(String),
    #[error("content repository unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Supplies the configured dimension presets.
pub trait DimensionPresetSource {
    fn all_presets(&self) -> DimensionPresets;
}

/// Node lookups within one (workspace, dimensions) context.
///
/// Every returned node carries the context it was read in, so follow-up calls taking a
/// `&Node` stay in that context.
pub trait ContentTreeReader {
    fn node_at(&self, context_path: &ContextPath) -> Result<Option<Node>, TreeReadError>;

    /// Direct children in repository order, optionally restricted to `type_filter` and its
    /// subtypes.
    fn children(&self, node: &Node, type_filter: Option<&str>) -> Result<Vec<Node>, TreeReadError>;

    fn parent(&self, node: &Node) -> Result<Option<Node>, TreeReadError>;

    /// Resolves a node reference held by a property of `context`.
    fn referenced_node(
        &self,
        identifier: &NodeId,
        context: &Node,
    ) -> Result<Option<Node>, TreeReadError>;

    fn is_of_type(&self, node: &Node, type_name: &str) -> bool;

    /// Root node of `site`; `None` when it does not exist in the context (e.g. untranslated).
    fn root_node(
        &self,
        site: &SiteName,
        workspace: &WorkspaceName,
        dimensions: &Dimensions,
    ) -> Result<Option<Node>, TreeReadError> {
        let context_path =
            ContextPath::new(NodePath::site_root(site), workspace.clone(), dimensions.clone());
        self.node_at(&context_path)
    }
}

/// Public route resolution.
pub trait Router {
    /// Route path (e.g. `/en/about`) of the node addressed by `identity`; `None` when it is not
    /// reachable through the current route configuration.
    fn resolve_public_path(&self, identity: &ContextPath) -> Option<String>;

    /// Inverse of [`Router::resolve_public_path`] for the live workspace of `site`.
    fn match_route(&self, site: &SiteName, route_path: &str) -> Option<ContextPath>;
}

/// Nearest ancestor-or-self of `node` that is of `type_name`.
pub fn closest_of_type(
    reader: &dyn ContentTreeReader,
    node: &Node,
    type_name: &str,
) -> Result<Option<Node>, TreeReadError> {
    if reader.is_of_type(node, type_name) {
        return Ok(Some(node.clone()));
    }

    let mut current = reader.parent(node)?;
    while let Some(candidate) = current {
        if reader.is_of_type(&candidate, type_name) {
            return Ok(Some(candidate));
        }
        current = reader.parent(&candidate)?;
    }

    Ok(None)
}
