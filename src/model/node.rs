// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use super::dimensions::Dimensions;
use super::ids::NodeId;
use super::node_type::NodeTypeName;
use super::path::{ContextPath, NodePath};
use super::value::PropertyValue;
use super::workspace::WorkspaceName;

/// One node variant as seen through a (workspace, dimensions) context.
///
/// Nodes are snapshots owned by the caller; the repository they came from stays the owner of
/// the actual content.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    identifier: NodeId,
    path: NodePath,
    node_type: NodeTypeName,
    workspace: WorkspaceName,
    dimensions: Dimensions,
    properties: BTreeMap<String, PropertyValue>,
    removed: bool,
    creation_date_time: Option<DateTime<FixedOffset>>,
    last_publication_date_time: Option<DateTime<FixedOffset>>,
}

impl Node {
    pub fn new(
        identifier: NodeId,
        path: NodePath,
        node_type: NodeTypeName,
        workspace: WorkspaceName,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            identifier,
            path,
            node_type,
            workspace,
            dimensions,
            properties: BTreeMap::new(),
            removed: false,
            creation_date_time: None,
            last_publication_date_time: None,
        }
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: BTreeMap<String, PropertyValue>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_removed(mut self, removed: bool) -> Self {
        self.removed = removed;
        self
    }

    pub fn with_creation_date_time(mut self, value: Option<DateTime<FixedOffset>>) -> Self {
        self.creation_date_time = value;
        self
    }

    pub fn with_last_publication_date_time(mut self, value: Option<DateTime<FixedOffset>>) -> Self {
        self.last_publication_date_time = value;
        self
    }

    pub fn identifier(&self) -> &NodeId {
        &self.identifier
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Last path segment; empty for the root node.
    pub fn name(&self) -> &str {
        self.path.name().unwrap_or_default()
    }

    pub fn node_type(&self) -> &NodeTypeName {
        &self.node_type
    }

    pub fn workspace(&self) -> &WorkspaceName {
        &self.workspace
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn creation_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        self.creation_date_time.as_ref()
    }

    pub fn last_publication_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        self.last_publication_date_time.as_ref()
    }

    pub fn context_path(&self) -> ContextPath {
        ContextPath::new(self.path.clone(), self.workspace.clone(), self.dimensions.clone())
    }
}
