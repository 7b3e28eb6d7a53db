// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! On-disk JSON shape of a content snapshot.
//!
//! Node properties are plain JSON with a few single-key markers:
//! `{"$ref": id}`, `{"$refs": [id, ...]}`, `{"$asset": id}` and `{"$date": iso8601}`.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{
    AssetId, DimensionPresets, NodeId, NodePath, NodeTypeName, Site, Workspace, WorkspaceName,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSnapshot {
    #[serde(default)]
    pub base_uri: String,
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub dimensions: DimensionPresets,
    #[serde(default)]
    pub node_types: BTreeMap<String, NodeTypeRecord>,
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeRecord {
    #[serde(default)]
    pub super_types: Vec<NodeTypeName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub identifier: AssetId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub copyright_notice: String,
    pub file_name: String,
    #[serde(default)]
    pub byte_size: u64,
    #[serde(default)]
    pub media_type: String,
    pub last_modified: DateTime<FixedOffset>,
    #[serde(default)]
    pub image: Option<ImageSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// One stored variant: a node in one workspace with concrete dimension values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub identifier: NodeId,
    pub path: NodePath,
    pub node_type: NodeTypeName,
    #[serde(default = "WorkspaceName::live")]
    pub workspace: WorkspaceName,
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub removed: bool,
    /// Position among siblings; ties fall back to path order.
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub creation_date_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub last_publication_date_time: Option<DateTime<FixedOffset>>,
}
