// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use super::ids::{AssetId, NodeId};

/// A node property value.
///
/// References are held by identifier and resolved lazily against the reader, so cyclic
/// node graphs are representable.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Date(DateTime<FixedOffset>),
    Asset(Box<Asset>),
    Reference(NodeId),
    Array(Vec<PropertyValue>),
    Structured(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Structural mapping of plain JSON (no references, assets or dates).
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(value) => Self::Number(value),
            serde_json::Value::String(value) => Self::String(value),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::Structured(
                map.into_iter().map(|(key, value)| (key, Self::from_json(value))).collect(),
            ),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Asset> for PropertyValue {
    fn from(value: Asset) -> Self {
        Self::Asset(Box::new(value))
    }
}

/// Binary/media asset metadata as attached to a node property.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub identifier: AssetId,
    pub title: String,
    pub caption: String,
    pub copyright_notice: String,
    pub resource: AssetResource,
    pub last_modified: DateTime<FixedOffset>,
    pub kind: AssetKind,
}

impl Asset {
    /// Lower-cased extension of the resource file name; empty when there is none.
    pub fn file_extension(&self) -> String {
        self.resource
            .file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, AssetKind::Image { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResource {
    pub file_name: String,
    pub byte_size: u64,
    pub media_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image { width: u32, height: u32 },
    File,
}
