// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{DimensionPresets, Dimensions};

/// One entry of a document listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub identifier: String,
    pub context_path: String,
    pub dimensions: Dimensions,
    pub site: String,
    /// `None` when the document has no public route in its context.
    pub route_path: Option<String>,
    pub creation_date_time: Option<String>,
    pub last_publication_date_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentListing {
    pub documents: Vec<DocumentSummary>,
    /// Configured presets, so clients can map routes back to dimensions.
    pub dimensions: DimensionPresets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeEnvelope {
    pub identifier: String,
    pub context_path: String,
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_path: Option<String>,
    pub properties: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentResponse {
    pub node: NodeEnvelope,
    pub site: NodeEnvelope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeResponse {
    pub node: NodeEnvelope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SiteResponse {
    pub site: NodeEnvelope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorEntry {
    pub message: String,
    pub code: u64,
}

/// Error response body: `{"errors": [{"message": ..., "code": ...}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    pub errors: Vec<ErrorEntry>,
}
