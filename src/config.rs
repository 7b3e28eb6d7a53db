// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime settings: JSON file with defaults, then environment overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::revalidate::RevalidateTarget;
use crate::serialize::ThumbnailBox;

pub const ENV_REVALIDATE_URL: &str = "THETIS_REVALIDATE_URL";
pub const ENV_REVALIDATE_TOKEN: &str = "THETIS_REVALIDATE_TOKEN";
pub const ENV_REFERENCE_DEPTH: &str = "THETIS_REFERENCE_DEPTH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid settings at {path:?}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// How many reference hops the serializer expands before emitting `null`.
    pub recursive_reference_property_depth: u32,
    pub document_list: DocumentListSettings,
    pub revalidate: RevalidateSettings,
    pub thumbnails: ThumbnailSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recursive_reference_property_depth: 1,
            document_list: DocumentListSettings::default(),
            revalidate: RevalidateSettings::default(),
            thumbnails: ThumbnailSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentListSettings {
    /// Document types (and their subtypes) left out of document listings.
    pub ignored_node_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RevalidateSettings {
    pub url: String,
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for RevalidateSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000/api/revalidate".to_owned(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

impl RevalidateSettings {
    pub fn target(&self) -> RevalidateTarget {
        RevalidateTarget { endpoint: self.url.clone(), token: self.token.clone() }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ThumbnailSettings {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        let bounds = ThumbnailBox::default();
        Self { max_width: bounds.max_width, max_height: bounds.max_height }
    }
}

impl ThumbnailSettings {
    pub fn bounds(&self) -> ThumbnailBox {
        ThumbnailBox { max_width: self.max_width, max_height: self.max_height }
    }
}

impl Settings {
    /// Reads `path` when given (defaults otherwise) and applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }

    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_REVALIDATE_URL) {
            self.revalidate.url = url;
        }
        if let Some(token) = lookup(ENV_REVALIDATE_TOKEN) {
            self.revalidate.token = token;
        }
        if let Some(raw) = lookup(ENV_REFERENCE_DEPTH) {
            self.recursive_reference_property_depth = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: ENV_REFERENCE_DEPTH, value: raw })?;
        }
        Ok(())
    }
}
