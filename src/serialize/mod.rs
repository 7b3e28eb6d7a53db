// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Node properties to JSON.
//!
//! References are followed up to a fixed depth, link tokens are rewritten to URIs and assets
//! become metadata objects. The output never contains cycles: every reference hop increases
//! the depth and the depth is capped.

pub mod asset;
pub mod tokens;


use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::model::{Asset, Node, NodeId, PropertyValue, DOCUMENT_NODE_TYPE};
use crate::tree::{ContentTreeReader, TreeReadError};
use tokens::{LinkScheme, LinkToken};

/// Key under which referenced documents carry their absolute link.
pub const LINK_TO_REFERENCE_KEY: &str = "_linkToReference";

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("malformed link token {0:?}")]
    MalformedToken(String),
    #[error("node {identifier:?} not found")]
    NodeNotFound { identifier: String },
    #[error("asset {identifier:?} not found")]
    AssetNotFound { identifier: String },
    #[error("node {context_path} has no public route")]
    Unroutable { context_path: String },
    #[error(transparent)]
    TreeRead(#[from] TreeReadError),
}

#[derive(Debug, thiserror::Error)]
pub enum AssetRenderError {
    #[error("asset {identifier:?} is not an image")]
    NotAnImage { identifier: String },
    #[error("image asset {identifier:?} has no pixel dimensions")]
    EmptyImage { identifier: String },
}

/// Turns link tokens and nodes into absolute URIs.
pub trait LinkResolver {
    /// Resolves `node://<id>` relative to the context of `context`.
    fn resolve_node_link(&self, token: &str, context: &Node) -> Result<String, LinkError>;

    fn resolve_asset_link(&self, token: &str) -> Result<String, LinkError>;

    /// Absolute URI of a document node.
    fn node_uri(&self, node: &Node) -> Result<String, LinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub url: String,
}

pub trait ThumbnailService {
    fn thumbnail_for(
        &self,
        asset: &Asset,
        max_width: u32,
        max_height: u32,
    ) -> Result<Thumbnail, AssetRenderError>;

    /// Public URI of the original resource.
    fn asset_uri(&self, asset: &Asset) -> Result<String, AssetRenderError>;
}

/// Bounding box image thumbnails are fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailBox {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ThumbnailBox {
    fn default() -> Self {
        Self { max_width: 1920, max_height: 1920 }
    }
}

/// State shared by one `serialize` call.
struct Walk<'n> {
    /// Top-level node; embedded `node://` tokens resolve relative to it at every depth.
    link_context: &'n Node,
    max_depth: u32,
}

pub struct PropertySerializer<'a> {
    reader: &'a dyn ContentTreeReader,
    links: &'a dyn LinkResolver,
    thumbnails: &'a dyn ThumbnailService,
    thumbnail_box: ThumbnailBox,
}

impl<'a> PropertySerializer<'a> {
    pub fn new(
        reader: &'a dyn ContentTreeReader,
        links: &'a dyn LinkResolver,
        thumbnails: &'a dyn ThumbnailService,
    ) -> Self {
        Self { reader, links, thumbnails, thumbnail_box: ThumbnailBox::default() }
    }

    pub fn with_thumbnail_box(mut self, thumbnail_box: ThumbnailBox) -> Self {
        self.thumbnail_box = thumbnail_box;
        self
    }

    /// Properties of `node` as a JSON object keyed by property name.
    ///
    /// Referenced nodes are expanded while fewer than `max_reference_depth` hops have been
    /// taken; deeper references become `null`. Reader failures propagate; link and asset
    /// failures degrade in place.
    pub fn serialize(&self, node: &Node, max_reference_depth: u32) -> Result<Value, TreeReadError> {
        let walk = Walk { link_context: node, max_depth: max_reference_depth };
        Ok(Value::Object(self.map_properties(node, 0, &walk)?))
    }

    fn map_properties(
        &self,
        node: &Node,
        depth: u32,
        walk: &Walk<'_>,
    ) -> Result<Map<String, Value>, TreeReadError> {
        node.properties()
            .iter()
            .map(|(name, value)| Ok((name.clone(), self.convert(value, node, depth, walk)?)))
            .collect()
    }

    fn convert(
        &self,
        value: &PropertyValue,
        owner: &Node,
        depth: u32,
        walk: &Walk<'_>,
    ) -> Result<Value, TreeReadError> {
        let converted = match value {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(value) => Value::Bool(*value),
            PropertyValue::Number(value) => Value::Number(value.clone()),
            PropertyValue::Date(value) => Value::String(asset::iso8601(value)),
            PropertyValue::Asset(value) => {
                asset::asset_data(value, self.thumbnails, self.thumbnail_box)
            }
            PropertyValue::Reference(identifier) => {
                return self.convert_reference(identifier, owner, depth, walk);
            }
            PropertyValue::String(text) => self.convert_string(text, walk.link_context),
            PropertyValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.convert(item, owner, depth, walk))
                    .collect::<Result<_, _>>()?,
            ),
            PropertyValue::Structured(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), self.convert(item, owner, depth, walk)?)))
                    .collect::<Result<_, TreeReadError>>()?,
            ),
        };
        Ok(converted)
    }

    fn convert_reference(
        &self,
        identifier: &NodeId,
        owner: &Node,
        depth: u32,
        walk: &Walk<'_>,
    ) -> Result<Value, TreeReadError> {
        if depth >= walk.max_depth {
            return Ok(Value::Null);
        }

        let Some(target) = self.reader.referenced_node(identifier, owner)? else {
            debug!(%identifier, owner = %owner.context_path(), "referenced node not found");
            return Ok(Value::Null);
        };

        let mut mapped = self.map_properties(&target, depth + 1, walk)?;

        if self.reader.is_of_type(&target, DOCUMENT_NODE_TYPE) {
            match self.links.node_uri(&target) {
                Ok(uri) => {
                    mapped.insert(LINK_TO_REFERENCE_KEY.to_owned(), Value::String(uri));
                }
                Err(err) => {
                    error!(
                        context_path = %target.context_path(),
                        error = %err,
                        "link to referenced node could not be created"
                    );
                    return Ok(Value::String(String::new()));
                }
            }
        }

        Ok(Value::Object(mapped))
    }

    fn convert_string(&self, text: &str, link_context: &Node) -> Value {
        if let Some(token) = tokens::exact_token(text) {
            return match self.resolve_token(token, link_context) {
                Some(uri) => Value::String(uri),
                None => Value::Null,
            };
        }

        let replaced =
            tokens::replace_embedded(text, |token| self.resolve_token(token, link_context));
        Value::String(replaced.into_owned())
    }

    fn resolve_token(&self, token: LinkToken<'_>, link_context: &Node) -> Option<String> {
        let resolved = match token.scheme {
            LinkScheme::Node => self.links.resolve_node_link(token.token, link_context),
            LinkScheme::Asset => self.links.resolve_asset_link(token.token),
        };
        match resolved {
            Ok(uri) => Some(uri),
            Err(err) => {
                warn!(token = token.token, error = %err, "link token could not be resolved");
                None
            }
        }
    }
}
