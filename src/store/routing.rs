// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Route, link and thumbnail URIs for stored content.
//!
//! Routes are `/<preset uri segments>/<uriPathSegment>/...`: one segment per dimension with a
//! non-empty preset segment, then one segment per document below the site root.

use super::ContentStore;
use crate::model::{
    Asset, AssetId, AssetKind, ContextPath, Dimensions, Node, NodeId, NodePath, SiteName,
    WorkspaceName, DOCUMENT_NODE_TYPE,
};
use crate::serialize::tokens::{self, LinkScheme};
use crate::serialize::{AssetRenderError, LinkError, LinkResolver, Thumbnail, ThumbnailService};
use crate::tree::{ContentTreeReader, Router};

const URI_PATH_SEGMENT_PROPERTY: &str = "uriPathSegment";
const RESOURCES_PREFIX: &str = "/_Resources/Persistent";

/// Route segment of a document: its `uriPathSegment` property, else its node name.
fn uri_path_segment(node: &Node) -> &str {
    node.property(URI_PATH_SEGMENT_PROPERTY)
        .and_then(|value| value.as_str())
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| node.name())
}

impl ContentStore {
    /// Leading route segments selecting `dimensions`; `None` when a value set matches no preset.
    fn dimension_segments(&self, dimensions: &Dimensions) -> Option<Vec<String>> {
        let mut segments = Vec::new();
        for dimension in self.presets.dimensions() {
            let Some(values) = dimensions.get(&dimension.name) else {
                continue;
            };
            let preset = dimension.preset_for_values(values)?;
            if !preset.uri_segment.is_empty() {
                segments.push(preset.uri_segment.clone());
            }
        }
        Some(segments)
    }

    fn route_of(&self, identity: &ContextPath) -> Option<String> {
        let site = identity.node_path().site_name()?;
        let site_root = NodePath::site_root(&site);
        let below = identity.node_path().segments_below(&site_root)?;

        let mut segments = self.dimension_segments(identity.dimensions())?;

        let in_context = |path: NodePath| {
            ContextPath::new(path, identity.workspace().clone(), identity.dimensions().clone())
        };
        self.node_at(&in_context(site_root.clone())).ok().flatten()?;

        let mut path = site_root;
        for name in below {
            path = path.child(name).ok()?;
            let node = self.node_at(&in_context(path.clone())).ok().flatten()?;
            if !self.is_of_type(&node, DOCUMENT_NODE_TYPE) {
                return None;
            }
            segments.push(uri_path_segment(&node).to_owned());
        }

        Some(format!("/{}", segments.join("/")))
    }

    fn asset_url(&self, asset: &Asset) -> String {
        format!(
            "{}{RESOURCES_PREFIX}/{}/{}",
            self.base_uri, asset.identifier, asset.resource.file_name
        )
    }
}

impl Router for ContentStore {
    fn resolve_public_path(&self, identity: &ContextPath) -> Option<String> {
        self.route_of(identity)
    }

    fn match_route(&self, site: &SiteName, route_path: &str) -> Option<ContextPath> {
        let segments =
            route_path.split('/').filter(|segment| !segment.is_empty()).collect::<Vec<_>>();
        let mut rest = segments.as_slice();

        let mut dimensions = Dimensions::new();
        for dimension in self.presets.dimensions() {
            if dimension.presets.is_empty() {
                continue;
            }
            let matched = rest.first().and_then(|segment| dimension.preset_by_uri_segment(segment));
            let preset = match matched {
                Some(preset) => {
                    rest = &rest[1..];
                    preset
                }
                None => dimension.default_preset()?,
            };
            dimensions.insert(dimension.name.clone(), preset.values.clone());
        }

        let mut current = self
            .root_node(site, &WorkspaceName::live(), &dimensions)
            .ok()
            .flatten()?;
        for segment in rest {
            current = self
                .children(&current, Some(DOCUMENT_NODE_TYPE))
                .ok()?
                .into_iter()
                .find(|child| uri_path_segment(child) == *segment)?;
        }

        Some(current.context_path())
    }
}

impl LinkResolver for ContentStore {
    fn resolve_node_link(&self, token: &str, context: &Node) -> Result<String, LinkError> {
        let identifier = match tokens::exact_token(token) {
            Some(parsed) if parsed.scheme == LinkScheme::Node => parsed.identifier,
            _ => return Err(LinkError::MalformedToken(token.to_owned())),
        };
        let identifier = NodeId::new(identifier)
            .map_err(|_| LinkError::MalformedToken(token.to_owned()))?;

        let node = self
            .referenced_node(&identifier, context)?
            .ok_or_else(|| LinkError::NodeNotFound { identifier: identifier.to_string() })?;
        self.node_uri(&node)
    }

    fn resolve_asset_link(&self, token: &str) -> Result<String, LinkError> {
        let identifier = match tokens::exact_token(token) {
            Some(parsed) if parsed.scheme == LinkScheme::Asset => parsed.identifier,
            _ => return Err(LinkError::MalformedToken(token.to_owned())),
        };
        let asset = AssetId::new(identifier)
            .ok()
            .and_then(|identifier| self.asset(&identifier))
            .ok_or_else(|| LinkError::AssetNotFound { identifier: identifier.to_owned() })?;
        Ok(self.asset_url(asset))
    }

    fn node_uri(&self, node: &Node) -> Result<String, LinkError> {
        let context_path = node.context_path();
        let route = self
            .route_of(&context_path)
            .ok_or_else(|| LinkError::Unroutable { context_path: context_path.to_string() })?;
        Ok(format!("{}{route}", self.base_uri))
    }
}

impl ThumbnailService for ContentStore {
    /// Scales the image to fit the box, never upscaling.
    fn thumbnail_for(
        &self,
        asset: &Asset,
        max_width: u32,
        max_height: u32,
    ) -> Result<Thumbnail, AssetRenderError> {
        let AssetKind::Image { width, height } = asset.kind else {
            return Err(AssetRenderError::NotAnImage { identifier: asset.identifier.to_string() });
        };
        if width == 0 || height == 0 {
            return Err(AssetRenderError::EmptyImage { identifier: asset.identifier.to_string() });
        }

        let scale = (f64::from(max_width) / f64::from(width))
            .min(f64::from(max_height) / f64::from(height))
            .min(1.0);
        let fitted = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);
        let (width, height) = (fitted(width), fitted(height));

        let extension = asset.file_extension();
        let url = format!(
            "{}{RESOURCES_PREFIX}/Thumbnails/{}-{width}x{height}.{extension}",
            self.base_uri, asset.identifier
        );
        Ok(Thumbnail { width, height, url })
    }

    fn asset_uri(&self, asset: &Asset) -> Result<String, AssetRenderError> {
        Ok(self.asset_url(asset))
    }
}
