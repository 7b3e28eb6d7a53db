// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Response documents of the content API.
//!
//! `ContentApi` ties enumeration, property serialization and routing together into the
//! listing, document, node and site responses. Transport is up to the caller.

pub mod error;
pub mod types;


pub use error::{ApiError, MISSING_ADDRESS_CODE, NODE_NOT_FOUND_CODE, ROUTE_NOT_FOUND_CODE};
pub use types::{
    DocumentListing, DocumentResponse, DocumentSummary, ErrorBody, ErrorEntry, NodeEnvelope,
    NodeResponse, SiteResponse,
};

use tracing::debug;

use crate::config::Settings;
use crate::model::{
    ContextPath, Dimensions, Node, NodePath, SiteName, WorkspaceName, DOCUMENT_NODE_TYPE,
};
use crate::serialize::asset::iso8601;
use crate::serialize::{LinkResolver, PropertySerializer, ThumbnailService};
use crate::tree::{ContentTreeReader, DimensionPresetSource, Router, TreeEnumerator};

/// How a document request addresses its node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentAddress {
    /// Public route path, e.g. `/en/about`.
    Route(String),
    /// Context path text, e.g. `/sites/demo/about@user-admin;language=en`.
    ContextPath(String),
}

impl DocumentAddress {
    /// A route path takes precedence over a context path.
    pub fn from_parts(
        path: Option<String>,
        context_path: Option<String>,
    ) -> Result<Self, ApiError> {
        match (path, context_path) {
            (Some(path), _) => Ok(Self::Route(path)),
            (None, Some(context_path)) => Ok(Self::ContextPath(context_path)),
            (None, None) => Err(ApiError::MissingAddress),
        }
    }
}

pub struct ContentApi<'a> {
    presets: &'a dyn DimensionPresetSource,
    reader: &'a dyn ContentTreeReader,
    router: &'a dyn Router,
    links: &'a dyn LinkResolver,
    thumbnails: &'a dyn ThumbnailService,
    settings: &'a Settings,
}

impl<'a> ContentApi<'a> {
    pub fn new<R>(repository: &'a R, settings: &'a Settings) -> Self
    where
        R: DimensionPresetSource + ContentTreeReader + Router + LinkResolver + ThumbnailService,
    {
        Self {
            presets: repository,
            reader: repository,
            router: repository,
            links: repository,
            thumbnails: repository,
            settings,
        }
    }

    /// Every document of `site` in every dimension combination of `workspace`.
    pub fn list_documents(
        &self,
        site: &SiteName,
        workspace: &WorkspaceName,
    ) -> Result<DocumentListing, ApiError> {
        let enumerator = TreeEnumerator::new(self.presets, self.reader);
        let mut documents = Vec::new();

        for root in enumerator.site_roots(site, workspace) {
            for document in enumerator.documents_under(root?) {
                let document = document?;
                if self.is_ignored(&document) {
                    debug!(context_path = %document.context_path(), "ignored document type");
                    continue;
                }
                documents.push(self.summary(&document, site));
            }
        }

        Ok(DocumentListing { documents, dimensions: self.presets.all_presets() })
    }

    pub fn document(
        &self,
        site: &SiteName,
        address: DocumentAddress,
    ) -> Result<DocumentResponse, ApiError> {
        let context_path = match address {
            DocumentAddress::Route(path) => {
                let path = path.trim_start_matches('/');
                self.router
                    .match_route(site, path)
                    .ok_or_else(|| ApiError::RouteNotFound { path: path.to_owned() })?
            }
            DocumentAddress::ContextPath(raw) => ContextPath::parse(&raw)?,
        };

        let node = self.node_at(&context_path)?;
        let site_node = self.site_node_for(&node)?;
        Ok(DocumentResponse { node: self.envelope(&node)?, site: self.envelope(&site_node)? })
    }

    pub fn node(&self, context_path: &str) -> Result<NodeResponse, ApiError> {
        let context_path = ContextPath::parse(context_path)?;
        let node = self.node_at(&context_path)?;
        Ok(NodeResponse { node: self.envelope(&node)? })
    }

    pub fn site(
        &self,
        site: &SiteName,
        workspace: &WorkspaceName,
        dimensions: &Dimensions,
    ) -> Result<SiteResponse, ApiError> {
        let root = self
            .reader
            .root_node(site, workspace, dimensions)?
            .ok_or_else(|| ApiError::NodeNotFound { path: NodePath::site_root(site).to_string() })?;
        Ok(SiteResponse { site: self.envelope(&root)? })
    }

    fn node_at(&self, context_path: &ContextPath) -> Result<Node, ApiError> {
        self.reader
            .node_at(context_path)?
            .ok_or_else(|| ApiError::NodeNotFound { path: context_path.node_path().to_string() })
    }

    fn site_node_for(&self, node: &Node) -> Result<Node, ApiError> {
        let site = node
            .path()
            .site_name()
            .ok_or_else(|| ApiError::NodeNotFound { path: node.path().to_string() })?;
        self.reader.root_node(&site, node.workspace(), node.dimensions())?.ok_or_else(|| {
            ApiError::NodeNotFound { path: NodePath::site_root(&site).to_string() }
        })
    }

    fn envelope(&self, node: &Node) -> Result<NodeEnvelope, ApiError> {
        let serializer = PropertySerializer::new(self.reader, self.links, self.thumbnails)
            .with_thumbnail_box(self.settings.thumbnails.bounds());
        let properties =
            serializer.serialize(node, self.settings.recursive_reference_property_depth)?;

        let route_path = if self.reader.is_of_type(node, DOCUMENT_NODE_TYPE) {
            self.router.resolve_public_path(&node.context_path())
        } else {
            None
        };

        Ok(NodeEnvelope {
            identifier: node.identifier().to_string(),
            context_path: node.context_path().to_string(),
            node_type: node.node_type().to_string(),
            route_path,
            properties,
        })
    }

    fn summary(&self, document: &Node, site: &SiteName) -> DocumentSummary {
        let context_path = document.context_path();
        DocumentSummary {
            identifier: document.identifier().to_string(),
            context_path: context_path.to_string(),
            dimensions: document.dimensions().clone(),
            site: site.to_string(),
            route_path: self.router.resolve_public_path(&context_path),
            creation_date_time: document.creation_date_time().map(iso8601),
            last_publication_date_time: document.last_publication_date_time().map(iso8601),
        }
    }

    fn is_ignored(&self, document: &Node) -> bool {
        self.settings
            .document_list
            .ignored_node_types
            .iter()
            .any(|type_name| self.reader.is_of_type(document, type_name))
    }
}
