// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory content repository loaded from a JSON snapshot.
//!
//! The store keeps every stored variant (node x workspace x concrete dimension values) and
//! projects them into contexts: a workspace reads through its base workspace chain and a
//! dimension context picks the best variant along each dimension's fallback list. It
//! implements every read trait the API layer consumes, plus publishing between workspaces.

mod decode;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod publish;
mod routing;
pub mod snapshot;

pub use publish::{PublishError, PublishReport};
pub use snapshot::ContentSnapshot;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::model::{
    Asset, AssetId, AssetKind, AssetResource, ContextPath, DimensionPresets, Dimensions, Node,
    NodeId, NodePath, NodeTypeHierarchy, NodeTypeName, PropertyValue, Site, SiteName, Workspace,
    WorkspaceName,
};
use crate::tree::{ContentTreeReader, DimensionPresetSource, TreeReadError};
use snapshot::AssetRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid content snapshot at {path:?}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("invalid content snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("node {node} references unknown asset {asset:?}")]
    UnknownAsset { node: String, asset: String },
    #[error("node {node} has a malformed {marker:?} property value")]
    InvalidMarker { node: String, marker: String },
    #[error("node {node} is stored in unknown workspace {workspace:?}")]
    UnknownWorkspace { node: String, workspace: String },
}

/// One stored variant of a node.
#[derive(Debug, Clone)]
struct StoredNode {
    identifier: NodeId,
    path: NodePath,
    node_type: NodeTypeName,
    workspace: WorkspaceName,
    dimension_values: BTreeMap<String, String>,
    properties: BTreeMap<String, PropertyValue>,
    removed: bool,
    index: i64,
    creation_date_time: Option<DateTime<FixedOffset>>,
    last_publication_date_time: Option<DateTime<FixedOffset>>,
}

type Variants = BTreeMap<NodePath, Vec<StoredNode>>;

#[derive(Debug)]
pub struct ContentStore {
    base_uri: String,
    sites: Vec<Site>,
    presets: DimensionPresets,
    node_types: NodeTypeHierarchy,
    workspaces: BTreeMap<WorkspaceName, Workspace>,
    assets: BTreeMap<AssetId, Asset>,
    variants: RwLock<Variants>,
}

impl ContentStore {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        let snapshot: ContentSnapshot = serde_json::from_str(&text)
            .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, StoreError> {
        Self::from_snapshot(serde_json::from_value(value)?)
    }

    pub fn from_snapshot(snapshot: ContentSnapshot) -> Result<Self, StoreError> {
        let assets = snapshot
            .assets
            .into_iter()
            .map(|record| (record.identifier.clone(), asset_from_record(record)))
            .collect::<BTreeMap<_, _>>();

        let node_types = snapshot
            .node_types
            .into_iter()
            .map(|(name, record)| (NodeTypeName::new(name), record.super_types))
            .collect::<NodeTypeHierarchy>();

        let mut workspaces = snapshot
            .workspaces
            .into_iter()
            .map(|workspace| (workspace.name().clone(), workspace))
            .collect::<BTreeMap<_, _>>();
        workspaces.entry(WorkspaceName::live()).or_insert_with(Workspace::live);

        let mut variants = Variants::new();
        let mut node_count = 0usize;
        for record in snapshot.nodes {
            if !workspaces.contains_key(&record.workspace) {
                return Err(StoreError::UnknownWorkspace {
                    node: record.identifier.to_string(),
                    workspace: record.workspace.to_string(),
                });
            }

            let properties = record
                .properties
                .into_iter()
                .map(|(name, value)| {
                    Ok((name, decode::property_value(value, &assets, &record.identifier)?))
                })
                .collect::<Result<BTreeMap<_, _>, StoreError>>()?;

            node_count += 1;
            variants.entry(record.path.clone()).or_default().push(StoredNode {
                identifier: record.identifier,
                path: record.path,
                node_type: record.node_type,
                workspace: record.workspace,
                dimension_values: record.dimensions,
                properties,
                removed: record.removed,
                index: record.index,
                creation_date_time: record.creation_date_time,
                last_publication_date_time: record.last_publication_date_time,
            });
        }

        debug!(
            sites = snapshot.sites.len(),
            workspaces = workspaces.len(),
            assets = assets.len(),
            variants = node_count,
            "content snapshot loaded"
        );

        Ok(Self {
            base_uri: snapshot.base_uri.trim_end_matches('/').to_owned(),
            sites: snapshot.sites,
            presets: snapshot.dimensions,
            node_types,
            workspaces,
            assets,
            variants: RwLock::new(variants),
        })
    }

    /// Absolute URI prefix without trailing slash; empty for root-relative links.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, node_name: &SiteName) -> Option<&Site> {
        self.sites.iter().find(|site| &site.node_name == node_name)
    }

    /// First configured site.
    pub fn default_site(&self) -> Option<&Site> {
        self.sites.first()
    }

    pub fn workspace(&self, name: &WorkspaceName) -> Option<&Workspace> {
        self.workspaces.get(name)
    }

    pub fn workspaces(&self) -> impl Iterator<Item = &Workspace> {
        self.workspaces.values()
    }

    pub fn asset(&self, identifier: &AssetId) -> Option<&Asset> {
        self.assets.get(identifier)
    }

    fn read_variants(&self) -> RwLockReadGuard<'_, Variants> {
        self.variants.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_variants(&self) -> RwLockWriteGuard<'_, Variants> {
        self.variants.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// `workspace` followed by its base workspaces, nearest first.
    fn workspace_chain(
        &self,
        workspace: &WorkspaceName,
    ) -> Result<Vec<WorkspaceName>, TreeReadError> {
        let mut chain: Vec<WorkspaceName> = Vec::new();
        let mut current = Some(workspace.clone());

        while let Some(name) = current {
            if chain.contains(&name) {
                break;
            }
            let entry = self
                .workspaces
                .get(&name)
                .ok_or_else(|| TreeReadError::UnknownWorkspace(name.to_string()))?;
            current = entry.base_workspace().cloned();
            chain.push(name);
        }

        Ok(chain)
    }
}

/// Variant shown in a context, or `None` when it is missing or marked removed.
///
/// Candidates are ranked by dimension fallback position first, then by workspace distance, so
/// a base workspace's better-matching variant wins over a draft in a fallback dimension.
fn visible_variant<'v>(
    candidates: &'v [StoredNode],
    chain: &[WorkspaceName],
    dimensions: &Dimensions,
) -> Option<&'v StoredNode> {
    let mut best: Option<(Vec<usize>, usize, &StoredNode)> = None;

    for variant in candidates {
        let Some(distance) = chain.iter().position(|workspace| workspace == &variant.workspace)
        else {
            continue;
        };
        let Some(rank) = dimension_rank(&variant.dimension_values, dimensions) else {
            continue;
        };
        let better = match &best {
            Some((best_rank, best_distance, _)) => (&rank, distance) < (best_rank, *best_distance),
            None => true,
        };
        if better {
            best = Some((rank, distance, variant));
        }
    }

    best.and_then(|(_, _, variant)| (!variant.removed).then_some(variant))
}

/// Position of each stored value in the context's fallback list; lower is better.
///
/// A variant without a value for a context dimension matches after every listed value.
fn dimension_rank(values: &BTreeMap<String, String>, context: &Dimensions) -> Option<Vec<usize>> {
    context
        .iter()
        .map(|(name, fallbacks)| match values.get(name) {
            Some(value) => fallbacks.iter().position(|candidate| candidate == value),
            None => Some(fallbacks.len()),
        })
        .collect()
}

fn materialize(stored: &StoredNode, workspace: &WorkspaceName, dimensions: &Dimensions) -> Node {
    Node::new(
        stored.identifier.clone(),
        stored.path.clone(),
        stored.node_type.clone(),
        workspace.clone(),
        dimensions.clone(),
    )
    .with_properties(stored.properties.clone())
    .with_removed(stored.removed)
    .with_creation_date_time(stored.creation_date_time)
    .with_last_publication_date_time(stored.last_publication_date_time)
}

fn asset_from_record(record: AssetRecord) -> Asset {
    let kind = match record.image {
        Some(size) => AssetKind::Image { width: size.width, height: size.height },
        None => AssetKind::File,
    };
    Asset {
        identifier: record.identifier,
        title: record.title,
        caption: record.caption,
        copyright_notice: record.copyright_notice,
        resource: AssetResource {
            file_name: record.file_name,
            byte_size: record.byte_size,
            media_type: record.media_type,
        },
        last_modified: record.last_modified,
        kind,
    }
}

impl DimensionPresetSource for ContentStore {
    fn all_presets(&self) -> DimensionPresets {
        self.presets.clone()
    }
}

impl ContentTreeReader for ContentStore {
    fn node_at(&self, context_path: &ContextPath) -> Result<Option<Node>, TreeReadError> {
        let chain = self.workspace_chain(context_path.workspace())?;
        let variants = self.read_variants();

        Ok(variants
            .get(context_path.node_path())
            .and_then(|candidates| visible_variant(candidates, &chain, context_path.dimensions()))
            .map(|stored| {
                materialize(stored, context_path.workspace(), context_path.dimensions())
            }))
    }

    fn children(&self, node: &Node, type_filter: Option<&str>) -> Result<Vec<Node>, TreeReadError> {
        let chain = self.workspace_chain(node.workspace())?;
        let variants = self.read_variants();

        let mut children = variants
            .iter()
            .filter(|(path, _)| path.parent().as_ref() == Some(node.path()))
            .filter_map(|(_, candidates)| visible_variant(candidates, &chain, node.dimensions()))
            .filter(|stored| {
                type_filter.map_or(true, |type_name| {
                    self.node_types.is_of_type(&stored.node_type, type_name)
                })
            })
            .collect::<Vec<_>>();
        children.sort_by(|left, right| {
            left.index.cmp(&right.index).then_with(|| left.path.cmp(&right.path))
        });

        Ok(children
            .into_iter()
            .map(|stored| materialize(stored, node.workspace(), node.dimensions()))
            .collect())
    }

    fn parent(&self, node: &Node) -> Result<Option<Node>, TreeReadError> {
        let Some(parent) = node.path().parent() else {
            return Ok(None);
        };
        self.node_at(&ContextPath::new(
            parent,
            node.workspace().clone(),
            node.dimensions().clone(),
        ))
    }

    fn referenced_node(
        &self,
        identifier: &NodeId,
        context: &Node,
    ) -> Result<Option<Node>, TreeReadError> {
        let paths = self
            .read_variants()
            .iter()
            .filter(|(_, candidates)| {
                candidates.iter().any(|variant| &variant.identifier == identifier)
            })
            .map(|(path, _)| path.clone())
            .collect::<Vec<_>>();

        for path in paths {
            let context_path =
                ContextPath::new(path, context.workspace().clone(), context.dimensions().clone());
            if let Some(node) = self.node_at(&context_path)? {
                if node.identifier() == identifier {
                    return Ok(Some(node));
                }
            }
        }
        Ok(None)
    }

    fn is_of_type(&self, node: &Node, type_name: &str) -> bool {
        self.node_types.is_of_type(node.node_type(), type_name)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::fixtures::demo_store;
    use super::{ContentStore, StoreError};
    use crate::model::{
        ContextPath, Dimensions, NodePath, PropertyValue, SiteName, WorkspaceName,
        DOCUMENT_NODE_TYPE,
    };
    use crate::tree::{ContentTreeReader, TreeReadError};

    #[fixture]
    fn store() -> ContentStore {
        demo_store()
    }

    fn context(path: &str, workspace: &str, dimensions: &str) -> ContextPath {
        ContextPath::new(
            NodePath::new(path).unwrap(),
            WorkspaceName::new(workspace).unwrap(),
            Dimensions::parse(dimensions).unwrap(),
        )
    }

    fn title(store: &ContentStore, context_path: &ContextPath) -> Option<String> {
        store
            .node_at(context_path)
            .unwrap()
            .and_then(|node| {
                node.property("title").and_then(PropertyValue::as_str).map(str::to_owned)
            })
    }

    #[rstest]
    fn node_at_prefers_earlier_fallback_values(store: ContentStore) {
        let german = context("/sites/demo/about", "live", "language=de,en");
        assert_eq!(title(&store, &german).as_deref(), Some("Über uns"));

        // No German variant of the team page, the English one is the fallback.
        let team = context("/sites/demo/about/team", "live", "language=de,en");
        assert_eq!(title(&store, &team).as_deref(), Some("Team"));

        let french = context("/sites/demo/about", "live", "language=fr");
        assert!(store.node_at(&french).unwrap().is_none());
    }

    #[rstest]
    fn node_at_reads_through_base_workspace(store: ContentStore) {
        let about = context("/sites/demo/about", "user-admin", "language=en");
        assert_eq!(title(&store, &about).as_deref(), Some("About us (draft)"));

        let contact = context("/sites/demo/contact", "user-admin", "language=en");
        let node = store.node_at(&contact).unwrap().unwrap();
        assert_eq!(node.workspace().as_str(), "user-admin");
        assert_eq!(title(&store, &contact).as_deref(), Some("Contact"));
    }

    #[rstest]
    fn removed_variant_shadows_base_workspace(store: ContentStore) {
        let news = context("/sites/demo/news", "user-admin", "language=en");
        assert!(store.node_at(&news).unwrap().is_none());

        let live_news = context("/sites/demo/news", "live", "language=en");
        assert!(store.node_at(&live_news).unwrap().is_some());
    }

    #[rstest]
    fn unknown_workspace_is_a_read_error(store: ContentStore) {
        let missing = context("/sites/demo", "nowhere", "language=en");
        assert!(matches!(
            store.node_at(&missing),
            Err(TreeReadError::UnknownWorkspace(name)) if name == "nowhere"
        ));
    }

    #[rstest]
    fn children_follow_index_order_and_type_filter(store: ContentStore) {
        let root = store
            .root_node(
                &SiteName::new("demo").unwrap(),
                &WorkspaceName::live(),
                &Dimensions::parse("language=en").unwrap(),
            )
            .unwrap()
            .unwrap();

        let all = store.children(&root, None).unwrap();
        let names = all.iter().map(|node| node.name().to_owned()).collect::<Vec<_>>();
        assert_eq!(names, vec!["main", "about", "news", "contact"]);

        let documents = store.children(&root, Some(DOCUMENT_NODE_TYPE)).unwrap();
        let names = documents.iter().map(|node| node.name().to_owned()).collect::<Vec<_>>();
        assert_eq!(names, vec!["about", "news", "contact"]);
    }

    #[rstest]
    fn referenced_node_resolves_in_owner_context(store: ContentStore) {
        let about = store
            .node_at(&context("/sites/demo/about", "live", "language=de,en"))
            .unwrap()
            .unwrap();
        let PropertyValue::Reference(identifier) = about.property("related").unwrap().clone() else {
            panic!("expected a reference");
        };

        let target = store.referenced_node(&identifier, &about).unwrap().unwrap();
        assert_eq!(target.path().as_str(), "/sites/demo/news");
        assert_eq!(target.dimensions(), about.dimensions());
    }

    #[test]
    fn unknown_asset_marker_fails_loading() {
        let err = ContentStore::from_value(json!({
            "nodes": [{
                "identifier": "a",
                "path": "/sites/x",
                "nodeType": "Thetis:Page",
                "properties": { "image": { "$asset": "missing" } }
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::UnknownAsset { asset, .. } if asset == "missing"));
    }

    #[test]
    fn nodes_in_undeclared_workspaces_fail_loading() {
        let err = ContentStore::from_value(json!({
            "nodes": [{
                "identifier": "a",
                "path": "/sites/x",
                "nodeType": "Thetis:Page",
                "workspace": "ghost"
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::UnknownWorkspace { .. }));
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let err =
            ContentStore::load(std::path::Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { path, .. } if path.ends_with("here.json")));
    }
}
