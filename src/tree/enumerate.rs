// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::{ContentTreeReader, DimensionPresetSource, TreeReadError};
use crate::model::{Dimensions, Node, SiteName, WorkspaceName, DOCUMENT_NODE_TYPE};

/// Walks a site once per dimension combination.
#[derive(Clone, Copy)]
pub struct TreeEnumerator<'a> {
    presets: &'a dyn DimensionPresetSource,
    reader: &'a dyn ContentTreeReader,
}

impl<'a> TreeEnumerator<'a> {
    pub fn new(presets: &'a dyn DimensionPresetSource, reader: &'a dyn ContentTreeReader) -> Self {
        Self { presets, reader }
    }

    /// The site root under every configured dimension combination where it exists.
    pub fn site_roots(&self, site: &SiteName, workspace: &WorkspaceName) -> SiteRoots<'a> {
        SiteRoots {
            reader: self.reader,
            site: site.clone(),
            workspace: workspace.clone(),
            combinations: self.presets.all_presets().combinations().into_iter(),
        }
    }

    /// `node` itself, then every document descendant reachable through document children only.
    pub fn documents_under(&self, node: Node) -> DocumentsUnder<'a> {
        DocumentsUnder { reader: self.reader, stack: vec![node], expand: None, failed: false }
    }
}

/// Lazy sequence of site roots, one per dimension combination with an existing root.
///
/// A read failure is yielded for the affected combination; iteration can continue with the
/// next one.
pub struct SiteRoots<'a> {
    reader: &'a dyn ContentTreeReader,
    site: SiteName,
    workspace: WorkspaceName,
    combinations: std::vec::IntoIter<Dimensions>,
}

impl Iterator for SiteRoots<'_> {
    type Item = Result<Node, TreeReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dimensions = self.combinations.next()?;
            match self.reader.root_node(&self.site, &self.workspace, &dimensions) {
                Ok(Some(root)) => return Some(Ok(root)),
                Ok(None) => {
                    debug!(
                        site = %self.site,
                        workspace = %self.workspace,
                        dimensions = %dimensions,
                        "site root absent in dimension combination"
                    );
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Pre-order document traversal.
///
/// Children of a yielded node are fetched on the following `next` call; after a read failure
/// the sequence ends.
pub struct DocumentsUnder<'a> {
    reader: &'a dyn ContentTreeReader,
    stack: Vec<Node>,
    expand: Option<Node>,
    failed: bool,
}

impl Iterator for DocumentsUnder<'_> {
    type Item = Result<Node, TreeReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if let Some(parent) = self.expand.take() {
            match self.reader.children(&parent, Some(DOCUMENT_NODE_TYPE)) {
                Ok(children) => self.stack.extend(children.into_iter().rev()),
                Err(err) => {
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(err));
                }
            }
        }

        let node = self.stack.pop()?;
        self.expand = Some(node.clone());
        Some(Ok(node))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::TreeEnumerator;
    use crate::model::{
        ContextPath, DimensionPresets, Node, NodeId, NodePath, SiteName, WorkspaceName,
    };
    use crate::store::fixtures::demo_store;
    use crate::store::ContentStore;
    use crate::tree::{ContentTreeReader, DimensionPresetSource, TreeReadError};

    #[fixture]
    fn store() -> ContentStore {
        demo_store()
    }

    fn demo() -> SiteName {
        SiteName::new("demo").unwrap()
    }

    fn paths(nodes: &[Node]) -> Vec<String> {
        nodes.iter().map(|node| node.path().to_string()).collect()
    }

    /// Delegates to the demo store but fails reads below one path.
    struct FlakyReader<'a> {
        inner: &'a ContentStore,
        fail_children_of: NodePath,
        fail_roots_with: Option<String>,
        children_calls: Cell<usize>,
    }

    impl ContentTreeReader for FlakyReader<'_> {
        fn node_at(&self, context_path: &ContextPath) -> Result<Option<Node>, TreeReadError> {
            if let Some(value) = &self.fail_roots_with {
                if context_path.dimensions().to_string().contains(value.as_str()) {
                    return Err(TreeReadError::Unavailable { reason: "timeout".to_owned() });
                }
            }
            self.inner.node_at(context_path)
        }

        fn children(
            &self,
            node: &Node,
            type_filter: Option<&str>,
        ) -> Result<Vec<Node>, TreeReadError> {
            self.children_calls.set(self.children_calls.get() + 1);
            if node.path() == &self.fail_children_of {
                return Err(TreeReadError::Unavailable { reason: "connection reset".to_owned() });
            }
            self.inner.children(node, type_filter)
        }

        fn parent(&self, node: &Node) -> Result<Option<Node>, TreeReadError> {
            self.inner.parent(node)
        }

        fn referenced_node(
            &self,
            identifier: &NodeId,
            context: &Node,
        ) -> Result<Option<Node>, TreeReadError> {
            self.inner.referenced_node(identifier, context)
        }

        fn is_of_type(&self, node: &Node, type_name: &str) -> bool {
            self.inner.is_of_type(node, type_name)
        }
    }

    struct NoPresets;

    impl DimensionPresetSource for NoPresets {
        fn all_presets(&self) -> DimensionPresets {
            DimensionPresets::default()
        }
    }

    #[rstest]
    fn site_roots_skip_combinations_without_root(store: ContentStore) {
        let enumerator = TreeEnumerator::new(&store, &store);
        let roots = enumerator
            .site_roots(&demo(), &WorkspaceName::live())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        // en and de exist, fr has no translated site root.
        let contexts = roots.iter().map(|root| root.context_path().to_string()).collect::<Vec<_>>();
        assert_eq!(
            contexts,
            vec!["/sites/demo@live;language=en", "/sites/demo@live;language=de,en"]
        );
    }

    #[test]
    fn site_roots_cover_the_product_of_all_dimensions() {
        let store = ContentStore::from_value(json!({
            "dimensions": [
                {
                    "name": "language",
                    "presets": [
                        { "name": "en", "values": ["en"], "uriSegment": "en" },
                        { "name": "de", "values": ["de", "en"], "uriSegment": "de" }
                    ]
                },
                {
                    "name": "country",
                    "presets": [
                        { "name": "ch", "values": ["ch"], "uriSegment": "ch" },
                        { "name": "at", "values": ["at"], "uriSegment": "at" }
                    ]
                }
            ],
            "nodes": [
                {
                    "identifier": "multi-en-ch",
                    "path": "/sites/multi",
                    "nodeType": "Thetis:Page",
                    "dimensions": { "language": "en", "country": "ch" }
                },
                {
                    "identifier": "multi-de-at",
                    "path": "/sites/multi",
                    "nodeType": "Thetis:Page",
                    "dimensions": { "language": "de", "country": "at" }
                }
            ]
        }))
        .unwrap();

        let enumerator = TreeEnumerator::new(&store, &store);
        let roots = enumerator
            .site_roots(&SiteName::new("multi").unwrap(), &WorkspaceName::live())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        // Every combination carries both dimensions; en + at has no root.
        let contexts = roots.iter().map(|root| root.context_path().to_string()).collect::<Vec<_>>();
        assert_eq!(
            contexts,
            vec![
                "/sites/multi@live;country=ch&language=en",
                "/sites/multi@live;country=ch&language=de,en",
                "/sites/multi@live;country=at&language=de,en",
            ]
        );
    }

    #[rstest]
    fn site_roots_without_presets_use_empty_combination(store: ContentStore) {
        let enumerator = TreeEnumerator::new(&NoPresets, &store);
        let roots = enumerator
            .site_roots(&demo(), &WorkspaceName::live())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].dimensions().is_empty());
    }

    #[rstest]
    fn site_roots_yield_read_failures_per_combination(store: ContentStore) {
        let reader = FlakyReader {
            inner: &store,
            fail_children_of: NodePath::root(),
            fail_roots_with: Some("language=de".to_owned()),
            children_calls: Cell::new(0),
        };
        let enumerator = TreeEnumerator::new(&store, &reader);
        let results = enumerator.site_roots(&demo(), &WorkspaceName::live()).collect::<Vec<_>>();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(TreeReadError::Unavailable { .. })));
    }

    #[rstest]
    fn documents_under_visits_documents_in_pre_order(store: ContentStore) {
        let enumerator = TreeEnumerator::new(&store, &store);
        let root = enumerator.site_roots(&demo(), &WorkspaceName::live()).next().unwrap().unwrap();

        let documents = enumerator.documents_under(root).collect::<Result<Vec<_>, _>>().unwrap();

        // `/sites/demo/main/landing` is a document below a content collection and stays hidden.
        assert_eq!(
            paths(&documents),
            vec![
                "/sites/demo",
                "/sites/demo/about",
                "/sites/demo/about/team",
                "/sites/demo/news",
                "/sites/demo/news/launch",
                "/sites/demo/contact",
            ]
        );
    }

    #[rstest]
    fn documents_under_is_restartable(store: ContentStore) {
        let enumerator = TreeEnumerator::new(&store, &store);
        let root = enumerator.site_roots(&demo(), &WorkspaceName::live()).next().unwrap().unwrap();

        let first =
            enumerator.documents_under(root.clone()).collect::<Result<Vec<_>, _>>().unwrap();
        let second = enumerator.documents_under(root).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(paths(&first), paths(&second));
    }

    #[rstest]
    fn documents_under_stops_after_read_failure(store: ContentStore) {
        let reader = FlakyReader {
            inner: &store,
            fail_children_of: NodePath::new("/sites/demo/about").unwrap(),
            fail_roots_with: None,
            children_calls: Cell::new(0),
        };
        let enumerator = TreeEnumerator::new(&store, &reader);
        let root = enumerator.site_roots(&demo(), &WorkspaceName::live()).next().unwrap().unwrap();

        let results = enumerator.documents_under(root).collect::<Vec<_>>();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().path().as_str(), "/sites/demo");
        assert_eq!(results[1].as_ref().unwrap().path().as_str(), "/sites/demo/about");
        assert!(matches!(results[2], Err(TreeReadError::Unavailable { .. })));
        assert_eq!(reader.children_calls.get(), 2);
    }
}
