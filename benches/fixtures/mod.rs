// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use serde_json::{json, Value};
use thetis::model::{ContextPath, Dimensions, Node, NodePath, WorkspaceName};
use thetis::store::ContentStore;
use thetis::tree::ContentTreeReader;

pub const SITE: &str = "bench";

fn snapshot(nodes: Vec<Value>) -> Value {
    json!({
        "baseUri": "https://bench.example.com",
        "sites": [{ "nodeName": SITE, "name": "Bench" }],
        "dimensions": [{
            "name": "language",
            "defaultPreset": "en",
            "presets": [
                { "name": "en", "values": ["en"], "uriSegment": "en" },
                { "name": "de", "values": ["de", "en"], "uriSegment": "de" }
            ]
        }],
        "nodeTypes": {
            "Thetis:Document": {},
            "Thetis:Page": { "superTypes": ["Thetis:Document"] },
            "Thetis:ContentCollection": {},
            "Thetis:Text": {}
        },
        "nodes": nodes
    })
}

fn page(identifier: &str, path: &str, index: usize, properties: Value) -> Value {
    json!({
        "identifier": identifier,
        "path": path,
        "nodeType": "Thetis:Page",
        "dimensions": { "language": "en" },
        "index": index,
        "properties": properties
    })
}

fn site_root() -> Value {
    page("bench-root", &format!("/sites/{SITE}"), 0, json!({ "title": "Bench" }))
}

/// `length` sibling pages, each referencing the next; the last one points back to the first.
pub fn reference_chain(length: usize) -> ContentStore {
    let mut nodes = vec![site_root()];
    for i in 0..length {
        let next = (i + 1) % length;
        nodes.push(page(
            &format!("chain-{i}"),
            &format!("/sites/{SITE}/chain-{i}"),
            i,
            json!({
                "title": format!("Chain {i}"),
                "body": format!(
                    "See <a href=\"node://chain-{next}\">next</a> and \
                     <a href=\"node://chain-0\">start</a>."
                ),
                "next": { "$ref": format!("chain-{next}") }
            }),
        ));
    }
    ContentStore::from_value(snapshot(nodes)).expect("reference chain snapshot")
}

/// `width` pages per level over `levels` levels, each page with a text node in a collection.
pub fn wide_tree(width: usize, levels: usize) -> ContentStore {
    let mut nodes = vec![site_root()];
    let mut frontier = vec![format!("/sites/{SITE}")];

    for level in 0..levels {
        let mut next_frontier = Vec::with_capacity(frontier.len() * width);
        for parent in &frontier {
            let collection = format!("{parent}/main");
            nodes.push(json!({
                "identifier": format!("c{}", nodes.len()),
                "path": collection,
                "nodeType": "Thetis:ContentCollection",
                "dimensions": { "language": "en" }
            }));
            nodes.push(json!({
                "identifier": format!("t{}", nodes.len()),
                "path": format!("{collection}/text"),
                "nodeType": "Thetis:Text",
                "dimensions": { "language": "en" },
                "properties": { "text": "Lorem ipsum" }
            }));
            for i in 0..width {
                let path = format!("{parent}/p{level}-{i}");
                let identifier = format!("n{}", nodes.len());
                nodes.push(page(&identifier, &path, i + 1, json!({ "title": identifier })));
                next_frontier.push(path);
            }
        }
        frontier = next_frontier;
    }

    ContentStore::from_value(snapshot(nodes)).expect("wide tree snapshot")
}

pub fn live_node(store: &ContentStore, path: &str) -> Node {
    let context_path = ContextPath::new(
        NodePath::new(path).expect("bench node path"),
        WorkspaceName::live(),
        Dimensions::parse("language=en").expect("bench dimensions"),
    );
    store.node_at(&context_path).expect("read bench node").expect("bench node exists")
}
