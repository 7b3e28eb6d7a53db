// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

/// Marker type of navigable, routable nodes.
pub const DOCUMENT_NODE_TYPE: &str = "Thetis:Document";

/// Name of a node type, e.g. `Thetis:Page`. The set of names is open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeTypeName(SmolStr);

impl NodeTypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NodeTypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for NodeTypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeTypeName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

/// Declared node types and their direct supertypes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTypeHierarchy {
    supertypes: BTreeMap<NodeTypeName, Vec<NodeTypeName>>,
}

impl NodeTypeHierarchy {
    pub fn insert(&mut self, name: NodeTypeName, supertypes: Vec<NodeTypeName>) {
        self.supertypes.insert(name, supertypes);
    }

    pub fn contains(&self, name: &NodeTypeName) -> bool {
        self.supertypes.contains_key(name)
    }

    /// Reflexive, transitive subtype check. Undeclared types only match themselves.
    pub fn is_of_type(&self, name: &NodeTypeName, target: &str) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![name];

        while let Some(current) = stack.pop() {
            if current.as_str() == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(supertypes) = self.supertypes.get(current) {
                stack.extend(supertypes.iter());
            }
        }

        false
    }
}

impl FromIterator<(NodeTypeName, Vec<NodeTypeName>)> for NodeTypeHierarchy {
    fn from_iter<I: IntoIterator<Item = (NodeTypeName, Vec<NodeTypeName>)>>(iter: I) -> Self {
        Self { supertypes: iter.into_iter().collect() }
    }
}
