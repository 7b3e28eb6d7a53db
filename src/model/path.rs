// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::dimensions::{Dimensions, DimensionsError};
use super::ids::{IdError, SiteName};
use super::workspace::WorkspaceName;

const SITES_SEGMENT: &str = "sites";

/// Absolute hierarchical node path, e.g. `/sites/demo/about`.
///
/// `@`, `;`, `&` and `=` are reserved because they delimit the parts of a [`ContextPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    value: String,
}

impl NodePath {
    pub fn new(value: impl Into<String>) -> Result<Self, NodePathError> {
        let value = value.into();
        validate_node_path(&value)?;
        Ok(Self { value })
    }

    pub fn root() -> Self {
        Self { value: "/".to_owned() }
    }

    /// Path of the root node of `site`: `/sites/<site>`.
    pub fn site_root(site: &SiteName) -> Self {
        Self { value: format!("/{SITES_SEGMENT}/{site}") }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_root(&self) -> bool {
        self.value == "/"
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.value.split('/').filter(|segment| !segment.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last path segment; `None` for the root path.
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        let (parent, _) = self.value.rsplit_once('/')?;
        if parent.is_empty() {
            Some(Self::root())
        } else {
            Some(Self { value: parent.to_owned() })
        }
    }

    pub fn child(&self, name: &str) -> Result<NodePath, NodePathError> {
        if self.is_root() {
            Self::new(format!("/{name}"))
        } else {
            Self::new(format!("{}/{name}", self.value))
        }
    }

    /// Strict ancestry: a path is not its own ancestor.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other
            .value
            .strip_prefix(&self.value)
            .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
    }

    /// Segments of `self` below `ancestor`, or `None` when `ancestor` is not an ancestor-or-self.
    pub fn segments_below<'a>(&'a self, ancestor: &NodePath) -> Option<Vec<&'a str>> {
        if self == ancestor {
            return Some(Vec::new());
        }
        if !ancestor.is_ancestor_of(self) {
            return None;
        }
        Some(self.segments().skip(ancestor.depth()).collect())
    }

    /// Site node name for paths at or below `/sites/<site>`.
    pub fn site_name(&self) -> Option<SiteName> {
        let mut segments = self.segments();
        if segments.next()? != SITES_SEGMENT {
            return None;
        }
        SiteName::new(segments.next()?.to_owned()).ok()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for NodePath {
    type Err = NodePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodePathError {
    #[error("node path must not be empty")]
    Empty,
    #[error("node path must be absolute (start with '/')")]
    NotAbsolute,
    #[error("node path must not contain empty segments")]
    EmptySegment,
    #[error("node path must not contain reserved character {0:?}")]
    ReservedCharacter(char),
}

fn validate_node_path(value: &str) -> Result<(), NodePathError> {
    if value.is_empty() {
        return Err(NodePathError::Empty);
    }
    if !value.starts_with('/') {
        return Err(NodePathError::NotAbsolute);
    }
    if let Some(reserved) = value.chars().find(|c| matches!(c, '@' | ';' | '&' | '=')) {
        return Err(NodePathError::ReservedCharacter(reserved));
    }
    if value == "/" {
        return Ok(());
    }
    if value[1..].split('/').any(str::is_empty) {
        return Err(NodePathError::EmptySegment);
    }
    Ok(())
}

/// Context identity of one node variant: node path, workspace and dimension values.
///
/// Text form: `<nodePath>@<workspace>[;<dimension>=<v1>,<v2>[&<dimension>=...]]`, e.g.
/// `/sites/demo/about@user-admin;language=de,en`. Dimensions format in name order, so the
/// text form is canonical and usable as a dedupe key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextPath {
    node_path: NodePath,
    workspace: WorkspaceName,
    dimensions: Dimensions,
}

impl ContextPath {
    pub fn new(node_path: NodePath, workspace: WorkspaceName, dimensions: Dimensions) -> Self {
        Self { node_path, workspace, dimensions }
    }

    pub fn node_path(&self) -> &NodePath {
        &self.node_path
    }

    pub fn workspace(&self) -> &WorkspaceName {
        &self.workspace
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Same node path and dimensions, projected onto another workspace.
    pub fn with_workspace(&self, workspace: WorkspaceName) -> Self {
        Self { node_path: self.node_path.clone(), workspace, dimensions: self.dimensions.clone() }
    }

    pub fn parse(input: &str) -> Result<Self, ContextPathError> {
        let (node_path_str, context) =
            input.split_once('@').ok_or(ContextPathError::MissingWorkspace)?;

        let node_path = NodePath::new(node_path_str.to_owned())
            .map_err(ContextPathError::InvalidNodePath)?;

        let (workspace_str, dimensions_str) = match context.split_once(';') {
            Some((workspace, dimensions)) => (workspace, Some(dimensions)),
            None => (context, None),
        };

        if workspace_str.is_empty() {
            return Err(ContextPathError::MissingWorkspace);
        }
        let workspace = WorkspaceName::new(workspace_str.to_owned())
            .map_err(ContextPathError::InvalidWorkspace)?;

        let dimensions = match dimensions_str {
            Some(raw) => Dimensions::parse(raw).map_err(ContextPathError::InvalidDimensions)?,
            None => Dimensions::default(),
        };

        Ok(Self { node_path, workspace, dimensions })
    }
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node_path, self.workspace)?;
        if !self.dimensions.is_empty() {
            write!(f, ";{}", self.dimensions)?;
        }
        Ok(())
    }
}

impl FromStr for ContextPath {
    type Err = ContextPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContextPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextPathError {
    #[error("context path is missing '@<workspace>'")]
    MissingWorkspace,
    #[error("invalid node path: {0}")]
    InvalidNodePath(#[source] NodePathError),
    #[error("invalid workspace name: {0}")]
    InvalidWorkspace(#[source] IdError),
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(#[source] DimensionsError),
}

#[cfg(test)]
mod tests {
    use super::{ContextPath, ContextPathError, NodePath, NodePathError};
    use crate::model::ids::SiteName;

    fn path(value: &str) -> NodePath {
        NodePath::new(value).expect("node path")
    }

    #[test]
    fn node_path_navigation() {
        let about = path("/sites/demo/about");
        assert_eq!(about.name(), Some("about"));
        assert_eq!(about.parent(), Some(path("/sites/demo")));
        assert_eq!(path("/sites").parent(), Some(NodePath::root()));
        assert_eq!(NodePath::root().parent(), None);
        assert_eq!(about.child("team").expect("child"), path("/sites/demo/about/team"));
        assert_eq!(about.depth(), 3);
        assert_eq!(about.site_name().map(SiteName::into_string), Some("demo".to_owned()));
    }

    #[test]
    fn node_path_ancestry_is_strict_and_segment_aligned() {
        let site = path("/sites/demo");
        assert!(site.is_ancestor_of(&path("/sites/demo/about")));
        assert!(!site.is_ancestor_of(&site));
        assert!(!site.is_ancestor_of(&path("/sites/demo-two")));
        assert_eq!(
            path("/sites/demo/about/team").segments_below(&site),
            Some(vec!["about", "team"])
        );
        assert_eq!(site.segments_below(&site), Some(Vec::new()));
        assert_eq!(path("/sites/other").segments_below(&site), None);
    }

    #[test]
    fn node_path_rejects_malformed_input() {
        assert_eq!(NodePath::new(""), Err(NodePathError::Empty));
        assert_eq!(NodePath::new("sites/demo"), Err(NodePathError::NotAbsolute));
        assert_eq!(NodePath::new("/sites//demo"), Err(NodePathError::EmptySegment));
        assert_eq!(NodePath::new("/sites/demo/"), Err(NodePathError::EmptySegment));
        assert_eq!(NodePath::new("/sites/a@b"), Err(NodePathError::ReservedCharacter('@')));
    }

    #[test]
    fn parses_and_formats_context_paths() {
        let cases = [
            "/sites/demo@live",
            "/sites/demo/about@user-admin;language=de,en",
            "/sites/demo/about@live;country=ch&language=de,en",
        ];

        for s in cases {
            let parsed: ContextPath = s.parse().expect("parse");
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn context_path_formatting_is_canonical() {
        let parsed: ContextPath =
            "/sites/demo@live;language=en&country=de".parse().expect("parse");
        assert_eq!(parsed.to_string(), "/sites/demo@live;country=de&language=en");
    }

    #[test]
    fn context_path_projects_to_workspace() {
        let parsed: ContextPath =
            "/sites/demo/about@user-admin;language=en".parse().expect("parse");
        let live = parsed.with_workspace("live".parse().expect("workspace"));
        assert_eq!(live.to_string(), "/sites/demo/about@live;language=en");
        assert_eq!(live.dimensions(), parsed.dimensions());
    }

    #[test]
    fn context_path_rejects_malformed_input() {
        assert_eq!(ContextPath::parse("/sites/demo"), Err(ContextPathError::MissingWorkspace));
        assert_eq!(ContextPath::parse("/sites/demo@"), Err(ContextPathError::MissingWorkspace));
        assert!(matches!(
            ContextPath::parse("sites/demo@live"),
            Err(ContextPathError::InvalidNodePath(NodePathError::NotAbsolute))
        ));
        assert!(matches!(
            ContextPath::parse("/sites/demo@live;language"),
            Err(ContextPathError::InvalidDimensions(_))
        ));
    }
}
