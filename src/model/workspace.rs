// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkspaceNameTag {}
pub type WorkspaceName = Id<WorkspaceNameTag>;

pub const LIVE_WORKSPACE: &str = "live";
const PERSONAL_WORKSPACE_PREFIX: &str = "user-";

impl Id<WorkspaceNameTag> {
    /// The publicly visible workspace routes resolve against.
    pub fn live() -> Self {
        Self::new(LIVE_WORKSPACE).expect("static workspace name")
    }

    pub fn is_live(&self) -> bool {
        self.as_str() == LIVE_WORKSPACE
    }
}

/// An isolated content version line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    name: WorkspaceName,
    #[serde(default)]
    base_workspace: Option<WorkspaceName>,
    #[serde(default)]
    owner: Option<String>,
}

impl Workspace {
    pub fn new(name: WorkspaceName) -> Self {
        Self { name, base_workspace: None, owner: None }
    }

    pub fn live() -> Self {
        Self::new(WorkspaceName::live())
    }

    pub fn with_base_workspace(mut self, base_workspace: WorkspaceName) -> Self {
        self.base_workspace = Some(base_workspace);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn name(&self) -> &WorkspaceName {
        &self.name
    }

    pub fn base_workspace(&self) -> Option<&WorkspaceName> {
        self.base_workspace.as_ref()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Neither based on another workspace nor owned by anyone (e.g. `live`).
    pub fn is_public(&self) -> bool {
        self.base_workspace.is_none() && self.owner.is_none()
    }

    /// Shared review workspace: has a base workspace but no owner.
    pub fn is_internal(&self) -> bool {
        self.base_workspace.is_some() && self.owner.is_none()
    }

    pub fn is_personal(&self) -> bool {
        self.name.as_str().starts_with(PERSONAL_WORKSPACE_PREFIX)
    }

    pub fn is_private(&self) -> bool {
        self.owner.is_some() && !self.is_personal()
    }
}

#[cfg(test)]
mod tests {
    use super::{Workspace, WorkspaceName};

    fn name(value: &str) -> WorkspaceName {
        WorkspaceName::new(value).expect("workspace name")
    }

    #[test]
    fn live_is_public() {
        let live = Workspace::live();
        assert!(live.is_public());
        assert!(!live.is_internal());
        assert!(live.name().is_live());
    }

    #[test]
    fn classifies_draft_workspaces() {
        let personal = Workspace::new(name("user-admin"))
            .with_base_workspace(WorkspaceName::live())
            .with_owner("admin");
        assert!(!personal.is_public());
        assert!(personal.is_personal());
        assert!(!personal.is_private());

        let review = Workspace::new(name("review")).with_base_workspace(WorkspaceName::live());
        assert!(review.is_internal());
        assert!(!review.is_public());

        let private = Workspace::new(name("campaign"))
            .with_base_workspace(WorkspaceName::live())
            .with_owner("editor");
        assert!(private.is_private());
        assert!(!private.is_public());
    }

    #[test]
    fn deserializes_snapshot_form() {
        let workspace: Workspace =
            serde_json::from_str(r#"{"name":"user-admin","baseWorkspace":"live","owner":"admin"}"#)
                .expect("workspace");
        assert_eq!(workspace.base_workspace(), Some(&WorkspaceName::live()));
        assert!(workspace.is_personal());
    }
}
