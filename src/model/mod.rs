// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Nodes live at hierarchical paths inside a workspace and a dimension context; their
//! properties are a closed set of value variants so serialization can match exhaustively.

pub mod dimensions;
pub mod ids;
pub mod node;
pub mod node_type;
pub mod path;
pub mod site;
pub mod value;
pub mod workspace;

pub use dimensions::{
    DimensionConfig, DimensionPreset, DimensionPresets, Dimensions, DimensionsError,
};
pub use ids::{AssetId, Id, IdError, NodeId, SiteName};
pub use node::Node;
pub use node_type::{NodeTypeHierarchy, NodeTypeName, DOCUMENT_NODE_TYPE};
pub use path::{ContextPath, ContextPathError, NodePath, NodePathError};
pub use site::Site;
pub use value::{Asset, AssetKind, AssetResource, PropertyValue};
pub use workspace::{Workspace, WorkspaceName, LIVE_WORKSPACE};
