// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::types::{ErrorBody, ErrorEntry};
use crate::model::ContextPathError;
use crate::tree::TreeReadError;

pub const ROUTE_NOT_FOUND_CODE: u64 = 1611250322;
pub const NODE_NOT_FOUND_CODE: u64 = 1611245114;
pub const MISSING_ADDRESS_CODE: u64 = 1662111662;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Node with path {path} not found")]
    RouteNotFound { path: String },
    #[error("Node with node path \"{path}\" not found")]
    NodeNotFound { path: String },
    #[error("No path or context path provided")]
    MissingAddress,
    #[error("Unknown site {0:?}")]
    UnknownSite(String),
    #[error("Invalid context path: {0}")]
    InvalidContextPath(#[from] ContextPathError),
    #[error(transparent)]
    TreeRead(#[from] TreeReadError),
}

impl ApiError {
    /// Stable numeric code clients match on; `0` for unclassified failures.
    pub fn code(&self) -> u64 {
        match self {
            Self::RouteNotFound { .. } => ROUTE_NOT_FOUND_CODE,
            Self::NodeNotFound { .. } => NODE_NOT_FOUND_CODE,
            Self::MissingAddress => MISSING_ADDRESS_CODE,
            Self::UnknownSite(_) | Self::InvalidContextPath(_) | Self::TreeRead(_) => 0,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody { errors: vec![ErrorEntry { message: self.to_string(), code: self.code() }] }
    }
}
