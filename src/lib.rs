// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Thetis: headless content API core.
//!
//! Enumerates documents per dimension combination, serializes node properties into JSON
//! (reference expansion, link tokens, asset metadata) and batches revalidation notices for
//! published documents. The content repository sits behind the traits in [`tree`] and
//! [`serialize`]; [`store`] provides a JSON-snapshot implementation.

pub mod api;
pub mod config;
pub mod model;
pub mod revalidate;
pub mod serialize;
pub mod store;
pub mod tree;
