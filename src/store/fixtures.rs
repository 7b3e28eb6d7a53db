// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared demo content for unit tests.

use super::ContentStore;

const DEMO_SITE: &str = include_str!("../../tests/fixtures/demo-site.json");

/// A small bilingual site with a draft workspace: see `tests/fixtures/demo-site.json`.
pub(crate) fn demo_store() -> ContentStore {
    let snapshot = serde_json::from_str(DEMO_SITE).expect("demo snapshot parses");
    ContentStore::from_snapshot(snapshot).expect("demo snapshot loads")
}
