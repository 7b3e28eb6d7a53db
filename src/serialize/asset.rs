// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{json, Value};
use tracing::warn;

use super::{AssetRenderError, ThumbnailBox, ThumbnailService};
use crate::model::{Asset, AssetKind};

/// ISO-8601 with numeric offset, e.g. `2024-03-01T09:30:00+01:00`.
pub fn iso8601(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Fixed asset metadata plus a `rendering` object; rendering failures degrade to `null`.
pub(crate) fn asset_data(
    asset: &Asset,
    thumbnails: &dyn ThumbnailService,
    bounds: ThumbnailBox,
) -> Value {
    let rendering = match render(asset, thumbnails, bounds) {
        Ok(rendering) => rendering,
        Err(err) => {
            warn!(asset = %asset.identifier, error = %err, "asset rendering failed");
            Value::Null
        }
    };

    json!({
        "title": asset.title,
        "caption": asset.caption,
        "copyrightNotice": asset.copyright_notice,
        "byteSize": asset.resource.byte_size,
        "fileName": asset.resource.file_name,
        "fileExtension": asset.file_extension(),
        "lastModified": iso8601(&asset.last_modified),
        "rendering": rendering,
    })
}

fn render(
    asset: &Asset,
    thumbnails: &dyn ThumbnailService,
    bounds: ThumbnailBox,
) -> Result<Value, AssetRenderError> {
    match asset.kind {
        AssetKind::Image { .. } => {
            let thumbnail = thumbnails.thumbnail_for(asset, bounds.max_width, bounds.max_height)?;
            Ok(json!({
                "kind": "image",
                "width": thumbnail.width,
                "height": thumbnail.height,
                "url": thumbnail.url,
            }))
        }
        AssetKind::File => Ok(json!({
            "kind": "file",
            "url": thumbnails.asset_uri(asset)?,
        })),
    }
}
