// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde_json::{Map, Value};

use super::StoreError;
use crate::model::{Asset, AssetId, NodeId, PropertyValue};

const REF_MARKER: &str = "$ref";
const REFS_MARKER: &str = "$refs";
const ASSET_MARKER: &str = "$asset";
const DATE_MARKER: &str = "$date";

pub(super) fn property_value(
    value: Value,
    assets: &BTreeMap<AssetId, Asset>,
    owner: &NodeId,
) -> Result<PropertyValue, StoreError> {
    match value {
        Value::Object(map) if is_marker(&map) => marker_value(map, assets, owner),
        Value::Object(map) => Ok(PropertyValue::Structured(
            map.into_iter()
                .map(|(key, value)| Ok((key, property_value(value, assets, owner)?)))
                .collect::<Result<_, StoreError>>()?,
        )),
        Value::Array(items) => Ok(PropertyValue::Array(
            items
                .into_iter()
                .map(|item| property_value(item, assets, owner))
                .collect::<Result<_, _>>()?,
        )),
        other => Ok(PropertyValue::from_json(other)),
    }
}

fn is_marker(map: &Map<String, Value>) -> bool {
    map.len() == 1
        && map.keys().all(|key| {
            matches!(key.as_str(), REF_MARKER | REFS_MARKER | ASSET_MARKER | DATE_MARKER)
        })
}

fn marker_value(
    map: Map<String, Value>,
    assets: &BTreeMap<AssetId, Asset>,
    owner: &NodeId,
) -> Result<PropertyValue, StoreError> {
    let Some((marker, payload)) = map.into_iter().next() else {
        return Ok(PropertyValue::Null);
    };
    let invalid = || StoreError::InvalidMarker { node: owner.to_string(), marker: marker.clone() };

    match (marker.as_str(), payload) {
        (REF_MARKER, Value::String(identifier)) => {
            NodeId::new(identifier).map(PropertyValue::Reference).map_err(|_| invalid())
        }
        (REFS_MARKER, Value::Array(identifiers)) => identifiers
            .into_iter()
            .map(|identifier| match identifier {
                Value::String(identifier) => {
                    NodeId::new(identifier).map(PropertyValue::Reference).map_err(|_| invalid())
                }
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PropertyValue::Array),
        (ASSET_MARKER, Value::String(identifier)) => AssetId::new(identifier.as_str())
            .ok()
            .and_then(|id| assets.get(&id))
            .map(|asset| PropertyValue::from(asset.clone()))
            .ok_or_else(|| StoreError::UnknownAsset { node: owner.to_string(), asset: identifier }),
        (DATE_MARKER, Value::String(text)) => {
            DateTime::parse_from_rfc3339(&text).map(PropertyValue::Date).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}
