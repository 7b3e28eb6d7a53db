// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Content dimensions (e.g. `language`) and their configured presets.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Dimension name → ordered fallback values, e.g. `language → [de, en]`.
///
/// The empty mapping is a valid combination and means "no dimension variance".
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Dimensions(BTreeMap<String, Vec<String>>);

impl Dimensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.0.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parses the dimension part of a context path: `language=de,en&country=ch`.
    pub fn parse(input: &str) -> Result<Self, DimensionsError> {
        let mut dimensions = Self::default();
        if input.is_empty() {
            return Ok(dimensions);
        }

        for pair in input.split('&') {
            let (name, values) = pair
                .split_once('=')
                .ok_or_else(|| DimensionsError::MissingValues { pair: pair.to_owned() })?;
            if name.is_empty() {
                return Err(DimensionsError::EmptyName);
            }
            if values.is_empty() {
                return Err(DimensionsError::MissingValues { pair: pair.to_owned() });
            }
            let values = values.split(',').map(str::to_owned).collect::<Vec<_>>();
            if values.iter().any(String::is_empty) {
                return Err(DimensionsError::EmptyValue { dimension: name.to_owned() });
            }
            if dimensions.0.insert(name.to_owned(), values).is_some() {
                return Err(DimensionsError::Duplicate { dimension: name.to_owned() });
            }
        }

        Ok(dimensions)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, values)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{name}={}", values.join(","))?;
        }
        Ok(())
    }
}

impl FromIterator<(String, Vec<String>)> for Dimensions {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimensionsError {
    #[error("dimension name must not be empty")]
    EmptyName,
    #[error("dimension pair {pair:?} has no values")]
    MissingValues { pair: String },
    #[error("dimension {dimension:?} has an empty value")]
    EmptyValue { dimension: String },
    #[error("dimension {dimension:?} is given more than once")]
    Duplicate { dimension: String },
}

/// One configured value set for a dimension, e.g. preset `de` = `[de, en]` under uri segment `de`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DimensionPreset {
    pub name: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub uri_segment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DimensionConfig {
    pub name: String,
    #[serde(default)]
    pub default_preset: Option<String>,
    #[serde(default)]
    pub presets: Vec<DimensionPreset>,
}

impl DimensionConfig {
    /// The named default preset, else the first configured one.
    pub fn default_preset(&self) -> Option<&DimensionPreset> {
        self.default_preset
            .as_deref()
            .and_then(|name| self.presets.iter().find(|preset| preset.name == name))
            .or_else(|| self.presets.first())
    }

    pub fn preset_by_uri_segment(&self, segment: &str) -> Option<&DimensionPreset> {
        self.presets
            .iter()
            .find(|preset| !preset.uri_segment.is_empty() && preset.uri_segment == segment)
    }

    /// The preset whose primary (first) value matches the first of `values`.
    pub fn preset_for_values(&self, values: &[String]) -> Option<&DimensionPreset> {
        let primary = values.first()?;
        self.presets
            .iter()
            .find(|preset| preset.values.as_slice() == values)
            .or_else(|| self.presets.iter().find(|preset| preset.values.first() == Some(primary)))
    }
}

/// All configured dimensions in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DimensionPresets(Vec<DimensionConfig>);

impl DimensionPresets {
    pub fn new(dimensions: Vec<DimensionConfig>) -> Self {
        Self(dimensions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dimensions(&self) -> &[DimensionConfig] {
        &self.0
    }

    pub fn dimension(&self, name: &str) -> Option<&DimensionConfig> {
        self.0.iter().find(|dimension| dimension.name == name)
    }

    /// Cartesian product of every dimension's presets, first dimension outermost.
    ///
    /// Without configured presets this yields exactly one empty combination. Dimensions
    /// configured without presets do not contribute.
    pub fn combinations(&self) -> Vec<Dimensions> {
        let mut combinations = vec![Dimensions::default()];

        for dimension in &self.0 {
            if dimension.presets.is_empty() {
                continue;
            }
            let mut next = Vec::with_capacity(combinations.len() * dimension.presets.len());
            for base in &combinations {
                for preset in &dimension.presets {
                    next.push(base.clone().with(dimension.name.clone(), preset.values.clone()));
                }
            }
            combinations = next;
        }

        combinations
    }

    /// Context dimensions for a stored variant with single concrete values per dimension.
    ///
    /// Each value is widened to the fallback list of the preset whose primary value it is;
    /// unknown values stay single-valued.
    pub fn context_for_values(&self, values: &BTreeMap<String, String>) -> Dimensions {
        values
            .iter()
            .map(|(name, value)| {
                let fallbacks = self
                    .dimension(name)
                    .and_then(|dimension| {
                        dimension
                            .presets
                            .iter()
                            .find(|preset| preset.values.first() == Some(value))
                    })
                    .map(|preset| preset.values.clone())
                    .unwrap_or_else(|| vec![value.clone()]);
                (name.clone(), fallbacks)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{DimensionConfig, DimensionPreset, DimensionPresets, Dimensions, DimensionsError};

    fn preset(name: &str, values: &[&str]) -> DimensionPreset {
        DimensionPreset {
            name: name.to_owned(),
            values: values.iter().map(|v| (*v).to_owned()).collect(),
            uri_segment: name.to_owned(),
        }
    }

    fn language() -> DimensionConfig {
        DimensionConfig {
            name: "language".to_owned(),
            default_preset: Some("en".to_owned()),
            presets: vec![preset("en", &["en"]), preset("de", &["de", "en"])],
        }
    }

    #[test]
    fn parses_and_formats_dimension_pairs() {
        let parsed = Dimensions::parse("language=de,en&country=ch").expect("parse");
        assert_eq!(parsed.get("language"), Some(&["de".to_owned(), "en".to_owned()][..]));
        assert_eq!(parsed.to_string(), "country=ch&language=de,en");
        assert!(Dimensions::parse("").expect("empty").is_empty());
    }

    #[test]
    fn rejects_malformed_dimension_pairs() {
        assert_eq!(Dimensions::parse("=en"), Err(DimensionsError::EmptyName));
        assert!(matches!(
            Dimensions::parse("language"),
            Err(DimensionsError::MissingValues { .. })
        ));
        assert!(matches!(
            Dimensions::parse("language=en,"),
            Err(DimensionsError::EmptyValue { .. })
        ));
        assert!(matches!(
            Dimensions::parse("language=en&language=de"),
            Err(DimensionsError::Duplicate { .. })
        ));
    }

    #[test]
    fn empty_presets_yield_single_empty_combination() {
        let combinations = DimensionPresets::default().combinations();
        assert_eq!(combinations, vec![Dimensions::default()]);
    }

    #[test]
    fn single_dimension_yields_one_combination_per_preset() {
        let presets = DimensionPresets::new(vec![language()]);
        let combinations = presets.combinations();
        assert_eq!(combinations.len(), 2);
        assert_eq!(combinations[0].to_string(), "language=en");
        assert_eq!(combinations[1].to_string(), "language=de,en");
    }

    #[test]
    fn multiple_dimensions_yield_cartesian_product_in_config_order() {
        let country = DimensionConfig {
            name: "country".to_owned(),
            default_preset: None,
            presets: vec![preset("ch", &["ch"]), preset("at", &["at"]), preset("de", &["de"])],
        };
        let empty =
            DimensionConfig { name: "audience".to_owned(), default_preset: None, presets: vec![] };
        let presets = DimensionPresets::new(vec![language(), empty, country]);

        let combinations =
            presets.combinations().iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            combinations,
            vec![
                "country=ch&language=en",
                "country=at&language=en",
                "country=de&language=en",
                "country=ch&language=de,en",
                "country=at&language=de,en",
                "country=de&language=de,en",
            ]
        );
    }

    #[test]
    fn default_preset_falls_back_to_first() {
        let mut config = language();
        assert_eq!(config.default_preset().map(|p| p.name.as_str()), Some("en"));
        config.default_preset = Some("missing".to_owned());
        assert_eq!(config.default_preset().map(|p| p.name.as_str()), Some("en"));
    }

    #[test]
    fn context_for_values_widens_to_preset_fallbacks() {
        let presets = DimensionPresets::new(vec![language()]);
        let values = BTreeMap::from([("language".to_owned(), "de".to_owned())]);
        assert_eq!(presets.context_for_values(&values).to_string(), "language=de,en");

        let unknown = BTreeMap::from([("language".to_owned(), "fr".to_owned())]);
        assert_eq!(presets.context_for_values(&unknown).to_string(), "language=fr");
    }

    #[test]
    fn preset_lookup_by_values_and_uri_segment() {
        let config = language();
        assert_eq!(
            config.preset_for_values(&["de".to_owned(), "en".to_owned()]).map(|p| p.name.as_str()),
            Some("de")
        );
        assert_eq!(
            config.preset_for_values(&["de".to_owned()]).map(|p| p.name.as_str()),
            Some("de")
        );
        assert_eq!(config.preset_by_uri_segment("de").map(|p| p.name.as_str()), Some("de"));
        assert!(config.preset_by_uri_segment("fr").is_none());
    }
}
