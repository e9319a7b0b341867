/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The serde module contains structs used while parsing data using the serde crate.

use std::collections::BTreeMap;

/// RoadProperties contains the tags of one road feature.
#[derive(serde::Deserialize)]
pub struct RoadProperties {
    /// Road classification.
    pub highway: Option<String>,
    /// Street name.
    pub name: Option<String>,
    /// OSM way id, number or string.
    pub osm_id: Option<serde_json::Value>,
    /// Everything else.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl RoadProperties {
    /// Parses a GeoJSON property map, a missing map means no tags.
    pub fn from_properties(properties: Option<&geojson::JsonObject>) -> anyhow::Result<Self> {
        let object = properties.cloned().unwrap_or_default();
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }

    /// Gets the OSM id as a string, if there is one.
    pub fn get_osm_id(&self) -> Option<String> {
        self.osm_id.as_ref().and_then(json_to_string)
    }

    /// Gets all tags as strings, including `highway` and `name`.
    pub fn get_tags(&self) -> BTreeMap<String, String> {
        let mut tags: BTreeMap<String, String> = self
            .other
            .iter()
            .filter_map(|(key, value)| json_to_string(value).map(|value| (key.clone(), value)))
            .collect();
        if let Some(ref highway) = self.highway {
            tags.insert("highway".into(), highway.clone());
        }
        if let Some(ref name) = self.name {
            tags.insert("name".into(), name.clone());
        }
        tags
    }
}

/// Converts a scalar JSON value to a string, null is None.
pub fn json_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}
