/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The roads module reads the crowd-sourced road segments and derives their metric length.

use crate::config;
use crate::context;
use crate::projection;
use crate::serde::RoadProperties;
use anyhow::Context as _;
use std::collections::BTreeMap;

/// One road segment, geometry already in the metric plane.
#[derive(Clone, Debug)]
pub struct LineSegment {
    /// OSM id, or the feature id, or the feature index.
    pub id: String,
    /// Length of `raw_geometry`.
    pub length_km: f64,
    /// Free-form tags, at least `highway`.
    pub tags: BTreeMap<String, String>,
    /// Projected geometry.
    pub raw_geometry: geo::MultiLineString<f64>,
}

impl LineSegment {
    /// Gets the value of a tag.
    pub fn get_tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|i| i.as_str())
    }
}

/// Counters of the features which did not become segments.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RoadDiagnostics {
    /// Features in the input.
    pub total_features: u64,
    /// Features which became segments.
    pub kept_segments: u64,
    /// No `highway` tag.
    pub untagged: u64,
    /// `highway` is not a physical road.
    pub excluded_highway: u64,
    /// No geometry.
    pub missing_geometry: u64,
    /// Not a line.
    pub non_line_geometry: u64,
    /// Properties of an unexpected shape.
    pub malformed_properties: u64,
    /// Zero length after projection.
    pub zero_length: u64,
    /// Length of the excluded features, in km.
    pub excluded_km: f64,
}

/// The parsed road feed.
#[derive(Clone, Debug, Default)]
pub struct RoadSet {
    /// Kept segments, in input order.
    pub segments: Vec<LineSegment>,
    /// What was dropped and why.
    pub diagnostics: RoadDiagnostics,
}

fn to_multi_line_string(geometry: geo::Geometry<f64>) -> Option<geo::MultiLineString<f64>> {
    match geometry {
        geo::Geometry::LineString(line_string) => Some(geo::MultiLineString::new(vec![line_string])),
        geo::Geometry::MultiLineString(multi_line_string) => Some(multi_line_string),
        _ => None,
    }
}

fn feature_id(feature: &geojson::Feature) -> Option<String> {
    match feature.id {
        Some(geojson::feature::Id::String(ref id)) => Some(id.clone()),
        Some(geojson::feature::Id::Number(ref id)) => Some(id.to_string()),
        None => None,
    }
}

/// Parses a GeoJSON FeatureCollection of roads.
pub fn parse_roads(
    data: &str,
    config: &config::PipelineConfig,
    laea: &projection::Laea,
) -> anyhow::Result<RoadSet> {
    let geojson: geojson::GeoJson = data.parse()?;
    let collection = geojson::FeatureCollection::try_from(geojson)?;

    let mut ret = RoadSet::default();
    for (index, feature) in collection.features.into_iter().enumerate() {
        ret.diagnostics.total_features += 1;

        let properties = match RoadProperties::from_properties(feature.properties.as_ref()) {
            Ok(value) => value,
            Err(err) => {
                log::debug!("parse_roads: feature #{index}: {err}");
                ret.diagnostics.malformed_properties += 1;
                continue;
            }
        };
        let id = properties
            .get_osm_id()
            .or_else(|| feature_id(&feature))
            .unwrap_or_else(|| index.to_string());

        let geometry = match feature.geometry {
            Some(value) => value,
            None => {
                ret.diagnostics.missing_geometry += 1;
                continue;
            }
        };
        let geometry: geo::Geometry<f64> = match geometry.try_into() {
            Ok(value) => value,
            Err(_) => {
                ret.diagnostics.non_line_geometry += 1;
                continue;
            }
        };
        let lines = match to_multi_line_string(geometry) {
            Some(value) => laea.project(&value),
            None => {
                ret.diagnostics.non_line_geometry += 1;
                continue;
            }
        };
        let length_km = projection::length_km(&lines);

        let highway = match properties.highway {
            Some(ref value) => value.trim(),
            None => {
                ret.diagnostics.untagged += 1;
                ret.diagnostics.excluded_km += length_km;
                continue;
            }
        };
        if config.excluded_highway_types.iter().any(|i| i == highway) {
            ret.diagnostics.excluded_highway += 1;
            ret.diagnostics.excluded_km += length_km;
            continue;
        }
        // A segment must contribute length, otherwise the segment count and the length would
        // disagree.
        if length_km <= 0.0 || !length_km.is_finite() {
            ret.diagnostics.zero_length += 1;
            continue;
        }

        ret.segments.push(LineSegment {
            id,
            length_km,
            tags: properties.get_tags(),
            raw_geometry: lines,
        });
    }
    ret.diagnostics.kept_segments = ret.segments.len() as u64;

    log::info!(
        "parse_roads: kept {} of {} features, excluded {} by highway type, {} untagged",
        ret.diagnostics.kept_segments,
        ret.diagnostics.total_features,
        ret.diagnostics.excluded_highway,
        ret.diagnostics.untagged
    );
    Ok(ret)
}

/// Loads the road feed configured for this context.
pub fn load_roads(ctx: &context::Context, laea: &projection::Laea) -> anyhow::Result<RoadSet> {
    let path = ctx.get_ini().get_roads_path();
    let data = ctx.get_file_system().read_to_string(&path)?;
    parse_roads(&data, ctx.get_ini().get_config(), laea)
        .with_context(|| format!("failed to parse roads from '{path}'"))
}
