/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The boundaries module reads the administrative boundary polygons.

use crate::config;
use crate::context;
use crate::names;
use crate::projection;
use crate::serde::json_to_string;
use crate::units::SourceKind;
use crate::units::UnitKind;
use anyhow::Context as _;
use geo::Validation as _;

/// One boundary feature, before dissolving fragments of the same unit.
#[derive(Clone, Debug)]
pub struct BoundaryFragment {
    /// Normalized name.
    pub canonical_name: String,
    /// Name as it appears in the input.
    pub source_name: String,
    /// A name without a unit type word is a state city.
    pub unit_kind: UnitKind,
    /// Projected geometry.
    pub geometry: geo::MultiPolygon<f64>,
}

fn to_multi_polygon(geometry: geo::Geometry<f64>) -> Option<geo::MultiPolygon<f64>> {
    match geometry {
        geo::Geometry::Polygon(polygon) => Some(geo::MultiPolygon::new(vec![polygon])),
        geo::Geometry::MultiPolygon(multi_polygon) => Some(multi_polygon),
        _ => None,
    }
}

/// Parses a GeoJSON FeatureCollection of boundaries. Any feature without a name or without a valid
/// areal geometry fails the whole parse: attributing roads to broken polygons would give wrong
/// numbers instead of missing ones.
pub fn parse_boundaries(
    data: &str,
    config: &config::PipelineConfig,
    normalizer: &names::NameNormalizer,
    laea: &projection::Laea,
) -> anyhow::Result<Vec<BoundaryFragment>> {
    let geojson: geojson::GeoJson = data.parse()?;
    let collection = geojson::FeatureCollection::try_from(geojson)?;
    let name_property = &config.boundary_name_property;

    let mut ret: Vec<BoundaryFragment> = Vec::new();
    for (index, feature) in collection.features.into_iter().enumerate() {
        let source_name = feature
            .property(name_property)
            .and_then(json_to_string)
            .filter(|i| !i.trim().is_empty())
            .with_context(|| format!("feature #{index} has no '{name_property}' property"))?;

        let geometry = feature
            .geometry
            .with_context(|| format!("feature '{source_name}' has no geometry"))?;
        let geometry: geo::Geometry<f64> = geometry
            .try_into()
            .with_context(|| format!("feature '{source_name}' has an unsupported geometry"))?;
        let geometry = to_multi_polygon(geometry)
            .with_context(|| format!("feature '{source_name}' is not a polygon"))?;
        if !geometry.is_valid() {
            return Err(anyhow::anyhow!(
                "feature '{source_name}' has an invalid polygon"
            ));
        }

        let normalized = normalizer.normalize(&source_name, SourceKind::Boundary);
        ret.push(BoundaryFragment {
            canonical_name: normalized.canonical,
            source_name,
            unit_kind: normalized.unit_kind.unwrap_or(UnitKind::StateCity),
            geometry: laea.project(&geometry),
        });
    }

    log::info!("parse_boundaries: read {} fragments", ret.len());
    Ok(ret)
}

/// Loads the boundaries configured for this context.
pub fn load_boundaries(
    ctx: &context::Context,
    normalizer: &names::NameNormalizer,
    laea: &projection::Laea,
) -> anyhow::Result<Vec<BoundaryFragment>> {
    let path = ctx.get_ini().get_boundaries_path();
    let data = ctx.get_file_system().read_to_string(&path)?;
    parse_boundaries(&data, ctx.get_ini().get_config(), normalizer, laea)
        .with_context(|| format!("failed to parse boundaries from '{path}'"))
}
