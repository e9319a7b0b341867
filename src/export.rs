/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The export module serializes the scored units for the serving layer: a CSV table, a GeoJSON
//! feature collection and a JSON summary.

use crate::context;
use crate::pipeline;
use crate::projection;
use crate::score::Rollup;
use crate::units::AdministrativeUnit;
use crate::units::Category;
use crate::units::DataQualityFlag;
use crate::units::UnitKind;
use crate::util;
use anyhow::Context as _;

/// Columns of the CSV table, in order.
pub const TABLE_COLUMNS: [&str; 12] = [
    "canonical_name",
    "unit_kind",
    "osm_road_km",
    "segment_count",
    "official_road_km",
    "completeness_pct",
    "category",
    "data_quality_flag",
    "km_to_map",
    "excess_km",
    "area_km2",
    "road_density_km_per_km2",
];

/// The attributes of one unit, shared by all exports so they can't disagree.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct UnitRecord {
    /// Join key.
    pub canonical_name: String,
    /// Municipality or state city.
    pub unit_kind: UnitKind,
    /// Rounded to 3 digits.
    pub osm_road_km: f64,
    /// Number of OSM segments.
    pub segment_count: u64,
    /// Rounded to 3 digits.
    pub official_road_km: Option<f64>,
    /// Rounded to 1 digit.
    pub completeness_pct: Option<f64>,
    /// Category of the percentage.
    pub category: Category,
    /// Missing data classification.
    pub data_quality_flag: DataQualityFlag,
    /// Rounded to 3 digits.
    pub km_to_map: Option<f64>,
    /// Rounded to 3 digits.
    pub excess_km: Option<f64>,
    /// Rounded to 3 digits.
    pub area_km2: Option<f64>,
    /// Rounded to 3 digits.
    pub road_density_km_per_km2: Option<f64>,
}

fn round_km(value: f64) -> f64 {
    util::round_to(value, 3)
}

impl UnitRecord {
    /// Builds the record of a unit.
    pub fn new(unit: &AdministrativeUnit) -> Self {
        UnitRecord {
            canonical_name: unit.canonical_name.clone(),
            unit_kind: unit.unit_kind,
            osm_road_km: round_km(unit.osm_road_km),
            segment_count: unit.segment_count,
            official_road_km: unit.official_road_km.map(round_km),
            completeness_pct: unit.score.completeness_pct,
            category: unit.score.category,
            data_quality_flag: unit.data_quality_flag,
            km_to_map: unit.score.km_to_map.map(round_km),
            excess_km: unit.score.excess_km.map(round_km),
            area_km2: unit.area_km2.map(round_km),
            road_density_km_per_km2: unit.score.road_density_km_per_km2,
        }
    }
}

/// Produces the CSV table, one row per unit, empty cells for missing values.
pub fn to_table(units: &[AdministrativeUnit]) -> anyhow::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        writer.write_record(TABLE_COLUMNS)?;
        for unit in units {
            writer.serialize(UnitRecord::new(unit))?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buf)?)
}

/// Produces the GeoJSON feature collection: boundaries back in WGS84, null geometry for units
/// without a boundary.
pub fn to_geojson(
    units: &[AdministrativeUnit],
    laea: &projection::Laea,
) -> anyhow::Result<String> {
    let mut features: Vec<geojson::Feature> = Vec::new();
    for unit in units {
        let properties = match serde_json::to_value(UnitRecord::new(unit))? {
            serde_json::Value::Object(value) => value,
            _ => return Err(anyhow::anyhow!("unit record is not an object")),
        };
        let geometry = unit
            .boundary_geometry
            .as_ref()
            .map(|i| geojson::Geometry::new(geojson::Value::from(&laea.unproject(i))));
        features.push(geojson::Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }
    let collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    Ok(serde_json::to_string(&collection)?)
}

/// The JSON summary: rollup and per-stage diagnostics.
#[derive(serde::Serialize)]
pub struct Summary<'a> {
    /// Totals.
    pub rollup: &'a Rollup,
    /// What was dropped, lost or left unmatched.
    pub diagnostics: &'a pipeline::Diagnostics,
}

/// Produces the JSON summary.
pub fn to_summary(rollup: &Rollup, diagnostics: &pipeline::Diagnostics) -> anyhow::Result<String> {
    let summary = Summary {
        rollup,
        diagnostics,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Writes all exports of a snapshot to the configured paths.
pub fn write_exports(ctx: &context::Context, snapshot: &pipeline::Snapshot) -> anyhow::Result<()> {
    let ini = ctx.get_ini();
    let laea = projection::from_config(ini.get_config().projection);
    let file_system = ctx.get_file_system();

    let path = ini.get_table_output_path();
    file_system
        .write_from_string(&to_table(&snapshot.units)?, &path)
        .with_context(|| format!("failed to write '{path}'"))?;

    let path = ini.get_geojson_output_path();
    file_system
        .write_from_string(&to_geojson(&snapshot.units, &laea)?, &path)
        .with_context(|| format!("failed to write '{path}'"))?;

    let path = ini.get_summary_output_path();
    file_system
        .write_from_string(&to_summary(&snapshot.rollup, &snapshot.diagnostics)?, &path)
        .with_context(|| format!("failed to write '{path}'"))?;

    log::info!("write_exports: wrote {} units", snapshot.units.len());
    Ok(())
}

#[cfg(test)]
mod tests;
