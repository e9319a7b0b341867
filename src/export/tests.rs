/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the export module.

use super::*;
use geo::polygon;
use crate::context::tests::TestFileSystem;
use crate::units::ReconciledUnit;
use crate::units::SourceKind;
use crate::units::UnitScore;
use std::collections::BTreeSet;

fn make_unit(name: &str, osm_road_km: f64, official_road_km: Option<f64>) -> AdministrativeUnit {
    let laea = projection::Laea::etrs89();
    let polygon = polygon![
        (x: 23.0, y: 56.9),
        (x: 23.1, y: 56.9),
        (x: 23.1, y: 57.0),
        (x: 23.0, y: 57.0),
    ];
    let geometry = laea.project(&geo::MultiPolygon::new(vec![polygon]));
    let area_km2 = projection::area_km2(&geometry);
    let unit = ReconciledUnit {
        canonical_name: name.into(),
        source_names: BTreeSet::from([format!("{name} municipality")]),
        sources: BTreeSet::from([SourceKind::Boundary, SourceKind::OfficialStat]),
        unit_kind: UnitKind::Municipality,
        boundary_geometry: Some(geometry),
        area_km2: Some(area_km2),
        osm_road_km,
        segment_count: 3,
        official_road_km,
        data_quality_flag: DataQualityFlag::Complete,
    };
    let score = crate::score::score_unit(&unit, &crate::config::CategoryThresholds::default());
    AdministrativeUnit::new(unit, score)
}

fn make_orphan(name: &str) -> AdministrativeUnit {
    let unit = ReconciledUnit {
        canonical_name: name.into(),
        source_names: BTreeSet::from([name.to_string()]),
        sources: BTreeSet::from([SourceKind::CrowdSource]),
        unit_kind: UnitKind::StateCity,
        boundary_geometry: None,
        area_km2: None,
        osm_road_km: 12.34567,
        segment_count: 2,
        official_road_km: None,
        data_quality_flag: DataQualityFlag::MissingOfficialData,
    };
    let score = UnitScore {
        completeness_pct: None,
        category: Category::NoData,
        km_to_map: None,
        excess_km: None,
        road_density_km_per_km2: None,
    };
    AdministrativeUnit::new(unit, score)
}

/// Tests UnitRecord::new(): lengths are rounded, the rest is copied.
#[test]
fn test_unit_record_new() {
    let unit = make_unit("Tukums", 250.1234, Some(500.0));

    let ret = UnitRecord::new(&unit);

    assert_eq!(ret.canonical_name, "Tukums");
    assert_eq!(ret.osm_road_km, 250.123);
    assert_eq!(ret.official_road_km, Some(500.0));
    assert_eq!(ret.completeness_pct, Some(50.0));
    assert_eq!(ret.category, Category::Partial);
    assert_eq!(ret.km_to_map, Some(249.877));
    assert_eq!(ret.excess_km, Some(0.0));
}

/// Tests to_table(): header and one row per unit, null values as empty cells.
#[test]
fn test_to_table() {
    let units = vec![make_unit("Tukums", 100.0, Some(200.0)), make_orphan("Ikšķile")];

    let ret = to_table(&units).unwrap();

    let lines: Vec<&str> = ret.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], TABLE_COLUMNS.join(","));
    assert_eq!(
        lines[1].starts_with("Tukums,municipality,100.0,3,200.0,50.0,partial,complete,100.0,0.0,"),
        true
    );
    assert_eq!(
        lines[2],
        "Ikšķile,state_city,12.346,2,,,no_data,missing_official_data,,,,"
    );
}

/// Tests to_table(): no units still gives a header.
#[test]
fn test_to_table_empty() {
    let ret = to_table(&[]).unwrap();

    assert_eq!(ret, format!("{}\n", TABLE_COLUMNS.join(",")));
}

/// Tests to_geojson(): geometry is back in WGS84, orphans get a null geometry.
#[test]
fn test_to_geojson() {
    let units = vec![make_unit("Tukums", 100.0, Some(200.0)), make_orphan("Ikšķile")];
    let laea = projection::Laea::etrs89();

    let ret = to_geojson(&units, &laea).unwrap();

    let value: serde_json::Value = serde_json::from_str(&ret).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);

    let tukums = &features[0];
    assert_eq!(tukums["properties"]["canonical_name"], "Tukums");
    assert_eq!(tukums["properties"]["category"], "partial");
    assert_eq!(tukums["geometry"]["type"], "MultiPolygon");
    let first = &tukums["geometry"]["coordinates"][0][0][0];
    assert_eq!((first[0].as_f64().unwrap() - 23.0).abs() < 1e-6, true);
    assert_eq!((first[1].as_f64().unwrap() - 56.9).abs() < 1e-6, true);

    let orphan = &features[1];
    assert_eq!(orphan["geometry"], serde_json::Value::Null);
    assert_eq!(orphan["properties"]["official_road_km"], serde_json::Value::Null);
    assert_eq!(orphan["properties"]["data_quality_flag"], "missing_official_data");
}

/// Tests that the table and the feature collection agree on every shared attribute.
#[test]
fn test_exports_agree() {
    let units = vec![
        make_unit("Tukums", 100.0, Some(200.0)),
        make_unit("Ogre", 321.0987, Some(300.0)),
        make_orphan("Ikšķile"),
    ];
    let laea = projection::Laea::etrs89();
    let table = to_table(&units).unwrap();
    let geojson: serde_json::Value =
        serde_json::from_str(&to_geojson(&units, &laea).unwrap()).unwrap();
    let features = geojson["features"].as_array().unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(table.as_bytes());
    for (row, feature) in reader.records().zip(features) {
        let row = row.unwrap();
        for (column, cell) in TABLE_COLUMNS.iter().zip(row.iter()) {
            let property = &feature["properties"][*column];
            let expected = match property {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(value) => value.clone(),
                serde_json::Value::Number(value) => {
                    assert_eq!(cell.parse::<f64>().unwrap(), value.as_f64().unwrap());
                    cell.to_string()
                }
                other => other.to_string(),
            };
            assert_eq!(cell, expected, "column {column}");
        }
    }
}

/// Tests that the same input always serializes to the same bytes.
#[test]
fn test_exports_deterministic() {
    let units = vec![make_unit("Tukums", 100.0, Some(200.0)), make_orphan("Ikšķile")];
    let laea = projection::Laea::etrs89();

    assert_eq!(to_table(&units).unwrap(), to_table(&units).unwrap());
    assert_eq!(
        to_geojson(&units, &laea).unwrap(),
        to_geojson(&units, &laea).unwrap()
    );
}

/// Tests to_summary(): rollup and diagnostics are both present.
#[test]
fn test_to_summary() {
    let units = vec![make_unit("Tukums", 100.0, Some(200.0)), make_orphan("Ikšķile")];
    let rollup = crate::score::rollup(&units);
    let diagnostics = pipeline::Diagnostics::default();

    let ret = to_summary(&rollup, &diagnostics).unwrap();

    let value: serde_json::Value = serde_json::from_str(&ret).unwrap();
    assert_eq!(value["rollup"]["unit_count"], 2);
    assert_eq!(value["rollup"]["category_counts"]["no_data"], 1);
    assert_eq!(value["rollup"]["overall_completeness_pct"], 50.0);
    assert_eq!(value["diagnostics"]["spatial"]["unassigned_segments"], 0);
    assert_eq!(value.get("built_at"), None);
}

/// Tests write_exports(): all three configured paths are written.
#[test]
fn test_write_exports() {
    let mut ctx = context::tests::make_test_context().unwrap();
    let files = pipeline::tests::make_test_files(&ctx);
    let file_system = TestFileSystem::from_files(&files);
    ctx.set_file_system(&file_system);
    let snapshot = pipeline::Snapshot {
        units: vec![make_orphan("Ikšķile")],
        rollup: crate::score::Rollup::default(),
        diagnostics: pipeline::Diagnostics::default(),
        built_at: ctx.get_time().now(),
    };

    write_exports(&ctx, &snapshot).unwrap();

    let table = file_system
        .read_to_string(&ctx.get_abspath("workdir/completeness.csv"))
        .unwrap();
    assert_eq!(table.lines().count(), 2);
    let geojson = file_system
        .read_to_string(&ctx.get_abspath("workdir/completeness.geojson"))
        .unwrap();
    assert_eq!(geojson.contains("Ikšķile"), true);
    let summary = file_system
        .read_to_string(&ctx.get_abspath("workdir/summary.json"))
        .unwrap();
    assert_eq!(summary.contains("\"rollup\""), true);
}
