/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the report module.

use super::*;
use crate::context::tests::TestFileSystem;

fn make_context() -> context::Context {
    let mut ctx = context::tests::make_test_context().unwrap();
    let files = pipeline::tests::make_test_files(&ctx);
    let file_system = TestFileSystem::from_files(&files);
    ctx.set_file_system(&file_system);
    ctx
}

/// Tests to_report(): overview, category listings, orphans and spatial diagnostics.
#[test]
fn test_to_report() {
    let ctx = make_context();
    let snapshot = pipeline::build_snapshot(&ctx).unwrap();

    let ret = to_report(&snapshot).unwrap();

    let lines: Vec<&str> = ret.lines().collect();
    assert_eq!(lines[0], "Road completeness report");
    assert_eq!(lines.contains(&"Units: 4 (3 municipalities, 1 state cities)"), true);
    // Ogre and Jūrmala have OSM roads but no official length: not part of the headline.
    assert_eq!(
        lines.contains(&"Overall completeness: 1.87% (1.1 km of 60.0 km in units with official data)"),
        true
    );
    assert_eq!(lines.contains(&"Over-mapped (0):"), true);
    assert_eq!(lines.contains(&"Complete (0):"), true);

    // Largest deficit first.
    let low = lines.iter().position(|i| *i == "Low (2):").unwrap();
    assert_eq!(
        lines[low + 1],
        "  Valmiera: 0.0 km / 50.0 km (0.00%), 50.0 km to map"
    );
    assert_eq!(
        lines[low + 2],
        "  Tukums: 1.1 km / 10.0 km (11.20%), 8.9 km to map"
    );

    let no_data = lines.iter().position(|i| *i == "No data (2):").unwrap();
    assert_eq!(lines[no_data + 1].starts_with("  Jūrmala: 0.6 km / - (-)"), true);
    assert_eq!(lines[no_data + 2].starts_with("  Ogre: 1.1 km / - (-)"), true);

    let orphans = lines.iter().position(|i| *i == "Orphans (2):").unwrap();
    assert_eq!(
        lines[orphans + 1],
        "  Jūrmala: missing from official statistics, spellings: Jūrmala"
    );
    assert_eq!(
        lines[orphans + 2],
        "  Valmiera: missing from boundaries, OSM, spellings: Valmiera municipality"
    );

    assert_eq!(
        lines.contains(&"Unassigned roads: 1 of 4 segments, 1.1 km (28.24%)"),
        true
    );
    assert_eq!(
        lines.contains(&"Border roads: 0 segments, 0.0 km counted more than once"),
        true
    );
}

/// Tests to_report(): over-mapped units list their excess.
#[test]
fn test_to_report_over_mapped() {
    let ctx = make_context();
    let mut snapshot = pipeline::build_snapshot(&ctx).unwrap();
    let thresholds = crate::config::CategoryThresholds::default();
    for unit in snapshot.units.iter_mut() {
        if unit.canonical_name == "Tukums" {
            unit.osm_road_km = 12.5;
            let reconciled = crate::units::ReconciledUnit {
                canonical_name: unit.canonical_name.clone(),
                source_names: unit.source_names.clone(),
                sources: unit.sources.clone(),
                unit_kind: unit.unit_kind,
                boundary_geometry: None,
                area_km2: unit.area_km2,
                osm_road_km: unit.osm_road_km,
                segment_count: unit.segment_count,
                official_road_km: unit.official_road_km,
                data_quality_flag: unit.data_quality_flag,
            };
            unit.score = crate::score::score_unit(&reconciled, &thresholds);
        }
    }

    let ret = to_report(&snapshot).unwrap();

    let lines: Vec<&str> = ret.lines().collect();
    let over_mapped = lines.iter().position(|i| *i == "Over-mapped (1):").unwrap();
    assert_eq!(
        lines[over_mapped + 1],
        "  Tukums: 12.5 km / 10.0 km (125.00%), 2.5 km excess"
    );
}

/// Tests main().
#[test]
fn test_main() {
    let ctx = make_context();
    let argv = ["".to_string()];
    let mut buf: std::io::Cursor<Vec<u8>> = std::io::Cursor::new(Vec::new());

    let ret = main(&argv, &mut buf, &ctx);

    assert_eq!(ret, 0);
    let output = String::from_utf8(buf.into_inner()).unwrap();
    assert_eq!(output.starts_with("Road completeness report\n"), true);
}

/// Tests main(): missing inputs are reported, not a panic.
#[test]
fn test_main_error() {
    let mut ctx = context::tests::make_test_context().unwrap();
    let file_system = TestFileSystem::from_files(&std::collections::HashMap::new());
    ctx.set_file_system(&file_system);
    let argv = ["".to_string()];
    let mut buf: std::io::Cursor<Vec<u8>> = std::io::Cursor::new(Vec::new());

    let ret = main(&argv, &mut buf, &ctx);

    assert_eq!(ret, 1);
}
