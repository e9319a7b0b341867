/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The report module renders a plain text quality report of a snapshot, for humans reviewing a
//! run.

use crate::context;
use crate::pipeline;
use crate::units::AdministrativeUnit;
use crate::units::Category;
use crate::units::SourceKind;
use crate::util;
use std::fmt::Write as _;
use std::io::Write;

fn get_source_label(source_kind: &SourceKind) -> &'static str {
    match source_kind {
        SourceKind::Boundary => "boundaries",
        SourceKind::OfficialStat => "official statistics",
        SourceKind::CrowdSource => "OSM",
    }
}

fn get_category_title(category: Category) -> &'static str {
    match category {
        Category::OverMapped => "Over-mapped",
        Category::Low => "Low",
        Category::Partial => "Partial",
        Category::Complete => "Complete",
        Category::NoData => "No data",
    }
}

/// Formats one line of a category listing.
fn format_unit(unit: &AdministrativeUnit) -> String {
    let official = match unit.official_road_km {
        Some(value) => util::format_km(value),
        None => "-".into(),
    };
    let mut line = format!(
        "  {}: {} / {} ({})",
        unit.canonical_name,
        util::format_km(unit.osm_road_km),
        official,
        util::format_percent(unit.score.completeness_pct)
    );
    match unit.score.category {
        Category::OverMapped => {
            if let Some(excess_km) = unit.score.excess_km {
                line.push_str(&format!(", {} excess", util::format_km(excess_km)));
            }
        }
        Category::Low | Category::Partial => {
            if let Some(km_to_map) = unit.score.km_to_map {
                line.push_str(&format!(", {} to map", util::format_km(km_to_map)));
            }
        }
        _ => (),
    }
    line
}

/// Units of one category, in the order the category is best reviewed in.
fn get_category_units(
    units: &[AdministrativeUnit],
    category: Category,
) -> Vec<&AdministrativeUnit> {
    let mut ret: Vec<&AdministrativeUnit> = units
        .iter()
        .filter(|i| i.score.category == category)
        .collect();
    match category {
        Category::OverMapped => {
            ret.sort_by(|a, b| {
                let a = a.score.excess_km.unwrap_or(0.0);
                b.score.excess_km.unwrap_or(0.0).total_cmp(&a)
            });
        }
        Category::Low | Category::Partial => {
            ret.sort_by(|a, b| {
                let a = a.score.km_to_map.unwrap_or(0.0);
                b.score.km_to_map.unwrap_or(0.0).total_cmp(&a)
            });
        }
        _ => (),
    }
    ret
}

/// Renders the report.
pub fn to_report(snapshot: &pipeline::Snapshot) -> anyhow::Result<String> {
    let rollup = &snapshot.rollup;
    let diagnostics = &snapshot.diagnostics;
    let mut ret = String::new();

    writeln!(ret, "Road completeness report")?;
    writeln!(ret)?;
    writeln!(
        ret,
        "Units: {} ({} municipalities, {} state cities)",
        rollup.unit_count, rollup.municipality_count, rollup.state_city_count
    )?;
    writeln!(
        ret,
        "OSM roads: {}, official roads: {}",
        util::format_km(rollup.total_osm_km),
        util::format_km(rollup.total_official_km)
    )?;
    writeln!(
        ret,
        "Overall completeness: {} ({} of {} in units with official data)",
        util::format_percent(rollup.overall_completeness_pct),
        util::format_km(rollup.scored_osm_km),
        util::format_km(rollup.total_official_km)
    )?;
    writeln!(
        ret,
        "Mean completeness: {} (municipalities: {}, state cities: {})",
        util::format_percent(rollup.mean_completeness_pct),
        util::format_percent(rollup.municipality_mean_completeness_pct),
        util::format_percent(rollup.state_city_mean_completeness_pct)
    )?;
    writeln!(
        ret,
        "Still to map: {}, mapped above the official length: {}",
        util::format_km(rollup.total_km_to_map),
        util::format_km(rollup.total_excess_km)
    )?;

    for category in [
        Category::OverMapped,
        Category::Low,
        Category::Partial,
        Category::Complete,
        Category::NoData,
    ] {
        let units = get_category_units(&snapshot.units, category);
        writeln!(ret)?;
        writeln!(ret, "{} ({}):", get_category_title(category), units.len())?;
        for unit in units {
            writeln!(ret, "{}", format_unit(unit))?;
        }
    }

    writeln!(ret)?;
    writeln!(ret, "Orphans ({}):", diagnostics.reconcile.orphans.len())?;
    for orphan in &diagnostics.reconcile.orphans {
        let missing_from: Vec<&str> = orphan.missing_from.iter().map(get_source_label).collect();
        writeln!(
            ret,
            "  {}: missing from {}, spellings: {}",
            orphan.canonical_name,
            missing_from.join(", "),
            orphan.source_names.join(", ")
        )?;
    }
    if !diagnostics.reconcile.kind_collisions.is_empty() {
        writeln!(
            ret,
            "Unit kind differs between sources: {}",
            diagnostics.reconcile.kind_collisions.join(", ")
        )?;
    }

    let spatial = &diagnostics.spatial;
    writeln!(ret)?;
    writeln!(
        ret,
        "Unassigned roads: {} of {} segments, {} ({:.2}%)",
        spatial.unassigned_segments,
        spatial.total_segments,
        util::format_km(spatial.unassigned_km),
        spatial.unassigned_pct
    )?;
    writeln!(
        ret,
        "Border roads: {} segments, {} counted more than once",
        spatial.multi_assigned_segments,
        util::format_km(spatial.double_counted_km)
    )?;
    writeln!(
        ret,
        "Dropped official rows: {} malformed, {} placeholders",
        diagnostics.official.malformed_rows, diagnostics.official.placeholder_rows
    )?;

    Ok(ret)
}

/// Inner main() that is allowed to fail.
pub fn our_main(
    _argv: &[String],
    stream: &mut dyn Write,
    ctx: &context::Context,
) -> anyhow::Result<()> {
    let snapshot = ctx.get_snapshot_cache().get(ctx)?;
    stream.write_all(to_report(&snapshot)?.as_bytes())?;
    Ok(())
}

/// Commandline interface: prints the quality report.
pub fn main(argv: &[String], stream: &mut dyn Write, ctx: &context::Context) -> i32 {
    match our_main(argv, stream, ctx) {
        Ok(_) => 0,
        Err(err) => {
            log::error!("report: {err:?}");
            let _ = stream.write_all(format!("{err:?}\n").as_bytes());
            1
        }
    }
}

#[cfg(test)]
mod tests;
