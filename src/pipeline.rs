/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The pipeline module runs all stages in order and produces one immutable snapshot of scored
//! units.

use crate::aggregate;
use crate::boundaries;
use crate::context;
use crate::export;
use crate::names;
use crate::official;
use crate::official::OfficialDiagnostics;
use crate::projection;
use crate::reconcile;
use crate::reconcile::ReconcileDiagnostics;
use crate::roads;
use crate::roads::RoadDiagnostics;
use crate::score;
use crate::spatial;
use crate::spatial::SpatialDiagnostics;
use crate::units::AdministrativeUnit;
use std::io::Write;

/// Per-stage diagnostics of one run.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct Diagnostics {
    /// Dropped road features.
    pub roads: RoadDiagnostics,
    /// Number of boundary features before dissolving.
    pub boundary_fragments: usize,
    /// Dropped or filtered official rows.
    pub official: OfficialDiagnostics,
    /// Unassigned and double counted road length.
    pub spatial: SpatialDiagnostics,
    /// Orphans and kind collisions.
    pub reconcile: ReconcileDiagnostics,
}

/// The result of one full run. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Scored units, sorted by canonical name.
    pub units: Vec<AdministrativeUnit>,
    /// Totals.
    pub rollup: score::Rollup,
    /// What the stages dropped or could not match.
    pub diagnostics: Diagnostics,
    /// When the inputs were read.
    pub built_at: time::OffsetDateTime,
}

/// Loads all inputs configured for this context and runs every stage on them.
pub fn build_snapshot(ctx: &context::Context) -> anyhow::Result<Snapshot> {
    let built_at = ctx.get_time().now();
    let config = ctx.get_ini().get_config();
    let laea = projection::from_config(config.projection);
    let normalizer = names::NameNormalizer::load(ctx)?;

    let official_table = official::load_official(ctx, &normalizer)?;
    let fragments = boundaries::load_boundaries(ctx, &normalizer, &laea)?;
    let boundary_fragments = fragments.len();
    let boundaries = aggregate::dissolve_boundaries(fragments);
    let road_set = roads::load_roads(ctx, &laea)?;

    let assignment = match config.road_unit_property {
        Some(ref property) => {
            spatial::assign_by_property(&road_set.segments, property, &normalizer)
        }
        None => spatial::assign_segments(&road_set.segments, &boundaries, config.spatial_predicate),
    };
    let lengths = aggregate::aggregate_lengths(
        assignment
            .attributions
            .iter()
            .map(|i| (i.canonical_name.as_str(), i.length_km)),
    );

    let reconciliation = reconcile::reconcile(&lengths, boundaries, &official_table.stats);
    let units = score::score_units(reconciliation.units, &config.categories);
    let rollup = score::rollup(&units);
    log::info!(
        "build_snapshot: {} units, overall completeness: {:?}%",
        rollup.unit_count,
        rollup.overall_completeness_pct
    );

    Ok(Snapshot {
        units,
        rollup,
        diagnostics: Diagnostics {
            roads: road_set.diagnostics,
            boundary_fragments,
            official: official_table.diagnostics,
            spatial: assignment.diagnostics,
            reconcile: reconciliation.diagnostics,
        },
        built_at,
    })
}

/// Inner main() that is allowed to fail.
pub fn our_main(
    _argv: &[String],
    stream: &mut dyn Write,
    ctx: &context::Context,
) -> anyhow::Result<()> {
    let snapshot = ctx.get_snapshot_cache().get(ctx)?;
    export::write_exports(ctx, &snapshot)?;
    let ini = ctx.get_ini();
    stream.write_all(
        format!(
            "{} units, wrote '{}', '{}' and '{}'\n",
            snapshot.units.len(),
            ini.get_table_output_path(),
            ini.get_geojson_output_path(),
            ini.get_summary_output_path()
        )
        .as_bytes(),
    )?;
    Ok(())
}

/// Commandline interface: runs the pipeline and writes the exports.
pub fn main(argv: &[String], stream: &mut dyn Write, ctx: &context::Context) -> i32 {
    match our_main(argv, stream, ctx) {
        Ok(_) => 0,
        Err(err) => {
            log::error!("run: {err:?}");
            let _ = stream.write_all(format!("{err:?}\n").as_bytes());
            1
        }
    }
}
