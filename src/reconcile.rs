/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The reconcile module outer-joins the OSM, boundary and official sources on the canonical name.

use crate::aggregate::Boundary;
use crate::aggregate::LengthAggregate;
use crate::official::OfficialStat;
use crate::units::DataQualityFlag;
use crate::units::ReconciledUnit;
use crate::units::SourceKind;
use crate::units::UnitKind;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A unit which is missing from some of the sources, typically a name the name table doesn't
/// know yet.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Orphan {
    /// The join key.
    pub canonical_name: String,
    /// Sources the unit was found in.
    pub found_in: Vec<SourceKind>,
    /// Sources the unit is missing from.
    pub missing_from: Vec<SourceKind>,
    /// Raw spellings, to help extending the name table.
    pub source_names: Vec<String>,
}

/// Join level anomalies.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ReconcileDiagnostics {
    /// Number of distinct canonical names.
    pub unit_count: usize,
    /// Units missing from at least one source.
    pub orphans: Vec<Orphan>,
    /// Units found in only one source.
    pub single_source_count: usize,
    /// Units where the official table and the boundaries disagree on the unit kind.
    pub kind_collisions: Vec<String>,
}

/// The joined units, sorted by canonical name.
#[derive(Clone, Debug, Default)]
pub struct Reconciliation {
    /// One per canonical name.
    pub units: Vec<ReconciledUnit>,
    /// Orphans and collisions.
    pub diagnostics: ReconcileDiagnostics,
}

const ALL_SOURCES: [SourceKind; 3] = [
    SourceKind::Boundary,
    SourceKind::OfficialStat,
    SourceKind::CrowdSource,
];

/// Full outer join: every name of any source appears exactly once in the output. Keys are compared
/// exactly, a mismatch is fixed in the name table, not here.
pub fn reconcile(
    osm: &BTreeMap<String, LengthAggregate>,
    mut boundaries: BTreeMap<String, Boundary>,
    official: &BTreeMap<String, OfficialStat>,
) -> Reconciliation {
    let names: BTreeSet<String> = osm
        .keys()
        .chain(boundaries.keys())
        .chain(official.keys())
        .cloned()
        .collect();

    let mut ret = Reconciliation::default();
    for canonical_name in names {
        let aggregate = osm.get(&canonical_name).cloned().unwrap_or_default();
        let boundary = boundaries.remove(&canonical_name);
        let stat = official.get(&canonical_name);

        let mut sources: BTreeSet<SourceKind> = BTreeSet::new();
        let mut source_names: BTreeSet<String> = BTreeSet::new();
        if let Some(ref boundary) = boundary {
            sources.insert(SourceKind::Boundary);
            source_names.extend(boundary.source_names.iter().cloned());
        }
        if let Some(stat) = stat {
            sources.insert(SourceKind::OfficialStat);
            source_names.extend(stat.source_names.iter().cloned());
        }
        if osm.contains_key(&canonical_name) {
            sources.insert(SourceKind::CrowdSource);
        }

        let unit_kind = match (stat, &boundary) {
            (Some(stat), Some(boundary)) => {
                if stat.unit_kind != boundary.unit_kind {
                    ret.diagnostics.kind_collisions.push(canonical_name.clone());
                }
                stat.unit_kind
            }
            (Some(stat), None) => stat.unit_kind,
            (None, Some(boundary)) => boundary.unit_kind,
            (None, None) => UnitKind::Municipality,
        };

        let official_road_km = stat.and_then(|i| i.official_road_km);
        let data_quality_flag = if official_road_km.is_none() && aggregate.osm_road_km > 0.0 {
            DataQualityFlag::MissingOfficialData
        } else {
            DataQualityFlag::Complete
        };

        if sources.len() < ALL_SOURCES.len() {
            let missing_from: Vec<SourceKind> = ALL_SOURCES
                .iter()
                .filter(|i| !sources.contains(*i))
                .copied()
                .collect();
            log::warn!(
                "reconcile: '{}' is missing from {:?}, spellings: {:?}",
                canonical_name,
                missing_from,
                source_names
            );
            if sources.len() == 1 {
                ret.diagnostics.single_source_count += 1;
            }
            ret.diagnostics.orphans.push(Orphan {
                canonical_name: canonical_name.clone(),
                found_in: sources.iter().copied().collect(),
                missing_from,
                source_names: source_names.iter().cloned().collect(),
            });
        }

        let (boundary_geometry, area_km2) = match boundary {
            Some(boundary) => (Some(boundary.geometry), Some(boundary.area_km2)),
            None => (None, None),
        };
        ret.units.push(ReconciledUnit {
            canonical_name,
            source_names,
            sources,
            unit_kind,
            boundary_geometry,
            area_km2,
            osm_road_km: aggregate.osm_road_km,
            segment_count: aggregate.segment_count,
            official_road_km,
            data_quality_flag,
        });
    }
    ret.diagnostics.unit_count = ret.units.len();
    ret
}
