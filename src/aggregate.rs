/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The aggregate module reduces per-segment lengths to per-unit totals and boundary fragments to
//! one geometry per unit.

use crate::boundaries::BoundaryFragment;
use crate::projection;
use crate::units::UnitKind;
use geo::BooleanOps as _;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Neumaier's compensated summation: keeps the rounding error of each addition and adds it back
/// at the end.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    /// Adds one term.
    pub fn add(&mut self, value: f64) {
        let sum = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - sum) + value;
        } else {
            self.compensation += (value - sum) + self.sum;
        }
        self.sum = sum;
    }

    /// Gets the sum of the terms so far.
    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut ret = CompensatedSum::default();
        for value in iter {
            ret.add(value);
        }
        ret
    }
}

/// Road length and segment count of one unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LengthAggregate {
    /// Total length.
    pub osm_road_km: f64,
    /// Number of contributing segments.
    pub segment_count: u64,
}

/// Sums `(unit, length_km)` pairs per unit.
pub fn aggregate_lengths<'a, I>(pairs: I) -> BTreeMap<String, LengthAggregate>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut sums: BTreeMap<String, (CompensatedSum, u64)> = BTreeMap::new();
    for (unit, length_km) in pairs {
        let entry = sums.entry(unit.to_string()).or_default();
        entry.0.add(length_km);
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(unit, (sum, count))| {
            (
                unit,
                LengthAggregate {
                    osm_road_km: sum.value(),
                    segment_count: count,
                },
            )
        })
        .collect()
}

/// The dissolved boundary of one unit.
#[derive(Clone, Debug)]
pub struct Boundary {
    /// Normalized name.
    pub canonical_name: String,
    /// Names of the fragments as found in the input.
    pub source_names: BTreeSet<String>,
    /// Unit kind of the first fragment.
    pub unit_kind: UnitKind,
    /// Union of the fragments, possibly multi-part.
    pub geometry: geo::MultiPolygon<f64>,
    /// Area of `geometry`.
    pub area_km2: f64,
    /// Number of input fragments.
    pub fragment_count: usize,
}

/// Unions fragments sharing a canonical name. Overlaps are only counted once; a non-contiguous
/// unit stays one unit with several parts.
pub fn dissolve_boundaries(fragments: Vec<BoundaryFragment>) -> BTreeMap<String, Boundary> {
    let mut groups: BTreeMap<String, Vec<BoundaryFragment>> = BTreeMap::new();
    for fragment in fragments {
        groups
            .entry(fragment.canonical_name.clone())
            .or_default()
            .push(fragment);
    }

    let mut ret: BTreeMap<String, Boundary> = BTreeMap::new();
    for (canonical_name, group) in groups {
        let fragment_count = group.len();
        let unit_kind = group[0].unit_kind;
        let mut source_names: BTreeSet<String> = BTreeSet::new();
        let mut geometry: Option<geo::MultiPolygon<f64>> = None;
        for fragment in group {
            if fragment.unit_kind != unit_kind {
                log::warn!(
                    "dissolve_boundaries: '{}' is both {:?} and {:?}",
                    canonical_name,
                    unit_kind,
                    fragment.unit_kind
                );
            }
            source_names.insert(fragment.source_name);
            geometry = Some(match geometry {
                Some(union) => union.union(&fragment.geometry),
                None => fragment.geometry,
            });
        }
        let geometry = geometry.unwrap_or_else(|| geo::MultiPolygon::new(Vec::new()));
        if fragment_count > 1 {
            log::debug!(
                "dissolve_boundaries: '{}': {} fragments -> {} parts",
                canonical_name,
                fragment_count,
                geometry.0.len()
            );
        }

        let area_km2 = projection::area_km2(&geometry);
        ret.insert(
            canonical_name.clone(),
            Boundary {
                canonical_name,
                source_names,
                unit_kind,
                geometry,
                area_km2,
                fragment_count,
            },
        );
    }
    ret
}
