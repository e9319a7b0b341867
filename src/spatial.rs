/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The spatial module attributes road segments to the boundary polygons they belong to.
//!
//! With the intersects predicate, a segment crossing a border belongs to both units, so border
//! roads are counted twice. This matches "roads on the territory of the unit" and is reported as
//! `multi_assigned_segments` instead of being corrected.

use crate::aggregate::Boundary;
use crate::config::SpatialPredicate;
use crate::names;
use crate::roads::LineSegment;
use crate::units::SourceKind;
use crate::util;
use geo::BoundingRect as _;
use geo::Contains as _;
use geo::Intersects as _;
use rstar::AABB;
use rstar::RTree;
use rstar::RTreeObject;
use std::collections::BTreeMap;

/// A boundary polygon stored in the R-tree.
struct BoundaryEntry<'a> {
    canonical_name: &'a str,
    envelope: AABB<[f64; 2]>,
    polygon: &'a geo::MultiPolygon<f64>,
}

impl RTreeObject for BoundaryEntry<'_> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_envelope(rect: geo::Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// One (segment, unit) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribution {
    /// Id of the road segment.
    pub segment_id: String,
    /// Unit the segment belongs to.
    pub canonical_name: String,
    /// Full length of the segment.
    pub length_km: f64,
}

/// How much of the road network could be attributed.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SpatialDiagnostics {
    /// Input segments.
    pub total_segments: u64,
    /// Length of the input segments.
    pub total_km: f64,
    /// Segments attributed to no unit.
    pub unassigned_segments: u64,
    /// Length of the unattributed segments.
    pub unassigned_km: f64,
    /// `unassigned_km` relative to `total_km`, rounded to 2 digits.
    pub unassigned_pct: f64,
    /// Segments attributed to more than one unit.
    pub multi_assigned_segments: u64,
    /// Length counted more than once because of the above.
    pub double_counted_km: f64,
}

/// The attribution table with its diagnostics.
#[derive(Clone, Debug, Default)]
pub struct SpatialAssignment {
    /// Sorted by segment id, then unit name.
    pub attributions: Vec<Attribution>,
    /// Loss and double counting.
    pub diagnostics: SpatialDiagnostics,
}

impl SpatialAssignment {
    fn finish(mut self) -> Self {
        self.attributions.sort_by(|a, b| {
            a.segment_id
                .cmp(&b.segment_id)
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        });
        let diagnostics = &mut self.diagnostics;
        diagnostics.unassigned_pct = if diagnostics.total_km > 0.0 {
            util::round_to(diagnostics.unassigned_km / diagnostics.total_km * 100.0, 2)
        } else {
            0.0
        };
        log::info!(
            "spatial: {} of {} segments unassigned ({}% of the length), {} on borders",
            diagnostics.unassigned_segments,
            diagnostics.total_segments,
            diagnostics.unassigned_pct,
            diagnostics.multi_assigned_segments
        );
        self
    }

    fn record(&mut self, segment: &LineSegment, units: Vec<String>) {
        self.diagnostics.total_segments += 1;
        self.diagnostics.total_km += segment.length_km;
        match units.len() {
            0 => {
                self.diagnostics.unassigned_segments += 1;
                self.diagnostics.unassigned_km += segment.length_km;
            }
            1 => (),
            count => {
                self.diagnostics.multi_assigned_segments += 1;
                self.diagnostics.double_counted_km += segment.length_km * (count - 1) as f64;
            }
        }
        for canonical_name in units {
            self.attributions.push(Attribution {
                segment_id: segment.id.clone(),
                canonical_name,
                length_km: segment.length_km,
            });
        }
    }
}

/// Attributes each segment to every boundary matching `predicate`. The R-tree only lives for the
/// duration of this call.
pub fn assign_segments(
    segments: &[LineSegment],
    boundaries: &BTreeMap<String, Boundary>,
    predicate: SpatialPredicate,
) -> SpatialAssignment {
    let entries: Vec<BoundaryEntry<'_>> = boundaries
        .values()
        .filter_map(|boundary| {
            let rect = boundary.geometry.bounding_rect()?;
            Some(BoundaryEntry {
                canonical_name: &boundary.canonical_name,
                envelope: to_envelope(rect),
                polygon: &boundary.geometry,
            })
        })
        .collect();
    let tree = RTree::bulk_load(entries);

    let mut ret = SpatialAssignment::default();
    for segment in segments {
        let mut units: Vec<String> = Vec::new();
        if let Some(rect) = segment.raw_geometry.bounding_rect() {
            for entry in tree.locate_in_envelope_intersecting(&to_envelope(rect)) {
                let matches = match predicate {
                    SpatialPredicate::Intersects => entry.polygon.intersects(&segment.raw_geometry),
                    SpatialPredicate::Contains => entry.polygon.contains(&segment.raw_geometry),
                };
                if matches {
                    units.push(entry.canonical_name.to_string());
                }
            }
        }
        units.sort();
        ret.record(segment, units);
    }
    ret.finish()
}

/// Attributes segments using a property which already names their unit, no geometry involved.
pub fn assign_by_property(
    segments: &[LineSegment],
    property: &str,
    normalizer: &names::NameNormalizer,
) -> SpatialAssignment {
    let mut ret = SpatialAssignment::default();
    for segment in segments {
        let units: Vec<String> = segment
            .get_tag(property)
            .filter(|i| !i.trim().is_empty())
            .map(|label| normalizer.normalize(label, SourceKind::CrowdSource).canonical)
            .into_iter()
            .collect();
        ret.record(segment, units);
    }
    ret.finish()
}
