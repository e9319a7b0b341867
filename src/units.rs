/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The units module contains the per administrative unit records the pipeline produces.

use std::collections::BTreeSet;

/// Kind of an administrative unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Municipality (novads).
    Municipality,
    /// State city (valstspilsēta).
    StateCity,
}

/// Which input a name or a value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Administrative boundary polygons.
    Boundary,
    /// Official road statistics table.
    OfficialStat,
    /// Crowd-sourced (OSM) road segments.
    CrowdSource,
}

/// Completeness category, ordered from worst to best, then over-mapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// No completeness percentage.
    NoData,
    /// Below the partial threshold.
    Low,
    /// Between the partial and complete thresholds.
    Partial,
    /// Within the complete range, upper bound included.
    Complete,
    /// Above the complete range.
    OverMapped,
}

impl Category {
    /// All categories, in order.
    pub const ALL: [Category; 5] = [
        Category::NoData,
        Category::Low,
        Category::Partial,
        Category::Complete,
        Category::OverMapped,
    ];

    /// Gets the serialized name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NoData => "no_data",
            Category::Low => "low",
            Category::Partial => "partial",
            Category::Complete => "complete",
            Category::OverMapped => "over_mapped",
        }
    }
}

/// Whether the official side of a unit is usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityFlag {
    /// Nothing is missing that would make the percentage misleading.
    Complete,
    /// OSM has roads here, but there is no official length to compare with.
    MissingOfficialData,
}

/// One unit after the outer join, before scoring.
#[derive(Clone, Debug)]
pub struct ReconciledUnit {
    /// The reconciliation key.
    pub canonical_name: String,
    /// Raw spellings seen in the inputs.
    pub source_names: BTreeSet<String>,
    /// Inputs this unit was found in.
    pub sources: BTreeSet<SourceKind>,
    /// Municipality or state city.
    pub unit_kind: UnitKind,
    /// Dissolved boundary, in the metric projection.
    pub boundary_geometry: Option<geo::MultiPolygon<f64>>,
    /// Area of the boundary.
    pub area_km2: Option<f64>,
    /// Length of the attributed OSM roads.
    pub osm_road_km: f64,
    /// Number of attributed OSM road segments.
    pub segment_count: u64,
    /// Official road length.
    pub official_road_km: Option<f64>,
    /// Missing data classification.
    pub data_quality_flag: DataQualityFlag,
}

/// Derived metrics of one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitScore {
    /// OSM length relative to the official length, in percent, rounded to 1 digit.
    pub completeness_pct: Option<f64>,
    /// Category of `completeness_pct`.
    pub category: Category,
    /// Official length not yet in OSM, clamped at zero.
    pub km_to_map: Option<f64>,
    /// OSM length above the official length, clamped at zero.
    pub excess_km: Option<f64>,
    /// OSM road length per area, rounded to 3 digits.
    pub road_density_km_per_km2: Option<f64>,
}

/// The central entity: one reconciled and scored administrative unit.
#[derive(Clone, Debug)]
pub struct AdministrativeUnit {
    /// The reconciliation key.
    pub canonical_name: String,
    /// Raw spellings seen in the inputs.
    pub source_names: BTreeSet<String>,
    /// Inputs this unit was found in.
    pub sources: BTreeSet<SourceKind>,
    /// Municipality or state city.
    pub unit_kind: UnitKind,
    /// Dissolved boundary, in the metric projection.
    pub boundary_geometry: Option<geo::MultiPolygon<f64>>,
    /// Area of the boundary.
    pub area_km2: Option<f64>,
    /// Length of the attributed OSM roads.
    pub osm_road_km: f64,
    /// Number of attributed OSM road segments.
    pub segment_count: u64,
    /// Official road length.
    pub official_road_km: Option<f64>,
    /// Missing data classification.
    pub data_quality_flag: DataQualityFlag,
    /// Derived metrics.
    pub score: UnitScore,
}

impl AdministrativeUnit {
    /// Combines a reconciled unit with its score.
    pub fn new(unit: ReconciledUnit, score: UnitScore) -> Self {
        AdministrativeUnit {
            canonical_name: unit.canonical_name,
            source_names: unit.source_names,
            sources: unit.sources,
            unit_kind: unit.unit_kind,
            boundary_geometry: unit.boundary_geometry,
            area_km2: unit.area_km2,
            osm_road_km: unit.osm_road_km,
            segment_count: unit.segment_count,
            official_road_km: unit.official_road_km,
            data_quality_flag: unit.data_quality_flag,
            score,
        }
    }
}
