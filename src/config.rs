/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The config module describes one parameterized pipeline run: inputs, outputs, filters,
//! thresholds, spatial predicate and projection.

/// Paths of the input files, relative to the project root unless absolute.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputPaths {
    /// Official road statistics table (CSV).
    pub official_stats: String,
    /// Administrative boundaries (GeoJSON, WGS84).
    pub boundaries: String,
    /// OSM road segments (GeoJSON, WGS84).
    pub roads: String,
    /// Irregular name table (YAML).
    pub names: String,
}

impl Default for InputPaths {
    fn default() -> Self {
        InputPaths {
            official_stats: "workdir/official_road_stats.csv".into(),
            boundaries: "workdir/municipalities.geojson".into(),
            roads: "workdir/roads.geojson".into(),
            names: "data/names.yaml".into(),
        }
    }
}

/// Paths of the output files.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPaths {
    /// One row per unit.
    pub table: String,
    /// One feature per unit.
    pub geojson: String,
    /// Rollup and diagnostics.
    pub summary: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        OutputPaths {
            table: "workdir/completeness.csv".into(),
            geojson: "workdir/completeness.geojson".into(),
            summary: "workdir/summary.json".into(),
        }
    }
}

/// Column names of the official statistics table.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OfficialColumns {
    /// Territorial unit label column.
    pub territorial_unit: String,
    /// Surface type label column.
    pub surface_type: String,
    /// Indicator label column.
    pub indicator: String,
    /// Length value column, empty means the last column.
    pub value: String,
}

impl Default for OfficialColumns {
    fn default() -> Self {
        OfficialColumns {
            territorial_unit: "Territorial unit".into(),
            surface_type: "Types of surface".into(),
            indicator: "Indicator".into(),
            value: String::new(),
        }
    }
}

/// Selects the single aggregate row of a unit from the per-surface-type breakdown.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrandTotalFilter {
    /// Expected indicator label.
    pub indicator_label: String,
    /// Expected surface type label.
    pub surface_type_label: String,
}

impl Default for GrandTotalFilter {
    fn default() -> Self {
        GrandTotalFilter {
            indicator_label: "Total".into(),
            surface_type_label: "Total".into(),
        }
    }
}

impl GrandTotalFilter {
    /// Decides if a row is a grand total row.
    pub fn matches(&self, indicator_label: &str, surface_type_label: &str) -> bool {
        indicator_label.trim() == self.indicator_label && surface_type_label.trim() == self.surface_type_label
    }
}

/// Category breakpoints, applied to the completeness percentage.
///
/// `[0, partial_from)` is low, `[partial_from, complete_from)` is partial, `[complete_from,
/// complete_to]` is complete and anything above `complete_to` is over-mapped.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryThresholds {
    /// Lower bound of the partial category, inclusive.
    pub partial_from: f64,
    /// Lower bound of the complete category, inclusive.
    pub complete_from: f64,
    /// Upper bound of the complete category, inclusive.
    pub complete_to: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        CategoryThresholds {
            partial_from: 50.0,
            complete_from: 80.0,
            complete_to: 100.0,
        }
    }
}

impl CategoryThresholds {
    fn validate(&self) -> anyhow::Result<()> {
        let values = [self.partial_from, self.complete_from, self.complete_to];
        if values.iter().any(|i| !i.is_finite()) {
            return Err(anyhow::anyhow!("category thresholds must be finite"));
        }
        if !(0.0 < self.partial_from
            && self.partial_from < self.complete_from
            && self.complete_from < self.complete_to)
        {
            return Err(anyhow::anyhow!(
                "expected 0 < partial_from < complete_from < complete_to, got {} / {} / {}",
                self.partial_from,
                self.complete_from,
                self.complete_to
            ));
        }
        Ok(())
    }
}

/// How a road segment is attributed to a boundary polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialPredicate {
    /// A segment belongs to every polygon it touches.
    #[default]
    Intersects,
    /// A segment belongs only to a polygon that fully contains it.
    Contains,
}

/// The metric reference system used for lengths, areas and intersection tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Projection {
    /// ETRS89 / LAEA Europe, EPSG:3035.
    #[default]
    #[serde(rename = "etrs89-laea", alias = "EPSG:3035")]
    Etrs89Laea,
}

/// One pipeline run's configuration, see workdir/config.toml.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Input files.
    pub inputs: InputPaths,
    /// Output files.
    pub outputs: OutputPaths,
    /// Columns of the official table.
    pub official_columns: OfficialColumns,
    /// Number of title lines before the header of the official table.
    pub official_header_skip: usize,
    /// Grand total row selection.
    pub grand_total: GrandTotalFilter,
    /// Category breakpoints.
    pub categories: CategoryThresholds,
    /// Segment to polygon attribution.
    pub spatial_predicate: SpatialPredicate,
    /// Metric reference system.
    pub projection: Projection,
    /// `highway` values which are not physical roads.
    pub excluded_highway_types: Vec<String>,
    /// Name property of boundary features.
    pub boundary_name_property: String,
    /// If set, road features already carry their unit name in this property and no spatial
    /// assignment happens.
    pub road_unit_property: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            inputs: InputPaths::default(),
            outputs: OutputPaths::default(),
            official_columns: OfficialColumns::default(),
            official_header_skip: 2,
            grand_total: GrandTotalFilter::default(),
            categories: CategoryThresholds::default(),
            spatial_predicate: SpatialPredicate::default(),
            projection: Projection::default(),
            excluded_highway_types: vec![
                "proposed".into(),
                "construction".into(),
                "abandoned".into(),
            ],
            boundary_name_property: "shapeName".into(),
            road_unit_property: None,
        }
    }
}

impl PipelineConfig {
    /// Checks the constraints serde can't express.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.categories.validate()?;
        if self.boundary_name_property.is_empty() {
            return Err(anyhow::anyhow!("boundary_name_property is empty"));
        }
        if self.grand_total.indicator_label.is_empty() || self.grand_total.surface_type_label.is_empty() {
            return Err(anyhow::anyhow!("grand_total labels must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
