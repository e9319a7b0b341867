/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The score module derives the completeness percentage, its category and the deficit metrics.

use crate::aggregate::CompensatedSum;
use crate::config::CategoryThresholds;
use crate::units::AdministrativeUnit;
use crate::units::Category;
use crate::units::DataQualityFlag;
use crate::units::ReconciledUnit;
use crate::units::UnitKind;
use crate::units::UnitScore;
use crate::util;
use std::collections::BTreeMap;

/// OSM length relative to the official length, rounded to 1 digit. None when there is nothing to
/// compare with, so no division by zero.
pub fn completeness_pct(osm_road_km: f64, official_road_km: Option<f64>) -> Option<f64> {
    match official_road_km {
        Some(official) if official > 0.0 => Some(util::round_to(osm_road_km / official * 100.0, 1)),
        _ => None,
    }
}

/// Maps a percentage to exactly one category. The upper bound of the complete range is still
/// complete.
pub fn categorize(completeness_pct: Option<f64>, thresholds: &CategoryThresholds) -> Category {
    match completeness_pct {
        None => Category::NoData,
        Some(pct) if pct < thresholds.partial_from => Category::Low,
        Some(pct) if pct < thresholds.complete_from => Category::Partial,
        Some(pct) if pct <= thresholds.complete_to => Category::Complete,
        Some(_) => Category::OverMapped,
    }
}

/// Computes the derived metrics of one unit.
pub fn score_unit(unit: &ReconciledUnit, thresholds: &CategoryThresholds) -> UnitScore {
    let completeness_pct = completeness_pct(unit.osm_road_km, unit.official_road_km);
    let category = categorize(completeness_pct, thresholds);
    let km_to_map = unit
        .official_road_km
        .map(|official| (official - unit.osm_road_km).max(0.0));
    let excess_km = unit
        .official_road_km
        .map(|official| (unit.osm_road_km - official).max(0.0));
    let road_density_km_per_km2 = match unit.area_km2 {
        Some(area) if area > 0.0 => Some(util::round_to(unit.osm_road_km / area, 3)),
        _ => None,
    };
    UnitScore {
        completeness_pct,
        category,
        km_to_map,
        excess_km,
        road_density_km_per_km2,
    }
}

/// Scores all units, keeping their order.
pub fn score_units(
    units: Vec<ReconciledUnit>,
    thresholds: &CategoryThresholds,
) -> Vec<AdministrativeUnit> {
    units
        .into_iter()
        .map(|unit| {
            let score = score_unit(&unit, thresholds);
            AdministrativeUnit::new(unit, score)
        })
        .collect()
}

/// Totals over all units.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Rollup {
    /// Number of units.
    pub unit_count: usize,
    /// Number of municipalities.
    pub municipality_count: usize,
    /// Number of state cities.
    pub state_city_count: usize,
    /// OSM length of all units.
    pub total_osm_km: f64,
    /// Official length of all units which have one.
    pub total_official_km: f64,
    /// OSM length of the units with a non-zero official length.
    pub scored_osm_km: f64,
    /// The headline number: ratio of sums, rounded to 2 digits.
    pub overall_completeness_pct: Option<f64>,
    /// Unweighted mean of the unit percentages, rounded to 2 digits. Small units count as much as
    /// large ones, so this is not the headline.
    pub mean_completeness_pct: Option<f64>,
    /// Mean percentage of municipalities.
    pub municipality_mean_completeness_pct: Option<f64>,
    /// Mean percentage of state cities.
    pub state_city_mean_completeness_pct: Option<f64>,
    /// Category name -> number of units.
    pub category_counts: BTreeMap<String, usize>,
    /// Units flagged as missing official data.
    pub missing_official_data_count: usize,
    /// Official length not yet in OSM.
    pub total_km_to_map: f64,
    /// OSM length above the official length.
    pub total_excess_km: f64,
}

fn mean_pct<'a>(units: impl Iterator<Item = &'a AdministrativeUnit>) -> Option<f64> {
    let percentages: Vec<f64> = units.filter_map(|i| i.score.completeness_pct).collect();
    if percentages.is_empty() {
        return None;
    }
    let sum: CompensatedSum = percentages.iter().copied().collect();
    Some(util::round_to(sum.value() / percentages.len() as f64, 2))
}

/// Computes the totals.
pub fn rollup(units: &[AdministrativeUnit]) -> Rollup {
    let total_osm: CompensatedSum = units.iter().map(|i| i.osm_road_km).collect();
    let total_official: CompensatedSum = units.iter().filter_map(|i| i.official_road_km).collect();
    let scored: Vec<&AdministrativeUnit> = units
        .iter()
        .filter(|i| i.score.completeness_pct.is_some())
        .collect();
    let scored_osm: CompensatedSum = scored.iter().map(|i| i.osm_road_km).collect();
    let scored_official: CompensatedSum =
        scored.iter().filter_map(|i| i.official_road_km).collect();
    let overall_completeness_pct = if scored_official.value() > 0.0 {
        Some(util::round_to(
            scored_osm.value() / scored_official.value() * 100.0,
            2,
        ))
    } else {
        None
    };

    let mut category_counts: BTreeMap<String, usize> = Category::ALL
        .iter()
        .map(|i| (i.as_str().to_string(), 0))
        .collect();
    for unit in units {
        *category_counts
            .entry(unit.score.category.as_str().to_string())
            .or_default() += 1;
    }

    let total_km_to_map: CompensatedSum = units.iter().filter_map(|i| i.score.km_to_map).collect();
    let total_excess_km: CompensatedSum = units.iter().filter_map(|i| i.score.excess_km).collect();

    Rollup {
        unit_count: units.len(),
        municipality_count: units
            .iter()
            .filter(|i| i.unit_kind == UnitKind::Municipality)
            .count(),
        state_city_count: units
            .iter()
            .filter(|i| i.unit_kind == UnitKind::StateCity)
            .count(),
        total_osm_km: total_osm.value(),
        total_official_km: total_official.value(),
        scored_osm_km: scored_osm.value(),
        overall_completeness_pct,
        mean_completeness_pct: mean_pct(units.iter()),
        municipality_mean_completeness_pct: mean_pct(
            units.iter().filter(|i| i.unit_kind == UnitKind::Municipality),
        ),
        state_city_mean_completeness_pct: mean_pct(
            units.iter().filter(|i| i.unit_kind == UnitKind::StateCity),
        ),
        category_counts,
        missing_official_data_count: units
            .iter()
            .filter(|i| i.data_quality_flag == DataQualityFlag::MissingOfficialData)
            .count(),
        total_km_to_map: total_km_to_map.value(),
        total_excess_km: total_excess_km.value(),
    }
}
