/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the config module.

use super::*;

/// Tests the defaults: the canonical 50/80/100 scheme and intersection attribution.
#[test]
fn test_pipeline_config_default() {
    let config = PipelineConfig::default();

    assert_eq!(config.categories.partial_from, 50.0);
    assert_eq!(config.categories.complete_from, 80.0);
    assert_eq!(config.categories.complete_to, 100.0);
    assert_eq!(config.spatial_predicate, SpatialPredicate::Intersects);
    assert_eq!(config.projection, Projection::Etrs89Laea);
    assert_eq!(config.official_header_skip, 2);
    assert_eq!(config.validate().is_ok(), true);
}

/// Tests that non-ascending thresholds are rejected.
#[test]
fn test_pipeline_config_validate_thresholds() {
    let mut config = PipelineConfig::default();
    config.categories.complete_from = 40.0;

    assert_eq!(config.validate().is_err(), true);
}

/// Tests that unknown keys are rejected, so typos don't silently fall back to defaults.
#[test]
fn test_pipeline_config_unknown_key() {
    let ret = toml::from_str::<PipelineConfig>("[categories]\npartial_form = 70.0\n");

    assert_eq!(ret.is_err(), true);
}

/// Tests the projection alias.
#[test]
fn test_pipeline_config_projection_alias() {
    let config: PipelineConfig = toml::from_str("projection = \"EPSG:3035\"\n").unwrap();

    assert_eq!(config.projection, Projection::Etrs89Laea);
}

/// Tests GrandTotalFilter::matches().
#[test]
fn test_grand_total_filter_matches() {
    let filter = GrandTotalFilter::default();

    assert_eq!(filter.matches("Total", " Total "), true);
    assert_eq!(filter.matches("Total", "Asphalt concrete"), false);
    assert_eq!(filter.matches("State roads", "Total"), false);
}
