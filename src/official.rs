/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The official module reads the government road length statistics table.

use crate::config;
use crate::context;
use crate::names;
use crate::units::SourceKind;
use crate::units::UnitKind;
use crate::util;
use anyhow::Context as _;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io::Cursor;

/// Values which mean "no data" in the statistics portal exports.
const PLACEHOLDERS: [&str; 8] = ["…", "...", "-", "–", "—", "..", "x", ""];

/// One row of the official table, as found in the input.
#[derive(Clone, Debug, PartialEq)]
pub struct RawOfficialStatRow {
    /// Unit name, any spelling.
    pub territorial_unit_label: String,
    /// E.g. "Total" or "Gravel".
    pub surface_type_label: String,
    /// E.g. "Total" or "State roads".
    pub indicator_label: String,
    /// Road length for the selected year, as text.
    pub length_value: String,
}

/// Counters of the official table rows.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct OfficialDiagnostics {
    /// Data rows after the header.
    pub total_rows: u64,
    /// Rows about a statistical region or the whole country.
    pub aggregate_rows: u64,
    /// Per surface type or per indicator breakdown rows, ignored.
    pub breakdown_rows: u64,
    /// Grand total rows which were used.
    pub grand_total_rows: u64,
    /// Grand total rows with a "no data" marker.
    pub placeholder_rows: u64,
    /// Rows dropped because their value is not a number.
    pub malformed_rows: u64,
}

/// The official road length of one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct OfficialStat {
    /// Normalized name.
    pub canonical_name: String,
    /// Labels seen for this unit.
    pub source_names: BTreeSet<String>,
    /// A label without a unit type word is a state city.
    pub unit_kind: UnitKind,
    /// Sum of the grand total rows, None if they are all "no data".
    pub official_road_km: Option<f64>,
}

/// The parsed official table.
#[derive(Clone, Debug, Default)]
pub struct OfficialTable {
    /// Canonical name -> official length.
    pub stats: BTreeMap<String, OfficialStat>,
    /// What was dropped and why.
    pub diagnostics: OfficialDiagnostics,
}

/// Parses one length value: Ok(None) for "no data", an error for anything else that is not a
/// non-negative number.
pub fn parse_length_value(text: &str) -> anyhow::Result<Option<f64>> {
    let text = text.trim();
    if PLACEHOLDERS.contains(&text) {
        return Ok(None);
    }

    let mut number: String = text
        .chars()
        .filter(|i| *i != ' ' && *i != '\u{a0}' && *i != '\u{202f}')
        .collect();
    if let Some(position) = number.find(',') {
        // A comma is only a decimal separator when it can't be a thousands separator.
        let fraction = &number[position + 1..];
        if number.contains('.')
            || fraction.contains(',')
            || (fraction.len() == 3 && fraction.chars().all(|i| i.is_ascii_digit()))
        {
            return Err(anyhow::anyhow!("'{text}' has an ambiguous comma"));
        }
        number = number.replace(',', ".");
    }
    let value: f64 = number
        .parse()
        .with_context(|| format!("'{text}' is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(anyhow::anyhow!("'{text}' is not a valid length"));
    }
    Ok(Some(value))
}

fn find_column(headers: &csv::StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|i| i.trim() == name)
        .with_context(|| format!("missing column '{name}'"))
}

/// Reads the rows of the table, after skipping the title lines. A missing column is an error.
pub fn read_rows(
    data: &str,
    config: &config::PipelineConfig,
) -> anyhow::Result<Vec<RawOfficialStatRow>> {
    let data = data.strip_prefix('\u{feff}').unwrap_or(data);
    let body: String = data
        .split_inclusive('\n')
        .skip(config.official_header_skip)
        .collect();
    let body = body.strip_prefix('\u{feff}').unwrap_or(&body);

    let mut cursor = Cursor::new(body.as_bytes());
    let mut csv_read = util::CsvRead::new(&mut cursor);
    let headers = csv_read.headers()?;
    let columns = &config.official_columns;
    let unit_index = find_column(&headers, &columns.territorial_unit)?;
    let surface_index = find_column(&headers, &columns.surface_type)?;
    let indicator_index = find_column(&headers, &columns.indicator)?;
    let value_index = if columns.value.is_empty() {
        match headers.len() {
            0 => return Err(anyhow::anyhow!("empty header")),
            len => len - 1,
        }
    } else {
        find_column(&headers, &columns.value)?
    };

    let mut rows: Vec<RawOfficialStatRow> = Vec::new();
    for result in csv_read.records() {
        let record = result?;
        if record.iter().all(|i| i.trim().is_empty()) {
            continue;
        }
        let get = |index: usize| record.get(index).unwrap_or("").to_string();
        rows.push(RawOfficialStatRow {
            territorial_unit_label: get(unit_index),
            surface_type_label: get(surface_index),
            indicator_label: get(indicator_index),
            length_value: get(value_index),
        });
    }
    Ok(rows)
}

/// Reduces the rows to one value per canonical name, only summing grand total rows.
pub fn reduce_rows(
    rows: &[RawOfficialStatRow],
    config: &config::PipelineConfig,
    normalizer: &names::NameNormalizer,
) -> OfficialTable {
    let mut ret = OfficialTable::default();
    for row in rows {
        ret.diagnostics.total_rows += 1;
        let label = &row.territorial_unit_label;
        if normalizer.is_aggregate(label) {
            ret.diagnostics.aggregate_rows += 1;
            continue;
        }
        if !config
            .grand_total
            .matches(&row.indicator_label, &row.surface_type_label)
        {
            ret.diagnostics.breakdown_rows += 1;
            continue;
        }

        let value = match parse_length_value(&row.length_value) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("reduce_rows: dropping row of '{label}': {err}");
                ret.diagnostics.malformed_rows += 1;
                continue;
            }
        };
        ret.diagnostics.grand_total_rows += 1;
        if value.is_none() {
            ret.diagnostics.placeholder_rows += 1;
        }

        let normalized = normalizer.normalize(label, SourceKind::OfficialStat);
        let stat = ret
            .stats
            .entry(normalized.canonical.clone())
            .or_insert_with(|| OfficialStat {
                canonical_name: normalized.canonical.clone(),
                source_names: BTreeSet::new(),
                unit_kind: normalized.unit_kind.unwrap_or(UnitKind::StateCity),
                official_road_km: None,
            });
        stat.source_names.insert(util::collapse_whitespace(label));
        stat.official_road_km = match (stat.official_road_km, value) {
            (Some(sum), Some(value)) => Some(sum + value),
            (sum, None) => sum,
            (None, value) => value,
        };
    }

    log::info!(
        "reduce_rows: {} units from {} rows, {} malformed, {} placeholders",
        ret.stats.len(),
        ret.diagnostics.total_rows,
        ret.diagnostics.malformed_rows,
        ret.diagnostics.placeholder_rows
    );
    ret
}

/// Parses the full official table.
pub fn parse_official(
    data: &str,
    config: &config::PipelineConfig,
    normalizer: &names::NameNormalizer,
) -> anyhow::Result<OfficialTable> {
    let rows = read_rows(data, config)?;
    Ok(reduce_rows(&rows, config, normalizer))
}

/// Loads the official table configured for this context.
pub fn load_official(
    ctx: &context::Context,
    normalizer: &names::NameNormalizer,
) -> anyhow::Result<OfficialTable> {
    let path = ctx.get_ini().get_official_stats_path();
    let data = ctx.get_file_system().read_to_string(&path)?;
    parse_official(&data, ctx.get_ini().get_config(), normalizer)
        .with_context(|| format!("failed to parse official statistics from '{path}'"))
}
