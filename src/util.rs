/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The util module contains functionality shared between other modules.

use lazy_static::lazy_static;
use std::io::Read;

lazy_static! {
    static ref WHITESPACE: regex::Regex = regex::Regex::new(r"\s+").unwrap();
}

/// Like Read, but for CSV reading.
pub struct CsvRead<'a> {
    reader: csv::Reader<&'a mut dyn Read>,
}

impl<'a> CsvRead<'a> {
    /// Creates a reader of comma-separated rows, the first row being the header.
    pub fn new(read: &'a mut dyn Read) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .double_quote(true)
            .from_reader(read);
        CsvRead { reader }
    }

    /// Gets the header row.
    pub fn headers(&mut self) -> anyhow::Result<csv::StringRecord> {
        Ok(self.reader.headers()?.clone())
    }

    /// Gets access to the rows of the CSV.
    pub fn records(&mut self) -> csv::StringRecordsIter<'_, &'a mut dyn Read> {
        self.reader.records()
    }
}

/// Replaces whitespace runs with a single space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Rounds `value` to `digits` decimal digits, half away from zero.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10_f64.powi(digits);
    let ret = (value * factor).round() / factor;
    // Avoid "-0" in the output.
    if ret == 0.0 { 0.0 } else { ret }
}

/// Formats a percentage with 2 digits, or a dash for missing values.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}%"),
        None => "-".into(),
    }
}

/// Formats a length in km with 1 digit.
pub fn format_km(value: f64) -> String {
    format!("{value:.1} km")
}
