/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The validator module validates the name table under data/.

use crate::context;
use crate::names;
use crate::units::SourceKind;
use crate::util;
use std::collections::HashMap;
use std::io::Write;

/// Validates the irregular table: no empty entries, canonical values are not keys themselves.
/// Keys are compared case-insensitively, the same way the normalizer looks them up.
fn validate_irregular(errors: &mut Vec<String>, dict: &names::NameTableDict) {
    let mut keys: HashMap<String, &String> = HashMap::new();
    for key in dict.irregular.keys() {
        let folded = util::collapse_whitespace(key).to_lowercase();
        if let Some(other) = keys.insert(folded, key) {
            errors.push(format!(
                "keys 'irregular.{other}' and 'irregular.{key}' only differ in case"
            ));
        }
    }

    for (key, value) in &dict.irregular {
        if key.trim().is_empty() {
            errors.push("expected non-empty key in 'irregular'".into());
        }
        if value.trim().is_empty() {
            errors.push(format!("expected non-empty value for 'irregular.{key}'"));
            continue;
        }
        if keys.contains_key(&util::collapse_whitespace(value).to_lowercase()) {
            errors.push(format!(
                "canonical value '{value}' of 'irregular.{key}' is also a key, chains are not followed"
            ));
        }
    }
}

/// Validates the unit suffixes: each is one word.
fn validate_unit_suffixes(errors: &mut Vec<String>, dict: &names::NameTableDict) {
    for key in dict.unit_suffixes.keys() {
        if key.trim().is_empty() || key.trim().contains(char::is_whitespace) {
            errors.push(format!("expected a single word for 'unit_suffixes.{key}'"));
        }
    }
}

/// Validates the case endings.
fn validate_case_endings(errors: &mut Vec<String>, dict: &names::NameTableDict) {
    for (index, case_ending) in dict.case_endings.iter().enumerate() {
        if case_ending.inflected.is_empty() {
            errors.push(format!(
                "expected non-empty 'case_endings[{index}].inflected'"
            ));
        }
    }
}

/// Validates a list of regular expressions.
fn validate_patterns(errors: &mut Vec<String>, parent: &str, patterns: &[String]) {
    for (index, pattern) in patterns.iter().enumerate() {
        if let Err(err) = regex::Regex::new(pattern) {
            errors.push(format!("failed to compile '{parent}[{index}]': {err}"));
        }
    }
}

/// Validates that the normalizer leaves canonical names alone, so normalizing twice is the same as
/// normalizing once.
fn validate_fixed_points(errors: &mut Vec<String>, dict: &names::NameTableDict) {
    let normalizer = match names::NameNormalizer::new(dict) {
        Ok(value) => value,
        Err(err) => {
            errors.push(format!("failed to build the normalizer: {err}"));
            return;
        }
    };
    for value in normalizer.get_irregular_values() {
        for source_kind in [
            SourceKind::Boundary,
            SourceKind::OfficialStat,
            SourceKind::CrowdSource,
        ] {
            let normalized = normalizer.normalize(&value, source_kind);
            if normalized.canonical != value {
                errors.push(format!(
                    "canonical value '{}' normalizes to '{}'",
                    value, normalized.canonical
                ));
                break;
            }
        }
    }
}

/// Validates a whole name table.
pub fn validate_names(errors: &mut Vec<String>, dict: &names::NameTableDict) {
    validate_irregular(errors, dict);
    validate_unit_suffixes(errors, dict);
    validate_case_endings(errors, dict);
    validate_patterns(errors, "qualifiers", &dict.qualifiers);
    validate_patterns(errors, "aggregates", &dict.aggregates);
    if errors.is_empty() {
        validate_fixed_points(errors, dict);
    }
}

/// Inner main() that is allowed to fail.
pub fn our_main(
    argv: &[String],
    stream: &mut dyn Write,
    ctx: &context::Context,
) -> anyhow::Result<i32> {
    let yaml_path = match argv.get(1) {
        Some(value) => ctx.get_abspath(value),
        None => ctx.get_ini().get_names_path(),
    };
    let data = ctx.get_file_system().read_to_string(&yaml_path)?;
    let dict: names::NameTableDict = match serde_yaml::from_str(&data) {
        Ok(value) => value,
        Err(err) => {
            stream.write_all(format!("failed to validate {yaml_path}: {err}\n").as_bytes())?;
            return Ok(1_i32);
        }
    };
    let mut errors: Vec<String> = Vec::new();
    validate_names(&mut errors, &dict);
    if !errors.is_empty() {
        for error in errors {
            stream.write_all(format!("failed to validate {yaml_path}: {error}\n").as_bytes())?;
        }
        return Ok(1_i32);
    }
    Ok(0_i32)
}

/// Commandline interface: validates the name table given as the first argument, the configured
/// one by default.
pub fn main(argv: &[String], stream: &mut dyn Write, ctx: &context::Context) -> i32 {
    match our_main(argv, stream, ctx) {
        Ok(value) => value,
        Err(err) => {
            let _ = stream.write_all(format!("{err:?}\n").as_bytes());
            1
        }
    }
}
