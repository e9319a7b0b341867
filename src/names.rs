/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The names module maps administrative unit labels from the boundary, official and OSM
//! vocabularies to one canonical reconciliation key.

use crate::context;
use crate::units::SourceKind;
use crate::units::UnitKind;
use crate::util;
use anyhow::Context as _;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// A trailing unit type word, e.g. "novads".
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitSuffixDict {
    /// The unit kind this word implies.
    pub kind: UnitKind,
    /// The name before this word is in genitive case.
    #[serde(default)]
    pub genitive: bool,
}

/// A regular genitive to nominative ending rewrite.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseEndingDict {
    /// Ending in genitive case.
    pub inflected: String,
    /// The same ending in nominative case.
    pub nominative: String,
}

/// NameTableDict is the parsed form of data/names.yaml.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NameTableDict {
    /// Inflected label -> canonical name.
    pub irregular: BTreeMap<String, String>,
    /// Unit type word -> its properties.
    pub unit_suffixes: BTreeMap<String, UnitSuffixDict>,
    /// Applied after stripping a genitive unit suffix.
    pub case_endings: Vec<CaseEndingDict>,
    /// Patterns of qualifier clauses to remove.
    pub qualifiers: Vec<String>,
    /// Patterns of official rows which aggregate several units.
    pub aggregates: Vec<String>,
}

/// The result of normalizing one label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedName {
    /// The reconciliation key.
    pub canonical: String,
    /// Unit kind, if the label had a unit type word.
    pub unit_kind: Option<UnitKind>,
}

/// Canonicalizes administrative unit names.
pub struct NameNormalizer {
    /// Lowercase label -> canonical name.
    irregular: HashMap<String, String>,
    /// Longest first, so "valstspilsēta" wins over "pilsēta".
    suffixes: Vec<(String, UnitSuffixDict)>,
    /// Longest first.
    case_endings: Vec<(String, String)>,
    qualifiers: Vec<regex::Regex>,
    aggregates: Vec<regex::Regex>,
}

impl NameNormalizer {
    /// Builds a normalizer from an already parsed name table.
    pub fn new(dict: &NameTableDict) -> anyhow::Result<Self> {
        let irregular: HashMap<String, String> = dict
            .irregular
            .iter()
            .map(|(key, value)| {
                (
                    util::collapse_whitespace(key).to_lowercase(),
                    util::collapse_whitespace(value),
                )
            })
            .collect();

        let mut suffixes: Vec<(String, UnitSuffixDict)> = Vec::new();
        for (suffix, value) in &dict.unit_suffixes {
            let suffix = suffix.trim();
            if suffix.is_empty() || suffix.contains(char::is_whitespace) {
                return Err(anyhow::anyhow!(
                    "unit suffix '{suffix}' is not a single word"
                ));
            }
            suffixes.push((suffix.to_lowercase(), value.clone()));
        }
        suffixes.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()).then(a.0.cmp(&b.0)));

        let mut case_endings: Vec<(String, String)> = dict
            .case_endings
            .iter()
            .map(|i| (i.inflected.clone(), i.nominative.clone()))
            .collect();
        case_endings.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let qualifiers = compile_patterns(&dict.qualifiers)?;
        let aggregates = compile_patterns(&dict.aggregates)?;

        Ok(NameNormalizer {
            irregular,
            suffixes,
            case_endings,
            qualifiers,
            aggregates,
        })
    }

    /// Builds a normalizer from YAML text.
    pub fn from_yaml(data: &str) -> anyhow::Result<Self> {
        let dict: NameTableDict = serde_yaml::from_str(data)?;
        NameNormalizer::new(&dict)
    }

    /// Loads the name table configured for this context.
    pub fn load(ctx: &context::Context) -> anyhow::Result<Self> {
        let path = ctx.get_ini().get_names_path();
        let data = ctx.get_file_system().read_to_string(&path)?;
        NameNormalizer::from_yaml(&data).with_context(|| format!("failed to load '{path}'"))
    }

    /// Maps `label` to its canonical form. Unknown labels are returned trimmed, which makes them
    /// orphans later, but is not an error.
    pub fn normalize(&self, label: &str, source_kind: SourceKind) -> NormalizedName {
        let mut name = util::collapse_whitespace(label);
        for qualifier in &self.qualifiers {
            name = util::collapse_whitespace(&qualifier.replace_all(&name, ""));
        }

        let ret = if let Some(canonical) = self.irregular.get(&name.to_lowercase()) {
            NormalizedName {
                canonical: canonical.clone(),
                unit_kind: self.find_suffix(&name).map(|(_, suffix)| suffix.kind),
            }
        } else if let Some((head, suffix)) = self.find_suffix(&name) {
            let head = if suffix.genitive {
                self.to_nominative(head)
            } else {
                head.to_string()
            };
            NormalizedName {
                canonical: util::collapse_whitespace(&head),
                unit_kind: Some(suffix.kind),
            }
        } else {
            NormalizedName {
                canonical: name,
                unit_kind: None,
            }
        };

        log::debug!(
            "normalize: {:?} '{}' -> '{}'",
            source_kind,
            label,
            ret.canonical
        );
        ret
    }

    /// Decides if an official row label is an aggregate of several units.
    pub fn is_aggregate(&self, label: &str) -> bool {
        let label = util::collapse_whitespace(label);
        self.aggregates.iter().any(|i| i.is_match(&label))
    }

    /// Gets the distinct canonical values of the irregular table.
    pub fn get_irregular_values(&self) -> Vec<String> {
        let mut ret: Vec<String> = self.irregular.values().cloned().collect();
        ret.sort();
        ret.dedup();
        ret
    }

    /// Splits `name` into a head and a trailing unit type word, case-insensitively.
    fn find_suffix<'a>(&self, name: &'a str) -> Option<(&'a str, &UnitSuffixDict)> {
        let (head, last) = name.rsplit_once(' ')?;
        let last = last.to_lowercase();
        self.suffixes
            .iter()
            .find(|(suffix, _)| *suffix == last)
            .map(|(_, value)| (head.trim_end(), value))
    }

    fn to_nominative(&self, head: &str) -> String {
        for (inflected, nominative) in &self.case_endings {
            if let Some(stem) = head.strip_suffix(inflected.as_str()) {
                if !stem.is_empty() {
                    return format!("{stem}{nominative}");
                }
            }
        }
        head.to_string()
    }
}

fn compile_patterns(patterns: &[String]) -> anyhow::Result<Vec<regex::Regex>> {
    patterns
        .iter()
        .map(|i| regex::Regex::new(i).with_context(|| format!("invalid pattern '{i}'")))
        .collect()
}

#[cfg(test)]
mod tests;
