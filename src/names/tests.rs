/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the names module.

use super::*;

fn make_normalizer() -> NameNormalizer {
    NameNormalizer::from_yaml(include_str!("../../data/names.yaml")).unwrap()
}

fn canonical(normalizer: &NameNormalizer, label: &str, source_kind: SourceKind) -> String {
    normalizer.normalize(label, source_kind).canonical
}

/// Tests normalize(): all boundary labels of the 2021 municipalities.
#[test]
fn test_normalize_boundary_labels() {
    let normalizer = make_normalizer();
    let expected = [
        ("Aizkraukles novads", "Aizkraukle"),
        ("Alūksnes novads", "Alūksne"),
        ("Augšdaugavas novads", "Augšdaugava"),
        ("Balvu novads", "Balvi"),
        ("Bauskas novads", "Bauska"),
        ("Cēsu novads", "Cēsis"),
        ("Dienvidkurzemes novads", "Dienvidkurzeme"),
        ("Dobeles novads", "Dobele"),
        ("Gulbenes novads", "Gulbene"),
        ("Jelgavas novads", "Jelgava"),
        ("Jēkabpils novads", "Jēkabpils"),
        ("Krāslavas novads", "Krāslava"),
        ("Kuldīgas novads", "Kuldīga"),
        ("Limbažu novads", "Limbaži"),
        ("Ludzas novads", "Ludza"),
        ("Līvānu novads", "Līvāni"),
        ("Madonas novads", "Madona"),
        ("Mārupes novads", "Mārupe"),
        ("Ogres novads", "Ogre"),
        ("Olaines novads", "Olaine"),
        ("Preiļu novads", "Preiļi"),
        ("Ropažu novads", "Ropaži"),
        ("Rēzeknes novads", "Rēzekne"),
        ("Saldus novads", "Saldus"),
        ("Saulkrastu novads", "Saulkrasti"),
        ("Siguldas novads", "Sigulda"),
        ("Smiltenes novads", "Smiltene"),
        ("Talsu novads", "Talsi"),
        ("Tukuma novads", "Tukums"),
        ("Valkas novads", "Valka"),
        ("Valmieras novads", "Valmiera"),
        ("Varakļānu novads", "Varakļāni"),
        ("Ventspils novads", "Ventspils"),
        ("Ādažu novads", "Ādaži"),
        ("Ķekavas novads", "Ķekava"),
    ];
    for (label, name) in expected {
        assert_eq!(canonical(&normalizer, label, SourceKind::Boundary), name);
    }
}

/// Tests normalize(): the three vocabularies meet at the same key.
#[test]
fn test_normalize_across_sources() {
    let normalizer = make_normalizer();

    let boundary = normalizer.normalize("Cēsu novads", SourceKind::Boundary);
    let official = normalizer.normalize("Cēsis municipality", SourceKind::OfficialStat);
    let osm = normalizer.normalize("Cēsis", SourceKind::CrowdSource);

    assert_eq!(boundary.canonical, "Cēsis");
    assert_eq!(official.canonical, "Cēsis");
    assert_eq!(osm.canonical, "Cēsis");
    assert_eq!(boundary.unit_kind, Some(UnitKind::Municipality));
    assert_eq!(official.unit_kind, Some(UnitKind::Municipality));
    assert_eq!(osm.unit_kind, None);
}

/// Tests normalize(): state cities.
#[test]
fn test_normalize_state_city() {
    let normalizer = make_normalizer();

    let riga = normalizer.normalize("Riga", SourceKind::OfficialStat);
    assert_eq!(riga.canonical, "Rīga");
    assert_eq!(riga.unit_kind, None);

    let riga = normalizer.normalize("Rīgas valstspilsēta", SourceKind::Boundary);
    assert_eq!(riga.canonical, "Rīga");
    assert_eq!(riga.unit_kind, Some(UnitKind::StateCity));

    let jelgava = normalizer.normalize("Jelgava city", SourceKind::OfficialStat);
    assert_eq!(jelgava.canonical, "Jelgava");
    assert_eq!(jelgava.unit_kind, Some(UnitKind::StateCity));

    let liepaja = normalizer.normalize("Liepājas pilsēta", SourceKind::Boundary);
    assert_eq!(liepaja.canonical, "Liepāja");
    assert_eq!(liepaja.unit_kind, Some(UnitKind::StateCity));
}

/// Tests normalize(): qualifier clauses and whitespace.
#[test]
fn test_normalize_qualifiers() {
    let normalizer = make_normalizer();

    assert_eq!(
        canonical(
            &normalizer,
            "Jelgava municipality (before 2021)",
            SourceKind::OfficialStat
        ),
        "Jelgava"
    );
    assert_eq!(
        canonical(&normalizer, "  Tukuma   novads ", SourceKind::Boundary),
        "Tukums"
    );
    assert_eq!(
        canonical(
            &normalizer,
            "Kurzeme statistical region",
            SourceKind::OfficialStat
        ),
        "Kurzeme"
    );
    assert_eq!(
        canonical(&normalizer, "Ogre MUNICIPALITY", SourceKind::OfficialStat),
        "Ogre"
    );
}

/// Tests normalize(): an unknown label is passed through, trimmed.
#[test]
fn test_normalize_unknown() {
    let normalizer = make_normalizer();

    let ret = normalizer.normalize("  Nowhere   Land ", SourceKind::CrowdSource);

    assert_eq!(ret.canonical, "Nowhere Land");
    assert_eq!(ret.unit_kind, None);
}

/// Tests normalize(): a bare unit type word is not stripped to an empty name.
#[test]
fn test_normalize_bare_suffix() {
    let normalizer = make_normalizer();

    assert_eq!(
        canonical(&normalizer, "novads", SourceKind::Boundary),
        "novads"
    );
}

/// Tests that canonical names are fixed points of normalize().
#[test]
fn test_normalize_idempotent() {
    let normalizer = make_normalizer();
    let mut names = normalizer.get_irregular_values();
    names.push("Jelgava".into());
    names.push("Saldus".into());
    names.push("Ventspils".into());
    names.push("Dienvidkurzeme".into());

    for name in names {
        for source_kind in [
            SourceKind::Boundary,
            SourceKind::OfficialStat,
            SourceKind::CrowdSource,
        ] {
            let once = canonical(&normalizer, &name, source_kind);
            assert_eq!(once, name);
            assert_eq!(canonical(&normalizer, &once, source_kind), once);
        }
    }
}

/// Tests is_aggregate().
#[test]
fn test_is_aggregate() {
    let normalizer = make_normalizer();

    assert_eq!(normalizer.is_aggregate("Latvia"), true);
    assert_eq!(normalizer.is_aggregate("Vidzeme statistical region"), true);
    assert_eq!(normalizer.is_aggregate("Ogre municipality"), false);
}

/// Tests NameNormalizer::new(): invalid inputs.
#[test]
fn test_new_invalid() {
    let ret = NameNormalizer::from_yaml("qualifiers:\n  - '('\n");
    assert_eq!(ret.is_err(), true);

    let ret = NameNormalizer::from_yaml("unit_suffixes:\n  'state city':\n    kind: state_city\n");
    assert_eq!(ret.is_err(), true);

    let ret = NameNormalizer::from_yaml("unit_suffixes:\n  city:\n    kind: village\n");
    assert_eq!(ret.is_err(), true);

    let ret = NameNormalizer::from_yaml("irregulars: {}\n");
    assert_eq!(ret.is_err(), true);
}

/// Tests NameNormalizer::load().
#[test]
fn test_load() {
    let mut ctx = context::tests::make_test_context().unwrap();
    let names = context::tests::TestFileSystem::make_file_from_string(
        "irregular:\n  Cēsu novads: Cēsis\n",
    );
    let files = context::tests::TestFileSystem::make_files(&ctx, &[("data/names.yaml", &names)]);
    let file_system = context::tests::TestFileSystem::from_files(&files);
    ctx.set_file_system(&file_system);

    let normalizer = NameNormalizer::load(&ctx).unwrap();

    assert_eq!(
        canonical(&normalizer, "Cēsu novads", SourceKind::Boundary),
        "Cēsis"
    );
}

/// Tests normalize(): the irregular table is looked up case-insensitively.
#[test]
fn test_normalize_irregular_case() {
    let normalizer = make_normalizer();

    for label in ["Cēsu Novads", "CĒSU NOVADS", "cēsu novads"] {
        let ret = normalizer.normalize(label, SourceKind::Boundary);
        assert_eq!(ret.canonical, "Cēsis");
        assert_eq!(ret.unit_kind, Some(UnitKind::Municipality));
    }
}
