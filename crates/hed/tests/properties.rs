// HED Tools - Hierarchical Event Descriptor validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Behavioural properties of the public entry points.

use hed::schema::{SchemaBuilder, SchemaGroup};
use hed::validate::{EventContents, EventState};
use hed::{assemble_events, check_compliance, expand, extract_definitions, validate_string};
use hed::{HedErrorKind, IssueKind};
use hed_test::{codes, count_kind, library_schema, standard_group, standard_schema};
use proptest::prelude::*;

fn leaf_paths() -> Vec<String> {
    standard_schema()
        .tags()
        .iter()
        .map(|entry| entry.long_name().to_string())
        .filter(|name| !name.ends_with('#'))
        .collect()
}

// ===== Resolution =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exact_paths_resolve_without_remainder(path in prop::sample::select(leaf_paths())) {
        let schemas = standard_group();
        let tag = schemas.resolve(&path).unwrap();
        prop_assert!(tag.remainder.is_none());
        prop_assert_eq!(tag.long_base, path);
    }

    #[test]
    fn prop_closed_extension_reports_once(ext in "Zq[a-z]{2,8}", deeper in any::<bool>()) {
        let schemas = standard_group();
        let tail = if deeper { format!("{}/Zz", ext) } else { ext.clone() };
        let hed = format!("Event/Sensory-event/{}", tail);
        let issues = validate_string(&hed, &schemas);
        prop_assert_eq!(issues.len(), 1);
        prop_assert_eq!(issues[0].kind(), IssueKind::InvalidExtension);
        let span = issues[0].span().unwrap();
        prop_assert_eq!(&hed[span.start..span.end], ext.as_str());
    }
}

// ===== Validation =====

#[test]
fn test_duplicates_canonical_and_positioned() {
    let schemas = standard_group();
    for hed in [
        "Event/Sensory-event,Event/Sensory-event",
        "Man-made-object/Vehicle/Boat, Boat",
    ] {
        let issues = validate_string(hed, &schemas);
        assert_eq!(codes(&issues), vec!["HED_TAG_REPEATED"]);
        assert_eq!(issues[0].tag_index(), Some(1));
    }
}

#[test]
fn test_duration_units() {
    let schemas = standard_group();
    assert!(validate_string("Duration/3 ms", &schemas).is_empty());
    assert_eq!(count_kind(&validate_string("Duration/3", &schemas), IssueKind::UnitsDefaultUsed), 1);

    let issues = validate_string("Duration/3 cm", &schemas);
    assert_eq!(issues[0].kind(), IssueKind::UnitsInvalid);
    for unit in ["s", "second", "minute", "hour", "day"] {
        assert!(issues[0].message().contains(unit));
    }
}

#[test]
fn test_definition_placement() {
    let schemas = standard_group();
    assert!(validate_string("(Definition/ValidDef)", &schemas).is_empty());
    assert_eq!(
        codes(&validate_string("Definition/InvalidDef", &schemas)),
        vec!["HED_TOP_LEVEL_TAG"]
    );
}

// ===== Definitions =====

#[test]
fn test_expand_collapse_round_trip() {
    let schemas = standard_group();
    let (table, issues) = extract_definitions(&["(Definition/Cue, (Sensory-event, Red))"], &schemas);
    assert!(issues.is_empty());

    let (mut expanded, issues) = expand("Boat, Def/Cue", &table, &schemas);
    assert!(issues.is_empty());

    let once = expanded.clone();
    assert!(table.expand(&mut expanded, &schemas).is_empty());
    assert_eq!(expanded, once);

    table.collapse(&mut expanded);
    assert_eq!(expanded.children_string(), "Boat, Def/Cue");
}

// ===== Temporal =====

#[test]
fn test_onset_offset_pair() {
    let schemas = standard_group();
    let rows = [
        (0, 0.0, "(Definition/X)"),
        (0, 0.0, "(Onset, Def/X)"),
        (1, 1.0, "(Offset, Def/X)"),
    ];
    let assembly = assemble_events(&rows, &schemas).unwrap();
    assert!(assembly.issues.is_empty());
    assert_eq!(assembly.events.len(), 1);
    assert_eq!(assembly.events[0].start_index(), 0);
    assert_eq!(assembly.events[0].end_index(), Some(1));
    assert_eq!(assembly.events[0].state(), EventState::Closed);
}

#[test]
fn test_onset_with_duration() {
    let schemas = standard_group();
    let rows = [
        (0, 0.0, "(Definition/X)"),
        (1, 1.0, "(Onset, Duration/2 s, Def/X, (Red))"),
    ];
    let assembly = assemble_events(&rows, &schemas).unwrap();
    assert!(assembly.issues.is_empty());
    assert_eq!(assembly.events.len(), 1);
    let event = &assembly.events[0];
    assert_eq!(event.state(), EventState::Closed);
    assert_eq!(event.end_time(), Some(3.0));
    let EventContents::Group(contents) = event.contents() else {
        panic!("expected group contents");
    };
    assert_eq!(contents.children_string(), "(Red)");
}

#[test]
fn test_offset_without_onset() {
    let schemas = standard_group();
    let rows = [(0, 0.0, "(Definition/X)"), (1, 1.0, "(Offset, Def/X)")];
    let assembly = assemble_events(&rows, &schemas).unwrap();
    assert!(assembly.events.is_empty());
    assert_eq!(codes(&assembly.issues), vec!["OFFSET_BEFORE_ONSET"]);
}

#[test]
fn test_second_onset_rejected() {
    let schemas = standard_group();
    let rows = [
        (0, 0.0, "(Definition/X)"),
        (1, 1.0, "(Onset, Def/X)"),
        (2, 2.0, "(Onset, Def/X)"),
    ];
    let assembly = assemble_events(&rows, &schemas).unwrap();
    assert_eq!(assembly.events.len(), 1);
    assert_eq!(assembly.events[0].start_index(), 1);
    assert_eq!(
        codes(&assembly.issues),
        vec!["ONSET_TOO_MANY_DEFS", "HED_ONSET_OFFSET_ERROR"]
    );
    assert_eq!(assembly.events[0].end_time(), None);
}

// ===== Schemas =====

#[test]
fn test_prefix_collision_fails_before_validation() {
    let err = SchemaGroup::new(vec![library_schema(), library_schema()]).unwrap_err();
    assert_eq!(err.kind, HedErrorKind::DuplicatePrefix);
}

#[test]
fn test_compliance_does_not_stop_at_first_schema() {
    let broken = |prefix: &str| {
        SchemaBuilder::new()
            .prefix(prefix)
            .tag("A", &[])
            .tag("A/Dup", &[])
            .tag("B", &[])
            .tag("B/Dup", &[])
            .build()
            .unwrap()
    };
    let group = SchemaGroup::new(vec![broken("aa"), broken("bb")]).unwrap();
    assert_eq!(count_kind(&check_compliance(&group, false), IssueKind::SchemaDuplicateNode), 2);
}

#[cfg(feature = "serde")]
#[test]
fn test_issues_serialize() {
    let schemas = standard_group();
    let issues = validate_string("Event/Red", &schemas);
    let json = serde_json::to_string(&issues).unwrap();
    assert!(!issues.is_empty());
    assert!(json.contains(&format!("{:?}", issues[0].kind())));
    let back: Vec<hed::Issue> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, issues);
}
