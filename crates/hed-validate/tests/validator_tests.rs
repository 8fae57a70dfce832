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

//! End-to-end validation against the fixture schemas.

use hed_core::IssueKind;
use hed_test::{
    codes, count_kind, interleaved, invalid_strings, library_group, onset_offset, standard_group,
    unmatched, valid_strings, DEFINITIONS,
};
use hed_validate::{EventContents, EventState, HedValidator, ValidatorConfig};
use proptest::prelude::*;

// ===== String Validation =====

#[test]
fn test_valid_strings() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    for (name, hed) in valid_strings() {
        let issues = validator.validate_string(hed);
        assert!(issues.is_empty(), "{}: {:?}", name, issues);
    }
}

#[test]
fn test_invalid_strings() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    for (name, hed, expected) in invalid_strings() {
        let issues = validator.validate_string(hed);
        assert_eq!(codes(&issues), expected.to_vec(), "{}: {:?}", name, issues);
    }
}

#[test]
fn test_require_child_is_per_tag() {
    let schemas = standard_group();
    let issues = HedValidator::new(&schemas).validate_string("(Duration, Duration/3 s)");
    assert_eq!(codes(&issues), vec!["HED_TAG_REQUIRES_CHILD"]);
    assert_eq!(issues[0].tag_index(), Some(0));
}

#[test]
fn test_duplicate_reported_at_second_tag() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    for hed in [
        "Event/Sensory-event,Event/Sensory-event",
        "Man-made-object/Vehicle/Boat, Boat",
    ] {
        let issues = validator.validate_string(hed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].tag_index(), Some(1));
    }
}

#[test]
fn test_units_invalid_names_legal_units() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let issues = validator.validate_string("Duration/3 cm");
    assert!(issues[0].message().ends_with("day, hour, minute, s, second"));
}

#[test]
fn test_issue_spans_point_into_source() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let source = "Sensory-event, (Red, Event/Nonsense)";
    let issues = validator.validate_string(source);
    let span = issues[0].span().unwrap();
    assert_eq!(&source[span.start..span.end], "Nonsense");
}

#[test]
fn test_library_prefixes() {
    let schemas = library_group();
    let validator = HedValidator::new(&schemas);
    assert!(validator
        .validate_string("sc:Sleep-stage-1, Sensory-event, sc:Artifact/Chewing")
        .is_empty());
    assert_eq!(
        codes(&validator.validate_string("zz:Sleep-stage-1")),
        vec!["HED_UNKNOWN_PREFIX"]
    );
}

#[test]
fn test_extension_reports() {
    let schemas = standard_group();
    let config = ValidatorConfig::default().with_extension_reports(true);
    let validator = HedValidator::with_config(&schemas, config).unwrap();
    let issues = validator.validate_string("Item/Beaver, Agent/Robot");
    assert_eq!(count_kind(&issues, IssueKind::TagExtended), 2);
}

#[test]
fn test_placeholders_in_sidecar_values() {
    let schemas = standard_group();
    let strict = HedValidator::new(&schemas);
    assert_eq!(codes(&strict.validate_string("Label/#")), vec!["HED_PLACEHOLDER_INVALID"]);

    let config = ValidatorConfig::default().with_placeholders(true);
    let sidecar = HedValidator::with_config(&schemas, config).unwrap();
    assert!(sidecar.validate_string("Label/#, Duration/# ms").is_empty());
}

#[test]
fn test_issue_cap() {
    let schemas = standard_group();
    let config = ValidatorConfig::default().with_max_issues(2);
    let validator = HedValidator::with_config(&schemas, config).unwrap();
    let issues = validator.validate_string("Blorp, Blarp, Blurp, Blerp");
    assert_eq!(issues.len(), 2);
}

#[test]
fn test_parallel_matches_sequential() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let sources: Vec<&str> = invalid_strings().into_iter().map(|(_, hed, _)| hed).collect();
    let parallel = validator.validate_strings(&sources);
    for (source, issues) in sources.iter().zip(parallel) {
        assert_eq!(issues, validator.validate_string(source));
    }
}

// ===== Documents =====

fn document(rows: &[(usize, f64, &'static str)]) -> Vec<(usize, f64, &'static str)> {
    let mut all = vec![(0, 0.0, DEFINITIONS)];
    all.extend(rows.iter().map(|&(index, time, hed)| (index + 1, time, hed)));
    all
}

#[test]
fn test_document_onset_offset() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let report = validator.validate_document(&document(&onset_offset())).unwrap();
    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert_eq!(report.definitions.len(), 3);
    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].start_index(), 1);
    assert_eq!(report.events[0].end_index(), Some(2));
}

#[test]
fn test_document_interleaved() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let report = validator.validate_document(&document(&interleaved())).unwrap();
    assert!(!report.has_errors(), "{:?}", report.issues);

    let anchors: Vec<&str> = report.events.iter().map(|e| e.anchor()).collect();
    assert_eq!(anchors, vec!["stim", "move/3 m", "response"]);
    assert!(report.events.iter().all(|e| e.state() == EventState::Closed));

    let stim = &report.events[0];
    assert_eq!(stim.insets().len(), 1);
    match stim.contents() {
        EventContents::Group(group) => assert_eq!(group.to_string(), "((Purple))"),
        other => panic!("unexpected contents {:?}", other),
    }
    assert_eq!(report.events[1].end_time(), Some(3.0));
    assert_eq!(report.events[2].end_index(), None);
}

#[test]
fn test_document_unmatched_onset() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let report = validator.validate_document(&document(&unmatched())).unwrap();
    assert_eq!(codes(&report.issues), vec!["HED_ONSET_OFFSET_ERROR"]);
    assert_eq!(report.issues[0].row(), Some(1));
    assert_eq!(report.events[0].state(), EventState::Unmatched);
    assert_eq!(report.events[0].end_time(), None);
}

#[test]
fn test_document_reports_rows() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let rows = [
        (0, 0.0, "(Definition/Stim, (Red)), (Definition/Stim, (Boat))"),
        (1, 1.0, "Def/Missing"),
    ];
    let report = validator.validate_document(&rows).unwrap();
    assert_eq!(codes(&report.issues), vec!["duplicateDefinition", "HED_DEF_UNMATCHED"]);
    assert_eq!(report.issues[0].row(), Some(0));
    assert_eq!(report.issues[1].row(), Some(1));
}

#[test]
fn test_document_rows_out_of_order() {
    let schemas = standard_group();
    let validator = HedValidator::new(&schemas);
    let rows = [(1, 1.0, "Red"), (0, 0.0, "Boat")];
    assert!(validator.validate_document(&rows).is_err());
}

// ===== Properties =====

const LEAVES: &[(&str, &str)] = &[
    ("Boat", "Item/Object/Man-made-object/Vehicle/Boat"),
    ("Car", "Item/Object/Man-made-object/Vehicle/Car"),
    ("Red", "Property/Sensory-property/Visual-attribute/Color/CSS-color/Red-color/Red"),
    ("Sensory-event", "Event/Sensory-event"),
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_duplicates_symmetric(
        (first_idx, second_idx) in (0..LEAVES.len(), 0..LEAVES.len()),
        first_long in any::<bool>(),
        second_long in any::<bool>(),
    ) {
        let schemas = standard_group();
        let validator = HedValidator::new(&schemas);
        let pick = |i: usize, long: bool| if long { LEAVES[i].1 } else { LEAVES[i].0 };
        let a = pick(first_idx, first_long);
        let b = pick(second_idx, second_long);

        let forward = validator.validate_string(&format!("{}, {}", a, b));
        let backward = validator.validate_string(&format!("{}, {}", b, a));
        let expected = usize::from(first_idx == second_idx);
        prop_assert_eq!(count_kind(&forward, IssueKind::TagRepeated), expected);
        prop_assert_eq!(count_kind(&backward, IssueKind::TagRepeated), expected);
        if expected == 1 {
            prop_assert_eq!(forward[0].tag_index(), Some(1));
        }
    }

    #[test]
    fn prop_closed_branch_extension_single_issue(ext in "Zq[a-z]{2,8}") {
        let schemas = standard_group();
        let validator = HedValidator::new(&schemas);
        let issues = validator.validate_string(&format!("Sensory-event/{}", ext));
        prop_assert_eq!(codes(&issues), vec!["invalidExtension"]);
        let span = issues[0].span().unwrap();
        prop_assert_eq!(span.start, "Sensory-event/".len());
    }
}
