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

//! Resolution properties over a small hierarchy.

use hed_core::{IssueKind, RemainderKind};
use hed_schema::{Schema, SchemaBuilder, SchemaGroup};
use proptest::prelude::*;

const NODES: &[&str] = &[
    "Event",
    "Event/Sensory-event",
    "Event/Agent-action",
    "Item",
    "Item/Object",
    "Item/Object/Man-made-object",
    "Item/Object/Man-made-object/Vehicle",
    "Item/Object/Man-made-object/Vehicle/Boat",
    "Item/Object/Man-made-object/Vehicle/Car",
    "Property",
    "Property/Informational-property",
    "Property/Informational-property/Label",
];

fn schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    for node in NODES {
        let attrs: &[&str] = if *node == "Item" { &["extensionAllowed"] } else { &[] };
        builder = builder.tag(node, attrs);
    }
    builder
        .tag("Property/Informational-property/Label/#", &[])
        .build()
        .expect("schema builds")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every suffix of every long name resolves to that node with no remainder.
    #[test]
    fn prop_exact_paths_resolve(idx in 0..NODES.len(), cut in 0usize..6, upper in any::<bool>()) {
        let schema = schema();
        let long = NODES[idx];
        let parts: Vec<_> = long.split('/').collect();
        let start = cut.min(parts.len() - 1);
        let mut form = parts[start..].join("/");
        if upper {
            form = form.to_uppercase();
        }
        let tag = schema.resolve(&form).expect("suffix form resolves");
        prop_assert_eq!(tag.long_base.as_str(), long);
        prop_assert!(tag.remainder.is_none());
    }

    /// Extensions under a closed branch fail at the first new segment.
    #[test]
    fn prop_closed_branch_rejects_extensions(ext in "Zq[a-z]{2,8}") {
        let schema = schema();
        let text = format!("Event/Sensory-event/{}", ext);
        let issue = schema.resolve(&text).expect_err("extension rejected");
        prop_assert_eq!(issue.kind(), IssueKind::InvalidExtension);
        let span = issue.span().expect("positioned");
        prop_assert_eq!(&text[span.start..span.end], ext.as_str());
    }

    /// Extensions under an open branch keep their text.
    #[test]
    fn prop_open_branch_accepts_extensions(ext in "Xq[a-z]{1,8}") {
        let schema = schema();
        let tag = schema.resolve(&format!("Car/{}", ext)).expect("extension allowed");
        let rem = tag.remainder.expect("has remainder");
        prop_assert_eq!(rem.kind, RemainderKind::Extension);
        prop_assert_eq!(rem.text, ext);
    }
}

#[test]
fn test_value_nodes_swallow_the_rest() {
    let schema = schema();
    let tag = schema.resolve("Label/Event/Car").expect("value");
    assert_eq!(tag.value(), Some("Event/Car"));
    assert_eq!(tag.short_tag(), "Label/Event/Car");
}

#[test]
fn test_group_of_one_defaults_to_empty_prefix() {
    let group = SchemaGroup::from(schema());
    assert!(group.default_schema().is_some());
    assert_eq!(group.prefixes().collect::<Vec<_>>(), vec![""]);
    assert_eq!(
        group.resolve("Boat").expect("resolves").long_tag(),
        "Item/Object/Man-made-object/Vehicle/Boat"
    );
}
