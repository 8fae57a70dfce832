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

//! Sample HED strings with the issue codes they should produce.

/// Strings that validate cleanly against the standard fixture schema.
pub fn valid_strings() -> Vec<(&'static str, &'static str)> {
    vec![
        ("single_tag", "Event/Sensory-event"),
        ("short_form", "Sensory-event"),
        ("long_form", "Item/Object/Man-made-object/Vehicle/Boat"),
        ("extension", "Item/Beaver"),
        ("group", "Sensory-event, (Red, Boat)"),
        ("value_with_unit", "Duration/3 ms"),
        ("word_unit", "Duration/2 minutes"),
        ("frequency", "Temporal-rate/20 Hz"),
        ("currency", "Cost/$25.99"),
        ("label", "Label/My_label"),
        ("definition", "(Definition/ValidDef)"),
        ("definition_with_contents", "(Definition/ValidDef, (Red, Boat))"),
        ("camel_case", "EvEnt/Sensory-event"),
        ("nested_groups", "(Agent-action, (Human-agent, (Car)))"),
        ("empty", ""),
    ]
}

/// Strings with exactly the listed issue codes, in order.
pub fn invalid_strings() -> Vec<(&'static str, &'static str, &'static [&'static str])> {
    vec![
        ("leaf_extension", "Experiment-procedure/Something", &["invalidExtension"]),
        ("closed_extension", "Event/Nonsense", &["invalidExtension"]),
        ("wrong_parent", "Event/Red", &["invalidParent"]),
        ("unknown_tag", "Nonsense/Tag", &["invalidTag"]),
        ("missing_child", "Label", &["HED_TAG_REQUIRES_CHILD"]),
        ("default_unit", "Duration/3", &["HED_UNITS_DEFAULT_USED"]),
        ("bad_unit", "Duration/3 cm", &["HED_UNITS_INVALID"]),
        ("bad_value", "Item-count/many", &["HED_VALUE_INVALID"]),
        ("duplicate", "Event/Sensory-event, Event/Sensory-event", &["HED_TAG_REPEATED"]),
        ("duplicate_short", "Man-made-object/Vehicle/Boat, Boat", &["HED_TAG_REPEATED"]),
        ("top_level", "Definition/InvalidDef", &["HED_TOP_LEVEL_TAG"]),
        ("lowercase", "Item/something", &["HED_STYLE_WARNING"]),
        ("curly", "Item/{bad}", &["HED_CHARACTER_INVALID", "HED_CHARACTER_INVALID"]),
        ("tilde", "Item ~ Boat", &["HED_TILDES_UNSUPPORTED"]),
        ("empty_node", "Item//Boat", &["HED_NODE_NAME_EMPTY"]),
        ("placeholder", "Label/#", &["HED_PLACEHOLDER_INVALID"]),
        ("comma_missing", "(Red)(Boat)", &["HED_COMMA_MISSING"]),
        ("empty_group", "Event, ()", &["emptyHedGroup"]),
        ("unclosed", "(Red, Boat", &["HED_PARENTHESES_MISMATCH"]),
    ]
}
