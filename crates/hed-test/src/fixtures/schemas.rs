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

//! Fixture schemas shaped after the standard HED 8 vocabulary.
//!
//! Only the branches the test suites touch are present, but paths,
//! attributes and unit classes follow the real schema layout.

use hed_schema::{Schema, SchemaBuilder, SchemaGroup};

const TAGS: &[(&str, &[&str])] = &[
    ("Event", &[]),
    ("Event/Sensory-event", &[]),
    ("Event/Agent-action", &[]),
    ("Event/Experiment-procedure", &[]),
    ("Event/Experiment-control", &[]),
    ("Agent", &["extensionAllowed"]),
    ("Agent/Animal-agent", &[]),
    ("Agent/Human-agent", &[]),
    ("Item", &["extensionAllowed"]),
    ("Item/Object", &[]),
    ("Item/Object/Man-made-object", &[]),
    ("Item/Object/Man-made-object/Vehicle", &[]),
    ("Item/Object/Man-made-object/Vehicle/Boat", &[]),
    ("Item/Object/Man-made-object/Vehicle/Car", &[]),
    ("Property", &["extensionAllowed"]),
    ("Property/Sensory-property", &[]),
    ("Property/Sensory-property/Visual-attribute", &[]),
    ("Property/Sensory-property/Visual-attribute/Color", &[]),
    ("Property/Sensory-property/Visual-attribute/Color/CSS-color", &[]),
    ("Property/Sensory-property/Visual-attribute/Color/CSS-color/Red-color", &[]),
    ("Property/Sensory-property/Visual-attribute/Color/CSS-color/Red-color/Red", &[]),
    ("Property/Sensory-property/Visual-attribute/Color/CSS-color/Purple-color", &[]),
    ("Property/Sensory-property/Visual-attribute/Color/CSS-color/Purple-color/Purple", &[]),
    ("Property/Informational-property", &[]),
    ("Property/Informational-property/Label", &["requireChild"]),
    ("Property/Informational-property/Label/#", &["valueClass=nameClass"]),
    ("Property/Informational-property/Description", &["requireChild"]),
    ("Property/Informational-property/Description/#", &["valueClass=textClass"]),
    ("Property/Informational-property/Definition", &["requireChild", "topLevelTagGroup"]),
    ("Property/Informational-property/Definition/#", &["valueClass=nameClass"]),
    ("Property/Informational-property/Def", &["requireChild"]),
    ("Property/Informational-property/Def/#", &["valueClass=nameClass"]),
    ("Property/Informational-property/Def-expand", &["requireChild", "tagGroup"]),
    ("Property/Informational-property/Def-expand/#", &["valueClass=nameClass"]),
    ("Property/Data-property", &[]),
    ("Property/Data-property/Data-value", &[]),
    ("Property/Data-property/Data-value/Spatiotemporal-value", &[]),
    ("Property/Data-property/Data-value/Spatiotemporal-value/Temporal-value", &[]),
    ("Property/Data-property/Data-value/Spatiotemporal-value/Temporal-value/Duration", &["requireChild"]),
    (
        "Property/Data-property/Data-value/Spatiotemporal-value/Temporal-value/Duration/#",
        &["unitClass=timeUnits", "valueClass=numericClass"],
    ),
    ("Property/Data-property/Data-value/Spatiotemporal-value/Rate-of-change", &[]),
    ("Property/Data-property/Data-value/Spatiotemporal-value/Rate-of-change/Temporal-rate", &["requireChild"]),
    (
        "Property/Data-property/Data-value/Spatiotemporal-value/Rate-of-change/Temporal-rate/#",
        &["unitClass=frequencyUnits", "valueClass=numericClass"],
    ),
    ("Property/Data-property/Data-value/Spatiotemporal-value/Spatial-value", &[]),
    ("Property/Data-property/Data-value/Spatiotemporal-value/Spatial-value/Distance", &["requireChild"]),
    (
        "Property/Data-property/Data-value/Spatiotemporal-value/Spatial-value/Distance/#",
        &["unitClass=lengthUnits", "valueClass=numericClass"],
    ),
    ("Property/Data-property/Data-value/Quantitative-value", &[]),
    ("Property/Data-property/Data-value/Quantitative-value/Item-count", &["requireChild"]),
    ("Property/Data-property/Data-value/Quantitative-value/Item-count/#", &["valueClass=numericClass"]),
    ("Property/Data-property/Data-value/Quantitative-value/Frequency", &["requireChild"]),
    (
        "Property/Data-property/Data-value/Quantitative-value/Frequency/#",
        &["unitClass=frequencyUnits", "valueClass=numericClass"],
    ),
    ("Property/Data-property/Data-value/Quantitative-value/Cost", &["requireChild"]),
    (
        "Property/Data-property/Data-value/Quantitative-value/Cost/#",
        &["unitClass=currencyUnits", "valueClass=numericClass"],
    ),
    ("Property/Data-property/Data-value/Quantitative-value/Recording-date", &["requireChild"]),
    (
        "Property/Data-property/Data-value/Quantitative-value/Recording-date/#",
        &["valueClass=dateTimeClass"],
    ),
    ("Property/Organizational-property", &[]),
    ("Property/Organizational-property/Onset", &["topLevelTagGroup"]),
    ("Property/Organizational-property/Offset", &["topLevelTagGroup"]),
    ("Property/Organizational-property/Inset", &["topLevelTagGroup"]),
    ("Property/Organizational-property/Event-context", &["topLevelTagGroup", "unique"]),
];

/// The default (unprefixed) fixture schema.
///
/// # Examples
///
/// ```
/// let schema = hed_test::standard_schema();
/// assert!(schema.find_short("Sensory-event").is_some());
/// assert!(schema.takes_value(schema.find_short("Duration").unwrap().long_name()));
/// ```
pub fn standard_schema() -> Schema {
    let builder = TAGS
        .iter()
        .fold(SchemaBuilder::new().version("8.1.0"), |b, (name, attrs)| {
            b.tag(name, attrs)
        });

    builder
        .unit_class("timeUnits", &["defaultUnits=s"])
        .unit("timeUnits", "s", &["SIUnit", "unitSymbol", "conversionFactor=1.0"])
        .unit("timeUnits", "second", &["SIUnit", "conversionFactor=1.0"])
        .unit("timeUnits", "minute", &["conversionFactor=60.0"])
        .unit("timeUnits", "hour", &["conversionFactor=3600.0"])
        .unit("timeUnits", "day", &["conversionFactor=86400.0"])
        .unit_class("frequencyUnits", &["defaultUnits=Hz"])
        .unit("frequencyUnits", "Hz", &["SIUnit", "unitSymbol", "conversionFactor=1.0"])
        .unit("frequencyUnits", "hertz", &["SIUnit", "conversionFactor=1.0"])
        .unit_class("lengthUnits", &["defaultUnits=m"])
        .unit("lengthUnits", "m", &["SIUnit", "unitSymbol", "conversionFactor=1.0"])
        .unit("lengthUnits", "meter", &["SIUnit", "conversionFactor=1.0"])
        .unit("lengthUnits", "inch", &["conversionFactor=0.0254"])
        .unit("lengthUnits", "foot", &["conversionFactor=0.3048"])
        .unit_class("currencyUnits", &["defaultUnits=$"])
        .unit("currencyUnits", "$", &["unitPrefix", "unitSymbol", "conversionFactor=1.0"])
        .unit("currencyUnits", "dollar", &["conversionFactor=1.0"])
        .unit("currencyUnits", "point", &[])
        .unit_modifier("M", &["SIUnitSymbolModifier", "conversionFactor=1000000.0"])
        .unit_modifier("k", &["SIUnitSymbolModifier", "conversionFactor=1000.0"])
        .unit_modifier("c", &["SIUnitSymbolModifier", "conversionFactor=0.01"])
        .unit_modifier("m", &["SIUnitSymbolModifier", "conversionFactor=0.001"])
        .unit_modifier("u", &["SIUnitSymbolModifier", "conversionFactor=0.000001"])
        .unit_modifier("mega", &["SIUnitModifier", "conversionFactor=1000000.0"])
        .unit_modifier("kilo", &["SIUnitModifier", "conversionFactor=1000.0"])
        .unit_modifier("centi", &["SIUnitModifier", "conversionFactor=0.01"])
        .unit_modifier("milli", &["SIUnitModifier", "conversionFactor=0.001"])
        .unit_modifier("micro", &["SIUnitModifier", "conversionFactor=0.000001"])
        .value_class("numericClass", &[])
        .value_class("nameClass", &["allowedCharacter=letters,digits,hyphen,underscore"])
        .value_class("textClass", &[])
        .value_class("dateTimeClass", &[])
        .build()
        .unwrap_or_else(|e| panic!("standard fixture schema must build: {}", e))
}

/// A library schema bound to the `sc` prefix.
pub fn library_schema() -> Schema {
    SchemaBuilder::new()
        .prefix("sc")
        .library("score")
        .version("1.0.0")
        .tag("Sleep-stage", &[])
        .tag("Sleep-stage/Sleep-stage-1", &[])
        .tag("Sleep-stage/Sleep-stage-2", &[])
        .tag("Artifact", &["extensionAllowed"])
        .tag("Artifact/Eye-blink", &[])
        .tag("Recording-context", &["required"])
        .tag("Recording-context/#", &["valueClass=nameClass"])
        .value_class("nameClass", &["allowedCharacter=letters,digits,hyphen,underscore"])
        .build()
        .unwrap_or_else(|e| panic!("library fixture schema must build: {}", e))
}

/// The standard schema alone, as a group.
pub fn standard_group() -> SchemaGroup {
    SchemaGroup::from(standard_schema())
}

/// Standard plus library schema.
pub fn library_group() -> SchemaGroup {
    SchemaGroup::new(vec![standard_schema(), library_schema()])
        .unwrap_or_else(|e| panic!("fixture group must combine: {}", e))
}
