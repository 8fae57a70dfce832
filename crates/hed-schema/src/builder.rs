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

//! Programmatic schema construction.
//!
//! Loading schemas from XML or wiki sources is left to callers; they feed
//! the parsed nodes through [`SchemaBuilder`].

use crate::entry::{parse_attribute, AttributeValue, EntryAttributes, SchemaEntry, SchemaSection};
use crate::keys::{attr, property, SectionKey};
use crate::schema::Schema;
use hed_core::{HedError, HedResult, PLACEHOLDER};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct PendingEntry {
    name: String,
    attributes: Vec<(String, AttributeValue)>,
    description: Option<String>,
}

impl PendingEntry {
    fn new(name: &str, attributes: &[&str], description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            attributes: attributes.iter().map(|spec| parse_attribute(spec)).collect(),
            description: description.map(String::from),
        }
    }
}

/// Builder for [`Schema`].
///
/// Attributes are written as in schema sources: `"name"` for a flag,
/// `"name=value"` (comma-separated for several values) otherwise.
///
/// # Examples
///
/// ```
/// use hed_schema::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .tag("Property", &["extensionAllowed"])
///     .tag("Property/Duration", &[])
///     .tag("Property/Duration/#", &["unitClass=timeUnits"])
///     .unit_class("timeUnits", &["defaultUnits=s"])
///     .unit("timeUnits", "s", &["SIUnit", "unitSymbol"])
///     .build()
///     .unwrap();
///
/// assert!(schema.takes_value("Property/Duration"));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    prefix: String,
    version: Option<String>,
    library: Option<String>,
    properties: Vec<String>,
    attributes: Vec<(String, Vec<String>)>,
    tags: Vec<PendingEntry>,
    unit_classes: Vec<PendingEntry>,
    units: Vec<(String, PendingEntry)>,
    unit_modifiers: Vec<PendingEntry>,
    value_classes: Vec<PendingEntry>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// A builder pre-seeded with the standard attribute and property definitions.
    pub fn new() -> Self {
        let builder = Self::bare()
            .property(property::BOOL)
            .property(property::UNIT_CLASS)
            .property(property::UNIT)
            .property(property::UNIT_MODIFIER)
            .property(property::VALUE_CLASS);

        let flags = [
            attr::EXTENSION_ALLOWED,
            attr::RECOMMENDED,
            attr::REQUIRED,
            attr::REQUIRE_CHILD,
            attr::TAG_GROUP,
            attr::TAKES_VALUE,
            attr::TOP_LEVEL_TAG_GROUP,
            attr::UNIQUE,
        ];
        let builder = flags
            .iter()
            .fold(builder, |b, name| b.attribute(name, &[property::BOOL]));

        builder
            .attribute(attr::UNIT_CLASS, &[])
            .attribute(attr::VALUE_CLASS, &[])
            .attribute(attr::RELATED_TAG, &[])
            .attribute(attr::SUGGESTED_TAG, &[])
            .attribute(attr::DEFAULT_UNITS, &[property::UNIT_CLASS])
            .attribute(attr::SI_UNIT, &[property::BOOL, property::UNIT])
            .attribute(attr::UNIT_SYMBOL, &[property::BOOL, property::UNIT])
            .attribute(attr::UNIT_PREFIX, &[property::BOOL, property::UNIT])
            .attribute(attr::CONVERSION_FACTOR, &[property::UNIT, property::UNIT_MODIFIER])
            .attribute(attr::SI_UNIT_MODIFIER, &[property::BOOL, property::UNIT_MODIFIER])
            .attribute(attr::SI_UNIT_SYMBOL_MODIFIER, &[property::BOOL, property::UNIT_MODIFIER])
            .attribute(attr::ALLOWED_CHARACTER, &[property::VALUE_CLASS])
    }

    /// A builder with no attribute definitions at all.
    pub fn bare() -> Self {
        Self {
            prefix: String::new(),
            version: None,
            library: None,
            properties: Vec::new(),
            attributes: Vec::new(),
            tags: Vec::new(),
            unit_classes: Vec::new(),
            units: Vec::new(),
            unit_modifiers: Vec::new(),
            value_classes: Vec::new(),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    pub fn property(mut self, name: &str) -> Self {
        self.properties.push(name.to_string());
        self
    }

    /// Declare an attribute and the properties it carries.
    pub fn attribute(mut self, name: &str, properties: &[&str]) -> Self {
        self.attributes.push((
            name.to_string(),
            properties.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    /// Add a tag by long name. Parents must be added first.
    pub fn tag(mut self, long_name: &str, attributes: &[&str]) -> Self {
        self.tags.push(PendingEntry::new(long_name, attributes, None));
        self
    }

    pub fn described_tag(mut self, long_name: &str, description: &str, attributes: &[&str]) -> Self {
        self.tags
            .push(PendingEntry::new(long_name, attributes, Some(description)));
        self
    }

    pub fn unit_class(mut self, name: &str, attributes: &[&str]) -> Self {
        self.unit_classes.push(PendingEntry::new(name, attributes, None));
        self
    }

    /// Add a unit to an already-declared unit class.
    pub fn unit(mut self, class_name: &str, name: &str, attributes: &[&str]) -> Self {
        self.units
            .push((class_name.to_string(), PendingEntry::new(name, attributes, None)));
        self
    }

    pub fn unit_modifier(mut self, name: &str, attributes: &[&str]) -> Self {
        self.unit_modifiers
            .push(PendingEntry::new(name, attributes, None));
        self
    }

    pub fn value_class(mut self, name: &str, attributes: &[&str]) -> Self {
        self.value_classes
            .push(PendingEntry::new(name, attributes, None));
        self
    }

    /// Assemble the schema.
    ///
    /// Structural defects (missing parent, duplicate long name, unit in an
    /// undeclared class) are hard errors. Unknown attributes are recorded
    /// on the entry and logged.
    pub fn build(self) -> HedResult<Schema> {
        let property_names: BTreeSet<String> = self.properties.iter().cloned().collect();

        let mut properties = SchemaSection::new(SectionKey::Properties, BTreeSet::new());
        for name in &self.properties {
            properties.insert(SchemaEntry::new(name.clone(), SectionKey::Properties));
        }

        let mut attributes = SchemaSection::new(SectionKey::Attributes, property_names.clone());
        for (name, props) in &self.attributes {
            let mut entry = SchemaEntry::new(name.clone(), SectionKey::Attributes);
            for prop in props {
                record(&mut entry, prop, AttributeValue::Flag, &property_names);
            }
            attributes.insert(entry);
        }

        let valid = |key: SectionKey| valid_attributes_for(key, &attributes);

        let mut unit_classes = SchemaSection::new(SectionKey::UnitClasses, valid(SectionKey::UnitClasses));
        fill(&mut unit_classes, self.unit_classes)?;

        let mut units = SchemaSection::new(SectionKey::Units, valid(SectionKey::Units));
        for (class_name, pending) in self.units {
            let unit_name = pending.name.clone();
            let class = unit_classes.get_mut(&class_name).ok_or_else(|| {
                HedError::schema_build(format!(
                    "unit '{}' references undeclared unit class '{}'",
                    unit_name, class_name
                ))
            })?;
            if let EntryAttributes::UnitClass(typed) = class.typed_mut() {
                typed.units.push(unit_name.clone());
            }
            let mut entry = make_entry(pending, SectionKey::Units, units.valid_attributes());
            if let EntryAttributes::Unit(typed) = entry.typed_mut() {
                typed.unit_class = class_name;
            }
            if units.insert(entry).is_some() {
                return Err(HedError::schema_build(format!(
                    "unit '{}' is declared more than once",
                    unit_name
                )));
            }
        }

        let mut unit_modifiers = SchemaSection::new(SectionKey::UnitModifiers, valid(SectionKey::UnitModifiers));
        fill(&mut unit_modifiers, self.unit_modifiers)?;

        let mut value_classes = SchemaSection::new(SectionKey::ValueClasses, valid(SectionKey::ValueClasses));
        fill(&mut value_classes, self.value_classes)?;

        let mut tags = SchemaSection::new(SectionKey::Tags, valid(SectionKey::Tags));
        let mut short_index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for pending in self.tags {
            let entry = make_entry(pending, SectionKey::Tags, tags.valid_attributes());
            if let Some(parent) = entry.parent_name() {
                if !tags.contains(parent) {
                    return Err(HedError::schema_build(format!(
                        "parent '{}' of tag '{}' is not defined",
                        parent,
                        entry.long_name()
                    )));
                }
            }
            let short = entry.short_name().to_lowercase();
            let long = entry.long_name().to_string();
            if tags.insert(entry).is_some() {
                return Err(HedError::schema_build(format!(
                    "tag '{}' is declared more than once",
                    long
                )));
            }
            if !short.starts_with(PLACEHOLDER) {
                short_index.entry(short).or_default().push(long);
            }
        }

        debug!(
            prefix = %self.prefix,
            tags = tags.len(),
            unit_classes = unit_classes.len(),
            units = units.len(),
            "schema built"
        );

        Ok(Schema {
            prefix: self.prefix,
            version: self.version,
            library: self.library,
            tags,
            unit_classes,
            units,
            unit_modifiers,
            value_classes,
            attributes,
            properties,
            short_index,
        })
    }
}

/// Attributes legal in a section, derived from attribute properties.
///
/// Tag attributes are the ones bound to no other section.
fn valid_attributes_for(key: SectionKey, attributes: &SchemaSection) -> BTreeSet<String> {
    let section_properties = [
        property::UNIT_CLASS,
        property::UNIT,
        property::UNIT_MODIFIER,
        property::VALUE_CLASS,
    ];
    attributes
        .iter()
        .filter(|entry| {
            let props = entry
                .attribute_definition()
                .map(|d| d.properties.as_slice())
                .unwrap_or_default();
            match key.attribute_property() {
                Some(wanted) => props.iter().any(|p| p == wanted),
                None if key == SectionKey::Tags => {
                    !props.iter().any(|p| section_properties.contains(&p.as_str()))
                }
                None => false,
            }
        })
        .map(|entry| entry.long_name().to_string())
        .collect()
}

fn record(entry: &mut SchemaEntry, name: &str, value: AttributeValue, valid: &BTreeSet<String>) {
    if !entry.set_attribute(name, value, valid) {
        warn!(
            section = %entry.section(),
            entry = entry.long_name(),
            attribute = name,
            "unknown schema attribute recorded"
        );
    }
}

fn make_entry(pending: PendingEntry, key: SectionKey, valid: &BTreeSet<String>) -> SchemaEntry {
    let mut entry = SchemaEntry::new(pending.name, key);
    if let Some(description) = pending.description {
        entry.set_description(description);
    }
    for (name, value) in pending.attributes {
        record(&mut entry, &name, value, valid);
    }
    entry
}

fn fill(section: &mut SchemaSection, pending: Vec<PendingEntry>) -> HedResult<()> {
    let key = section.key();
    for item in pending {
        let entry = make_entry(item, key, section.valid_attributes());
        let name = entry.long_name().to_string();
        if section.insert(entry).is_some() {
            return Err(HedError::schema_build(format!(
                "{} entry '{}' is declared more than once",
                key, name
            )));
        }
    }
    Ok(())
}
