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

//! Schema entries and sections.
//!
//! Every entry keeps its recognised attributes twice: as written (for
//! generic queries) and as a typed record for its section. Attributes the
//! schema does not declare for a section go to a side table instead.

use crate::keys::{attr, SectionKey};
use hed_core::HIERARCHY_DELIMITER;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An attribute value: a bare flag or a text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Flag,
    Text(String),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            AttributeValue::Flag => None,
        }
    }

    /// Comma-separated values of a text attribute.
    pub fn values(&self) -> Vec<&str> {
        match self {
            AttributeValue::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .collect(),
            AttributeValue::Flag => Vec::new(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Flag => f.write_str("true"),
            AttributeValue::Text(text) => f.write_str(text),
        }
    }
}

/// Parse `name` or `name=value` as written in schema attribute lists.
pub fn parse_attribute(spec: &str) -> (String, AttributeValue) {
    match spec.split_once('=') {
        Some((name, value)) => (
            name.trim().to_string(),
            AttributeValue::Text(value.trim().to_string()),
        ),
        None => (spec.trim().to_string(), AttributeValue::Flag),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagAttributes {
    pub extension_allowed: bool,
    pub require_child: bool,
    pub required: bool,
    pub recommended: bool,
    pub unique: bool,
    pub top_level_tag_group: bool,
    pub tag_group: bool,
    pub takes_value: bool,
    pub unit_classes: Vec<String>,
    pub value_classes: Vec<String>,
    pub related_tags: Vec<String>,
    pub suggested_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitClassAttributes {
    pub default_units: Option<String>,
    /// Names of the units in this class, in declaration order.
    pub units: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitAttributes {
    pub unit_class: String,
    pub si_unit: bool,
    pub unit_symbol: bool,
    pub unit_prefix: bool,
    pub conversion_factor: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitModifierAttributes {
    pub si_unit_modifier: bool,
    pub si_unit_symbol_modifier: bool,
    pub conversion_factor: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueClassAttributes {
    pub allowed_characters: Vec<String>,
}

/// An entry in the attributes section: which properties it carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeDefinition {
    pub properties: Vec<String>,
}

/// Fixed-shape attribute record, one variant per section.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryAttributes {
    Tag(TagAttributes),
    UnitClass(UnitClassAttributes),
    Unit(UnitAttributes),
    UnitModifier(UnitModifierAttributes),
    ValueClass(ValueClassAttributes),
    Attribute(AttributeDefinition),
    Property,
}

impl EntryAttributes {
    pub fn for_section(key: SectionKey) -> Self {
        match key {
            SectionKey::Tags => EntryAttributes::Tag(TagAttributes::default()),
            SectionKey::UnitClasses => EntryAttributes::UnitClass(UnitClassAttributes::default()),
            SectionKey::Units => EntryAttributes::Unit(UnitAttributes::default()),
            SectionKey::UnitModifiers => {
                EntryAttributes::UnitModifier(UnitModifierAttributes::default())
            }
            SectionKey::ValueClasses => EntryAttributes::ValueClass(ValueClassAttributes::default()),
            SectionKey::Attributes => EntryAttributes::Attribute(AttributeDefinition::default()),
            SectionKey::Properties => EntryAttributes::Property,
        }
    }

    fn apply(&mut self, name: &str, value: &AttributeValue) {
        let owned = || value.values().into_iter().map(String::from).collect::<Vec<_>>();
        let factor = || value.as_text().and_then(|v| v.trim().parse::<f64>().ok());
        match self {
            EntryAttributes::Tag(tag) => match name {
                attr::EXTENSION_ALLOWED => tag.extension_allowed = true,
                attr::REQUIRE_CHILD => tag.require_child = true,
                attr::REQUIRED => tag.required = true,
                attr::RECOMMENDED => tag.recommended = true,
                attr::UNIQUE => tag.unique = true,
                attr::TOP_LEVEL_TAG_GROUP => tag.top_level_tag_group = true,
                attr::TAG_GROUP => tag.tag_group = true,
                attr::TAKES_VALUE => tag.takes_value = true,
                attr::UNIT_CLASS => tag.unit_classes.extend(owned()),
                attr::VALUE_CLASS => tag.value_classes.extend(owned()),
                attr::RELATED_TAG => tag.related_tags.extend(owned()),
                attr::SUGGESTED_TAG => tag.suggested_tags.extend(owned()),
                _ => {}
            },
            EntryAttributes::UnitClass(class) => {
                if name == attr::DEFAULT_UNITS {
                    class.default_units = value.as_text().map(String::from);
                }
            }
            EntryAttributes::Unit(unit) => match name {
                attr::SI_UNIT => unit.si_unit = true,
                attr::UNIT_SYMBOL => unit.unit_symbol = true,
                attr::UNIT_PREFIX => unit.unit_prefix = true,
                attr::CONVERSION_FACTOR => unit.conversion_factor = factor(),
                _ => {}
            },
            EntryAttributes::UnitModifier(modifier) => match name {
                attr::SI_UNIT_MODIFIER => modifier.si_unit_modifier = true,
                attr::SI_UNIT_SYMBOL_MODIFIER => modifier.si_unit_symbol_modifier = true,
                attr::CONVERSION_FACTOR => modifier.conversion_factor = factor(),
                _ => {}
            },
            EntryAttributes::ValueClass(class) => {
                if name == attr::ALLOWED_CHARACTER {
                    class.allowed_characters.extend(owned());
                }
            }
            EntryAttributes::Attribute(def) => {
                if matches!(value, AttributeValue::Flag) {
                    def.properties.push(name.to_string());
                }
            }
            EntryAttributes::Property => {}
        }
    }
}

/// One named entry of a schema section.
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    long_name: String,
    section: SectionKey,
    attributes: BTreeMap<String, AttributeValue>,
    typed: EntryAttributes,
    unknown_attributes: BTreeMap<String, AttributeValue>,
    description: Option<String>,
}

impl SchemaEntry {
    pub fn new(long_name: impl Into<String>, section: SectionKey) -> Self {
        Self {
            long_name: long_name.into(),
            section,
            attributes: BTreeMap::new(),
            typed: EntryAttributes::for_section(section),
            unknown_attributes: BTreeMap::new(),
            description: None,
        }
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Last path segment; equal to the long name outside the tag section.
    pub fn short_name(&self) -> &str {
        self.long_name
            .rsplit(HIERARCHY_DELIMITER)
            .next()
            .unwrap_or(&self.long_name)
    }

    /// Long name of the parent node, for tags below the root.
    pub fn parent_name(&self) -> Option<&str> {
        self.long_name
            .rfind(HIERARCHY_DELIMITER)
            .map(|idx| &self.long_name[..idx])
    }

    pub fn section(&self) -> SectionKey {
        self.section
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Record an attribute, routing it by whether `valid` declares it.
    ///
    /// Returns false when the attribute went to the unknown side table.
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: AttributeValue,
        valid: &BTreeSet<String>,
    ) -> bool {
        if valid.contains(name) {
            self.typed.apply(name, &value);
            self.attributes.insert(name.to_string(), value);
            true
        } else {
            self.unknown_attributes.insert(name.to_string(), value);
            false
        }
    }

    /// Look up an attribute, known or unknown.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .get(name)
            .or_else(|| self.unknown_attributes.get(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn unknown_attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.unknown_attributes
    }

    pub fn typed(&self) -> &EntryAttributes {
        &self.typed
    }

    pub(crate) fn typed_mut(&mut self) -> &mut EntryAttributes {
        &mut self.typed
    }

    pub fn tag(&self) -> Option<&TagAttributes> {
        match &self.typed {
            EntryAttributes::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn unit_class(&self) -> Option<&UnitClassAttributes> {
        match &self.typed {
            EntryAttributes::UnitClass(class) => Some(class),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&UnitAttributes> {
        match &self.typed {
            EntryAttributes::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn unit_modifier(&self) -> Option<&UnitModifierAttributes> {
        match &self.typed {
            EntryAttributes::UnitModifier(modifier) => Some(modifier),
            _ => None,
        }
    }

    pub fn value_class(&self) -> Option<&ValueClassAttributes> {
        match &self.typed {
            EntryAttributes::ValueClass(class) => Some(class),
            _ => None,
        }
    }

    pub fn attribute_definition(&self) -> Option<&AttributeDefinition> {
        match &self.typed {
            EntryAttributes::Attribute(def) => Some(def),
            _ => None,
        }
    }
}

/// Unknown attributes do not take part in equality.
impl PartialEq for SchemaEntry {
    fn eq(&self, other: &Self) -> bool {
        self.long_name == other.long_name
            && self.section == other.section
            && self.attributes == other.attributes
            && self.description == other.description
    }
}

/// A named collection of entries plus the attributes legal for them.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSection {
    key: SectionKey,
    entries: BTreeMap<String, SchemaEntry>,
    valid_attributes: BTreeSet<String>,
}

impl SchemaSection {
    pub fn new(key: SectionKey, valid_attributes: BTreeSet<String>) -> Self {
        Self {
            key,
            entries: BTreeMap::new(),
            valid_attributes,
        }
    }

    pub fn key(&self) -> SectionKey {
        self.key
    }

    /// Normalize a name into this section's lookup key.
    pub fn lookup_key(&self, name: &str) -> String {
        if self.key.is_case_sensitive() {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(&self.lookup_key(name))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut SchemaEntry> {
        let key = self.lookup_key(name);
        self.entries.get_mut(&key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert an entry; returns the entry it displaced, if any.
    pub(crate) fn insert(&mut self, entry: SchemaEntry) -> Option<SchemaEntry> {
        let key = self.lookup_key(entry.long_name());
        self.entries.insert(key, entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn valid_attributes(&self) -> &BTreeSet<String> {
        &self.valid_attributes
    }

    pub fn is_valid_attribute(&self, name: &str) -> bool {
        self.valid_attributes.contains(name)
    }
}
