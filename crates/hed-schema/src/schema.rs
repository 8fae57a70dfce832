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

//! The in-memory schema: seven sections plus a short-name index.

use crate::entry::{SchemaEntry, SchemaSection, TagAttributes};
use crate::keys::SectionKey;
use hed_core::{HedResult, HIERARCHY_DELIMITER, PLACEHOLDER};
use std::collections::BTreeMap;

/// One loaded schema version, optionally bound to a library prefix.
///
/// Schemas are immutable once built; share them by reference across
/// validation calls and threads.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) prefix: String,
    pub(crate) version: Option<String>,
    pub(crate) library: Option<String>,
    pub(crate) tags: SchemaSection,
    pub(crate) unit_classes: SchemaSection,
    pub(crate) units: SchemaSection,
    pub(crate) unit_modifiers: SchemaSection,
    pub(crate) value_classes: SchemaSection,
    pub(crate) attributes: SchemaSection,
    pub(crate) properties: SchemaSection,
    /// Lower-cased short name to the long names that carry it.
    pub(crate) short_index: BTreeMap<String, Vec<String>>,
}

impl Schema {
    /// Library prefix without the `:`; empty for the default schema.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    pub fn section(&self, key: SectionKey) -> &SchemaSection {
        match key {
            SectionKey::Tags => &self.tags,
            SectionKey::UnitClasses => &self.unit_classes,
            SectionKey::Units => &self.units,
            SectionKey::UnitModifiers => &self.unit_modifiers,
            SectionKey::ValueClasses => &self.value_classes,
            SectionKey::Attributes => &self.attributes,
            SectionKey::Properties => &self.properties,
        }
    }

    /// Section lookup by name; an unknown name is a hard error.
    pub fn section_named(&self, name: &str) -> HedResult<&SchemaSection> {
        SectionKey::from_name(name).map(|key| self.section(key))
    }

    pub fn tags(&self) -> &SchemaSection {
        &self.tags
    }

    /// Tag entry by long name (case-insensitive).
    pub fn tag(&self, long_name: &str) -> Option<&SchemaEntry> {
        self.tags.get(long_name)
    }

    pub fn tag_attributes(&self, long_name: &str) -> Option<&TagAttributes> {
        self.tag(long_name).and_then(SchemaEntry::tag)
    }

    /// First tag whose short name matches (case-insensitive).
    pub fn find_short(&self, short_name: &str) -> Option<&SchemaEntry> {
        self.short_index
            .get(&short_name.to_lowercase())
            .and_then(|longs| longs.first())
            .and_then(|long| self.tags.get(long))
    }

    /// Short names carried by more than one node.
    pub fn duplicate_short_names(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.short_index
            .iter()
            .filter(|(_, longs)| longs.len() > 1)
            .map(|(short, longs)| (short.as_str(), longs.as_slice()))
    }

    /// The `#` child of a node, if it takes a value.
    pub fn value_entry(&self, long_name: &str) -> Option<&SchemaEntry> {
        self.tags
            .get(&format!("{}{}{}", long_name, HIERARCHY_DELIMITER, PLACEHOLDER))
    }

    pub fn takes_value(&self, long_name: &str) -> bool {
        self.value_entry(long_name).is_some()
            || self
                .tag_attributes(long_name)
                .map(|t| t.takes_value)
                .unwrap_or(false)
    }

    /// The node itself followed by its ancestors up to the root.
    pub fn ancestors<'a>(&'a self, long_name: &'a str) -> impl Iterator<Item = &'a SchemaEntry> + 'a {
        let mut current = Some(long_name);
        std::iter::from_fn(move || {
            let name = current?;
            current = name.rfind(HIERARCHY_DELIMITER).map(|idx| &name[..idx]);
            Some(self.tags.get(name))
        })
        .flatten()
    }

    /// True if the node or any ancestor carries `extensionAllowed`.
    pub fn allows_extension(&self, long_name: &str) -> bool {
        self.ancestors(long_name)
            .filter_map(SchemaEntry::tag)
            .any(|t| t.extension_allowed)
    }

    /// Unit classes governing the value of a node (declared on its `#` child or itself).
    pub fn unit_classes_for(&self, long_name: &str) -> Vec<&SchemaEntry> {
        self.class_names_for(long_name, |t| &t.unit_classes)
            .into_iter()
            .filter_map(|name| self.unit_classes.get(name))
            .collect()
    }

    /// Value classes governing the value of a node.
    pub fn value_classes_for(&self, long_name: &str) -> Vec<&SchemaEntry> {
        self.class_names_for(long_name, |t| &t.value_classes)
            .into_iter()
            .filter_map(|name| self.value_classes.get(name))
            .collect()
    }

    fn class_names_for<'a>(
        &'a self,
        long_name: &str,
        pick: impl Fn(&'a TagAttributes) -> &'a Vec<String>,
    ) -> Vec<&'a str> {
        [self.value_entry(long_name), self.tag(long_name)]
            .into_iter()
            .flatten()
            .filter_map(SchemaEntry::tag)
            .flat_map(|t| pick(t).iter().map(String::as_str))
            .collect()
    }

    pub fn unit_class(&self, name: &str) -> Option<&SchemaEntry> {
        self.unit_classes.get(name)
    }

    /// Units of a class, in declaration order.
    pub fn units_of_class(&self, class_name: &str) -> Vec<&SchemaEntry> {
        self.unit_class(class_name)
            .and_then(SchemaEntry::unit_class)
            .map(|class| {
                class
                    .units
                    .iter()
                    .filter_map(|name| self.units.get(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn unit_modifiers(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.unit_modifiers.iter()
    }

    /// Every tag carrying the named attribute.
    pub fn tags_with_attribute(&self, name: &str) -> Vec<&SchemaEntry> {
        self.tags.iter().filter(|e| e.has_attribute(name)).collect()
    }
}

/// Equal when every section matches; prefix and version are labels only.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        SectionKey::ALL
            .iter()
            .all(|key| self.section(*key) == other.section(*key))
    }
}
