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

//! Document-scoped definitions and `Def` expansion.
//!
//! A [`DefinitionTable`] is filled once per document from its top-level
//! `(Definition/Name[/#], (contents))` groups. Expansion replaces each
//! `Def/Name[/value]` with `(Def-expand/Name[/value], (contents))`, binding
//! the placeholder; existing `Def-expand` groups are checked, not expanded
//! again, so expansion is idempotent.

use crate::runner::canonicalize;
use hed_core::{
    split_prefix, CanonicalTag, HedGroup, HedNode, HedTag, Issue, IssueKind, RemainderKind,
    HIERARCHY_DELIMITER, NAMESPACE_DELIMITER, PLACEHOLDER,
};
use hed_schema::keys::special;
use hed_schema::SchemaGroup;
use std::collections::BTreeMap;
use tracing::debug;

/// Split a definition-family value `Name[/value]`.
pub fn split_definition_value(value: &str) -> (&str, Option<&str>) {
    match value.split_once(HIERARCHY_DELIMITER) {
        Some((name, rest)) => (name, Some(rest)),
        None => (value, None),
    }
}

fn with_prefix(prefix: &str, body: String) -> String {
    if prefix.is_empty() {
        body
    } else {
        format!("{}{}{}", prefix, NAMESPACE_DELIMITER, body)
    }
}

/// One `Definition` group.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    name: String,
    display_name: String,
    takes_value: bool,
    contents: Option<HedGroup>,
}

impl Definition {
    /// Lower-cased name, the table key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as written in the definition.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// True for `Definition/Name/#`.
    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    pub fn contents(&self) -> Option<&HedGroup> {
        self.contents.as_ref()
    }

    /// Contents with the placeholder bound to `value`.
    pub fn instantiate(&self, value: Option<&str>) -> Option<HedGroup> {
        let mut contents = self.contents.clone()?;
        if let (true, Some(value)) = (self.takes_value, value) {
            contents.for_each_tag_mut(&mut |tag| {
                if tag.has_placeholder() {
                    *tag = tag.replace_placeholder(value);
                }
            });
        }
        Some(contents)
    }
}

/// Definitions of one document, keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionTable {
    definitions: BTreeMap<String, Definition>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    /// Pull the definition groups out of a string's root.
    ///
    /// Returns the root without its definition groups. The first of two
    /// same-named definitions wins; later ones are reported.
    pub fn extract(&mut self, root: &HedGroup, schemas: &SchemaGroup) -> (HedGroup, Vec<Issue>) {
        let mut root = root.clone();
        canonicalize(&mut root, schemas);
        let span = root.span();

        let mut issues = Vec::new();
        let mut remaining = Vec::new();
        for child in root.into_children() {
            match child {
                HedNode::Group(group) if group.tags().any(|t| t.is_base(special::DEFINITION)) => {
                    issues.extend(self.add(group, schemas));
                }
                other => remaining.push(other),
            }
        }
        (HedGroup::with_children(remaining).with_span(span), issues)
    }

    fn add(&mut self, group: HedGroup, schemas: &SchemaGroup) -> Option<Issue> {
        let tag = group.find_tag(|t| t.is_base(special::DEFINITION))?.clone();
        let value = tag.canonical()?.value()?;
        let (name, rest) = split_definition_value(value);
        let key = name.to_lowercase();

        if self.definitions.contains_key(&key) {
            return Some(
                Issue::new(
                    IssueKind::DuplicateDefinition,
                    format!("definition '{}' is defined more than once", name),
                )
                .with_span(tag.span())
                .with_tag_index(tag.index()),
            );
        }
        if schemas.iter().any(|schema| schema.find_short(name).is_some()) {
            return Some(
                Issue::new(
                    IssueKind::TagInSchema,
                    format!("definition name '{}' is already a schema tag", name),
                )
                .with_span(tag.span())
                .with_tag_index(tag.index()),
            );
        }

        let definition = Definition {
            name: key.clone(),
            display_name: name.to_string(),
            takes_value: rest.map_or(false, |r| r.len() == 1 && r.starts_with(PLACEHOLDER)),
            contents: group.into_children().into_iter().find_map(|child| match child {
                HedNode::Group(g) => Some(g),
                HedNode::Tag(_) => None,
            }),
        };
        debug!(name = %key, takes_value = definition.takes_value, "definition added");
        self.definitions.insert(key, definition);
        None
    }

    /// Replace `Def` references below `group` with `Def-expand` groups.
    ///
    /// References that cannot be expanded stay as written and are reported.
    pub fn expand(&self, group: &mut HedGroup, schemas: &SchemaGroup) -> Vec<Issue> {
        let mut issues = Vec::new();
        self.expand_into(group, schemas, &mut issues);
        issues
    }

    fn expand_into(&self, group: &mut HedGroup, schemas: &SchemaGroup, issues: &mut Vec<Issue>) {
        for child in group.children_mut().iter_mut() {
            match child {
                HedNode::Group(inner) => {
                    if let Some(anchor) = inner.find_tag(|t| t.is_base(special::DEF_EXPAND)) {
                        issues.extend(self.check_expanded(anchor, inner));
                    } else {
                        self.expand_into(inner, schemas, issues);
                    }
                }
                HedNode::Tag(tag) if tag.is_base(special::DEF) => {
                    match self.expand_reference(tag, schemas) {
                        Ok(Some(expanded)) => *child = HedNode::Group(expanded),
                        Ok(None) => {}
                        Err(issue) => issues.push(issue),
                    }
                }
                HedNode::Tag(_) => {}
            }
        }
    }

    fn expand_reference(&self, tag: &HedTag, schemas: &SchemaGroup) -> Result<Option<HedGroup>, Issue> {
        let Some(canonical) = tag.canonical() else {
            return Ok(None);
        };
        let value = canonical.value().unwrap_or_default();
        let (name, bound) = split_definition_value(value);
        let located = |issue: Issue| issue.with_span(tag.span()).with_tag_index(tag.index());

        let Some(definition) = self.get(name) else {
            return Err(located(Issue::new(
                IssueKind::DefUnmatched,
                format!("'{}' does not name a known definition", tag.text()),
            )));
        };

        match (definition.takes_value, bound) {
            (true, None) => {
                return Err(located(Issue::new(
                    IssueKind::DefValueMissing,
                    format!("definition '{}' requires a value", definition.display_name),
                )))
            }
            (false, Some(_)) => {
                return Err(located(Issue::new(
                    IssueKind::DefValueExtra,
                    format!("definition '{}' does not take a value", definition.display_name),
                )))
            }
            (true, Some(v)) if v.len() == 1 && v.starts_with(PLACEHOLDER) => return Ok(None),
            (true, Some(v)) => {
                if !self.bound_value_valid(definition, v, schemas) {
                    return Err(located(Issue::new(
                        IssueKind::DefValueInvalid,
                        format!("'{}' is not a valid value for definition '{}'", v, definition.display_name),
                    )));
                }
            }
            (false, None) => {}
        }

        let text = match base_end(tag, canonical) {
            Some(end) => format!("{}{}{}", &tag.text()[..end], EXPAND_SUFFIX, &tag.text()[end..]),
            None => with_prefix(
                &canonical.prefix,
                format!("{}{}{}", special::DEF_EXPAND, HIERARCHY_DELIMITER, value),
            ),
        };
        let mut anchor = HedTag::new(text.as_str())
            .with_span(tag.span())
            .with_index(tag.index());
        if let Ok(resolved) = schemas.resolve(&text) {
            anchor.set_canonical(resolved);
        }

        let mut expanded = HedGroup::new().with_span(tag.span());
        expanded.push_tag(anchor);
        if let Some(contents) = definition.instantiate(bound) {
            expanded.push_group(contents);
        }
        Ok(Some(expanded))
    }

    /// The bound value must satisfy the placeholder tag's value rules.
    fn bound_value_valid(&self, definition: &Definition, value: &str, schemas: &SchemaGroup) -> bool {
        let Some(contents) = definition.contents() else {
            return true;
        };
        let Some(template) = contents.all_tags().into_iter().find(|t| t.has_placeholder()) else {
            return true;
        };
        let bound = template.replace_placeholder(value);
        let Some(canonical) = bound.canonical() else {
            return true;
        };
        let (Some(schema), Some(text)) = (schemas.schema_for(canonical), canonical.value()) else {
            return true;
        };
        !schema
            .check_value(&canonical.long_base, text)
            .iter()
            .any(Issue::is_error)
    }

    fn check_expanded(&self, anchor: &HedTag, group: &HedGroup) -> Option<Issue> {
        let value = anchor.canonical()?.value()?;
        let (name, bound) = split_definition_value(value);
        let located = |issue: Issue| issue.with_span(anchor.span()).with_tag_index(anchor.index());

        let Some(definition) = self.get(name) else {
            return Some(located(Issue::new(
                IssueKind::DefUnmatched,
                format!("'{}' does not name a known definition", anchor.text()),
            )));
        };
        let expected = contents_key(definition.instantiate(bound).as_ref());
        let actual = contents_key(group.groups().next());
        if expected != actual {
            return Some(located(Issue::new(
                IssueKind::DefExpandInvalid,
                format!(
                    "contents of '{}' differ from definition '{}'",
                    anchor.text(),
                    definition.display_name
                ),
            )));
        }
        None
    }

    /// Turn `(Def-expand/X, (...))` groups back into `Def/X` tags.
    ///
    /// Groups naming an unknown definition, or carrying extra tags, are left
    /// alone.
    pub fn collapse(&self, group: &mut HedGroup) {
        for child in group.children_mut().iter_mut() {
            let replacement = match child {
                HedNode::Group(inner) => match inner.find_tag(|t| t.is_base(special::DEF_EXPAND)) {
                    Some(anchor) if inner.tags().count() == 1 => self.collapsed(anchor),
                    Some(_) => None,
                    None => {
                        self.collapse(inner);
                        None
                    }
                },
                HedNode::Tag(_) => None,
            };
            if let Some(tag) = replacement {
                *child = HedNode::Tag(tag);
            }
        }
    }

    fn collapsed(&self, anchor: &HedTag) -> Option<HedTag> {
        let canonical = anchor.canonical()?;
        let value = canonical.value()?;
        let (name, _) = split_definition_value(value);
        self.get(name)?;

        // Drop the `-expand` suffix of the base segment, keeping the form
        // and case the anchor was written in.
        let text = anchor.text();
        let end = base_end(anchor, canonical)?;
        let start = end.checked_sub(EXPAND_SUFFIX.len())?;
        if !text.get(start..end)?.eq_ignore_ascii_case(EXPAND_SUFFIX) {
            return None;
        }
        let offset = canonical.remainder.as_ref()?.offset.checked_sub(EXPAND_SUFFIX.len())?;

        let long_base = match canonical.long_base.rsplit_once(HIERARCHY_DELIMITER) {
            Some((parent, _)) => format!("{}{}{}", parent, HIERARCHY_DELIMITER, special::DEF),
            None => special::DEF.to_string(),
        };
        let mut tag = HedTag::new(format!("{}{}", &text[..start], &text[end..]))
            .with_span(anchor.span())
            .with_index(anchor.index());
        tag.set_canonical(
            CanonicalTag::new(canonical.prefix.clone(), long_base).with_remainder(
                value,
                RemainderKind::Value,
                offset,
            ),
        );
        Some(tag)
    }
}

const EXPAND_SUFFIX: &str = "-expand";

/// End of the base segment (`Def` or `Def-expand`) within the tag text.
fn base_end(tag: &HedTag, canonical: &CanonicalTag) -> Option<usize> {
    let remainder = canonical.remainder.as_ref()?;
    let (_, body) = split_prefix(tag.text());
    let prefix_len = tag.text().len() - body.len();
    (prefix_len + remainder.offset).checked_sub(1)
}

/// Order-insensitive identity of a contents group.
fn contents_key(group: Option<&HedGroup>) -> Vec<String> {
    let mut keys: Vec<String> = group
        .map(|g| g.all_tags().into_iter().map(HedTag::canonical_key).collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::HedString;
    use hed_test::{codes, standard_group, DEFINITIONS};

    fn parsed(source: &str) -> HedGroup {
        let (hed, issues) = HedString::parse(source);
        assert!(issues.is_empty(), "{:?}", issues);
        let mut root = hed.into_root();
        canonicalize(&mut root, &standard_group());
        root
    }

    fn table() -> DefinitionTable {
        let mut table = DefinitionTable::new();
        let (_, issues) = table.extract(&parsed(DEFINITIONS), &standard_group());
        assert!(issues.is_empty(), "{:?}", issues);
        table
    }

    #[test]
    fn test_extract() {
        let mut table = DefinitionTable::new();
        let (rest, issues) = table.extract(
            &parsed("Sensory-event, (Definition/Stim, (Red)), (Definition/Move/#, (Distance/#))"),
            &standard_group(),
        );
        assert!(issues.is_empty());
        assert_eq!(rest.to_string(), "(Sensory-event)");
        assert_eq!(table.len(), 2);
        assert!(!table.get("STIM").unwrap().takes_value());
        assert!(table.get("move").unwrap().takes_value());
        assert_eq!(table.get("Move").unwrap().display_name(), "Move");
    }

    #[test]
    fn test_extract_without_contents() {
        let mut table = DefinitionTable::new();
        table.extract(&parsed("(Definition/Marker)"), &standard_group());
        assert!(table.get("marker").unwrap().contents().is_none());
    }

    #[test]
    fn test_duplicate_and_schema_names() {
        let mut table = DefinitionTable::new();
        let (_, issues) = table.extract(
            &parsed("(Definition/Stim, (Red)), (Definition/stim, (Boat)), (Definition/Car, (Red))"),
            &standard_group(),
        );
        assert_eq!(codes(&issues), vec!["duplicateDefinition", "defAlreadyInSchema"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("stim").unwrap().contents().unwrap().to_string(), "(Red)");
    }

    #[test]
    fn test_expand_binds_placeholder() {
        let table = table();
        let mut root = parsed("Def/Move/3 m, Def/Stim");
        let issues = table.expand(&mut root, &standard_group());
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(
            root.to_string(),
            "((Def-expand/Move/3 m, (Distance/3 m, Car)), (Def-expand/Stim, (Sensory-event, Red)))"
        );
    }

    #[test]
    fn test_expand_reference_errors() {
        let table = table();
        let mut root = parsed("Def/Unknown, Def/Move, Def/Stim/3, Def/Move/3 cm");
        let issues = table.expand(&mut root, &standard_group());
        assert_eq!(
            codes(&issues),
            vec!["HED_DEF_UNMATCHED", "HED_DEF_VALUE_MISSING", "HED_DEF_VALUE_EXTRA", "HED_DEF_VALUE_INVALID"]
        );
        assert_eq!(root.groups().count(), 0);
    }

    #[test]
    fn test_expand_is_idempotent() {
        let table = table();
        let mut root = parsed("Sensory-event, (Def/Move/2 m, Purple)");
        table.expand(&mut root, &standard_group());
        let once = root.clone();
        let issues = table.expand(&mut root, &standard_group());
        assert!(issues.is_empty());
        assert_eq!(root, once);
    }

    #[test]
    fn test_collapse_round_trip() {
        let table = table();
        let original = parsed("Red, (Def/Stim, Boat)");
        let mut root = original.clone();
        table.expand(&mut root, &standard_group());
        assert_ne!(root, original);
        table.collapse(&mut root);
        assert_eq!(root, original);
    }

    #[test]
    fn test_collapse_keeps_written_form() {
        let table = table();
        for source in [
            "Property/Informational-property/Def/Move/2 m",
            "Informational-property/def/stim",
            "Boat, (Def/STIM, Red)",
        ] {
            let original = parsed(source);
            let mut root = original.clone();
            assert!(table.expand(&mut root, &standard_group()).is_empty());
            table.collapse(&mut root);
            assert_eq!(root.children_string(), source);
            assert_eq!(root, original);
        }
    }

    #[test]
    fn test_def_expand_contents_checked() {
        let table = table();
        let mut good = parsed("(Def-expand/Stim, (Red, Sensory-event))");
        assert!(table.expand(&mut good, &standard_group()).is_empty());

        let mut bad = parsed("(Def-expand/Stim, (Blue-color))");
        let issues = table.expand(&mut bad, &standard_group());
        assert_eq!(codes(&issues), vec!["HED_DEF_EXPAND_INVALID"]);

        let mut unknown = parsed("(Def-expand/Nope, (Red))");
        let issues = table.expand(&mut unknown, &standard_group());
        assert_eq!(codes(&issues), vec!["HED_DEF_UNMATCHED"]);
    }
}
