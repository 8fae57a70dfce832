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

//! Validation entry points tying the passes together.

use crate::config::ValidatorConfig;
use crate::definitions::DefinitionTable;
use crate::group_validator::{definition_tag_indices, GroupValidator};
use crate::tag_validator::{TagContext, TagValidator};
use crate::temporal::{EventAssembler, TemporalEvent};
use hed_core::{has_errors, HedGroup, HedNode, HedResult, HedString, Issue};
use hed_schema::keys::special;
use hed_schema::SchemaGroup;
use rayon::prelude::*;
use tracing::debug;

/// Attach canonical forms to every tag that resolves and lacks one.
pub fn canonicalize(group: &mut HedGroup, schemas: &SchemaGroup) {
    group.for_each_tag_mut(&mut |tag| {
        if tag.canonical().is_none() {
            if let Ok(canonical) = schemas.resolve(tag.text()) {
                tag.set_canonical(canonical);
            }
        }
    });
}

/// Outcome of [`HedValidator::validate_document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentReport {
    pub definitions: DefinitionTable,
    pub events: Vec<TemporalEvent>,
    pub issues: Vec<Issue>,
}

impl DocumentReport {
    pub fn has_errors(&self) -> bool {
        has_errors(&self.issues)
    }
}

/// Validates HED strings and documents against one schema group.
///
/// # Examples
///
/// ```
/// use hed_validate::HedValidator;
///
/// let schemas = hed_test::standard_group();
/// let validator = HedValidator::new(&schemas);
/// assert!(validator.validate_string("Sensory-event, (Red, Boat)").is_empty());
///
/// let issues = validator.validate_string("Duration/3 cm");
/// assert_eq!(issues[0].code(), "HED_UNITS_INVALID");
/// ```
#[derive(Debug, Clone)]
pub struct HedValidator<'a> {
    schemas: &'a SchemaGroup,
    config: ValidatorConfig,
}

impl<'a> HedValidator<'a> {
    pub fn new(schemas: &'a SchemaGroup) -> Self {
        Self {
            schemas,
            config: ValidatorConfig::default(),
        }
    }

    /// Build with explicit options; rejects an invalid configuration.
    pub fn with_config(schemas: &'a SchemaGroup, config: ValidatorConfig) -> HedResult<Self> {
        config.validate()?;
        Ok(Self { schemas, config })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn schemas(&self) -> &SchemaGroup {
        self.schemas
    }

    /// Validate one string. `Def` references are not checked.
    pub fn validate_string(&self, source: &str) -> Vec<Issue> {
        self.validate_string_with_definitions(source, None)
    }

    /// Validate one string, checking `Def`/`Def-expand` against `definitions`.
    ///
    /// Lexical errors end validation early: the tree is unreliable past them.
    pub fn validate_string_with_definitions(
        &self,
        source: &str,
        definitions: Option<&DefinitionTable>,
    ) -> Vec<Issue> {
        let (hed, mut issues) = HedString::parse(source);
        if has_errors(&issues) {
            return self.config.finish(issues);
        }

        let mut root = hed.into_root();
        canonicalize(&mut root, self.schemas);

        let inside = definition_tag_indices(&root);
        let tags = TagValidator::new(self.schemas, &self.config);
        for tag in root.all_tags() {
            let context = TagContext {
                in_definition: inside.contains(&tag.index()),
            };
            issues.extend(tags.validate_tag(tag, context));
        }

        issues.extend(GroupValidator::new(self.schemas, &self.config).validate_group(&root));

        if let Some(table) = definitions {
            let mut references = root;
            references.children_mut().retain(|child| match child {
                HedNode::Group(group) => group.find_tag(|t| t.is_base(special::DEFINITION)).is_none(),
                HedNode::Tag(_) => true,
            });
            issues.extend(table.expand(&mut references, self.schemas));
        }

        self.config.finish(issues)
    }

    /// Validate many independent strings in parallel.
    pub fn validate_strings(&self, sources: &[&str]) -> Vec<Vec<Issue>> {
        sources
            .par_iter()
            .map(|source| self.validate_string(source))
            .collect()
    }

    /// Validate an ordered sequence of `(row index, time, HED string)` rows.
    ///
    /// Definitions are gathered from every row first, each row is then
    /// validated against them, and finally temporal events are assembled.
    /// Issues carry their row. Rows out of order are a hard error.
    pub fn validate_document(&self, rows: &[(usize, f64, &str)]) -> HedResult<DocumentReport> {
        let mut definitions = DefinitionTable::new();
        let mut issues = Vec::new();
        let mut trees = Vec::with_capacity(rows.len());

        for &(index, time, source) in rows {
            let (hed, _) = HedString::parse(source);
            let (remaining, found) = definitions.extract(hed.root(), self.schemas);
            issues.extend(found.into_iter().map(|issue| issue.with_row(index)));
            trees.push((index, time, remaining));
        }

        let per_row: Vec<Vec<Issue>> = rows
            .par_iter()
            .map(|&(index, _, source)| {
                self.validate_string_with_definitions(source, Some(&definitions))
                    .into_iter()
                    .map(|issue| issue.with_row(index))
                    .collect()
            })
            .collect();
        issues.extend(per_row.into_iter().flatten());

        let mut assembler = EventAssembler::new(&definitions, self.schemas);
        for (index, time, root) in &trees {
            assembler.push(*index, *time, root)?;
        }
        let assembly = assembler.finish();
        issues.extend(assembly.issues);

        debug!(
            rows = rows.len(),
            definitions = definitions.len(),
            events = assembly.events.len(),
            issues = issues.len(),
            "document validated"
        );
        Ok(DocumentReport {
            issues: self.config.finish(issues),
            events: assembly.events,
            definitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::HedErrorKind;
    use hed_test::{codes, standard_group};

    #[test]
    fn test_canonicalize_skips_resolved_and_unknown() {
        let schemas = standard_group();
        let (hed, _) = HedString::parse("Boat, Blorp");
        let mut root = hed.into_root();
        canonicalize(&mut root, &schemas);
        let tags = root.all_tags();
        assert_eq!(tags[0].long_tag(), "Item/Object/Man-made-object/Vehicle/Boat");
        assert!(tags[1].canonical().is_none());
    }

    #[test]
    fn test_lexical_errors_stop_validation() {
        let schemas = standard_group();
        let validator = HedValidator::new(&schemas);
        assert_eq!(codes(&validator.validate_string("(Blorp, Red")), vec!["HED_PARENTHESES_MISMATCH"]);
    }

    #[test]
    fn test_with_config_validates() {
        let schemas = standard_group();
        let err = HedValidator::with_config(&schemas, ValidatorConfig::default().with_max_issues(0)).unwrap_err();
        assert_eq!(err.kind, HedErrorKind::InvalidParameter);
    }

    #[test]
    fn test_errors_only_drops_warnings() {
        let schemas = standard_group();
        let validator = HedValidator::with_config(&schemas, ValidatorConfig::errors_only()).unwrap();
        assert!(validator.validate_string("Item/something, Duration/3").is_empty());
    }

    #[test]
    fn test_definition_placeholders_are_legal() {
        let schemas = standard_group();
        let validator = HedValidator::new(&schemas);
        assert!(validator
            .validate_string("(Definition/Move/#, (Distance/#, Car))")
            .is_empty());
    }

    #[test]
    fn test_references_need_a_table() {
        let schemas = standard_group();
        let validator = HedValidator::new(&schemas);
        assert!(validator.validate_string("Def/Unknown").is_empty());

        let table = DefinitionTable::new();
        let issues = validator.validate_string_with_definitions("Def/Unknown", Some(&table));
        assert_eq!(codes(&issues), vec!["HED_DEF_UNMATCHED"]);
    }
}
