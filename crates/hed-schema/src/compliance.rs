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

//! Schema self-checks.

use crate::entry::SchemaEntry;
use crate::group::SchemaGroup;
use crate::keys::{attr, SectionKey};
use crate::schema::Schema;
use hed_core::{ContextEntry, Issue, IssueKind, NAMESPACE_DELIMITER, PLACEHOLDER};
use tracing::debug;

/// Well-formedness pass over a schema or a group of schemas.
pub trait ComplianceCheck {
    /// Collect every compliance issue; warnings only when asked.
    fn check_compliance(&self, include_warnings: bool) -> Vec<Issue>;
}

impl ComplianceCheck for Schema {
    fn check_compliance(&self, include_warnings: bool) -> Vec<Issue> {
        let mut issues = Vec::new();
        let display = |name: &str| {
            if self.prefix().is_empty() {
                name.to_string()
            } else {
                format!("{}{}{}", self.prefix(), NAMESPACE_DELIMITER, name)
            }
        };

        for (short, longs) in self.duplicate_short_names() {
            issues.push(
                Issue::new(
                    IssueKind::SchemaDuplicateNode,
                    format!(
                        "short name '{}' is used by {} nodes: {}",
                        short,
                        longs.len(),
                        longs.join(", ")
                    ),
                )
                .with_context(ContextEntry::SchemaSection(SectionKey::Tags.to_string()))
                .with_context(ContextEntry::SchemaTag(display(short))),
            );
        }

        for entry in self.tags().iter() {
            issues.extend(
                self.check_class_references(entry)
                    .into_iter()
                    .map(|issue| issue.with_context(ContextEntry::SchemaTag(display(entry.long_name())))),
            );
        }

        for class in self.section(SectionKey::UnitClasses).iter() {
            let Some(typed) = class.unit_class() else { continue };
            if let Some(default) = &typed.default_units {
                if !typed.units.contains(default) {
                    issues.push(
                        Issue::new(
                            IssueKind::SchemaAttributeInvalid,
                            format!(
                                "default unit '{}' of '{}' is not one of its units",
                                default,
                                class.long_name()
                            ),
                        )
                        .with_context(ContextEntry::SchemaSection(SectionKey::UnitClasses.to_string()))
                        .with_context(ContextEntry::SchemaAttribute(attr::DEFAULT_UNITS.to_string())),
                    );
                }
            }
        }

        if include_warnings {
            for key in SectionKey::ALL {
                for entry in self.section(key).iter() {
                    issues.extend(warnings_for(entry, key).into_iter().map(|issue| {
                        issue
                            .with_context(ContextEntry::SchemaSection(key.to_string()))
                            .with_context(ContextEntry::SchemaTag(display(entry.long_name())))
                    }));
                }
            }
        }

        debug!(prefix = self.prefix(), issues = issues.len(), "schema compliance checked");
        issues
    }
}

impl Schema {
    fn check_class_references(&self, entry: &SchemaEntry) -> Vec<Issue> {
        let Some(tag) = entry.tag() else {
            return Vec::new();
        };
        let unit_classes = tag
            .unit_classes
            .iter()
            .filter(|name| self.unit_class(name).is_none())
            .map(|name| (attr::UNIT_CLASS, name));
        let value_classes = tag
            .value_classes
            .iter()
            .filter(|name| !self.section(SectionKey::ValueClasses).contains(name))
            .map(|name| (attr::VALUE_CLASS, name));

        unit_classes
            .chain(value_classes)
            .map(|(attribute, name)| {
                Issue::new(
                    IssueKind::SchemaAttributeInvalid,
                    format!("{} '{}' is not defined in this schema", attribute, name),
                )
                .with_context(ContextEntry::SchemaAttribute(attribute.to_string()))
            })
            .collect()
    }
}

fn warnings_for(entry: &SchemaEntry, key: SectionKey) -> Vec<Issue> {
    let mut issues = Vec::new();

    for name in entry.unknown_attributes().keys() {
        issues.push(
            Issue::warning(
                IssueKind::SchemaAttributeInvalid,
                format!("attribute '{}' is not valid in section '{}'", name, key),
            )
            .with_context(ContextEntry::SchemaAttribute(name.clone())),
        );
    }

    if key == SectionKey::Tags {
        let short = entry.short_name();
        let is_placeholder = short.len() == 1 && short.starts_with(PLACEHOLDER);
        if !is_placeholder {
            if let Some(bad) = short
                .chars()
                .find(|c| !(c.is_alphanumeric() || *c == '-' || *c == '_'))
            {
                issues.push(Issue::new(
                    IssueKind::SchemaCharacterInvalid,
                    format!("'{}' contains the invalid character '{}'", short, bad),
                ));
            }
            if short.chars().next().map_or(false, char::is_lowercase) {
                issues.push(Issue::new(
                    IssueKind::SchemaInvalidCapitalization,
                    format!("'{}' should start with a capital letter", short),
                ));
            }
        }
    }

    if let Some(description) = entry.description() {
        if description.chars().any(char::is_control) {
            issues.push(Issue::new(
                IssueKind::SchemaCharacterInvalid,
                format!("description of '{}' contains control characters", entry.long_name()),
            ));
        }
    }

    issues
}

impl ComplianceCheck for SchemaGroup {
    /// Concatenates every schema's issues; one failing schema does not stop the rest.
    fn check_compliance(&self, include_warnings: bool) -> Vec<Issue> {
        self.iter()
            .flat_map(|schema| schema.check_compliance(include_warnings))
            .collect()
    }
}
