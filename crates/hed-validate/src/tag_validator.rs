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

//! Checks on one tag in isolation.
//!
//! Order is fixed: characters, empty nodes, resolution, `requireChild`,
//! placeholders, then capitalization. Lexical failures stop the tag there;
//! a resolution failure skips the attribute-driven checks.

use crate::config::ValidatorConfig;
use hed_core::{
    split_prefix, CanonicalTag, HedTag, Issue, IssueKind, RemainderKind, Span,
    HIERARCHY_DELIMITER, PLACEHOLDER,
};
use hed_schema::keys::special;
use hed_schema::{Schema, SchemaGroup};

/// Where a tag sits, as far as placeholder legality is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagContext {
    /// Inside a `Definition` group (the definition tag or its contents).
    pub in_definition: bool,
}

/// True for `Def`, `Def-expand` and `Definition`.
pub fn is_definition_family(canonical: &CanonicalTag) -> bool {
    let base = canonical.short_base();
    [special::DEF, special::DEF_EXPAND, special::DEFINITION]
        .iter()
        .any(|name| base.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy)]
pub struct TagValidator<'a> {
    schemas: &'a SchemaGroup,
    config: &'a ValidatorConfig,
}

impl<'a> TagValidator<'a> {
    pub fn new(schemas: &'a SchemaGroup, config: &'a ValidatorConfig) -> Self {
        Self { schemas, config }
    }

    /// Validate one tag. Spans are in the coordinates of the tag's string.
    pub fn validate_tag(&self, tag: &HedTag, context: TagContext) -> Vec<Issue> {
        let mut issues = check_characters(tag);
        issues.extend(check_empty_nodes(tag));

        if issues.is_empty() {
            let value_offset = match self.schemas.resolve(tag.text()) {
                Err(issue) => {
                    issues.push(issue.shifted(tag.span().start));
                    None
                }
                Ok(canonical) => self.check_resolved(tag, &canonical, context, &mut issues),
            };
            if self.config.check_warnings {
                issues.extend(check_capitalization(tag, value_offset));
            }
        }

        issues
            .into_iter()
            .map(|issue| issue.with_tag_index(tag.index()))
            .collect()
    }

    /// Attribute-driven checks. Returns the offset of the value within the
    /// tag text, when the tag carries one.
    fn check_resolved(
        &self,
        tag: &HedTag,
        canonical: &CanonicalTag,
        context: TagContext,
        issues: &mut Vec<Issue>,
    ) -> Option<usize> {
        let (_, body) = split_prefix(tag.text());
        let prefix_len = tag.text().len() - body.len();
        let start = tag.span().start;
        let attrs = self.schemas.entry(canonical).and_then(|e| e.tag());

        let Some(remainder) = &canonical.remainder else {
            // The child must be on the tag itself; a sibling in the
            // enclosing group does not satisfy `requireChild`.
            if attrs.map_or(false, |a| a.require_child) {
                issues.push(
                    Issue::new(
                        IssueKind::TagRequiresChild,
                        format!("'{}' requires a child or value", tag.text()),
                    )
                    .with_span(tag.span()),
                );
            }
            return None;
        };

        let rem_start = prefix_len + remainder.offset;
        let rem_span = Span::new(start + rem_start, start + tag.text().len());

        if remainder.kind == RemainderKind::Extension {
            if remainder.text.contains(PLACEHOLDER) {
                issues.push(
                    Issue::new(
                        IssueKind::PlaceholderInvalid,
                        format!("'{}' cannot hold a placeholder in an extension", tag.text()),
                    )
                    .with_span(rem_span),
                );
            } else if self.config.report_extensions {
                issues.push(
                    Issue::new(
                        IssueKind::TagExtended,
                        format!("'{}' extends '{}'", remainder.text, canonical.long_base),
                    )
                    .with_span(rem_span),
                );
            }
            return None;
        }

        let placeholders_allowed = context.in_definition || self.config.allow_placeholders;
        let Some(schema) = self.schemas.schema_for(canonical) else {
            return Some(rem_start);
        };

        if is_definition_family(canonical) {
            issues.extend(check_definition_name(
                schema,
                canonical,
                &remainder.text,
                placeholders_allowed,
                start + rem_start,
            ));
        } else if remainder.text.contains(PLACEHOLDER) {
            let text = remainder.text.as_str();
            let single = text.matches(PLACEHOLDER).count() == 1;
            if !single || !(text.len() == 1 || text.starts_with("# ")) {
                issues.push(
                    Issue::new(
                        IssueKind::PlaceholderInvalid,
                        format!("placeholder must stand for the whole magnitude in '{}'", tag.text()),
                    )
                    .with_span(rem_span),
                );
            } else if !placeholders_allowed {
                issues.push(
                    Issue::new(
                        IssueKind::PlaceholderInvalid,
                        format!("'{}' has a placeholder outside a definition", tag.text()),
                    )
                    .with_span(rem_span),
                );
            } else if text.len() > 1 {
                // `# ms`: the unit is still checked against a stand-in magnitude.
                issues.extend(
                    schema
                        .check_value(&canonical.long_base, &text.replacen(PLACEHOLDER, "1", 1))
                        .into_iter()
                        .map(|issue| issue.shifted(start + rem_start)),
                );
            }
        } else {
            issues.extend(
                schema
                    .check_value(&canonical.long_base, &remainder.text)
                    .into_iter()
                    .map(|issue| issue.shifted(start + rem_start)),
            );
        }
        Some(rem_start)
    }
}

/// `Def`, `Def-expand` and `Definition` values are `Name[/value]`; only the
/// name is checked against the value class.
fn check_definition_name(
    schema: &Schema,
    canonical: &CanonicalTag,
    value: &str,
    placeholders_allowed: bool,
    value_start: usize,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let (name, rest) = match value.split_once(HIERARCHY_DELIMITER) {
        Some((name, rest)) => (name, Some(rest)),
        None => (value, None),
    };
    let name_span = Span::new(value_start, value_start + name.len());

    let classes = schema.value_classes_for(&canonical.long_base);
    if !classes.is_empty() && !classes.iter().any(|c| schema.value_matches_class(c, name)) {
        issues.push(
            Issue::new(
                IssueKind::ValueInvalid,
                format!("'{}' is not a valid definition name", name),
            )
            .with_span(name_span),
        );
    }

    let Some(rest) = rest else {
        return issues;
    };
    let rest_start = value_start + name.len() + 1;
    let rest_span = Span::new(rest_start, rest_start + rest.len());
    let is_placeholder = rest.len() == 1 && rest.starts_with(PLACEHOLDER);

    if canonical.short_base().eq_ignore_ascii_case(special::DEFINITION) && !is_placeholder {
        issues.push(
            Issue::new(
                IssueKind::InvalidDefinitionExtension,
                format!("definition '{}' may only be followed by a placeholder", name),
            )
            .with_span(rest_span),
        );
    } else if is_placeholder && !placeholders_allowed {
        issues.push(
            Issue::new(
                IssueKind::PlaceholderInvalid,
                format!("'{}/{}' has a placeholder outside a definition", name, rest),
            )
            .with_span(rest_span),
        );
    } else if !is_placeholder && rest.contains(PLACEHOLDER) {
        issues.push(
            Issue::new(
                IssueKind::PlaceholderInvalid,
                format!("placeholder must be the whole value in '{}/{}'", name, rest),
            )
            .with_span(rest_span),
        );
    }
    issues
}

fn check_characters(tag: &HedTag) -> Vec<Issue> {
    let start = tag.span().start;
    tag.text()
        .char_indices()
        .filter_map(|(i, c)| {
            let span = Span::new(start + i, start + i + c.len_utf8());
            if c == '~' {
                Some(
                    Issue::new(IssueKind::TildesUnsupported, "'~' is not supported in HED 3")
                        .with_span(span),
                )
            } else if matches!(c, '[' | ']' | '{' | '}') || c.is_control() {
                Some(
                    Issue::new(
                        IssueKind::CharacterInvalid,
                        format!("invalid character {:?} in '{}'", c, tag.text()),
                    )
                    .with_span(span),
                )
            } else {
                None
            }
        })
        .collect()
}

fn check_empty_nodes(tag: &HedTag) -> Vec<Issue> {
    if tag.text().is_empty() {
        return vec![Issue::new(IssueKind::TagEmpty, "empty tag").with_span(tag.span())];
    }
    let (_, body) = split_prefix(tag.text());
    let mut offset = tag.span().start + tag.text().len() - body.len();
    for segment in body.split(HIERARCHY_DELIMITER) {
        if segment.trim().is_empty() {
            return vec![Issue::new(
                IssueKind::NodeNameEmpty,
                format!("'{}' has an empty node name", tag.text()),
            )
            .with_span(Span::new(offset, offset + segment.len()))];
        }
        offset += segment.len() + 1;
    }
    Vec::new()
}

/// First letter of each non-value segment should be upper case.
fn check_capitalization(tag: &HedTag, value_offset: Option<usize>) -> Vec<Issue> {
    let (_, body) = split_prefix(tag.text());
    let prefix_len = tag.text().len() - body.len();
    let checked = match value_offset {
        Some(offset) => &tag.text()[prefix_len..offset.saturating_sub(1).max(prefix_len)],
        None => body,
    };
    let mut offset = tag.span().start + prefix_len;
    for segment in checked.split(HIERARCHY_DELIMITER) {
        if segment.chars().next().map_or(false, char::is_lowercase) {
            return vec![Issue::new(
                IssueKind::StyleWarning,
                format!("'{}' in '{}' should start with a capital letter", segment, tag.text()),
            )
            .with_span(Span::new(offset, offset + segment.len()))];
        }
        offset += segment.len() + 1;
    }
    Vec::new()
}
