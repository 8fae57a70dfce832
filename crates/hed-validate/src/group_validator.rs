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

//! Structural checks on a parsed, canonicalized HED string.

use crate::config::ValidatorConfig;
use hed_core::{HedGroup, HedTag, Issue, IssueKind, NAMESPACE_DELIMITER, PLACEHOLDER};
use hed_schema::keys::{attr, special};
use hed_schema::{SchemaGroup, TagAttributes};
use std::collections::{HashMap, HashSet};
use tracing::trace;

const DEFINITION_FAMILY: [&str; 3] = [special::DEFINITION, special::DEF, special::DEF_EXPAND];

/// Indices of tags that sit inside a `Definition` group at any depth.
///
/// The root group never counts, so a bare `Definition/X/#` does not make
/// its placeholder legal.
pub fn definition_tag_indices(root: &HedGroup) -> HashSet<usize> {
    let mut inside = HashSet::new();
    let mut stack: Vec<(&HedGroup, bool)> = root.groups().map(|g| (g, false)).collect();
    while let Some((group, within)) = stack.pop() {
        let within = within || group.tags().any(|t| t.is_base(special::DEFINITION));
        if within {
            inside.extend(group.tags().map(HedTag::index));
        }
        stack.extend(group.groups().map(|g| (g, within)));
    }
    inside
}

/// Checks that need the tree: duplicates, placement and definition shape.
#[derive(Debug, Clone, Copy)]
pub struct GroupValidator<'a> {
    schemas: &'a SchemaGroup,
    config: &'a ValidatorConfig,
}

impl<'a> GroupValidator<'a> {
    pub fn new(schemas: &'a SchemaGroup, config: &'a ValidatorConfig) -> Self {
        Self { schemas, config }
    }

    fn attributes(&self, tag: &HedTag) -> Option<&TagAttributes> {
        self.schemas.entry(tag.canonical()?)?.tag()
    }

    fn has(&self, tag: &HedTag, pick: impl Fn(&TagAttributes) -> bool) -> bool {
        self.attributes(tag).map_or(false, pick)
    }

    /// Validate the root group of a string and everything below it.
    ///
    /// Tags are expected to carry their canonical form; unresolved tags take
    /// part in duplicate detection by text and are otherwise skipped.
    pub fn validate_group(&self, root: &HedGroup) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut stack = vec![(root, 0usize)];
        let mut visited = 0usize;

        while let Some((group, depth)) = stack.pop() {
            visited += 1;
            self.check_duplicates(group, &mut issues);
            self.check_placement(group, depth, &mut issues);
            if depth > 0 {
                self.check_definition_shape(group, &mut issues);
            }
            let children: Vec<_> = group.groups().collect();
            stack.extend(children.into_iter().rev().map(|g| (g, depth + 1)));
        }

        self.check_unique(root, &mut issues);
        if self.config.check_required_tags {
            self.check_required(root, &mut issues);
        }
        trace!(groups = visited, issues = issues.len(), "group checks done");
        issues
    }

    fn check_duplicates(&self, group: &HedGroup, issues: &mut Vec<Issue>) {
        let mut seen = HashSet::new();
        for tag in group.tags() {
            if !seen.insert(tag.canonical_key()) {
                issues.push(
                    Issue::new(
                        IssueKind::TagRepeated,
                        format!("'{}' appears more than once in the same group", tag.text()),
                    )
                    .with_span(tag.span())
                    .with_tag_index(tag.index()),
                );
            }
        }
    }

    /// Depth and co-occurrence of `topLevelTagGroup` tags. Their position
    /// among the group's children is not checked; `(Red, Onset, Def/X)` is
    /// accepted.
    fn check_placement(&self, group: &HedGroup, depth: usize, issues: &mut Vec<Issue>) {
        let top: Vec<&HedTag> = group
            .tags()
            .filter(|t| self.has(t, |a| a.top_level_tag_group))
            .collect();

        if depth != 1 {
            for tag in &top {
                issues.push(
                    Issue::new(
                        IssueKind::TopLevelTag,
                        format!("'{}' must be in a group at the top level of the string", tag.text()),
                    )
                    .with_span(tag.span())
                    .with_tag_index(tag.index()),
                );
            }
        } else if let [_, extra, ..] = top.as_slice() {
            let names: Vec<&str> = top.iter().map(|t| t.text()).collect();
            issues.push(
                Issue::new(
                    IssueKind::MultipleTopTags,
                    format!("group has more than one top-level tag: {}", names.join(", ")),
                )
                .with_span(extra.span())
                .with_tag_index(extra.index()),
            );
        }

        if depth == 0 {
            for tag in group.tags().filter(|t| self.has(t, |a| a.tag_group)) {
                issues.push(
                    Issue::new(
                        IssueKind::TagGroupTag,
                        format!("'{}' must be inside a group", tag.text()),
                    )
                    .with_span(tag.span())
                    .with_tag_index(tag.index()),
                );
            }
        }
    }

    fn check_definition_shape(&self, group: &HedGroup, issues: &mut Vec<Issue>) {
        let Some(anchor) = group
            .tags()
            .find(|t| t.is_base(special::DEFINITION) || t.is_base(special::DEF_EXPAND))
        else {
            return;
        };
        let at_anchor = |issue: Issue| issue.with_span(group.span()).with_tag_index(anchor.index());

        let tag_count = group.tags().count();
        if tag_count != 1 {
            issues.push(at_anchor(Issue::new(
                IssueKind::WrongNumberDefinitionTags,
                format!(
                    "'{}' group must hold exactly one tag besides its contents; found {}",
                    anchor.text(),
                    tag_count
                ),
            )));
        }

        let group_count = group.groups().count();
        if group_count > 1 {
            issues.push(at_anchor(Issue::new(
                IssueKind::WrongNumberGroupTags,
                format!(
                    "'{}' group may hold at most one contents group; found {}",
                    anchor.text(),
                    group_count
                ),
            )));
        }

        if !anchor.is_base(special::DEFINITION) {
            return;
        }

        let contents: Vec<&HedTag> = group.groups().flat_map(HedGroup::all_tags).collect();
        for tag in &contents {
            if DEFINITION_FAMILY.iter().any(|name| tag.is_base(name)) {
                issues.push(
                    Issue::new(
                        IssueKind::DefinitionInvalid,
                        format!("'{}' cannot appear inside the definition '{}'", tag.text(), anchor.text()),
                    )
                    .with_span(tag.span())
                    .with_tag_index(tag.index()),
                );
            }
        }

        let declares = anchor
            .canonical()
            .and_then(|c| c.value())
            .map_or(false, |v| v.ends_with("/#"));
        let expected = usize::from(declares);
        let found: usize = contents
            .iter()
            .map(|t| t.text().matches(PLACEHOLDER).count())
            .sum();
        if found != expected {
            issues.push(at_anchor(Issue::new(
                IssueKind::WrongNumberPlaceholderTags,
                format!(
                    "definition '{}' expects {} placeholder(s) in its contents; found {}",
                    anchor.text(),
                    expected,
                    found
                ),
            )));
        }
    }

    fn check_unique(&self, root: &HedGroup, issues: &mut Vec<Issue>) {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for tag in root.all_tags() {
            let Some(canonical) = tag.canonical() else { continue };
            if !self.has(tag, |a| a.unique) {
                continue;
            }
            let key = format!("{}:{}", canonical.prefix, canonical.long_base.to_lowercase());
            let seen = counts.entry(key).or_insert(0);
            *seen += 1;
            if *seen == 2 {
                issues.push(
                    Issue::new(
                        IssueKind::TagNotUnique,
                        format!("'{}' may appear only once per string", canonical.short_base()),
                    )
                    .with_span(tag.span())
                    .with_tag_index(tag.index()),
                );
            }
        }
    }

    fn check_required(&self, root: &HedGroup, issues: &mut Vec<Issue>) {
        let present: Vec<String> = root
            .all_tags()
            .into_iter()
            .filter_map(|t| t.canonical())
            .map(|c| {
                let long = c.long_base.to_lowercase();
                if c.prefix.is_empty() {
                    long
                } else {
                    format!("{}{}{}", c.prefix, NAMESPACE_DELIMITER, long)
                }
            })
            .collect();

        for required in self.schemas.tags_with_attribute(attr::REQUIRED) {
            let key = required.to_lowercase();
            let nested = format!("{}/", key);
            if !present.iter().any(|p| *p == key || p.starts_with(&nested)) {
                issues.push(Issue::new(
                    IssueKind::RequiredTagMissing,
                    format!("required tag '{}' is missing", required),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::canonicalize;
    use hed_core::HedString;
    use hed_test::{codes, library_group, standard_group};

    fn run_with(group: &SchemaGroup, config: &ValidatorConfig, source: &str) -> Vec<Issue> {
        let (parsed, parse_issues) = HedString::parse(source);
        assert!(parse_issues.is_empty(), "{:?}", parse_issues);
        let mut root = parsed.into_root();
        canonicalize(&mut root, group);
        GroupValidator::new(group, config).validate_group(&root)
    }

    fn run(source: &str) -> Vec<&'static str> {
        codes(&run_with(&standard_group(), &ValidatorConfig::default(), source))
    }

    #[test]
    fn test_duplicates_by_canonical_form() {
        let issues = run_with(
            &standard_group(),
            &ValidatorConfig::default(),
            "Man-made-object/Vehicle/Boat, Boat",
        );
        assert_eq!(codes(&issues), vec!["HED_TAG_REPEATED"]);
        assert_eq!(issues[0].tag_index(), Some(1));
    }

    #[test]
    fn test_duplicates_stay_within_a_group() {
        assert!(run("(Red, Boat), (Red, Boat)").is_empty());
        assert_eq!(run("(Red, (Boat), Red)"), vec!["HED_TAG_REPEATED"]);
        assert!(run("Duration/3 ms, Duration/4 ms").is_empty());
    }

    #[test]
    fn test_top_level_placement() {
        assert!(run("(Definition/ValidDef)").is_empty());
        assert_eq!(run("Definition/InvalidDef"), vec!["HED_TOP_LEVEL_TAG"]);
        assert_eq!(run("((Onset, Def/Stim))"), vec!["HED_TOP_LEVEL_TAG"]);
        assert_eq!(run("(Onset, Offset, Def/Stim)"), vec!["HED_MULTIPLE_TOP_TAGS"]);
        assert!(run("(Red, Onset, Def/Stim)").is_empty());
    }

    #[test]
    fn test_tag_group_tags_need_a_group() {
        assert_eq!(run("Def-expand/Stim"), vec!["HED_TAG_GROUP_TAG"]);
        assert!(run("(Def-expand/Stim, (Red))").is_empty());
    }

    #[test]
    fn test_definition_shape() {
        assert!(run("(Definition/Move/#, (Distance/#, Car))").is_empty());
        assert_eq!(
            run("(Definition/Move, Red, (Car))"),
            vec!["wrongNumberDefTags"]
        );
        assert_eq!(
            run("(Definition/Move, (Car), (Red))"),
            vec!["wrongNumberGroupTags"]
        );
        assert_eq!(
            run("(Definition/Move/#, (Car))"),
            vec!["wrongNumberPlaceholderTags"]
        );
        assert_eq!(
            run("(Definition/Move, (Distance/#))"),
            vec!["wrongNumberPlaceholderTags"]
        );
        assert_eq!(
            run("(Definition/Move, (Def/Other))"),
            vec!["HED_DEFINITION_INVALID"]
        );
    }

    #[test]
    fn test_unique_tags() {
        assert_eq!(
            run("(Event-context, Red), (Event-context, Boat)"),
            vec!["HED_TAG_NOT_UNIQUE"]
        );
    }

    #[test]
    fn test_required_tags_are_opt_in() {
        let group = library_group();
        let quiet = run_with(&group, &ValidatorConfig::default(), "Sensory-event");
        assert!(quiet.is_empty());

        let config = ValidatorConfig::default().with_required_tags(true);
        let loud = run_with(&group, &config, "Sensory-event");
        assert_eq!(codes(&loud), vec!["HED_REQUIRED_TAG_MISSING"]);
        assert!(run_with(&group, &config, "sc:Recording-context/Lab_A").is_empty());
    }

    #[test]
    fn test_definition_tag_indices() {
        let (parsed, _) = HedString::parse("Red, (Definition/X/#, (Label/#)), Boat");
        let mut root = parsed.into_root();
        canonicalize(&mut root, &standard_group());
        let inside = definition_tag_indices(&root);
        assert_eq!(inside.len(), 2);
        assert!(inside.contains(&1) && inside.contains(&2));
    }
}
