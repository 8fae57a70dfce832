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

//! Tag resolution against a single schema.
//!
//! Any suffix of a long name is accepted (`Boat`, `Vehicle/Boat`,
//! `Item/Object/Man-made-object/Vehicle/Boat`). The first segment is
//! looked up by short name; each further segment must continue the same
//! branch until a node that takes a value, or the first unknown segment,
//! ends the walk.

use crate::schema::Schema;
use hed_core::{CanonicalTag, Issue, IssueKind, RemainderKind, Span, HIERARCHY_DELIMITER};

/// A path segment with its byte range in the tag body.
#[derive(Debug, Clone, Copy)]
struct Segment<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

fn segments(body: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    for part in body.split(HIERARCHY_DELIMITER) {
        let end = start + part.len();
        out.push(Segment {
            text: part,
            start,
            end,
        });
        start = end + 1;
    }
    out
}

/// True if `long` equals `path` or ends with `/path` (both lower-case).
fn ends_on_boundary(long: &str, path: &str) -> bool {
    long == path
        || (long.len() > path.len()
            && long.ends_with(path)
            && long.as_bytes()[long.len() - path.len() - 1] == HIERARCHY_DELIMITER as u8)
}

impl Schema {
    /// Resolve an unprefixed tag body to its canonical form.
    ///
    /// Failures are returned as an issue whose span is relative to `body`.
    pub fn resolve(&self, body: &str) -> Result<CanonicalTag, Issue> {
        let parts = segments(body);

        let mut found: Option<&str> = None;
        let mut found_end = 0;
        let mut unknown_after: Option<Segment<'_>> = None;

        for segment in &parts {
            if let Some(long) = found {
                if self.takes_value(long) {
                    break;
                }
            }

            let entry = self.find_short(segment.text);
            if let Some(first_unknown) = unknown_after {
                if let Some(entry) = entry {
                    return Err(Issue::new(
                        IssueKind::InvalidParentNode,
                        format!(
                            "'{}' appears as an extension of '{}' but is a schema tag; expected '{}'",
                            segment.text,
                            &body[..first_unknown.start.saturating_sub(1)],
                            entry.long_name()
                        ),
                    )
                    .with_span(Span::new(segment.start, segment.end)));
                }
                continue;
            }

            match entry {
                None if found.is_none() => {
                    return Err(Issue::new(
                        IssueKind::NoValidTagFound,
                        format!("'{}' is not a valid base tag", segment.text),
                    )
                    .with_span(Span::new(segment.start, segment.end)));
                }
                None => unknown_after = Some(*segment),
                Some(entry) => {
                    let path = body[..segment.end].to_lowercase();
                    if !ends_on_boundary(&entry.long_name().to_lowercase(), &path) {
                        return Err(Issue::new(
                            IssueKind::InvalidParentNode,
                            format!(
                                "'{}' has the wrong parent; expected '{}'",
                                segment.text,
                                entry.long_name()
                            ),
                        )
                        .with_span(Span::new(segment.start, segment.end)));
                    }
                    found = Some(entry.long_name());
                    found_end = segment.end;
                }
            }
        }

        // The walk always finds a node or returns early on the first segment.
        let long = found.unwrap_or_default();
        let canonical = CanonicalTag::new(self.prefix.clone(), long);
        if found_end >= body.len() {
            return Ok(canonical);
        }

        let offset = found_end + 1;
        let remainder = &body[offset..];
        if self.takes_value(long) {
            return Ok(canonical.with_remainder(remainder, RemainderKind::Value, offset));
        }
        if !self.allows_extension(long) {
            let first_end = remainder
                .find(HIERARCHY_DELIMITER)
                .map(|idx| offset + idx)
                .unwrap_or(body.len());
            return Err(Issue::new(
                IssueKind::InvalidExtension,
                format!(
                    "'{}' does not allow extensions; '{}' is not a child of it",
                    long,
                    &body[offset..first_end]
                ),
            )
            .with_span(Span::new(offset, first_end)));
        }
        Ok(canonical.with_remainder(remainder, RemainderKind::Extension, offset))
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::SchemaBuilder;
    use crate::Schema;
    use hed_core::{IssueKind, RemainderKind, Span};

    fn schema() -> Schema {
        SchemaBuilder::new()
            .tag("Event", &[])
            .tag("Event/Sensory-event", &[])
            .tag("Item", &["extensionAllowed"])
            .tag("Item/Object", &[])
            .tag("Item/Object/Man-made-object", &[])
            .tag("Item/Object/Man-made-object/Vehicle", &[])
            .tag("Item/Object/Man-made-object/Vehicle/Boat", &[])
            .tag("Property", &[])
            .tag("Property/Red", &[])
            .tag("Property/Label", &[])
            .tag("Property/Label/#", &[])
            .build()
            .unwrap()
    }

    #[test]
    fn test_exact_and_short_forms() {
        let schema = schema();
        for form in ["Boat", "Vehicle/Boat", "Item/Object/Man-made-object/Vehicle/Boat", "bOAT"] {
            let tag = schema.resolve(form).unwrap();
            assert_eq!(tag.long_base, "Item/Object/Man-made-object/Vehicle/Boat");
            assert!(tag.remainder.is_none());
        }
    }

    #[test]
    fn test_extension_of_allowed_branch() {
        let schema = schema();
        let tag = schema.resolve("Boat/Dinghy/Small").unwrap();
        let rem = tag.remainder.unwrap();
        assert_eq!(rem.kind, RemainderKind::Extension);
        assert_eq!(rem.text, "Dinghy/Small");
        assert_eq!(rem.offset, 5);
    }

    #[test]
    fn test_extension_of_closed_branch() {
        let schema = schema();
        let issue = schema.resolve("Event/Nonsense/More").unwrap_err();
        assert_eq!(issue.kind(), IssueKind::InvalidExtension);
        assert_eq!(issue.span(), Some(Span::new(6, 14)));
    }

    #[test]
    fn test_value_stops_the_walk() {
        let schema = schema();
        let tag = schema.resolve("Label/Red/Boat").unwrap();
        assert_eq!(tag.long_base, "Property/Label");
        assert_eq!(tag.value(), Some("Red/Boat"));
    }

    #[test]
    fn test_wrong_parent() {
        let schema = schema();
        let issue = schema.resolve("Event/Red").unwrap_err();
        assert_eq!(issue.kind(), IssueKind::InvalidParentNode);
        assert_eq!(issue.span(), Some(Span::new(6, 9)));
        assert!(issue.message().contains("Property/Red"));
    }

    #[test]
    fn test_schema_tag_after_extension() {
        let schema = schema();
        let issue = schema.resolve("Item/Gizmo/Boat").unwrap_err();
        assert_eq!(issue.kind(), IssueKind::InvalidParentNode);
        assert_eq!(issue.span(), Some(Span::new(11, 15)));
    }

    #[test]
    fn test_unknown_base() {
        let schema = schema();
        let issue = schema.resolve("Nothing/Here").unwrap_err();
        assert_eq!(issue.kind(), IssueKind::NoValidTagFound);
        assert_eq!(issue.span(), Some(Span::new(0, 7)));
    }

    #[test]
    fn test_partial_suffix_is_not_a_boundary_match() {
        assert!(!super::ends_on_boundary("property/red", "ed"));
        assert!(super::ends_on_boundary("property/red", "red"));
        assert!(super::ends_on_boundary("red", "red"));
    }
}
