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

//! Syntactic tokenizer for HED strings.
//!
//! Splits on commas and parentheses only; no schema knowledge. Nesting is
//! tracked with an explicit stack so depth is bounded only by input size.

use crate::group::{HedGroup, HedString};
use crate::issue::{Issue, IssueKind, Span};
use crate::tag::HedTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Start,
    Comma,
    Open,
    Close,
    End,
}

struct Frame {
    group: HedGroup,
    open_at: usize,
}

struct Tokenizer<'a> {
    source: &'a str,
    stack: Vec<Frame>,
    issues: Vec<Issue>,
    next_index: usize,
}

/// Parse a HED string into a tag tree.
///
/// Lexical problems are returned as issues; the tree is always produced
/// (unbalanced groups are closed at end of input).
///
/// # Examples
///
/// ```
/// use hed_core::parse_hed_string;
///
/// let (hed, issues) = parse_hed_string("Event, (Onset, Def/Stim)");
/// assert!(issues.is_empty());
/// assert_eq!(hed.all_tags().len(), 3);
/// assert_eq!(hed.root().groups().count(), 1);
/// ```
pub fn parse_hed_string(source: &str) -> (HedString, Vec<Issue>) {
    let mut tokenizer = Tokenizer {
        source,
        stack: vec![Frame {
            group: HedGroup::new(),
            open_at: 0,
        }],
        issues: Vec::new(),
        next_index: 0,
    };

    let mut token_start = 0;
    let mut prev = Delimiter::Start;
    for (pos, ch) in source.char_indices() {
        let delimiter = match ch {
            ',' => Delimiter::Comma,
            '(' => Delimiter::Open,
            ')' => Delimiter::Close,
            _ => continue,
        };
        tokenizer.finish_token(token_start, pos, prev, delimiter);
        match delimiter {
            Delimiter::Open => tokenizer.stack.push(Frame {
                group: HedGroup::new(),
                open_at: pos,
            }),
            Delimiter::Close => tokenizer.close_group(pos),
            _ => {}
        }
        token_start = pos + 1;
        prev = delimiter;
    }
    tokenizer.finish_token(token_start, source.len(), prev, Delimiter::End);
    tokenizer.finish()
}

impl<'a> Tokenizer<'a> {
    fn finish_token(&mut self, start: usize, end: usize, prev: Delimiter, next: Delimiter) {
        let raw = &self.source[start..end];
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            match (prev, next) {
                (Delimiter::Start, Delimiter::End) => {}
                (Delimiter::Open, Delimiter::Close) => self.issues.push(
                    Issue::new(IssueKind::GroupEmpty, "Empty tag group '()'")
                        .with_span(Span::new(start.saturating_sub(1), end + 1)),
                ),
                (Delimiter::Close, Delimiter::Open) => self.issues.push(
                    Issue::new(IssueKind::CommaMissing, "Missing comma between tag groups")
                        .with_span(Span::new(start.saturating_sub(1), end + 1)),
                ),
                (Delimiter::Close, _) | (_, Delimiter::Open) => {}
                _ => self.issues.push(
                    Issue::new(IssueKind::TagEmpty, "Empty tag between delimiters")
                        .with_span(Span::new(start, end)),
                ),
            }
            return;
        }

        let lead = raw.len() - raw.trim_start().len();
        let span = Span::new(start + lead, start + lead + trimmed.len());
        let index = self.next_index;
        self.next_index += 1;

        if prev == Delimiter::Close {
            self.issues.push(
                Issue::new(
                    IssueKind::CommaMissing,
                    format!("Missing comma before '{}'", trimmed),
                )
                .with_span(span)
                .with_tag_index(index),
            );
        }
        if next == Delimiter::Open {
            self.issues.push(
                Issue::new(
                    IssueKind::CommaMissing,
                    format!("Missing comma after '{}'", trimmed),
                )
                .with_span(span)
                .with_tag_index(index),
            );
        }

        if let Some(frame) = self.stack.last_mut() {
            frame.group.push_tag(HedTag::parsed(trimmed, span, index));
        }
    }

    fn close_group(&mut self, pos: usize) {
        if self.stack.len() <= 1 {
            self.issues.push(
                Issue::new(IssueKind::ParenthesesMismatch, "Unmatched closing parenthesis")
                    .with_span(Span::new(pos, pos + 1)),
            );
            return;
        }
        if let Some(mut frame) = self.stack.pop() {
            frame.group.set_span(Span::new(frame.open_at, pos + 1));
            if let Some(parent) = self.stack.last_mut() {
                parent.group.push_group(frame.group);
            }
        }
    }

    fn finish(mut self) -> (HedString, Vec<Issue>) {
        while self.stack.len() > 1 {
            if let Some(mut frame) = self.stack.pop() {
                self.issues.push(
                    Issue::new(IssueKind::ParenthesesMismatch, "Unclosed parenthesis")
                        .with_span(Span::new(frame.open_at, frame.open_at + 1)),
                );
                frame.group.set_span(Span::new(frame.open_at, self.source.len()));
                if let Some(parent) = self.stack.last_mut() {
                    parent.group.push_group(frame.group);
                }
            }
        }

        let mut root = self
            .stack
            .pop()
            .map(|frame| frame.group)
            .unwrap_or_default();
        root.set_span(Span::new(0, self.source.len()));

        // Issues are reported in source order regardless of discovery order.
        self.issues
            .sort_by_key(|issue| issue.span().map(|s| s.start).unwrap_or(0));

        (HedString::from_parts(self.source, root), self.issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<IssueKind> {
        parse_hed_string(source).1.iter().map(Issue::kind).collect()
    }

    #[test]
    fn test_empty_string() {
        let (hed, issues) = parse_hed_string("");
        assert!(hed.is_empty());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_flat_tags_with_spans() {
        let (hed, issues) = parse_hed_string("Event,  Item/Boat ");
        assert!(issues.is_empty());
        let tags = hed.all_tags();
        assert_eq!(tags[0].span(), Span::new(0, 5));
        assert_eq!(tags[1].text(), "Item/Boat");
        assert_eq!(tags[1].span(), Span::new(8, 17));
        assert_eq!(tags[1].index(), 1);
    }

    #[test]
    fn test_nested_groups() {
        let (hed, issues) = parse_hed_string("(A, (B, C)), D");
        assert!(issues.is_empty());
        let outer = hed.root().groups().next().expect("outer group");
        assert_eq!(outer.span(), Span::new(0, 11));
        assert_eq!(outer.groups().count(), 1);
        assert_eq!(hed.to_string(), "(A, (B, C)), D");
    }

    #[test]
    fn test_empty_tags() {
        assert_eq!(kinds("A,,B"), vec![IssueKind::TagEmpty]);
        assert_eq!(kinds("A,"), vec![IssueKind::TagEmpty]);
        assert_eq!(kinds(",A"), vec![IssueKind::TagEmpty]);
        assert_eq!(kinds("(A,)"), vec![IssueKind::TagEmpty]);
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(kinds("A, ()"), vec![IssueKind::GroupEmpty]);
    }

    #[test]
    fn test_missing_commas() {
        assert_eq!(kinds("(A)(B)"), vec![IssueKind::CommaMissing]);
        assert_eq!(kinds("A(B)"), vec![IssueKind::CommaMissing]);
        assert_eq!(kinds("(A)B"), vec![IssueKind::CommaMissing]);
        assert!(kinds("(A), (B)").is_empty());
        assert!(kinds("((A))").is_empty());
    }

    #[test]
    fn test_parentheses_mismatch() {
        assert_eq!(kinds("(A, B"), vec![IssueKind::ParenthesesMismatch]);
        assert_eq!(kinds("A, B)"), vec![IssueKind::ParenthesesMismatch]);
        let (hed, _) = parse_hed_string("(A, (B");
        assert_eq!(hed.all_tags().len(), 2);
    }
}
