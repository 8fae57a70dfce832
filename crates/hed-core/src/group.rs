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

//! Parenthesized tag groups and whole HED strings.

use crate::issue::{Issue, Span};
use crate::tag::HedTag;
use std::fmt;

/// A child of a group: either a tag or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum HedNode {
    Tag(HedTag),
    Group(HedGroup),
}

impl HedNode {
    pub fn as_tag(&self) -> Option<&HedTag> {
        match self {
            HedNode::Tag(tag) => Some(tag),
            HedNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&HedGroup> {
        match self {
            HedNode::Group(group) => Some(group),
            HedNode::Tag(_) => None,
        }
    }
}

impl fmt::Display for HedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HedNode::Tag(tag) => write!(f, "{}", tag),
            HedNode::Group(group) => write!(f, "{}", group),
        }
    }
}

/// An ordered sequence of tags and nested groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HedGroup {
    children: Vec<HedNode>,
    span: Span,
}

impl HedGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<HedNode>) -> Self {
        Self {
            children,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    pub fn push_tag(&mut self, tag: HedTag) {
        self.children.push(HedNode::Tag(tag));
    }

    pub fn push_group(&mut self, group: HedGroup) {
        self.children.push(HedNode::Group(group));
    }

    pub fn children(&self) -> &[HedNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<HedNode> {
        &mut self.children
    }

    pub fn into_children(self) -> Vec<HedNode> {
        self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child tags.
    pub fn tags(&self) -> impl Iterator<Item = &HedTag> {
        self.children.iter().filter_map(HedNode::as_tag)
    }

    /// Direct child groups.
    pub fn groups(&self) -> impl Iterator<Item = &HedGroup> {
        self.children.iter().filter_map(HedNode::as_group)
    }

    /// Every tag at any depth, in source order.
    pub fn all_tags(&self) -> Vec<&HedTag> {
        let mut out = Vec::new();
        collect_tags(self, &mut out);
        out
    }

    /// Visit every tag at any depth mutably.
    pub fn for_each_tag_mut(&mut self, f: &mut dyn FnMut(&mut HedTag)) {
        for child in &mut self.children {
            match child {
                HedNode::Tag(tag) => f(tag),
                HedNode::Group(group) => group.for_each_tag_mut(f),
            }
        }
    }

    /// First direct child tag matching `pred`.
    pub fn find_tag(&self, pred: impl Fn(&HedTag) -> bool) -> Option<&HedTag> {
        self.tags().find(|tag| pred(tag))
    }

    /// Remove direct child tags matching `pred`, returning them.
    pub fn remove_tags(&mut self, pred: impl Fn(&HedTag) -> bool) -> Vec<HedTag> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                HedNode::Tag(tag) if pred(&tag) => removed.push(tag),
                other => kept.push(other),
            }
        }
        self.children = kept;
        removed
    }

    /// Render the children without the enclosing parentheses.
    pub fn children_string(&self) -> String {
        self.children
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn collect_tags<'a>(group: &'a HedGroup, out: &mut Vec<&'a HedTag>) {
    for child in &group.children {
        match child {
            HedNode::Tag(tag) => out.push(tag),
            HedNode::Group(inner) => collect_tags(inner, out),
        }
    }
}

impl fmt::Display for HedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.children_string())
    }
}

/// A parsed HED string: the source text plus its root (unparenthesized) group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HedString {
    source: String,
    root: HedGroup,
}

impl HedString {
    /// Tokenize `source`, returning the tree and any lexical issues.
    pub fn parse(source: &str) -> (Self, Vec<Issue>) {
        crate::parse::parse_hed_string(source)
    }

    pub fn from_parts(source: impl Into<String>, root: HedGroup) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &HedGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut HedGroup {
        &mut self.root
    }

    pub fn into_root(self) -> HedGroup {
        self.root
    }

    pub fn all_tags(&self) -> Vec<&HedTag> {
        self.root.all_tags()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl fmt::Display for HedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root.children_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HedGroup {
        let mut inner = HedGroup::new();
        inner.push_tag(HedTag::new("Onset"));
        inner.push_tag(HedTag::new("Def/X"));
        let mut root = HedGroup::new();
        root.push_tag(HedTag::new("Event"));
        root.push_group(inner);
        root.push_tag(HedTag::new("Item"));
        root
    }

    #[test]
    fn test_direct_and_all_tags() {
        let root = sample();
        assert_eq!(root.tags().count(), 2);
        assert_eq!(root.groups().count(), 1);
        let texts: Vec<_> = root.all_tags().iter().map(|t| t.text().to_string()).collect();
        assert_eq!(texts, vec!["Event", "Onset", "Def/X", "Item"]);
    }

    #[test]
    fn test_display() {
        let root = sample();
        assert_eq!(root.children_string(), "Event, (Onset, Def/X), Item");
        assert_eq!(format!("{}", root), "(Event, (Onset, Def/X), Item)");
    }

    #[test]
    fn test_remove_tags() {
        let mut root = sample();
        let removed = root.remove_tags(|t| t.text() == "Item");
        assert_eq!(removed.len(), 1);
        assert_eq!(root.children_string(), "Event, (Onset, Def/X)");
    }

    #[test]
    fn test_for_each_tag_mut() {
        let mut root = sample();
        let mut count = 0;
        root.for_each_tag_mut(&mut |_| count += 1);
        assert_eq!(count, 4);
    }
}
