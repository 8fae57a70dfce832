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

//! HED tag atoms.

use crate::issue::Span;
use std::fmt;

/// Separates hierarchy levels inside a tag path.
pub const HIERARCHY_DELIMITER: char = '/';
/// Separates a library prefix from the tag (`sc:Event`).
pub const NAMESPACE_DELIMITER: char = ':';
/// Placeholder marker used in definitions and sidecar value columns.
pub const PLACEHOLDER: char = '#';

/// What the text after the resolved schema node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemainderKind {
    /// A user extension below an `extensionAllowed` node.
    Extension,
    /// A value for a node that takes one (has a `#` child).
    Value,
}

/// The portion of a tag beyond its resolved schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Remainder {
    pub text: String,
    pub kind: RemainderKind,
    /// Byte offset of `text` within the tag body (prefix excluded).
    pub offset: usize,
}

/// Schema-resolved form of a tag.
///
/// Owned data only: the schema entry is referenced by its long name, which
/// is the lookup key in the schema's tag section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalTag {
    /// Library prefix without the delimiter; empty for the default schema.
    pub prefix: String,
    /// Long name of the matched schema node, case as in the schema.
    pub long_base: String,
    pub remainder: Option<Remainder>,
}

impl CanonicalTag {
    pub fn new(prefix: impl Into<String>, long_base: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            long_base: long_base.into(),
            remainder: None,
        }
    }

    pub fn with_remainder(mut self, text: impl Into<String>, kind: RemainderKind, offset: usize) -> Self {
        self.remainder = Some(Remainder {
            text: text.into(),
            kind,
            offset,
        });
        self
    }

    /// Last segment of the long name (the node's short name).
    pub fn short_base(&self) -> &str {
        self.long_base
            .rsplit(HIERARCHY_DELIMITER)
            .next()
            .unwrap_or(&self.long_base)
    }

    /// Lower-cased short base, used to recognise special tags.
    pub fn base_key(&self) -> String {
        self.short_base().to_lowercase()
    }

    pub fn value(&self) -> Option<&str> {
        match &self.remainder {
            Some(r) if r.kind == RemainderKind::Value => Some(&r.text),
            _ => None,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        match &self.remainder {
            Some(r) if r.kind == RemainderKind::Extension => Some(&r.text),
            _ => None,
        }
    }

    fn with_prefix(&self, body: String) -> String {
        if self.prefix.is_empty() {
            body
        } else {
            format!("{}{}{}", self.prefix, NAMESPACE_DELIMITER, body)
        }
    }

    fn join(base: &str, remainder: &Option<Remainder>) -> String {
        match remainder {
            Some(r) => format!("{}{}{}", base, HIERARCHY_DELIMITER, r.text),
            None => base.to_string(),
        }
    }

    pub fn short_tag(&self) -> String {
        self.with_prefix(Self::join(self.short_base(), &self.remainder))
    }

    pub fn long_tag(&self) -> String {
        self.with_prefix(Self::join(&self.long_base, &self.remainder))
    }

    /// Case-insensitive identity used for duplicate detection.
    pub fn canonical_key(&self) -> String {
        self.long_tag().to_lowercase()
    }
}

/// One annotation atom as written in a HED string.
#[derive(Debug, Clone, PartialEq)]
pub struct HedTag {
    text: String,
    span: Span,
    index: usize,
    canonical: Option<CanonicalTag>,
}

impl HedTag {
    /// Create a free-standing tag (no source position).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: Span::default(),
            index: 0,
            canonical: None,
        }
    }

    pub(crate) fn parsed(text: &str, span: Span, index: usize) -> Self {
        Self {
            text: text.to_string(),
            span,
            index,
            canonical: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// The tag exactly as written (trimmed).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Ordinal of this tag within its string, in source order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn canonical(&self) -> Option<&CanonicalTag> {
        self.canonical.as_ref()
    }

    pub fn set_canonical(&mut self, canonical: CanonicalTag) {
        self.canonical = Some(canonical);
    }

    pub fn clear_canonical(&mut self) {
        self.canonical = None;
    }

    /// Split `prefix:body`; the prefix is only recognised before the first `/`.
    pub fn split_prefix(&self) -> (Option<&str>, &str) {
        split_prefix(&self.text)
    }

    /// Lower-cased short base if resolved.
    pub fn base_key(&self) -> Option<String> {
        self.canonical.as_ref().map(CanonicalTag::base_key)
    }

    /// True if the tag resolved to the schema node with this short name.
    pub fn is_base(&self, short_name: &str) -> bool {
        self.canonical
            .as_ref()
            .map(|c| c.short_base().eq_ignore_ascii_case(short_name))
            .unwrap_or(false)
    }

    pub fn has_placeholder(&self) -> bool {
        self.text.contains(PLACEHOLDER)
    }

    pub fn short_tag(&self) -> String {
        match &self.canonical {
            Some(c) => c.short_tag(),
            None => self.text.clone(),
        }
    }

    pub fn long_tag(&self) -> String {
        match &self.canonical {
            Some(c) => c.long_tag(),
            None => self.text.clone(),
        }
    }

    /// Identity for duplicate detection; unresolved tags compare by text.
    pub fn canonical_key(&self) -> String {
        match &self.canonical {
            Some(c) => c.canonical_key(),
            None => self.text.to_lowercase(),
        }
    }

    /// Copy of this tag with the first placeholder replaced by `value`.
    pub fn replace_placeholder(&self, value: &str) -> HedTag {
        let mut tag = self.clone();
        tag.text = self.text.replacen(PLACEHOLDER, value, 1);
        if let Some(rem) = tag.canonical.as_mut().and_then(|c| c.remainder.as_mut()) {
            rem.text = rem.text.replacen(PLACEHOLDER, value, 1);
        }
        tag
    }
}

impl fmt::Display for HedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split a tag text into library prefix and body.
pub fn split_prefix(text: &str) -> (Option<&str>, &str) {
    let slash = text.find(HIERARCHY_DELIMITER).unwrap_or(text.len());
    match text[..slash].find(NAMESPACE_DELIMITER) {
        Some(colon)
            if colon > 0
                && text[..colon]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
        {
            (Some(&text[..colon]), &text[colon + 1..])
        }
        _ => (None, text),
    }
}
