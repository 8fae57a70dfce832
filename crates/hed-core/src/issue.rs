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

//! Validation issue types.
//!
//! Every validator in the workspace returns an owned `Vec<Issue>`; callers
//! concatenate them. An issue carries a stable code, a severity, and a
//! context stack (file, row, column, sidecar key, span) so it can be
//! rendered without re-parsing the source string.

use std::fmt;

/// A byte range into the HED string an issue refers to.
///
/// Offsets equal character offsets for ASCII annotation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Shift a span that is relative to a tag into string coordinates.
    #[inline]
    pub const fn offset(&self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Severity level for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Style or compatibility concern; the annotation is still valid.
    Warning,
    /// The annotation is invalid.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Taxonomy group an issue kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCategory {
    Lexical,
    Resolution,
    Semantic,
    Structural,
    Temporal,
    Schema,
}

/// Kind of issue. `code()` is stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueKind {
    // Lexical
    CharacterInvalid,
    TildesUnsupported,
    CommaMissing,
    ParenthesesMismatch,
    TagEmpty,
    GroupEmpty,
    NodeNameEmpty,
    // Resolution
    NoValidTagFound,
    InvalidExtension,
    InvalidParentNode,
    UnknownPrefix,
    // Semantic
    UnitsInvalid,
    UnitsDefaultUsed,
    ValueInvalid,
    PlaceholderInvalid,
    TagRequiresChild,
    TagRepeated,
    TagNotUnique,
    RequiredTagMissing,
    TagExtended,
    StyleWarning,
    // Structural
    TopLevelTag,
    MultipleTopTags,
    TagGroupTag,
    WrongNumberDefinitionTags,
    WrongNumberGroupTags,
    WrongNumberPlaceholderTags,
    DuplicateDefinition,
    TagInSchema,
    InvalidDefinitionExtension,
    DefinitionInvalid,
    DefUnmatched,
    DefValueMissing,
    DefValueExtra,
    DefValueInvalid,
    DefExpandInvalid,
    // Temporal
    OffsetBeforeOnset,
    OnsetDefUnmatched,
    OnsetWrongNumberGroups,
    OnsetNoDefTagFound,
    OnsetPlaceholderWrong,
    OnsetTooManyDefs,
    OnsetTagOutsideOfGroup,
    InsetBeforeOnset,
    OnsetUnmatched,
    // Schema compliance
    SchemaDuplicateNode,
    SchemaAttributeInvalid,
    SchemaCharacterInvalid,
    SchemaInvalidCapitalization,
}

impl IssueKind {
    /// The stable string constant for this kind.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CharacterInvalid => "HED_CHARACTER_INVALID",
            Self::TildesUnsupported => "HED_TILDES_UNSUPPORTED",
            Self::CommaMissing => "HED_COMMA_MISSING",
            Self::ParenthesesMismatch => "HED_PARENTHESES_MISMATCH",
            Self::TagEmpty => "HED_TAG_EMPTY",
            Self::GroupEmpty => "emptyHedGroup",
            Self::NodeNameEmpty => "HED_NODE_NAME_EMPTY",
            Self::NoValidTagFound => "invalidTag",
            Self::InvalidExtension => "invalidExtension",
            Self::InvalidParentNode => "invalidParent",
            Self::UnknownPrefix => "HED_UNKNOWN_PREFIX",
            Self::UnitsInvalid => "HED_UNITS_INVALID",
            Self::UnitsDefaultUsed => "HED_UNITS_DEFAULT_USED",
            Self::ValueInvalid => "HED_VALUE_INVALID",
            Self::PlaceholderInvalid => "HED_PLACEHOLDER_INVALID",
            Self::TagRequiresChild => "HED_TAG_REQUIRES_CHILD",
            Self::TagRepeated => "HED_TAG_REPEATED",
            Self::TagNotUnique => "HED_TAG_NOT_UNIQUE",
            Self::RequiredTagMissing => "HED_REQUIRED_TAG_MISSING",
            Self::TagExtended => "HED_TAG_EXTENDED",
            Self::StyleWarning => "HED_STYLE_WARNING",
            Self::TopLevelTag => "HED_TOP_LEVEL_TAG",
            Self::MultipleTopTags => "HED_MULTIPLE_TOP_TAGS",
            Self::TagGroupTag => "HED_TAG_GROUP_TAG",
            Self::WrongNumberDefinitionTags => "wrongNumberDefTags",
            Self::WrongNumberGroupTags => "wrongNumberGroupTags",
            Self::WrongNumberPlaceholderTags => "wrongNumberPlaceholderTags",
            Self::DuplicateDefinition => "duplicateDefinition",
            Self::TagInSchema => "defAlreadyInSchema",
            Self::InvalidDefinitionExtension => "invalidDefExtension",
            Self::DefinitionInvalid => "HED_DEFINITION_INVALID",
            Self::DefUnmatched => "HED_DEF_UNMATCHED",
            Self::DefValueMissing => "HED_DEF_VALUE_MISSING",
            Self::DefValueExtra => "HED_DEF_VALUE_EXTRA",
            Self::DefValueInvalid => "HED_DEF_VALUE_INVALID",
            Self::DefExpandInvalid => "HED_DEF_EXPAND_INVALID",
            Self::OffsetBeforeOnset => "OFFSET_BEFORE_ONSET",
            Self::OnsetDefUnmatched => "ONSET_DEF_UNMATCHED",
            Self::OnsetWrongNumberGroups => "ONSET_WRONG_NUMBER_GROUPS",
            Self::OnsetNoDefTagFound => "ONSET_NO_DEF_TAG_FOUND",
            Self::OnsetPlaceholderWrong => "ONSET_PLACEHOLDER_WRONG",
            Self::OnsetTooManyDefs => "ONSET_TOO_MANY_DEFS",
            Self::OnsetTagOutsideOfGroup => "ONSET_TAG_OUTSIDE_OF_GROUP",
            Self::InsetBeforeOnset => "INSET_BEFORE_ONSET",
            Self::OnsetUnmatched => "HED_ONSET_OFFSET_ERROR",
            Self::SchemaDuplicateNode => "HED_SCHEMA_DUPLICATE_NODE",
            Self::SchemaAttributeInvalid => "HED_SCHEMA_ATTRIBUTE_INVALID",
            Self::SchemaCharacterInvalid => "HED_SCHEMA_CHARACTER_INVALID",
            Self::SchemaInvalidCapitalization => "invalidCaps",
        }
    }

    pub const fn category(&self) -> IssueCategory {
        use IssueCategory::*;
        match self {
            Self::CharacterInvalid
            | Self::TildesUnsupported
            | Self::CommaMissing
            | Self::ParenthesesMismatch
            | Self::TagEmpty
            | Self::GroupEmpty
            | Self::NodeNameEmpty => Lexical,
            Self::NoValidTagFound
            | Self::InvalidExtension
            | Self::InvalidParentNode
            | Self::UnknownPrefix => Resolution,
            Self::UnitsInvalid
            | Self::UnitsDefaultUsed
            | Self::ValueInvalid
            | Self::PlaceholderInvalid
            | Self::TagRequiresChild
            | Self::TagRepeated
            | Self::TagNotUnique
            | Self::RequiredTagMissing
            | Self::TagExtended
            | Self::StyleWarning => Semantic,
            Self::TopLevelTag
            | Self::MultipleTopTags
            | Self::TagGroupTag
            | Self::WrongNumberDefinitionTags
            | Self::WrongNumberGroupTags
            | Self::WrongNumberPlaceholderTags
            | Self::DuplicateDefinition
            | Self::TagInSchema
            | Self::InvalidDefinitionExtension
            | Self::DefinitionInvalid
            | Self::DefUnmatched
            | Self::DefValueMissing
            | Self::DefValueExtra
            | Self::DefValueInvalid
            | Self::DefExpandInvalid => Structural,
            Self::OffsetBeforeOnset
            | Self::OnsetDefUnmatched
            | Self::OnsetWrongNumberGroups
            | Self::OnsetNoDefTagFound
            | Self::OnsetPlaceholderWrong
            | Self::OnsetTooManyDefs
            | Self::OnsetTagOutsideOfGroup
            | Self::InsetBeforeOnset
            | Self::OnsetUnmatched => Temporal,
            Self::SchemaDuplicateNode
            | Self::SchemaAttributeInvalid
            | Self::SchemaCharacterInvalid
            | Self::SchemaInvalidCapitalization => Schema,
        }
    }

    /// Severity used when an issue is created with [`Issue::new`].
    pub const fn default_severity(&self) -> Severity {
        match self {
            Self::UnitsDefaultUsed
            | Self::RequiredTagMissing
            | Self::TagExtended
            | Self::StyleWarning
            | Self::OnsetUnmatched
            | Self::SchemaCharacterInvalid
            | Self::SchemaInvalidCapitalization => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One frame of the context stack attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContextEntry {
    FileName(String),
    Row(usize),
    Column(String),
    SidecarKey(String),
    HedString(String),
    SchemaSection(String),
    SchemaTag(String),
    SchemaAttribute(String),
}

impl fmt::Display for ContextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileName(name) => write!(f, "file '{}'", name),
            Self::Row(row) => write!(f, "row {}", row),
            Self::Column(col) => write!(f, "column '{}'", col),
            Self::SidecarKey(key) => write!(f, "sidecar key '{}'", key),
            Self::HedString(s) => write!(f, "HED string '{}'", s),
            Self::SchemaSection(s) => write!(f, "section '{}'", s),
            Self::SchemaTag(t) => write!(f, "schema tag '{}'", t),
            Self::SchemaAttribute(a) => write!(f, "attribute '{}'", a),
        }
    }
}

/// A reported defect.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    kind: IssueKind,
    severity: Severity,
    message: String,
    /// Outermost frame first.
    context: Vec<ContextEntry>,
    span: Option<Span>,
    /// Ordinal of the offending tag within its string, in source order.
    tag_index: Option<usize>,
}

impl Issue {
    /// Create an issue with the kind's default severity.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: kind.default_severity(),
            kind,
            message: message.into(),
            context: Vec::new(),
            span: None,
            tag_index: None,
        }
    }

    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, message).with_severity(Severity::Error)
    }

    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, message).with_severity(Severity::Warning)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Move the span (if any) right by `by` bytes.
    pub fn shifted(mut self, by: usize) -> Self {
        self.span = self.span.map(|span| span.offset(by));
        self
    }

    pub fn with_tag_index(mut self, index: usize) -> Self {
        self.tag_index = Some(index);
        self
    }

    /// Push a context frame. Frames added later are more specific.
    pub fn with_context(mut self, entry: ContextEntry) -> Self {
        self.context.push(entry);
        self
    }

    /// Prepend an outer frame, used when a caller wraps lower-level issues.
    pub fn within(mut self, entry: ContextEntry) -> Self {
        self.context.insert(0, entry);
        self
    }

    pub fn with_row(self, row: usize) -> Self {
        self.within(ContextEntry::Row(row))
    }

    pub fn with_file(self, name: impl Into<String>) -> Self {
        self.within(ContextEntry::FileName(name.into()))
    }

    pub fn with_column(self, column: impl Into<String>) -> Self {
        self.with_context(ContextEntry::Column(column.into()))
    }

    pub fn with_sidecar_key(self, key: impl Into<String>) -> Self {
        self.with_context(ContextEntry::SidecarKey(key.into()))
    }

    pub fn with_hed_string(self, hed: impl Into<String>) -> Self {
        self.with_context(ContextEntry::HedString(hed.into()))
    }

    // Public getters
    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &[ContextEntry] {
        &self.context
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn tag_index(&self) -> Option<usize> {
        self.tag_index
    }

    /// The innermost row frame, if any.
    pub fn row(&self) -> Option<usize> {
        self.context.iter().rev().find_map(|entry| match entry {
            ContextEntry::Row(row) => Some(*row),
            _ => None,
        })
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.context {
            write!(f, "{}: ", entry)?;
        }

        write!(f, "[{}] {}: {}", self.kind.code(), self.severity, self.message)?;

        if let Some(span) = self.span {
            write!(f, " (at {})", span)?;
        }

        Ok(())
    }
}

/// True if any issue in the list is an error.
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(Issue::is_error)
}
