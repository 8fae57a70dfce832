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

//! Core data model for HED (Hierarchical Event Descriptor) annotations.
//!
//! This crate holds the pieces every other HED crate shares:
//!
//! - [`HedTag`], [`HedGroup`], [`HedString`]: the parsed annotation tree
//! - [`parse_hed_string`]: the syntactic tokenizer (commas and parentheses)
//! - [`Issue`], [`IssueKind`], [`Severity`]: the diagnostic taxonomy
//! - [`HedError`]: hard failures for malformed API input
//!
//! Schema resolution lives in `hed-schema`; validation in `hed-validate`.

mod error;
mod group;
mod issue;
mod parse;
mod tag;

pub use error::{HedError, HedErrorKind, HedResult};
pub use group::{HedGroup, HedNode, HedString};
pub use issue::{has_errors, ContextEntry, Issue, IssueCategory, IssueKind, Severity, Span};
pub use parse::parse_hed_string;
pub use tag::{
    split_prefix, CanonicalTag, HedTag, Remainder, RemainderKind, HIERARCHY_DELIMITER,
    NAMESPACE_DELIMITER, PLACEHOLDER,
};
