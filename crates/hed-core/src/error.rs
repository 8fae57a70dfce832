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

//! Hard-failure error types.
//!
//! Content defects in HED strings are never raised as errors; they are
//! reported as [`Issue`](crate::Issue) values. `HedError` is reserved for
//! malformed input to the API itself.

use std::fmt;
use thiserror::Error;

/// The kind of hard failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HedErrorKind {
    /// Two schemas in one group share a library prefix.
    DuplicatePrefix,
    /// A schema section was requested that does not exist.
    UnknownSection,
    /// A parameter passed to a public entry point is malformed.
    InvalidParameter,
    /// A schema could not be assembled (missing parent node, unknown unit class).
    SchemaBuild,
    /// Event rows were supplied out of index/time order.
    RowOrder,
}

impl fmt::Display for HedErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePrefix => write!(f, "DuplicatePrefixError"),
            Self::UnknownSection => write!(f, "UnknownSectionError"),
            Self::InvalidParameter => write!(f, "InvalidParameterError"),
            Self::SchemaBuild => write!(f, "SchemaBuildError"),
            Self::RowOrder => write!(f, "RowOrderError"),
        }
    }
}

/// An error raised for malformed API input.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct HedError {
    /// The kind of error.
    pub kind: HedErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl HedError {
    /// Create a new error.
    pub fn new(kind: HedErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn duplicate_prefix(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::DuplicatePrefix, message)
    }

    pub fn unknown_section(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::UnknownSection, message)
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::InvalidParameter, message)
    }

    pub fn schema_build(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::SchemaBuild, message)
    }

    pub fn row_order(message: impl Into<String>) -> Self {
        Self::new(HedErrorKind::RowOrder, message)
    }
}

/// Result type for HED operations that can fail hard.
pub type HedResult<T> = Result<T, HedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(
            format!("{}", HedErrorKind::DuplicatePrefix),
            "DuplicatePrefixError"
        );
        assert_eq!(format!("{}", HedErrorKind::RowOrder), "RowOrderError");
    }

    #[test]
    fn test_error_display() {
        let err = HedError::duplicate_prefix("prefix 'sc:' used twice");
        let msg = format!("{}", err);
        assert!(msg.contains("DuplicatePrefixError"));
        assert!(msg.contains("sc:"));
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(
            HedError::unknown_section("x").kind,
            HedErrorKind::UnknownSection
        );
        assert_eq!(
            HedError::invalid_parameter("x").kind,
            HedErrorKind::InvalidParameter
        );
        assert_eq!(HedError::schema_build("x").kind, HedErrorKind::SchemaBuild);
    }

    #[test]
    fn test_error_is_std_error() {
        fn accepts_error<E: std::error::Error>(_: E) {}
        accepts_error(HedError::row_order("row 3 before row 2"));
    }
}
