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

//! Shared test fixtures for the HED crates.
//!
//! - **Schemas**: a HED-8-shaped standard schema and an `sc:` library schema
//! - **Strings**: valid samples and invalid samples with expected codes
//! - **Rows**: annotated event sequences for temporal assembly
//!
//! ```rust
//! use hed_test::{codes, standard_group, valid_strings};
//!
//! let group = standard_group();
//! assert!(group.resolve("Sensory-event").is_ok());
//! assert!(!valid_strings().is_empty());
//! assert!(codes(&[]).is_empty());
//! ```

pub mod fixtures;

pub use fixtures::*;

use hed_core::{Issue, IssueKind};

/// Issue codes in order, for compact assertions.
pub fn codes(issues: &[Issue]) -> Vec<&'static str> {
    issues.iter().map(Issue::code).collect()
}

/// Number of issues of one kind.
pub fn count_kind(issues: &[Issue], kind: IssueKind) -> usize {
    issues.iter().filter(|i| i.kind() == kind).count()
}
