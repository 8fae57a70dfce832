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

//! Context helpers for issue lists.
//!
//! Validators know nothing about where a string came from. Hosts reading
//! event files or sidecars attach that context afterwards:
//!
//! ```rust
//! use hed::IssuesExt;
//!
//! let schemas = hed_test::standard_group();
//! let issues = hed::validate_string("Event/Nonsense", &schemas)
//!     .in_file("sub-01_events.tsv")
//!     .in_column("HED");
//!
//! let report = issues.render();
//! assert!(report.contains("sub-01_events.tsv"));
//! assert!(report.contains("invalidExtension"));
//! ```

use crate::{Issue, Severity};

/// Extension trait for `Vec<Issue>`.
pub trait IssuesExt: Sized {
    /// Prefix every issue with the file it came from.
    fn in_file(self, name: &str) -> Self;

    /// Tag every issue with a tabular column name.
    fn in_column(self, column: &str) -> Self;

    /// Tag every issue with the sidecar key whose value was validated.
    fn in_sidecar_key(self, key: &str) -> Self;

    /// Number of issues at the given severity.
    fn count_severity(&self, severity: Severity) -> usize;

    /// One rendered issue per line.
    fn render(&self) -> String;
}

impl IssuesExt for Vec<Issue> {
    fn in_file(self, name: &str) -> Self {
        self.into_iter().map(|issue| issue.with_file(name)).collect()
    }

    fn in_column(self, column: &str) -> Self {
        self.into_iter().map(|issue| issue.with_column(column)).collect()
    }

    fn in_sidecar_key(self, key: &str) -> Self {
        self.into_iter().map(|issue| issue.with_sidecar_key(key)).collect()
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.iter().filter(|issue| issue.severity() == severity).count()
    }

    fn render(&self) -> String {
        self.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
