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

//! Validator configuration.

use hed_core::{HedError, HedResult, Issue, Severity};
use tracing::warn;

/// Maximum number of issues collected per call.
///
/// A pathological input (every tag invalid in a very long string) would
/// otherwise produce an unbounded issue list.
pub const MAX_ISSUES: usize = 10_000;

/// Options for [`crate::HedValidator`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Report warning-level issues (style, default units, unmatched onsets).
    pub check_warnings: bool,
    /// Report every legal extension as `HED_TAG_EXTENDED`.
    pub report_extensions: bool,
    /// Report `required` schema tags missing from a string.
    pub check_required_tags: bool,
    /// Accept `#` placeholders outside definitions (sidecar value columns).
    pub allow_placeholders: bool,
    /// Issues past this count are dropped.
    pub max_issues: usize,
    /// Issues below this severity are dropped.
    pub min_severity: Severity,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            check_warnings: true,
            report_extensions: false,
            check_required_tags: false,
            allow_placeholders: false,
            max_issues: MAX_ISSUES,
            min_severity: Severity::Warning,
        }
    }
}

impl ValidatorConfig {
    /// Errors only.
    pub fn errors_only() -> Self {
        Self {
            check_warnings: false,
            min_severity: Severity::Error,
            ..Self::default()
        }
    }

    pub fn with_warnings(mut self, enabled: bool) -> Self {
        self.check_warnings = enabled;
        self
    }

    pub fn with_extension_reports(mut self, enabled: bool) -> Self {
        self.report_extensions = enabled;
        self
    }

    pub fn with_required_tags(mut self, enabled: bool) -> Self {
        self.check_required_tags = enabled;
        self
    }

    pub fn with_placeholders(mut self, enabled: bool) -> Self {
        self.allow_placeholders = enabled;
        self
    }

    pub fn with_max_issues(mut self, max: usize) -> Self {
        self.max_issues = max;
        self
    }

    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> HedResult<()> {
        if self.max_issues == 0 {
            return Err(HedError::invalid_parameter("max_issues must be at least 1"));
        }
        if self.max_issues > MAX_ISSUES * 100 {
            return Err(HedError::invalid_parameter(format!(
                "max_issues too large: {} (max: {})",
                self.max_issues,
                MAX_ISSUES * 100
            )));
        }
        if !self.check_warnings && self.min_severity == Severity::Warning && self.report_extensions {
            return Err(HedError::invalid_parameter(
                "report_extensions produces warnings but check_warnings is off",
            ));
        }
        Ok(())
    }

    /// True if the issue passes the severity filters.
    pub fn keeps(&self, issue: &Issue) -> bool {
        issue.severity() >= self.min_severity && (self.check_warnings || issue.is_error())
    }

    /// Apply the severity filters and the issue cap.
    pub fn finish(&self, issues: Vec<Issue>) -> Vec<Issue> {
        let mut kept: Vec<Issue> = issues.into_iter().filter(|i| self.keeps(i)).collect();
        if kept.len() > self.max_issues {
            warn!(
                total = kept.len(),
                limit = self.max_issues,
                "issue limit reached, truncating"
            );
            kept.truncate(self.max_issues);
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hed_core::{HedErrorKind, IssueKind};

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert!(config.check_warnings);
        assert!(!config.report_extensions);
        assert_eq!(config.max_issues, MAX_ISSUES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let err = ValidatorConfig::default().with_max_issues(0).validate().unwrap_err();
        assert_eq!(err.kind, HedErrorKind::InvalidParameter);
    }

    #[test]
    fn test_validate_rejects_contradiction() {
        let config = ValidatorConfig::default()
            .with_warnings(false)
            .with_extension_reports(true);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_finish_filters_and_truncates() {
        let issues = vec![
            Issue::new(IssueKind::StyleWarning, "style"),
            Issue::new(IssueKind::TagEmpty, "a"),
            Issue::new(IssueKind::TagEmpty, "b"),
        ];
        let errors = ValidatorConfig::errors_only().finish(issues.clone());
        assert_eq!(errors.len(), 2);

        let capped = ValidatorConfig::default().with_max_issues(1).finish(issues);
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].kind(), IssueKind::StyleWarning);
    }
}
