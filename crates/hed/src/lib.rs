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

//! # HED - Hierarchical Event Descriptors
//!
//! Validation of HED annotation strings against a schema, `Definition`
//! expansion, and assembly of `Onset`/`Offset`/`Duration` annotations into
//! timed events.
//!
//! ## Quick Start
//!
//! ```rust
//! use hed::schema::{SchemaBuilder, SchemaGroup};
//!
//! let schema = SchemaBuilder::new()
//!     .tag("Event", &[])
//!     .tag("Event/Sensory-event", &[])
//!     .tag("Item", &["extensionAllowed"])
//!     .build()
//!     .unwrap();
//! let schemas = SchemaGroup::from(schema);
//!
//! assert!(hed::validate_string("Sensory-event, (Item/Drum)", &schemas).is_empty());
//!
//! let issues = hed::validate_string("Event/Drum", &schemas);
//! assert_eq!(issues[0].code(), "invalidExtension");
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: schema model, builder, resolution and compliance
//! - [`validate`]: validators, definitions and temporal assembly
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for issues and spans

pub use hed_core::{
    has_errors, parse_hed_string, CanonicalTag, ContextEntry, HedError, HedErrorKind, HedGroup,
    HedNode, HedResult, HedString, HedTag, Issue, IssueCategory, IssueKind, Severity, Span,
};

mod issue_ext;
pub use issue_ext::IssuesExt;

pub mod schema {
    //! Schema model and resolution
    pub use hed_schema::keys::{attr, special};
    pub use hed_schema::{
        ComplianceCheck, Schema, SchemaBuilder, SchemaEntry, SchemaGroup, SchemaSection,
        SectionKey, TagAttributes, UnitSplit,
    };
}

pub mod validate {
    //! Validation passes
    pub use hed_validate::{
        canonicalize, Assembly, Definition, DefinitionTable, DocumentReport, EventAssembler,
        EventContents, EventState, GroupValidator, HedValidator, Inset, TagContext, TagValidator,
        TemporalEvent, ValidatorConfig,
    };
}

use hed_schema::{ComplianceCheck, SchemaGroup};
use hed_validate::{canonicalize, Assembly, DefinitionTable, EventAssembler, HedValidator};

/// Validate one HED string with the default configuration.
///
/// `Def` references are not resolved; use [`validate::HedValidator`] with a
/// [`validate::DefinitionTable`] for that.
#[inline]
pub fn validate_string(hed: &str, schemas: &SchemaGroup) -> Vec<Issue> {
    HedValidator::new(schemas).validate_string(hed)
}

/// Run the schema self-check on a schema or a whole group.
///
/// # Examples
///
/// ```rust
/// use hed::schema::SchemaBuilder;
///
/// let schema = SchemaBuilder::new().tag("Event", &[]).tag("event-like", &[]).build().unwrap();
/// assert!(hed::check_compliance(&schema, false).is_empty());
/// assert_eq!(hed::check_compliance(&schema, true)[0].code(), "invalidCaps");
/// ```
#[inline]
pub fn check_compliance(target: &impl ComplianceCheck, include_warnings: bool) -> Vec<Issue> {
    target.check_compliance(include_warnings)
}

/// Collect the definitions of a document given as its HED strings.
///
/// Issues (duplicate names, names that are schema tags) are returned with
/// the index of the string they came from as their row.
pub fn extract_definitions(document: &[&str], schemas: &SchemaGroup) -> (DefinitionTable, Vec<Issue>) {
    let mut table = DefinitionTable::new();
    let mut issues = Vec::new();
    for (row, hed) in document.iter().enumerate() {
        let (parsed, _) = HedString::parse(hed);
        let (_, found) = table.extract(parsed.root(), schemas);
        issues.extend(found.into_iter().map(|issue| issue.with_row(row)));
    }
    (table, issues)
}

/// Parse `hed` and replace its `Def` references with `Def-expand` groups.
///
/// # Examples
///
/// ```rust
/// let schemas = hed_test::standard_group();
/// let (table, _) = hed::extract_definitions(&["(Definition/Stim, (Red))"], &schemas);
/// let (expanded, issues) = hed::expand("Def/Stim, Boat", &table, &schemas);
/// assert!(issues.is_empty());
/// assert_eq!(expanded.children_string(), "(Def-expand/Stim, (Red)), Boat");
/// ```
pub fn expand(hed: &str, table: &DefinitionTable, schemas: &SchemaGroup) -> (HedGroup, Vec<Issue>) {
    let (parsed, mut issues) = HedString::parse(hed);
    let mut root = parsed.into_root();
    canonicalize(&mut root, schemas);
    issues.extend(table.expand(&mut root, schemas));
    (root, issues)
}

/// Assemble temporal events from `(row index, time, HED string)` rows.
///
/// Definitions are gathered from all rows first. Rows out of order are an
/// error.
pub fn assemble_events(rows: &[(usize, f64, &str)], schemas: &SchemaGroup) -> HedResult<Assembly> {
    let mut table = DefinitionTable::new();
    let mut trees = Vec::with_capacity(rows.len());
    let mut issues = Vec::new();
    for &(index, time, hed) in rows {
        let (parsed, _) = HedString::parse(hed);
        let (remaining, found) = table.extract(parsed.root(), schemas);
        issues.extend(found.into_iter().map(|issue| issue.with_row(index)));
        trees.push((index, time, remaining));
    }

    let mut assembler = EventAssembler::new(&table, schemas);
    for (index, time, root) in &trees {
        assembler.push(*index, *time, root)?;
    }
    let mut assembly = assembler.finish();
    issues.append(&mut assembly.issues);
    assembly.issues = issues;
    Ok(assembly)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use hed_test::{codes, library_group, standard_group, standard_schema};

    #[test]
    fn test_validate_string() {
        let schemas = standard_group();
        assert!(validate_string("Duration/3 ms", &schemas).is_empty());
        assert_eq!(codes(&validate_string("Duration/3", &schemas)), vec!["HED_UNITS_DEFAULT_USED"]);
    }

    #[test]
    fn test_check_compliance_group() {
        assert!(check_compliance(&library_group(), true).is_empty());
        assert!(check_compliance(&standard_schema(), true).is_empty());
    }

    #[test]
    fn test_extract_definitions_rows() {
        let schemas = standard_group();
        let (table, issues) = extract_definitions(
            &["(Definition/A, (Red))", "Boat", "(Definition/a, (Boat))"],
            &schemas,
        );
        assert_eq!(table.len(), 1);
        assert_eq!(codes(&issues), vec!["duplicateDefinition"]);
        assert_eq!(issues[0].row(), Some(2));
    }

    #[test]
    fn test_assemble_events() {
        let schemas = standard_group();
        let rows = [
            (0, 0.0, "(Definition/X)"),
            (1, 0.5, "(Onset, Def/X)"),
            (2, 1.0, "(Offset, Def/X)"),
        ];
        let assembly = assemble_events(&rows, &schemas).unwrap();
        assert!(assembly.issues.is_empty());
        assert_eq!(assembly.events.len(), 1);
        assert_eq!(assembly.events[0].end_index(), Some(2));
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
