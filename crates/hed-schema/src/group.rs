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

//! Multi-schema routing by library prefix.

use crate::entry::SchemaEntry;
use crate::schema::Schema;
use hed_core::{
    split_prefix, CanonicalTag, HedError, HedResult, Issue, IssueKind, Span, NAMESPACE_DELIMITER,
};
use std::collections::BTreeMap;

/// A set of schemas keyed by library prefix; `""` is the default schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaGroup {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaGroup {
    /// Combine schemas. Two schemas sharing a prefix is an error.
    pub fn new(schemas: impl IntoIterator<Item = Schema>) -> HedResult<Self> {
        let mut map = BTreeMap::new();
        for schema in schemas {
            let prefix = schema.prefix().to_string();
            if map.insert(prefix.clone(), schema).is_some() {
                return Err(HedError::duplicate_prefix(format!(
                    "multiple schemas share the prefix '{}'",
                    prefix
                )));
            }
        }
        Ok(Self { schemas: map })
    }

    pub fn schema(&self, prefix: &str) -> Option<&Schema> {
        self.schemas.get(prefix)
    }

    pub fn default_schema(&self) -> Option<&Schema> {
        self.schema("")
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Pick the schema for a possibly prefixed tag.
    ///
    /// Returns the schema, the tag body, and the byte offset of the body
    /// within `text`.
    pub fn route<'a>(&self, text: &'a str) -> Result<(&Schema, &'a str, usize), Issue> {
        let (prefix, body) = split_prefix(text);
        let key = prefix.unwrap_or("");
        let offset = text.len() - body.len();
        match self.schemas.get(key) {
            Some(schema) => Ok((schema, body, offset)),
            None => {
                let shown = prefix
                    .map(|p| format!("{}{}", p, NAMESPACE_DELIMITER))
                    .unwrap_or_default();
                let known: Vec<_> = self.prefixes().map(|p| format!("'{}'", p)).collect();
                Err(Issue::new(
                    IssueKind::UnknownPrefix,
                    format!(
                        "Unknown schema prefix '{}'; known prefixes: {}",
                        shown,
                        known.join(", ")
                    ),
                )
                .with_span(Span::new(0, offset.max(shown.len()))))
            }
        }
    }

    /// Route and resolve; issue spans are relative to `text`.
    pub fn resolve(&self, text: &str) -> Result<CanonicalTag, Issue> {
        let (schema, body, offset) = self.route(text)?;
        schema.resolve(body).map_err(|issue| issue.shifted(offset))
    }

    /// Schema entry a resolved tag points at.
    pub fn entry(&self, tag: &CanonicalTag) -> Option<&SchemaEntry> {
        self.schema(&tag.prefix)?.tag(&tag.long_base)
    }

    /// Schema that resolved tag belongs to.
    pub fn schema_for(&self, tag: &CanonicalTag) -> Option<&Schema> {
        self.schema(&tag.prefix)
    }

    /// Tags carrying an attribute across all schemas, as prefixed long names.
    pub fn tags_with_attribute(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        for (prefix, schema) in &self.schemas {
            for entry in schema.tags_with_attribute(name) {
                if prefix.is_empty() {
                    out.push(entry.long_name().to_string());
                } else {
                    out.push(format!("{}{}{}", prefix, NAMESPACE_DELIMITER, entry.long_name()));
                }
            }
        }
        out
    }
}

impl From<Schema> for SchemaGroup {
    fn from(schema: Schema) -> Self {
        let mut schemas = BTreeMap::new();
        schemas.insert(schema.prefix().to_string(), schema);
        Self { schemas }
    }
}
